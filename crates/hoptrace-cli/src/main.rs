//! CLI for hoptrace.

mod geo;
mod output;
mod resolve;
mod runner;

use clap::Parser;
use hoptrace_core::{ProbePolicy, TraceConfig, TraceParams};
use std::process::ExitCode;
use std::time::Duration;

/// Hoptrace - ICMP hop discovery tool.
#[derive(Parser, Debug)]
#[command(name = "hoptrace")]
#[command(version)]
#[command(about = "Hoptrace - ICMP hop discovery tool")]
pub struct Args {
    /// Target hostname or IP address.
    #[arg(required = true)]
    pub target: String,

    /// Maximum TTL to probe.
    #[arg(short = 'm', long = "max-hops", default_value = "30")]
    pub max_hops: u8,

    /// Timeout per probe in milliseconds.
    #[arg(short = 't', long, default_value = "1000")]
    pub timeout: u64,

    /// Probe scheduling mode (parallel, serial).
    #[arg(long, default_value = "parallel")]
    pub mode: String,

    /// Skip hop location lookups.
    #[arg(long = "no-location")]
    pub no_location: bool,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Convert CLI args to TraceConfig.
    fn to_config(&self) -> Result<TraceConfig, String> {
        let policy: ProbePolicy = self
            .mode
            .parse()
            .map_err(|e| format!("Invalid mode: {}", e))?;

        let config = TraceConfig {
            target: self.target.clone(),
            params: TraceParams {
                max_hops: self.max_hops,
                probe_timeout: Duration::from_millis(self.timeout),
                policy,
            },
            lookup_location: !self.no_location,
        };
        config.params.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Logging goes to stderr; stdout carries only the report
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match args.to_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runner::run_trace(config).await {
        Ok(report) => {
            if args.json {
                match report.to_json() {
                    Ok(text) => {
                        println!("{}", text);
                        ExitCode::SUCCESS
                    }
                    Err(e) => {
                        eprintln!("Failed to serialize report: {}", e);
                        ExitCode::FAILURE
                    }
                }
            } else {
                print!("{}", output::render(&report));
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Traceroute failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
