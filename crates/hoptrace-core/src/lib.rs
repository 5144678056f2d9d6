//! Core types, traits, and error handling for hoptrace.
//!
//! This crate provides the fundamental abstractions used throughout the
//! hop discovery implementation:
//!
//! - [`HopProber`] trait for probe implementations
//! - [`HopResult`] and other core types
//! - [`TraceError`] for error handling
//! - Report types for trace output

pub mod error;
pub mod execution;
pub mod report;
pub mod traits;
pub mod types;

pub use error::{TraceError, TraceResult};
pub use report::{ReportedHop, TraceReport};
pub use traits::HopProber;
pub use types::{HopReply, HopResult, ProbePolicy, TraceConfig, TraceParams};
