//! Raw socket transport, one socket per probe.

use async_trait::async_trait;
use hoptrace_core::TraceError;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{IpAddr, SocketAddr};
use tokio::net::UdpSocket;

/// Wire seam for a single probe: send the request once, then yield inbound
/// ICMP datagrams until the probe resolves. Tests drive the engine through
/// scripted implementations of this trait.
#[async_trait]
pub trait ProbeTransport: Send {
    /// Sends the probe packet to the destination.
    async fn send(&mut self, packet: &[u8], destination: IpAddr) -> io::Result<()>;

    /// Reads one inbound datagram (starting at the IP header) and its
    /// source address.
    async fn recv(&mut self, buf: &mut [u8]) -> io::Result<(usize, IpAddr)>;
}

/// Raw ICMP socket scoped to one probe.
///
/// The TTL is baked in at open time. The descriptor closes when the value
/// drops, which happens on every exit path of the probe, so there is no
/// close call to forget or to run twice.
pub struct ProbeSocket {
    socket: UdpSocket,
}

impl ProbeSocket {
    /// Opens a nonblocking raw ICMPv4 socket with the given IP TTL.
    pub fn open(ttl: u8) -> Result<Self, TraceError> {
        let socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))
            .map_err(TraceError::SocketCreation)?;
        socket
            .set_ttl(ttl as u32)
            .map_err(TraceError::SocketCreation)?;
        // Must be nonblocking before handing the fd to tokio
        socket
            .set_nonblocking(true)
            .map_err(TraceError::SocketCreation)?;

        let socket = UdpSocket::from_std(socket.into()).map_err(TraceError::SocketCreation)?;
        Ok(Self { socket })
    }
}

#[async_trait]
impl ProbeTransport for ProbeSocket {
    async fn send(&mut self, packet: &[u8], destination: IpAddr) -> io::Result<()> {
        // ICMP has no ports; the sockaddr still wants one
        let addr = SocketAddr::new(destination, 0);
        self.socket.send_to(packet, addr).await.map(|_| ())
    }

    async fn recv(&mut self, buf: &mut [u8]) -> io::Result<(usize, IpAddr)> {
        let (len, addr) = self.socket.recv_from(buf).await?;
        Ok((len, addr.ip()))
    }
}
