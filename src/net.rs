//! Local address detection.

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::debug;

/// Public address used only to pick a route; nothing is sent to it.
const ROUTE_PROBE: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 80);

/// The local IPv4 address the OS would use for outbound traffic.
///
/// Connecting a UDP socket only selects a route and source address; no
/// datagram leaves the machine.
pub async fn local_ipv4() -> io::Result<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
    socket.connect(ROUTE_PROBE).await?;

    match socket.local_addr()?.ip() {
        IpAddr::V4(addr) if !addr.is_unspecified() => {
            debug!(%addr, "detected outbound-route local address");
            Ok(addr)
        }
        other => Err(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no usable IPv4 source address (got {})", other),
        )),
    }
}
