//! Outbound address discovery.
//!
//! Connecting a UDP socket sends no packets but makes the OS pick the
//! interface it would route through, which `local_addr` then reports.

use std::io;
use std::net::IpAddr;
use tokio::net::UdpSocket;

/// Public address used to select the default route.
pub const PROBE_TARGET: &str = "8.8.8.8:80";

/// Local IP of the interface used for outbound traffic.
pub async fn discover() -> io::Result<IpAddr> {
    discover_via(PROBE_TARGET).await
}

/// Local IP of the interface that routes to `target`.
pub async fn discover_via(target: &str) -> io::Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect(target).await?;
    Ok(socket.local_addr()?.ip())
}
