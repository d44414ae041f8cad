//! Startup diagnostics.
//!
//! Nothing here can stop the service from starting.

use crate::net::outbound_ip;

/// Environment variable holding the address this host advertises.
pub const ADDRESS_ENV: &str = "IP_ADDRESS";

/// Log the advertised and discovered addresses of this host.
pub async fn log_diagnostics() {
    let advertised = std::env::var(ADDRESS_ENV).unwrap_or_default();
    tracing::info!(ip_address = %advertised, "Advertised address");

    match outbound_ip::discover().await {
        Ok(ip) => tracing::info!(outbound_ip = %ip, "Outbound address discovered"),
        Err(e) => tracing::warn!(
            error = %e,
            "Could not determine outbound address, continuing startup"
        ),
    }
}
