//! Network helpers.
//!
//! The listener itself lives in `http::server`; this module only holds
//! diagnostics about the host's network identity.

pub mod outbound_ip;
