use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::Serialize;

/// Canonical registration data, independent of the response schema it
/// was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationResult {
    /// Public key the service says it registered.
    pub public_key: String,
    /// The remote peer's public key.
    pub peer_public_key: String,
    pub ipv4: Ipv4Addr,
    pub ipv6: Ipv6Addr,
    /// Opaque base64 client identifier (source of the reserved bytes).
    pub client_id: String,
    /// Provider-supplied DNS servers; empty when none were sent.
    pub dns: Vec<IpAddr>,
}
