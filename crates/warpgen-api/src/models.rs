// Wire types for the provisioning services
//
// Request bodies are serialized exactly as the registration service expects
// them. Response types stay close to the JSON and use `#[serde(default)]`
// liberally, because the services have changed shape across API revisions.
// Normalization into domain types happens in `warpgen-core`.

use serde::{Deserialize, Serialize};

// ── Keys ─────────────────────────────────────────────────────────────

/// A keypair as returned by the keys service, before any domain checks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeysPayload {
    #[serde(alias = "publicKey", alias = "PublicKey")]
    pub public_key: String,
    #[serde(alias = "privateKey", alias = "PrivateKey")]
    pub private_key: String,
}

/// HTTP method used against the keys endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeysMethod {
    #[default]
    Post,
    Get,
}

// ── Registration ─────────────────────────────────────────────────────

/// Registration request body.
///
/// One canonical schema for every API revision: the public key travels as
/// `key`, and the synthetic device identity rides along in full.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub key: String,
    pub install_id: String,
    pub fcm_token: String,
    pub tos: String,
    pub model: String,
    pub serial_number: String,
    pub locale: String,
}

/// Any of the known registration response schemas.
///
/// ```json
/// { "success": true, "data": { "key": "...", "peer_public_key": "...", "allowed_ips": [...] } }
/// { "key": "...", "config": { "client_id": "...", "interface": { "addresses": { "v4": "...", "v6": "..." } }, "peers": [...] } }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RegistrationResponse {
    Wrapped(WrappedRegistration),
    Flat(FlatRegistration),
}

/// `{ success, data }` envelope returned by proxying workers.
#[derive(Debug, Clone, Deserialize)]
pub struct WrappedRegistration {
    pub success: bool,
    #[serde(default)]
    pub data: Option<WrappedData>,
    #[serde(default, alias = "error")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WrappedData {
    #[serde(alias = "public_key")]
    pub key: String,
    pub peer_public_key: String,
    /// Assigned addresses, one entry per family, optionally CIDR-qualified.
    #[serde(default)]
    pub allowed_ips: Vec<String>,
    pub client_id: String,
    #[serde(default)]
    pub dns: Vec<String>,
}

/// Account object as returned by the upstream registration API.
#[derive(Debug, Clone, Deserialize)]
pub struct FlatRegistration {
    /// Echo of the submitted public key.
    pub key: String,
    pub config: FlatConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlatConfig {
    pub client_id: String,
    pub interface: Interface,
    #[serde(default)]
    pub peers: Vec<Peer>,
    #[serde(default)]
    pub dns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Interface {
    pub addresses: Addresses,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Addresses {
    pub v4: String,
    pub v6: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Peer {
    pub public_key: String,
}

// ── Endpoint directory ───────────────────────────────────────────────

/// Raw endpoint directory: `host:port` strings keyed by address family.
///
/// Entries are untrusted and unfiltered at this layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EndpointList {
    #[serde(default)]
    pub ipv4: Vec<String>,
    #[serde(default)]
    pub ipv6: Vec<String>,
}
