// warpgen-api: Async client for WireGuard identity provisioning services

pub mod client;
pub mod directory;
pub mod error;
pub mod keys;
pub mod models;
pub mod register;
pub mod transport;

pub use client::{ProvisioningClient, ServiceUrls};
pub use error::Error;
pub use keys::parse_keys;
pub use models::{EndpointList, KeysMethod, KeysPayload, RegisterRequest, RegistrationResponse};
pub use transport::{TlsMode, TransportConfig};
