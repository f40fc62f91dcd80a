// warpgen-core: Provisioning pipeline between warpgen-api and the CLI.

pub mod config;
pub mod convert;
pub mod error;
pub mod keycache;
pub mod model;
pub mod provisioner;
pub mod render;
pub mod reserved;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ProvisionConfig;
pub use error::{CoreError, DecodeError, Warning};
pub use keycache::KeyCache;
pub use provisioner::{Provisioned, Provisioner};
pub use render::{RenderSettings, render_tunnel_uri, render_wireguard};
pub use reserved::{ReservedBytes, ReservedMode, decode_or_default, decode_reserved};
pub use validate::validate;

pub use model::{
    DeviceIdentity, DeviceSettings, Endpoint, EndpointChoice, EndpointDirectory, KeySource,
    Keypair, RegistrationResult, WELL_KNOWN_ENDPOINT, select_endpoint, select_endpoint_with,
};

// Transport knobs the CLI needs without depending on warpgen-api directly.
pub use warpgen_api::{KeysMethod, TlsMode};
