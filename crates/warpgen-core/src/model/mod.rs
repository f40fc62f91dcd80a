// Domain model for the provisioning pipeline.

pub mod endpoint;
pub mod identity;
pub mod keypair;
pub mod registration;

pub use endpoint::{
    Endpoint, EndpointChoice, EndpointDirectory, WELL_KNOWN_ENDPOINT, select_endpoint,
    select_endpoint_with,
};
pub use identity::{DeviceIdentity, DeviceSettings};
pub use keypair::{KeySource, Keypair};
pub use registration::RegistrationResult;
