// Account registration
//
// Submits the public key together with a synthetic device identity. Some
// registration services only answer clients that look like the official
// mobile app, so the emulation headers are on by default.

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use tracing::debug;

use crate::client::{ProvisioningClient, decode_json};
use crate::error::Error;
use crate::models::{RegisterRequest, RegistrationResponse};

/// `User-Agent` sent when emulating the mobile client.
pub const CLIENT_USER_AGENT: &str = "okhttp/3.12.1";
/// `CF-Client-Version` sent when emulating the mobile client.
pub const CLIENT_VERSION: &str = "a-6.10-2158";

const CLIENT_VERSION_HEADER: &str = "CF-Client-Version";

impl ProvisioningClient {
    /// Register a public key and return the raw service response.
    ///
    /// Shape normalization and the echoed-key check are left to the caller.
    pub async fn register_account(
        &self,
        request: &RegisterRequest,
    ) -> Result<RegistrationResponse, Error> {
        let url = self.urls().register.clone();
        debug!("POST {}", url);

        let mut builder = self
            .http()
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(request);

        if self.urls().client_headers {
            builder = builder
                .header(USER_AGENT, CLIENT_USER_AGENT)
                .header(CLIENT_VERSION_HEADER, CLIENT_VERSION);
        }

        let resp = self.send(builder).await?;
        let body = self.read_body(resp).await?;
        decode_json(&body)
    }
}
