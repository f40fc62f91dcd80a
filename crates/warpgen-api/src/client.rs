// Provisioning service HTTP client
//
// Wraps `reqwest::Client` with the three service URLs, status checking, and
// body decoding. The per-service calls (keys, registration, directory) are
// inherent methods implemented in their own files to keep this module
// focused on transport mechanics.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::KeysMethod;
use crate::transport::TransportConfig;

/// Where the provisioning services live and how to talk to them.
#[derive(Debug, Clone)]
pub struct ServiceUrls {
    /// Keypair service.
    pub keys: Url,
    /// HTTP method for the keypair service.
    pub keys_method: KeysMethod,
    /// Account registration service.
    pub register: Url,
    /// Optional endpoint directory.
    pub directory: Option<Url>,
    /// Send the mobile-client emulation headers on registration.
    pub client_headers: bool,
}

/// Raw HTTP client for the provisioning services.
///
/// Every method performs exactly one round trip and never retries; retry
/// policy belongs to the caller.
pub struct ProvisioningClient {
    http: reqwest::Client,
    urls: ServiceUrls,
    timeout_secs: u64,
}

impl ProvisioningClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(urls: ServiceUrls, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            urls,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, urls: ServiceUrls) -> Self {
        Self {
            http,
            urls,
            timeout_secs: 0,
        }
    }

    /// The configured service URLs.
    pub fn urls(&self) -> &ServiceUrls {
        &self.urls
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a prepared request, mapping timeouts to `Error::Timeout`.
    pub(crate) async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, Error> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else {
                Error::Transport(e)
            }
        })
    }

    /// Read the body of a response, failing on any non-2xx status.
    pub(crate) async fn read_body(&self, resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        let url = resp.url().to_string();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            debug!(status = status.as_u16(), %url, "service returned error status");
            return Err(Error::Status {
                status: status.as_u16(),
                url,
                body,
            });
        }

        Ok(body)
    }

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.send(self.http.get(url)).await?;
        let body = self.read_body(resp).await?;
        decode_json(&body)
    }
}

/// Decode a JSON body, keeping the raw text on failure.
pub(crate) fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.to_owned(),
    })
}
