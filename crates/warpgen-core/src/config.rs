// ── Runtime provisioning configuration ──
//
// Everything one pipeline run needs: where the services live, how to pick
// keys and endpoints, and the constants the formatters interpolate.
// Built by the CLI from profiles and flags; core never reads config files.

use std::time::Duration;

use url::Url;

use warpgen_api::{KeysMethod, ServiceUrls, TlsMode, TransportConfig};

use crate::error::CoreError;
use crate::model::{DeviceSettings, Endpoint, KeySource, WELL_KNOWN_ENDPOINT};
use crate::render::RenderSettings;
use crate::reserved::ReservedMode;

pub const DEFAULT_KEYS_URL: &str = "https://ancient.hmidreza13799.workers.dev/keys";
pub const DEFAULT_REGISTER_URL: &str = "https://ancient.hmidreza13799.workers.dev/wg";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const MIN_MTU: u16 = 576;
pub const MAX_MTU: u16 = 9000;

/// Configuration for a [`Provisioner`](crate::Provisioner).
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    pub keys_url: String,
    pub keys_method: KeysMethod,
    pub key_source: KeySource,
    pub register_url: String,
    /// Endpoint directory; `None` means the built-in fallback list.
    pub directory_url: Option<String>,
    /// Send the mobile-client emulation headers on registration.
    pub client_headers: bool,
    /// Endpoint used for `EndpointChoice::Default` and empty families.
    pub default_endpoint: String,
    pub render: RenderSettings,
    pub reserved_mode: ReservedMode,
    /// Reuse one keypair across attempts until it is refused.
    pub cache_keys: bool,
    pub device: DeviceSettings,
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            keys_url: DEFAULT_KEYS_URL.into(),
            keys_method: KeysMethod::default(),
            key_source: KeySource::default(),
            register_url: DEFAULT_REGISTER_URL.into(),
            directory_url: None,
            client_headers: true,
            default_endpoint: WELL_KNOWN_ENDPOINT.into(),
            render: RenderSettings::default(),
            reserved_mode: ReservedMode::default(),
            cache_keys: false,
            device: DeviceSettings::default(),
            tls: TlsMode::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ProvisionConfig {
    /// Check every field that can be wrong without touching the network.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.service_urls()?;
        self.fallback_endpoint()?;

        for (name, mtu) in [("mtu", self.render.mtu), ("uri_mtu", self.render.uri_mtu)] {
            if !(MIN_MTU..=MAX_MTU).contains(&mtu) {
                return Err(config_error(format!(
                    "{name} {mtu} is outside {MIN_MTU}..={MAX_MTU}"
                )));
            }
        }

        if self.render.dns.is_empty() {
            return Err(config_error("dns needs at least one resolver"));
        }

        if self.render.uri_label.trim().is_empty() {
            return Err(config_error("uri_label cannot be empty"));
        }

        Ok(())
    }

    /// Parsed service URLs for the API client.
    pub fn service_urls(&self) -> Result<ServiceUrls, CoreError> {
        Ok(ServiceUrls {
            keys: parse_url("keys_url", &self.keys_url)?,
            keys_method: self.keys_method,
            register: parse_url("register_url", &self.register_url)?,
            directory: self
                .directory_url
                .as_deref()
                .map(|raw| parse_url("directory_url", raw))
                .transpose()?,
            client_headers: self.client_headers,
        })
    }

    pub fn fallback_endpoint(&self) -> Result<Endpoint, CoreError> {
        Endpoint::new(&self.default_endpoint)
            .ok_or_else(|| config_error("default_endpoint cannot be empty"))
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
            ..TransportConfig::default()
        }
    }
}

fn parse_url(field: &str, raw: &str) -> Result<Url, CoreError> {
    let url = Url::parse(raw.trim()).map_err(|e| config_error(format!("{field} '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(config_error(format!(
            "{field} '{raw}': unsupported scheme '{other}'"
        ))),
    }
}

fn config_error(message: impl Into<String>) -> CoreError {
    CoreError::Config {
        message: message.into(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ProvisionConfig::default();
        config.validate().unwrap();
        let urls = config.service_urls().unwrap();
        assert_eq!(urls.keys.as_str(), DEFAULT_KEYS_URL);
        assert!(urls.directory.is_none());
        assert!(urls.client_headers);
    }

    #[test]
    fn rejects_bad_urls() {
        let config = ProvisionConfig {
            register_url: "not a url".into(),
            ..ProvisionConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("register_url"), "{err}");

        let config = ProvisionConfig {
            directory_url: Some("ftp://example.com/list".into()),
            ..ProvisionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_blank_default_endpoint() {
        let config = ProvisionConfig {
            default_endpoint: "  ".into(),
            ..ProvisionConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config { .. })));
    }

    #[test]
    fn rejects_out_of_range_mtu() {
        for mtu in [0, 575, 9001] {
            let mut config = ProvisionConfig::default();
            config.render.mtu = mtu;
            assert!(config.validate().is_err(), "mtu {mtu} accepted");
        }
        let mut config = ProvisionConfig::default();
        config.render.uri_mtu = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_dns() {
        let mut config = ProvisionConfig::default();
        config.render.dns.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("dns"), "{err}");
    }

    #[test]
    fn transport_carries_timeout() {
        let config = ProvisionConfig {
            timeout: Duration::from_secs(5),
            ..ProvisionConfig::default()
        };
        assert_eq!(config.transport().timeout_secs(), 5);
    }
}
