//! Configuration for the warpgen CLI.
//!
//! TOML profiles layered with environment variables, and translation of a
//! profile into `warpgen_core::ProvisionConfig`. The CLI applies its flag
//! overrides on top of the translated value.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use warpgen_core::{
    EndpointChoice, KeySource, KeysMethod, ProvisionConfig, ReservedMode, TlsMode,
};

pub const DEFAULT_PROFILE: &str = "default";
pub const ENV_PREFIX: &str = "WARPGEN_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String, available: Vec<String> },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named provisioning profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    /// text | json | json-compact | yaml
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "text".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    warpgen_core::config::DEFAULT_TIMEOUT_SECS
}

/// A named profile. Every field is optional; unset fields take the
/// built-in defaults of `ProvisionConfig`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys_method: Option<KeysMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_source: Option<KeySource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub register_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_headers: Option<bool>,

    /// Endpoint family used when `--endpoint` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<EndpointChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_endpoint: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_mtu: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_mode: Option<ReservedMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_keys: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// Extra CA certificate (PEM) to trust.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
    /// Accept any TLS certificate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "warpgen", "warpgen").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("warpgen");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load defaults, then `path` (if it exists), then `WARPGEN_*` variables.
///
/// Nested keys are separated by `__`, e.g.
/// `WARPGEN_PROFILES__DEFAULT__MTU=1400`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

impl Config {
    /// `flag` > `default_profile` > `"default"`.
    pub fn active_profile_name(&self, flag: Option<&str>) -> String {
        flag.map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| DEFAULT_PROFILE.into())
    }

    /// Look up a profile by name.
    ///
    /// An absent `"default"` profile is an empty one, so a fresh install
    /// works without any config file.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None if name == DEFAULT_PROFILE => Ok(Profile::default()),
            None => Err(ConfigError::ProfileNotFound {
                name: name.into(),
                available: self.profiles.keys().cloned().collect(),
            }),
        }
    }
}

impl Profile {
    /// Translate into a validated `ProvisionConfig`.
    ///
    /// `default_timeout` applies when the profile sets none.
    pub fn to_provision_config(&self, default_timeout: u64) -> Result<ProvisionConfig, ConfigError> {
        let mut config = ProvisionConfig::default();

        if let Some(url) = &self.keys_url {
            config.keys_url.clone_from(url);
        }
        if let Some(method) = self.keys_method {
            config.keys_method = method;
        }
        if let Some(source) = self.key_source {
            config.key_source = source;
        }
        if let Some(url) = &self.register_url {
            config.register_url.clone_from(url);
        }
        config.directory_url.clone_from(&self.directory_url);
        if let Some(headers) = self.client_headers {
            config.client_headers = headers;
        }
        if let Some(endpoint) = &self.default_endpoint {
            config.default_endpoint.clone_from(endpoint);
        }

        if let Some(dns) = &self.dns {
            config.render.dns = parse_dns(dns)?;
        }
        if let Some(mtu) = self.mtu {
            config.render.mtu = mtu;
        }
        if let Some(mtu) = self.uri_mtu {
            config.render.uri_mtu = mtu;
        }
        if let Some(label) = &self.uri_label {
            config.render.uri_label.clone_from(label);
        }
        if let Some(mode) = self.reserved_mode {
            config.reserved_mode = mode;
        }
        if let Some(cache) = self.cache_keys {
            config.cache_keys = cache;
        }
        if let Some(model) = &self.model {
            config.device.model.clone_from(model);
        }
        if let Some(locale) = &self.locale {
            config.device.locale.clone_from(locale);
        }

        config.tls = if self.insecure.unwrap_or(false) {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ca_path) = &self.ca_cert {
            TlsMode::CustomCa(ca_path.clone())
        } else {
            TlsMode::System
        };
        config.timeout = Duration::from_secs(self.timeout.unwrap_or(default_timeout));

        config.validate().map_err(|e| ConfigError::Validation {
            field: "profile".into(),
            reason: e.to_string(),
        })?;
        Ok(config)
    }

    /// Endpoint family to use when none is requested explicitly.
    pub fn endpoint_choice(&self) -> EndpointChoice {
        self.endpoint.unwrap_or_default()
    }
}

fn parse_dns(entries: &[String]) -> Result<Vec<IpAddr>, ConfigError> {
    entries
        .iter()
        .map(|raw| {
            raw.trim().parse().map_err(|_| ConfigError::Validation {
                field: "dns".into(),
                reason: format!("'{raw}' is not an IP address"),
            })
        })
        .collect()
}
