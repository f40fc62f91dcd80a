// ── Provisioning pipeline ──
//
// keys ─┐
//       ├─ register ─ validate ─ decode reserved ─ select endpoint ─ render
// dir  ─┘
//
// Directory loading and key acquisition overlap; everything after the
// registration call is local. Any fatal failure aborts the attempt before
// anything is rendered.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use warpgen_api::ProvisioningClient;

use crate::config::ProvisionConfig;
use crate::error::{CoreError, Warning};
use crate::keycache::KeyCache;
use crate::model::{
    DeviceIdentity, Endpoint, EndpointChoice, EndpointDirectory, KeySource, Keypair,
    RegistrationResult, select_endpoint,
};
use crate::render::{render_tunnel_uri, render_wireguard};
use crate::reserved::{ReservedBytes, decode_or_default};
use crate::validate::validate;

/// Output of one successful provisioning attempt.
#[derive(Debug, Clone, Serialize)]
pub struct Provisioned {
    /// INI-style WireGuard config.
    pub wireguard: String,
    /// Single-line `wireguard://` URI.
    pub tunnel_uri: String,
    pub endpoint: Endpoint,
    pub reserved: ReservedBytes,
    pub registration: RegistrationResult,
    /// Conditions recovered from along the way.
    pub warnings: Vec<Warning>,
}

/// Runs the provisioning pipeline.
///
/// Cheaply cloneable; clones share the keypair cache and the in-flight
/// guard, so overlapping [`provision`](Self::provision) calls on any clone
/// are refused.
#[derive(Clone)]
pub struct Provisioner {
    inner: Arc<ProvisionerInner>,
}

struct ProvisionerInner {
    config: ProvisionConfig,
    client: ProvisioningClient,
    fallback: Endpoint,
    keys: KeyCache,
    in_flight: Mutex<()>,
}

impl Provisioner {
    /// Validate `config` and build the HTTP client. Performs no I/O.
    pub fn new(config: ProvisionConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let urls = config.service_urls()?;
        let fallback = config.fallback_endpoint()?;
        let client = ProvisioningClient::new(urls, &config.transport()).map_err(|e| {
            CoreError::Config {
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            inner: Arc::new(ProvisionerInner {
                config,
                client,
                fallback,
                keys: KeyCache::new(),
                in_flight: Mutex::new(()),
            }),
        })
    }

    pub fn config(&self) -> &ProvisionConfig {
        &self.inner.config
    }

    /// Run the whole pipeline once.
    pub async fn provision(&self, choice: EndpointChoice) -> Result<Provisioned, CoreError> {
        let Ok(_guard) = self.inner.in_flight.try_lock() else {
            return Err(CoreError::ProvisioningInProgress);
        };
        info!(%choice, "provisioning started");

        let mut warnings = Vec::new();

        let (directory, keys) = tokio::join!(self.directory_for(choice), self.acquire_keys());
        let (directory, directory_warning) = directory;
        warnings.extend(directory_warning);
        let keys = keys?;

        let registration = self.register(&keys).await?;
        let registration = match validate(keys.public_key(), registration) {
            Ok(r) => r,
            Err(e) => {
                warn!("service returned a different public key; discarding keypair");
                self.inner.keys.invalidate().await;
                return Err(e);
            }
        };
        info!(client_id = %registration.client_id, "account registered");

        let (reserved, reserved_warning) =
            decode_or_default(&registration.client_id, self.inner.config.reserved_mode)?;
        warnings.extend(reserved_warning);

        if choice != EndpointChoice::Default && directory.candidates(choice).is_empty() {
            warnings.push(Warning::EmptyEndpointFamily { family: choice });
        }
        let endpoint = select_endpoint(choice, &directory, &self.inner.fallback);
        debug!(%endpoint, "endpoint selected");

        let render = &self.inner.config.render;
        let wireguard = render_wireguard(&registration, keys.expose_private(), &endpoint, render);
        let tunnel_uri = render_tunnel_uri(
            keys.expose_private(),
            &registration.peer_public_key,
            registration.ipv4,
            registration.ipv6,
            &reserved,
            &endpoint,
            render,
        );

        for w in &warnings {
            warn!("{w}");
        }
        info!(warnings = warnings.len(), "provisioning complete");

        Ok(Provisioned {
            wireguard,
            tunnel_uri,
            endpoint,
            reserved,
            registration,
            warnings,
        })
    }

    // ── Stages ───────────────────────────────────────────────────────

    /// Fetch the endpoint directory.
    ///
    /// With no directory URL configured this is the fallback directory.
    pub async fn load_endpoints(&self) -> Result<EndpointDirectory, CoreError> {
        match self.inner.client.fetch_endpoint_directory().await {
            Ok(Some(list)) => Ok(list.into()),
            Ok(None) => {
                debug!("no endpoint directory configured; using fallback");
                Ok(EndpointDirectory::fallback())
            }
            Err(e) => Err(CoreError::EndpointDirectoryUnavailable {
                reason: e.to_string(),
            }),
        }
    }

    /// Obtain a keypair, from the cache when enabled.
    pub async fn acquire_keys(&self) -> Result<Keypair, CoreError> {
        if self.inner.config.cache_keys {
            self.inner.keys.get_or_fetch(|| self.fresh_keys()).await
        } else {
            self.fresh_keys().await
        }
    }

    /// Register `keys` under a freshly generated device identity.
    pub async fn register(&self, keys: &Keypair) -> Result<RegistrationResult, CoreError> {
        let identity = DeviceIdentity::generate(&self.inner.config.device);
        debug!(install_id = %identity.install_id, "registering account");
        let request = identity.to_request(keys.public_key());

        let response = self
            .inner
            .client
            .register_account(&request)
            .await
            .map_err(|e| CoreError::registration(&e))?;

        RegistrationResult::try_from(response)
    }

    /// Forget the cached keypair.
    pub async fn invalidate_keys(&self) {
        self.inner.keys.invalidate().await;
    }

    async fn fresh_keys(&self) -> Result<Keypair, CoreError> {
        match self.inner.config.key_source {
            KeySource::Local => {
                debug!("generating keypair locally");
                Ok(Keypair::generate())
            }
            KeySource::Remote => {
                let payload = self
                    .inner
                    .client
                    .fetch_keys()
                    .await
                    .map_err(|e| CoreError::key_fetch(&e))?;
                Keypair::try_from(payload)
            }
        }
    }

    async fn directory_for(&self, choice: EndpointChoice) -> (EndpointDirectory, Option<Warning>) {
        if choice == EndpointChoice::Default {
            return (EndpointDirectory::default(), None);
        }
        match self.load_endpoints().await {
            Ok(directory) => (directory, None),
            Err(e) => {
                let reason = match e {
                    CoreError::EndpointDirectoryUnavailable { reason } => reason,
                    other => other.to_string(),
                };
                (
                    EndpointDirectory::fallback(),
                    Some(Warning::EndpointDirectoryUnavailable { reason }),
                )
            }
        }
    }
}
