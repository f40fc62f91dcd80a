// ── Core error types ──
//
// Pipeline-level errors from warpgen-core. Transport failures from
// warpgen-api are folded into the stage they happened in (key fetch,
// registration, directory), so consumers see *what* failed, not how.

use serde::Serialize;
use thiserror::Error;

use crate::model::EndpointChoice;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Recoverable ──────────────────────────────────────────────────
    /// The endpoint directory could not be fetched or parsed.
    ///
    /// The pipeline recovers from this with the fallback directory.
    #[error("Endpoint directory unavailable: {reason}")]
    EndpointDirectoryUnavailable { reason: String },

    /// The client identifier is not decodable into reserved bytes.
    #[error("Cannot decode client identifier: {0}")]
    Decode(#[from] DecodeError),

    // ── Fatal to the attempt ─────────────────────────────────────────
    #[error("Key acquisition failed: {reason}")]
    KeyFetch {
        reason: String,
        status: Option<u16>,
        transient: bool,
    },

    #[error("Account registration failed: {reason}")]
    Registration {
        reason: String,
        status: Option<u16>,
        transient: bool,
    },

    /// The service registered a different key than the one submitted.
    #[error("Registered public key does not match: requested {requested}, service returned {returned}")]
    IdentityMismatch { requested: String, returned: String },

    /// Another provisioning attempt is still running on this provisioner.
    #[error("A provisioning attempt is already in progress")]
    ProvisioningInProgress,

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Whether re-running the whole pipeline could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::KeyFetch { .. } | Self::Registration { .. } | Self::IdentityMismatch { .. }
        )
    }

    pub(crate) fn key_fetch(err: &warpgen_api::Error) -> Self {
        Self::KeyFetch {
            reason: err.to_string(),
            status: err.status(),
            transient: err.is_transient(),
        }
    }

    pub(crate) fn registration(err: &warpgen_api::Error) -> Self {
        Self::Registration {
            reason: err.to_string(),
            status: err.status(),
            transient: err.is_transient(),
        }
    }

    pub(crate) fn malformed_registration(reason: impl Into<String>) -> Self {
        Self::Registration {
            reason: reason.into(),
            status: None,
            transient: false,
        }
    }
}

/// Failure decoding a base64 client identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed base64: {0}")]
    Malformed(String),

    #[error("decoded to {available} byte(s), need 3")]
    TooShort { available: usize },
}

// ── Warnings ─────────────────────────────────────────────────────────

/// A non-fatal condition the pipeline recovered from.
///
/// Returned alongside a successful result so the caller can surface it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Directory fetch failed; the fallback directory was used.
    EndpointDirectoryUnavailable { reason: String },
    /// The requested family had no candidates; the default endpoint was used.
    EmptyEndpointFamily { family: EndpointChoice },
    /// The client identifier held fewer than three bytes; zeros were appended.
    ReservedPadded { available: usize },
    /// The client identifier was not valid base64; `[0, 0, 0]` was used.
    ReservedUndecodable { reason: String },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndpointDirectoryUnavailable { reason } => {
                write!(f, "endpoint directory unavailable ({reason}); using fallback endpoints")
            }
            Self::EmptyEndpointFamily { family } => {
                write!(f, "no {family} endpoints available; using the default endpoint")
            }
            Self::ReservedPadded { available } => {
                write!(f, "client id decoded to {available} byte(s); reserved bytes zero-padded")
            }
            Self::ReservedUndecodable { reason } => {
                write!(f, "client id is not valid base64 ({reason}); reserved bytes set to 0,0,0")
            }
        }
    }
}
