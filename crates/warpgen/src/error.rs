//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help
//! text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use warpgen_config::ConfigError;
use warpgen_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const IDENTITY_MISMATCH: i32 = 3;
    pub const DECODE: i32 = 4;
    pub const IN_PROGRESS: i32 = 6;
    pub const SERVICE: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Remote services ──────────────────────────────────────────────
    #[error("Could not obtain a keypair: {reason}")]
    #[diagnostic(
        code(warpgen::key_fetch),
        help(
            "Check keys_url in your profile, or generate keys locally with --local-keys.\n\
             Transient failures can be retried with --retries N."
        )
    )]
    KeyFetch { reason: String },

    #[error("Account registration failed: {reason}")]
    #[diagnostic(
        code(warpgen::registration),
        help("Check register_url in your profile, or retry with --retries N.")
    )]
    Registration { reason: String },

    #[error("Endpoint directory unavailable: {reason}")]
    #[diagnostic(code(warpgen::directory), help("Check directory_url in your profile."))]
    DirectoryUnavailable { reason: String },

    #[error("Service registered a different public key than the one submitted")]
    #[diagnostic(
        code(warpgen::identity_mismatch),
        help(
            "requested: {requested}\n\
             returned:  {returned}\n\
             No config was written. Retry with --retries N, or use --local-keys."
        )
    )]
    IdentityMismatch { requested: String, returned: String },

    #[error("Cannot decode reserved bytes: {reason}")]
    #[diagnostic(
        code(warpgen::decode),
        help("Drop --strict-reserved (or set reserved_mode = \"lenient\") to zero-fill instead.")
    )]
    Decode { reason: String },

    #[error("A provisioning attempt is already in progress")]
    #[diagnostic(code(warpgen::in_progress))]
    InProgress,

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(warpgen::validation))]
    Validation { field: String, reason: String },

    #[error("Refusing to overwrite {path}")]
    #[diagnostic(code(warpgen::file_exists), help("Pass --force to overwrite it."))]
    FileExists { path: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(warpgen::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: warpgen config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(warpgen::config), help("Config file: {path}"))]
    Config { message: String, path: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(warpgen::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::KeyFetch { .. } | Self::Registration { .. } | Self::DirectoryUnavailable { .. } => {
                exit_code::SERVICE
            }
            Self::IdentityMismatch { .. } => exit_code::IDENTITY_MISMATCH,
            Self::Decode { .. } => exit_code::DECODE,
            Self::InProgress => exit_code::IN_PROGRESS,
            Self::Validation { .. }
            | Self::FileExists { .. }
            | Self::ProfileNotFound { .. }
            | Self::Config { .. } => exit_code::USAGE,
            Self::Io(_) | Self::Render(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::KeyFetch { reason, .. } => CliError::KeyFetch { reason },
            CoreError::Registration { reason, .. } => CliError::Registration { reason },
            CoreError::EndpointDirectoryUnavailable { reason } => {
                CliError::DirectoryUnavailable { reason }
            }
            CoreError::IdentityMismatch {
                requested,
                returned,
            } => CliError::IdentityMismatch {
                requested,
                returned,
            },
            CoreError::Decode(e) => CliError::Decode {
                reason: e.to_string(),
            },
            CoreError::ProvisioningInProgress => CliError::InProgress,
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name, available } => CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
                path: warpgen_config::config_path().display().to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (
                CoreError::KeyFetch {
                    reason: "x".into(),
                    status: Some(503),
                    transient: true,
                },
                exit_code::SERVICE,
            ),
            (
                CoreError::IdentityMismatch {
                    requested: "a".into(),
                    returned: "b".into(),
                },
                exit_code::IDENTITY_MISMATCH,
            ),
            (
                CoreError::Decode(warpgen_core::DecodeError::TooShort { available: 1 }),
                exit_code::DECODE,
            ),
            (CoreError::ProvisioningInProgress, exit_code::IN_PROGRESS),
            (
                CoreError::Config {
                    message: "bad".into(),
                },
                exit_code::USAGE,
            ),
        ];

        for (core, code) in cases {
            let label = core.to_string();
            assert_eq!(CliError::from(core).exit_code(), code, "{label}");
        }
    }

    #[test]
    fn profile_not_found_lists_profiles() {
        let err = CliError::from(ConfigError::ProfileNotFound {
            name: "x".into(),
            available: vec!["a".into(), "b".into()],
        });
        match err {
            CliError::ProfileNotFound { available, .. } => assert_eq!(available, "a, b"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
