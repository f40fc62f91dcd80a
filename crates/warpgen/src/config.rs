//! Flag-aware configuration resolution.
//!
//! Loads the TOML/env config through `warpgen_config`, picks the active
//! profile, and applies global CLI overrides before anything reaches core.

use std::time::Duration;

use clap::ValueEnum;

use warpgen_config::{Config, Profile};
use warpgen_core::{KeySource, ProvisionConfig, TlsMode};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Active profile plus the `ProvisionConfig` derived from it.
pub struct Resolved {
    pub profile: Profile,
    pub provision: ProvisionConfig,
}

/// Load the config file and `WARPGEN_*` environment layers.
pub fn load() -> Result<Config, CliError> {
    Ok(warpgen_config::load_config()?)
}

/// `--output` > `defaults.output` > text.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&cfg.defaults.output, true).unwrap_or(OutputFormat::Text)
    })
}

/// Translate the active profile and apply flag overrides.
pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<Resolved, CliError> {
    let name = cfg.active_profile_name(global.profile.as_deref());
    let profile = cfg.profile(&name)?;
    let mut provision = profile.to_provision_config(cfg.defaults.timeout)?;

    apply_overrides(global, &mut provision);
    provision.validate()?;

    tracing::debug!(profile = %name, "configuration resolved");
    Ok(Resolved { profile, provision })
}

fn apply_overrides(global: &GlobalOpts, config: &mut ProvisionConfig) {
    if let Some(url) = &global.keys_url {
        config.keys_url.clone_from(url);
    }
    if let Some(url) = &global.register_url {
        config.register_url.clone_from(url);
    }
    if let Some(url) = &global.directory_url {
        config.directory_url = Some(url.clone());
    }
    if global.local_keys {
        config.key_source = KeySource::Local;
    }
    if global.insecure {
        config.tls = TlsMode::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        config.timeout = Duration::from_secs(secs);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["warpgen"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["reserved", "AQID"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_profile() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                keys_url: Some("https://profile.example.com/keys".into()),
                timeout: Some(10),
                ..Profile::default()
            },
        );

        let g = global(&[
            "--keys-url",
            "https://flag.example.com/keys",
            "--local-keys",
            "--timeout",
            "3",
        ]);
        let resolved = resolve(&g, &cfg).unwrap();

        assert_eq!(resolved.provision.keys_url, "https://flag.example.com/keys");
        assert_eq!(resolved.provision.key_source, KeySource::Local);
        assert_eq!(resolved.provision.timeout, Duration::from_secs(3));
    }

    #[test]
    fn invalid_override_is_rejected() {
        let g = global(&["--register-url", "nope"]);
        assert!(matches!(
            resolve(&g, &Config::default()),
            Err(CliError::Validation { .. })
        ));
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let g = global(&["--profile", "missing"]);
        assert!(matches!(
            resolve(&g, &Config::default()),
            Err(CliError::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn output_format_falls_back_to_config() {
        let mut cfg = Config::default();
        cfg.defaults.output = "yaml".into();
        assert_eq!(output_format(&global(&[]), &cfg), OutputFormat::Yaml);
        assert_eq!(
            output_format(&global(&["-o", "json"]), &cfg),
            OutputFormat::Json
        );

        cfg.defaults.output = "bogus".into();
        assert_eq!(output_format(&global(&[]), &cfg), OutputFormat::Text);
    }
}
