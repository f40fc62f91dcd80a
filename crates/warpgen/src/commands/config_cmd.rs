//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Select};

use warpgen_config::{self as wcfg, Config, Profile};
use warpgen_core::config::{DEFAULT_KEYS_URL, DEFAULT_REGISTER_URL};
use warpgen_core::{EndpointChoice, KeySource};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn profile_list(cfg: &Config) -> String {
    let default = cfg.default_profile.as_deref().unwrap_or(wcfg::DEFAULT_PROFILE);
    cfg.profiles
        .keys()
        .map(|name| {
            let marker = if name == default { " *" } else { "" };
            format!("{name}{marker}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn set_default(cfg: &mut Config, name: String) -> Result<(), CliError> {
    if !cfg.profiles.contains_key(&name) {
        return Err(wcfg::ConfigError::ProfileNotFound {
            name,
            available: cfg.profiles.keys().cloned().collect(),
        }
        .into());
    }
    cfg.default_profile = Some(name);
    Ok(())
}

/// Guided setup for one profile.
fn prompt_profile(existing: Option<&Profile>) -> Result<Profile, CliError> {
    let mut profile = existing.cloned().unwrap_or_default();

    let sources = &[
        "Keys service (remote)",
        "Generate locally (X25519)",
    ];
    let current = usize::from(profile.key_source == Some(KeySource::Local));
    let source = Select::new()
        .with_prompt("Where should keypairs come from?")
        .items(sources)
        .default(current)
        .interact()
        .map_err(prompt_err)?;

    if source == 0 {
        profile.key_source = Some(KeySource::Remote);
        let keys_url: String = Input::new()
            .with_prompt("Keys service URL")
            .default(profile.keys_url.clone().unwrap_or_else(|| DEFAULT_KEYS_URL.into()))
            .interact_text()
            .map_err(prompt_err)?;
        profile.keys_url = Some(keys_url);
    } else {
        profile.key_source = Some(KeySource::Local);
    }

    let register_url: String = Input::new()
        .with_prompt("Registration service URL")
        .default(
            profile
                .register_url
                .clone()
                .unwrap_or_else(|| DEFAULT_REGISTER_URL.into()),
        )
        .interact_text()
        .map_err(prompt_err)?;
    profile.register_url = Some(register_url);

    let directory_url: String = Input::new()
        .with_prompt("Endpoint directory URL (blank for built-in)")
        .default(profile.directory_url.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    profile.directory_url = Some(directory_url.trim().to_owned()).filter(|u| !u.is_empty());

    let choices = [
        EndpointChoice::Default,
        EndpointChoice::Ipv4,
        EndpointChoice::Ipv6,
    ];
    let current = choices
        .iter()
        .position(|c| *c == profile.endpoint_choice())
        .unwrap_or(0);
    let endpoint = Select::new()
        .with_prompt("Default endpoint")
        .items(&choices)
        .default(current)
        .interact()
        .map_err(prompt_err)?;
    profile.endpoint = Some(choices[endpoint]);

    Ok(profile)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            // An unreadable file is reported, never replaced.
            let mut cfg = config::load()?;
            let config_path = wcfg::config_path();
            eprintln!("warpgen configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let name: String = Input::new()
                .with_prompt("Profile name")
                .default(
                    global
                        .profile
                        .clone()
                        .unwrap_or_else(|| wcfg::DEFAULT_PROFILE.into()),
                )
                .interact_text()
                .map_err(prompt_err)?;

            let profile = prompt_profile(cfg.profiles.get(&name))?;
            cfg.profiles.insert(name.clone(), profile);

            let make_default = cfg.default_profile.as_deref() == Some(name.as_str())
                || Confirm::new()
                    .with_prompt(format!("Make '{name}' the default profile?"))
                    .default(true)
                    .interact()
                    .map_err(prompt_err)?;
            if make_default {
                cfg.default_profile = Some(name.clone());
            }

            // Reject a profile that would not resolve before writing it.
            cfg.profile(&name)?
                .to_provision_config(cfg.defaults.timeout)?;

            let path = wcfg::save_config(&cfg)?;
            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("  Profile: {name}");
            eprintln!("\n  Try it: warpgen provision -p {name}");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load()?;
            let out = match config::output_format(global, &cfg) {
                OutputFormat::Text => {
                    toml::to_string_pretty(&cfg).map_err(|e| CliError::Render(e.to_string()))?
                }
                structured => output::render_single(structured, &cfg, |_| String::new())?,
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", wcfg::config_path().display());
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = wcfg::load_config_or_default();
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: warpgen config init");
            } else {
                output::print_output(&profile_list(&cfg), global.quiet);
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load()?;
            set_default(&mut cfg, name.clone())?;
            wcfg::save_config(&cfg)?;
            output::status(format!("✓ Default profile set to '{name}'"), global.quiet);
            Ok(())
        }
    }
}
