//! Provision command handler.

use std::path::Path;
use std::time::Duration;

use warpgen_config::Config;
use warpgen_core::{CoreError, EndpointChoice, Provisioned, Provisioner, ReservedMode};

use crate::cli::{GlobalOpts, ProvisionArgs, ShowArg};
use crate::config;
use crate::error::CliError;
use crate::output;

const RETRY_BACKOFF: Duration = Duration::from_millis(250);

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: ProvisionArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let format = config::output_format(global, cfg);
    let resolved = config::resolve(global, cfg)?;

    // Refuse before registering an account that would have nowhere to go.
    if let Some(path) = &args.write {
        check_writable(path, args.force)?;
    }

    let mut provision = resolved.provision;
    if args.strict_reserved {
        provision.reserved_mode = ReservedMode::Strict;
    }
    let choice = args
        .endpoint
        .map_or_else(|| resolved.profile.endpoint_choice(), EndpointChoice::from);

    let provisioner = Provisioner::new(provision)?;
    let pb = output::spinner("Registering account...", global.quiet);
    let result = provision_with_retries(&provisioner, choice, args.retries).await;
    pb.finish_and_clear();
    let provisioned = result?;

    let color = output::should_color_stderr(global.color);
    for warning in &provisioned.warnings {
        output::warn(warning, color);
    }

    if let Some(path) = &args.write {
        std::fs::write(path, &provisioned.wireguard)?;
        output::status(
            format!("✓ WireGuard config written to {}", path.display()),
            global.quiet,
        );
    }

    let color = output::should_color(global.color);
    let out = output::render_single(format, &provisioned, |p| text(p, args.show, color))?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────

fn check_writable(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::FileExists {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

/// Run the pipeline, re-running the whole attempt on retryable failures.
async fn provision_with_retries(
    provisioner: &Provisioner,
    choice: EndpointChoice,
    retries: u32,
) -> Result<Provisioned, CoreError> {
    let mut attempt = 0;
    loop {
        match provisioner.provision(choice).await {
            Ok(p) => return Ok(p),
            Err(e) if e.is_retryable() && attempt < retries => {
                attempt += 1;
                tracing::warn!(attempt, max = retries, error = %e, "provisioning failed; retrying");
                tokio::time::sleep(RETRY_BACKOFF * attempt).await;
            }
            Err(e) => return Err(e),
        }
    }
}

fn text(p: &Provisioned, show: ShowArg, color: bool) -> String {
    match show {
        ShowArg::Wireguard => p.wireguard.clone(),
        ShowArg::Uri => p.tunnel_uri.clone(),
        ShowArg::Both => format!(
            "{}\n{}\n\n{}\n{}",
            output::heading("WireGuard", color),
            p.wireguard.trim_end(),
            output::heading("Tunnel URI", color),
            p.tunnel_uri,
        ),
    }
}
