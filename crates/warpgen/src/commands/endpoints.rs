//! Endpoint directory listing.

use serde::Serialize;
use tabled::Tabled;

use warpgen_config::Config;
use warpgen_core::{Endpoint, EndpointDirectory, Provisioner};

use crate::cli::{EndpointsArgs, FamilyArg, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct EndpointEntry {
    family: &'static str,
    endpoint: Endpoint,
}

#[derive(Tabled)]
struct EndpointRow {
    #[tabled(rename = "Family")]
    family: &'static str,
    #[tabled(rename = "Endpoint")]
    endpoint: String,
}

impl From<&EndpointEntry> for EndpointRow {
    fn from(e: &EndpointEntry) -> Self {
        Self {
            family: e.family,
            endpoint: e.endpoint.to_string(),
        }
    }
}

fn entries(directory: EndpointDirectory, family: Option<FamilyArg>) -> Vec<EndpointEntry> {
    let mut out = Vec::new();
    if family != Some(FamilyArg::Ipv6) {
        out.extend(directory.ipv4.into_iter().map(|endpoint| EndpointEntry {
            family: "ipv4",
            endpoint,
        }));
    }
    if family != Some(FamilyArg::Ipv4) {
        out.extend(directory.ipv6.into_iter().map(|endpoint| EndpointEntry {
            family: "ipv6",
            endpoint,
        }));
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: &EndpointsArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let format = config::output_format(global, cfg);
    let resolved = config::resolve(global, cfg)?;
    let provisioner = Provisioner::new(resolved.provision)?;

    let pb = output::spinner("Loading endpoints...", global.quiet);
    let loaded = provisioner.load_endpoints().await;
    pb.finish_and_clear();

    let directory = loaded.unwrap_or_else(|e| {
        output::warn(
            format!("{e}; showing fallback endpoints"),
            output::should_color_stderr(global.color),
        );
        EndpointDirectory::fallback()
    });

    let rows = entries(directory, args.family);
    let out = output::render_list(format, &rows, |e| EndpointRow::from(e))?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_filter() {
        let dir = EndpointDirectory::from_untrusted(["1.1.1.1:2408", "2.2.2.2:2408"], ["[::1]:2408"]);

        assert_eq!(entries(dir.clone(), None).len(), 3);

        let v4 = entries(dir.clone(), Some(FamilyArg::Ipv4));
        assert_eq!(v4.len(), 2);
        assert!(v4.iter().all(|e| e.family == "ipv4"));

        let v6 = entries(dir, Some(FamilyArg::Ipv6));
        assert_eq!(v6.len(), 1);
        assert_eq!(v6[0].endpoint.as_str(), "[::1]:2408");
    }
}
