//! Command dispatch: bridges CLI args -> core pipeline -> output formatting.

pub mod config_cmd;
pub mod endpoints;
pub mod provision;
pub mod reserved;

use warpgen_config::Config;
use warpgen_core::EndpointChoice;

use crate::cli::{Command, EndpointArg, GlobalOpts};
use crate::error::CliError;

/// Dispatch a config-backed command to its handler.
pub async fn dispatch(cmd: Command, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Provision(args) => provision::handle(args, cfg, global).await,
        Command::Endpoints(args) => endpoints::handle(&args, cfg, global).await,
        Command::Config(_) | Command::Completions(_) | Command::Reserved(_) => {
            Err(CliError::Validation {
                field: "command".into(),
                reason: "handled before dispatch".into(),
            })
        }
    }
}

impl From<EndpointArg> for EndpointChoice {
    fn from(arg: EndpointArg) -> Self {
        match arg {
            EndpointArg::Default => EndpointChoice::Default,
            EndpointArg::Ipv4 => EndpointChoice::Ipv4,
            EndpointArg::Ipv6 => EndpointChoice::Ipv6,
        }
    }
}
