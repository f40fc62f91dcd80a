//! Clap derive structures for the `warpgen` CLI.
//!
//! Shared with `build.rs` for man-page generation, so this module may only
//! depend on `clap` and `clap_complete`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// warpgen -- WireGuard configs from WARP-style registration services
#[derive(Debug, Parser)]
#[command(
    name = "warpgen",
    version,
    about = "Provision WireGuard configs and tunnel URIs",
    long_about = "Fetches a keypair, registers it with a WARP-style account service,\n\
        and renders the result as a wg-quick config and a wireguard:// URI.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "WARPGEN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Output format [default: from config, else text]
    #[arg(long, short = 'o', env = "WARPGEN_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds [default: from config, else 30]
    #[arg(long, env = "WARPGEN_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Keypair service URL (overrides profile)
    #[arg(long, env = "WARPGEN_KEYS_URL", global = true)]
    pub keys_url: Option<String>,

    /// Registration service URL (overrides profile)
    #[arg(long, env = "WARPGEN_REGISTER_URL", global = true)]
    pub register_url: Option<String>,

    /// Endpoint directory URL (overrides profile)
    #[arg(long, env = "WARPGEN_DIRECTORY_URL", global = true)]
    pub directory_url: Option<String>,

    /// Generate the keypair locally instead of calling the keys service
    #[arg(long, global = true)]
    pub local_keys: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "WARPGEN_INSECURE", global = true)]
    pub insecure: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text and tables
    Text,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a new account and print its WireGuard config and URI
    #[command(alias = "get")]
    Provision(ProvisionArgs),

    /// List endpoints from the endpoint directory
    #[command(alias = "ep")]
    Endpoints(EndpointsArgs),

    /// Decode the reserved bytes of a client identifier
    Reserved(ReservedArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROVISION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProvisionArgs {
    /// Endpoint to put in the config [default: from profile, else default]
    #[arg(long, short = 'e')]
    pub endpoint: Option<EndpointArg>,

    /// Which artifacts to print
    #[arg(long, default_value = "both")]
    pub show: ShowArg,

    /// Save the WireGuard config to a file
    #[arg(
        long,
        short = 'w',
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = "wireguard.conf"
    )]
    pub write: Option<PathBuf>,

    /// Overwrite an existing file given to --write
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Re-run the whole attempt up to N more times on failure
    #[arg(long, default_value = "0")]
    pub retries: u32,

    /// Fail instead of zero-filling undecodable reserved bytes
    #[arg(long)]
    pub strict_reserved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EndpointArg {
    /// The well-known default endpoint
    Default,
    /// A random IPv4 endpoint from the directory
    Ipv4,
    /// A random IPv6 endpoint from the directory
    Ipv6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShowArg {
    /// WireGuard config and tunnel URI
    Both,
    /// WireGuard config only
    Wireguard,
    /// Tunnel URI only
    Uri,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ENDPOINTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EndpointsArgs {
    /// Only list one address family
    #[arg(long)]
    pub family: Option<FamilyArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FamilyArg {
    Ipv4,
    Ipv6,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESERVED
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ReservedArgs {
    /// Base64 client identifier from a registration response
    pub client_id: String,

    /// Fail on short or malformed identifiers instead of zero-filling
    #[arg(long)]
    pub strict: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or update a profile with guided setup
    Init,

    /// Display the loaded configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
