//! Clap derive structures for the `kraken` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// kraken -- poll Haivision Kraken transcoders for monitoring snapshots
#[derive(Debug, Parser)]
#[command(
    name = "kraken",
    version,
    about = "Collect flat monitoring snapshots from Kraken transcoders",
    long_about = "Logs in to a Kraken appliance, walks its REST API (system, network,\n\
        license, streams, load, services) and prints one flat key/value snapshot.",
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
    /// Appliance profile to use
    #[arg(long, short = 'p', env = "KRAKEN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Appliance address or URL (overrides profile)
    #[arg(long, short = 'H', env = "KRAKEN_HOST", global = true)]
    pub host: Option<String>,

    /// Login username (overrides profile)
    #[arg(long, short = 'u', env = "KRAKEN_USERNAME", global = true)]
    pub username: Option<String>,

    /// Output format (falls back to `defaults.output` in the config, then table)
    #[arg(long, short = 'o', env = "KRAKEN_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "KRAKEN_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "KRAKEN_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    /// The output format in effect once config defaults are applied.
    pub fn format(&self) -> OutputFormat {
        self.output.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Key/value table (default, interactive)
    #[default]
    Table,
    /// Pretty-printed JSON object
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain `key=value` lines (scripting)
    Plain,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one collection cycle and print the snapshot
    #[command(alias = "c")]
    Collect(CollectArgs),

    /// Collect on a fixed interval until interrupted
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Submit control requests (accepted and logged, never sent to the device)
    Control(ControlArgs),

    /// Manage configuration profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct CollectArgs {
    /// Only print keys starting with this prefix (e.g. `Stream_`)
    #[arg(long, short = 'f')]
    pub filter: Option<String>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between cycles (defaults to the profile's poll_interval)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,

    /// Stop after this many cycles
    #[arg(long, short = 'n')]
    pub count: Option<u64>,

    /// Only print keys starting with this prefix
    #[arg(long, short = 'f')]
    pub filter: Option<String>,
}

#[derive(Debug, Args)]
pub struct ControlArgs {
    /// Property assignments, e.g. `Stream_Main#State=stopped`
    #[arg(value_name = "PROPERTY=VALUE")]
    pub assignments: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the effective configuration (passwords redacted)
    Show,

    /// Write a profile from --host / --username (and --profile for its name)
    Init(InitArgs),
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Environment variable holding the password
    #[arg(long)]
    pub password_env: Option<String>,

    /// Seconds between cycles in watch mode
    #[arg(long)]
    pub poll_interval: Option<u64>,

    /// Replace an existing profile of the same name
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
