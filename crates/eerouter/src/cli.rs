//! Clap derive structures for the `eerouter` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// eerouter -- list devices known to an EE BrightBox 2 or Smart Hub
#[derive(Debug, Parser)]
#[command(
    name = "eerouter",
    version,
    about = "List the devices known to an EE home router",
    long_about = "Reads the known-device list from an EE BrightBox 2 (router version 2)\n\
        or EE Smart Hub (router version 3) and prints it as a table, JSON, YAML\n\
        or plain MAC addresses.",
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
    /// Router profile to use
    #[arg(long, short = 'p', env = "EEROUTER_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Router host or host:port (overrides profile)
    #[arg(long, env = "EEROUTER_HOST", global = true)]
    pub host: Option<String>,

    /// Router generation: 2 (BrightBox 2) or 3 (Smart Hub)
    #[arg(long, short = 'r', env = "EEROUTER_ROUTER_VERSION", global = true)]
    pub router_version: Option<u32>,

    /// Admin username (BrightBox 2)
    #[arg(long, short = 'u', env = "EEROUTER_USERNAME", global = true)]
    pub username: Option<String>,

    /// Admin password
    #[arg(long, env = "EEROUTER_PASSWORD", global = true, hide = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format (defaults to the config's `defaults.output`)
    #[arg(long, short = 'o', env = "EEROUTER_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "EEROUTER_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List devices known to the router
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// List wireless networks (BrightBox 2)
    #[command(alias = "wifi")]
    Ssids(SsidsArgs),

    /// Report the MAC addresses currently present
    Scan(ScanArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List every device the router has recorded
    #[command(alias = "ls")]
    List {
        /// Only devices currently active on IPv4
        #[arg(long, short = 'a')]
        active: bool,
    },

    /// Show one device
    Get {
        /// Device MAC address
        #[arg(value_name = "MAC")]
        mac: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SSIDS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SsidsArgs {
    #[command(subcommand)]
    pub command: SsidsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SsidsCommand {
    /// List configured wireless networks
    #[command(alias = "ls")]
    List {
        /// Include WPA passwords in the output
        #[arg(long)]
        show_passwords: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SCAN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Keep scanning every N seconds until interrupted
    #[arg(long, short = 'i', value_name = "SECS")]
    pub interval: Option<u64>,
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
    /// Print the config file location
    Path,

    /// Display current configuration (secrets masked)
    Show,

    /// Store the router password in the system keyring
    SetPassword,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
