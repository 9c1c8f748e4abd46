//! Command-line argument definitions using clap.

use crate::output::OutputFormat;
use clap::{ArgAction, Args, Parser, Subcommand};

/// Live DNS and zone metadata lookups
///
/// Resolves a domain's public DNS records and, with an API token, collects
/// the zone's provider-side configuration into one report.
#[derive(Parser, Debug)]
#[command(name = "zonewatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Zone API token (or set ZONEWATCH_API_TOKEN env var)
    #[arg(short = 't', long, env = "ZONEWATCH_API_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Zone API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Silence logging from background lookups
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up a domain and print the report as results arrive
    Lookup(DomainArgs),

    /// List the domains visible to the token
    Domains,

    /// Read `domain <name>`, `token <tok>`, `cancel` and `quit` lines from stdin
    Watch,

    /// Email addresses known to the zone's email routing
    Emails(EmailsArgs),

    /// Email routing rules of the zone
    Rules(DomainArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct DomainArgs {
    /// Domain name
    pub domain: String,
}

#[derive(Args, Debug)]
pub struct EmailsArgs {
    /// Domain name
    pub domain: String,

    /// Include entries that do not look like mail addresses
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },

    /// Show configuration file path
    Path,
}
