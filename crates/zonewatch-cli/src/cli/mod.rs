//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load()?;

    // flag and env are resolved by clap, the config file comes last
    let token = cli.token.or_else(|| config.api_token.clone());

    let ctx = commands::Context {
        token,
        api_url: cli
            .api_url
            .or_else(|| config.api_base_url.clone())
            .unwrap_or_else(|| zonewatch::DEFAULT_BASE_URL.to_string()),
        request_timeout: Duration::from_secs(config.request_timeout_secs()),
        join_timeout: Duration::from_millis(config.join_timeout_ms()),
        output_format: cli.output.or(config.output_format).unwrap_or_default(),
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Lookup(args) => commands::lookup::execute(ctx, args).await,
        Commands::Domains => commands::domains::execute(ctx).await,
        Commands::Watch => commands::watch::execute(ctx).await,
        Commands::Emails(args) => commands::emails::execute(ctx, args).await,
        Commands::Rules(args) => commands::rules::execute(ctx, args).await,
        Commands::Config(args) => commands::config::execute(&ctx, args),
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
