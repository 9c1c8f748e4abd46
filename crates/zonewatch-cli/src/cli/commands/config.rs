//! `zonewatch config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::OutputFormat;

pub fn execute(ctx: &Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(ctx),
        ConfigCommands::Set { key, value } => set_config(&key, &value),
        ConfigCommands::Path => show_path(),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = Config::load()?;
    let token = config.masked_token();

    match ctx.output_format {
        OutputFormat::Json => {
            let mut shown = config.clone();
            shown.api_token = token;
            println!("{}", serde_json::to_string_pretty(&shown)?);
        }
        OutputFormat::Pretty => {
            let unset = || "(not set)".dimmed().to_string();
            println!("{}", "Current Configuration:".bold());
            println!();
            println!("  {} {}", "api_token:".bold(), token.unwrap_or_else(unset));
            println!(
                "  {} {}",
                "api_base_url:".bold(),
                config.api_base_url.clone().unwrap_or_else(unset)
            );
            println!("  {} {}", "request_timeout_secs:".bold(), config.request_timeout_secs());
            println!("  {} {}", "join_timeout_ms:".bold(), config.join_timeout_ms());
            println!(
                "  {} {}",
                "output_format:".bold(),
                config.output_format.unwrap_or_default()
            );
        }
    }

    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;
    println!("{} {} set.", "Success:".green().bold(), key.cyan());
    Ok(())
}

fn show_path() -> Result<()> {
    let path = Config::path()?;
    println!("{}", path.display());
    Ok(())
}
