//! `zonewatch domains` - list the token's domains.

use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use super::Context;
use crate::output::{print_json_line, OutputFormat};

pub async fn execute(ctx: Context) -> Result<()> {
    let token = ctx.require_token()?;
    let domains = ctx.fetcher()?.list_domains(token).await?;

    match ctx.output_format {
        OutputFormat::Json => print_json_line(&json!(domains)),
        OutputFormat::Pretty => {
            if domains.is_empty() {
                println!("{}", "No domains found for this token.".dimmed());
            }
            for domain in &domains {
                println!("{}", domain.green());
            }
        }
    }

    Ok(())
}
