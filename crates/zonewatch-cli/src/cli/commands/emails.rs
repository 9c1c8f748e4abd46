//! `zonewatch emails` - addresses known to a zone's email routing.

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use zonewatch::is_plausible_email;

use super::{settled_zone, Context};
use crate::cli::args::EmailsArgs;
use crate::output::{print_json_line, OutputFormat};

pub async fn execute(ctx: Context, args: EmailsArgs) -> Result<()> {
    let zone = settled_zone(&ctx, args.domain.trim()).await?;
    let candidates: Vec<_> = zone
        .email_candidates()
        .into_iter()
        .filter(|c| args.all || is_plausible_email(&c.email))
        .collect();

    match ctx.output_format {
        OutputFormat::Json => print_json_line(&json!(candidates)),
        OutputFormat::Pretty => {
            if candidates.is_empty() {
                println!("{}", "No email addresses found.".dimmed());
            }
            for candidate in &candidates {
                println!("{candidate}");
            }
        }
    }

    Ok(())
}
