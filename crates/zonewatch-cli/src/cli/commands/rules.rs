//! `zonewatch rules` - email routing rules of a zone.

use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use super::{settled_zone, Context};
use crate::cli::args::DomainArgs;
use crate::output::{print_json_line, OutputFormat};

pub async fn execute(ctx: Context, args: DomainArgs) -> Result<()> {
    let zone = settled_zone(&ctx, args.domain.trim()).await?;
    let rules = zone.rule_choices();

    match ctx.output_format {
        OutputFormat::Json => print_json_line(&json!(rules)),
        OutputFormat::Pretty => {
            if rules.is_empty() {
                println!("{}", "No email routing rules.".dimmed());
            }
            for rule in &rules {
                println!("{rule}");
            }
        }
    }

    Ok(())
}
