//! `zonewatch lookup` - one domain, reported as results arrive.

use anyhow::Result;

use super::Context;
use crate::cli::args::DomainArgs;
use crate::output::ConsoleSink;

pub async fn execute(ctx: Context, args: DomainArgs) -> Result<()> {
    let domain = args.domain.trim();
    if domain.is_empty() {
        anyhow::bail!("domain must not be empty");
    }

    let mut session = ctx.session(ConsoleSink::new(ctx.output_format))?;
    session.submit_query(domain, ctx.token_or_empty()).await;

    while !session.is_settled() {
        session.step().await;
    }

    tracing::debug!(failures = session.sink().failures(), "lookup settled");
    Ok(())
}
