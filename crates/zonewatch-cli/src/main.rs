//! zonewatch - live DNS and zone metadata lookups from the terminal.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    zonewatch_cli::run().await
}
