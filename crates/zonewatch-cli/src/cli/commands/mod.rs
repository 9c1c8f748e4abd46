//! Command implementations.

pub mod config;
pub mod domains;
pub mod emails;
pub mod lookup;
pub mod rules;
pub mod watch;

use std::time::Duration;

use anyhow::Result;
use zonewatch::{
    DnsRecordResolver, LookupSupervisor, ReportSession, ReportSink, SupervisorConfig,
    ZoneMetadataFetcher, ZoneSnapshot,
};

use crate::output::{OutputFormat, SilentSink};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Zone API token
    pub token: Option<String>,

    /// Zone API base URL
    pub api_url: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Bound on waiting for a superseded lookup
    pub join_timeout: Duration,

    /// Output format
    pub output_format: OutputFormat,

    /// Silence background lookup logging
    pub quiet: bool,
}

impl Context {
    /// Get the token, returning an error if not set.
    pub fn require_token(&self) -> Result<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty()).ok_or_else(|| {
            anyhow::anyhow!(
                "API token required.\n\n\
                 Set it with one of:\n  \
                 1. --token <TOKEN>\n  \
                 2. ZONEWATCH_API_TOKEN environment variable\n  \
                 3. zonewatch config set api_token <TOKEN>"
            )
        })
    }

    /// Token or an empty credential
    pub fn token_or_empty(&self) -> &str {
        self.token.as_deref().unwrap_or_default()
    }

    /// Zone fetcher using the system resolver
    pub fn fetcher(&self) -> Result<ZoneMetadataFetcher> {
        let dns = DnsRecordResolver::system()?;
        Ok(self.fetcher_with(dns))
    }

    fn fetcher_with(&self, dns: DnsRecordResolver) -> ZoneMetadataFetcher {
        ZoneMetadataFetcher::new(dns)
            .base_url(self.api_url.as_str())
            .timeout(self.request_timeout)
    }

    /// Session feeding `sink`
    pub fn session<S: ReportSink>(&self, sink: S) -> Result<ReportSession<S>> {
        let dns = DnsRecordResolver::system()?;
        let zone = self.fetcher_with(dns.clone());

        let mut config = SupervisorConfig {
            join_timeout: self.join_timeout,
            ..SupervisorConfig::default()
        };
        if self.quiet {
            config = config.quiet();
        }

        Ok(ReportSession::new(LookupSupervisor::new(dns, zone, config), sink))
    }
}

/// Run one lookup without printing and hand out the finished zone snapshot
pub async fn settled_zone(ctx: &Context, domain: &str) -> Result<std::sync::Arc<ZoneSnapshot>> {
    let token = ctx.require_token()?;
    let mut session = ctx.session(SilentSink::default())?;
    session.submit_query(domain, token).await;
    while !session.is_settled() {
        session.step().await;
    }

    if let Some(zone) = session.zone_snapshot() {
        return Ok(zone);
    }

    let message = session
        .sink()
        .failures
        .iter()
        .find(|(slot, _, _)| *slot == zonewatch::SlotKey::Zone)
        .map_or_else(|| "no zone data".to_string(), |(_, kind, msg)| format!("{msg} ({kind})"));
    anyhow::bail!("zone lookup for {domain} failed: {message}")
}
