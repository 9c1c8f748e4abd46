//! Zone metadata collection from the provider API.

use crate::dns::DnsRecordResolver;
use chrono::Utc;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use zonewatch_client::{ZoneClient, DEFAULT_BASE_URL};
use zonewatch_core::{Result, ZoneError, ZoneSnapshot};

/// Collects every metadata category of one zone.
///
/// The zone id lookup runs first and also proves the credential: if it
/// fails the whole fetch fails. After that each endpoint is queried on its
/// own and a failure only leaves its field empty.
///
/// Clones share one client per credential, so the request quota and the
/// connection pool span every fetch made with that credential.
#[derive(Debug, Clone)]
pub struct ZoneMetadataFetcher {
    dns: DnsRecordResolver,
    base_url: String,
    timeout: Duration,
    requests_per_minute: Option<u32>,
    client: Arc<Mutex<Option<CachedClient>>>,
}

#[derive(Debug)]
struct CachedClient {
    credential: String,
    client: ZoneClient,
}

impl ZoneMetadataFetcher {
    /// Create a fetcher; DMARC lookups go through `dns`
    #[must_use]
    pub fn new(dns: DnsRecordResolver) -> Self {
        Self {
            dns,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            requests_per_minute: None,
            client: Arc::default(),
        }
    }

    /// Point the fetcher at another API base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self.client = Arc::default();
        self
    }

    /// Per-request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.client = Arc::default();
        self
    }

    /// Override the client's request quota; `0` disables it
    #[must_use]
    pub fn requests_per_minute(mut self, rpm: u32) -> Self {
        self.requests_per_minute = Some(rpm);
        self.client = Arc::default();
        self
    }

    fn client(&self, credential: &str) -> Result<ZoneClient> {
        if credential.trim().is_empty() {
            return Err(ZoneError::EmptyCredential);
        }

        let mut cached = self.client.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = cached.as_ref().filter(|c| c.credential == credential) {
            return Ok(entry.client.clone());
        }

        let client = self.build_client(credential)?;
        debug!("built zone client for new credential");
        *cached = Some(CachedClient {
            credential: credential.to_string(),
            client: client.clone(),
        });
        Ok(client)
    }

    fn build_client(&self, credential: &str) -> Result<ZoneClient> {
        let mut builder = ZoneClient::builder(credential)
            .base_url(self.base_url.as_str())
            .timeout(self.timeout);
        if let Some(rpm) = self.requests_per_minute {
            builder = builder.requests_per_minute(rpm);
        }
        builder.build()
    }

    /// Names of all zones the credential can see
    pub async fn list_domains(&self, credential: &str) -> Result<Vec<String>> {
        let client = self.client(credential)?;
        let domains = client.zones().domain_names().await?;
        info!(count = domains.len(), "listed provider domains");
        Ok(domains)
    }

    /// Fetch the snapshot of `domain`.
    ///
    /// `cancel` is checked before every sub-request; once it fires no new
    /// request is issued and the partial snapshot is returned.
    pub async fn fetch(
        &self,
        domain: &str,
        credential: &str,
        cancel: &CancellationToken,
    ) -> Result<ZoneSnapshot> {
        let client = self.client(credential)?;
        let zone_id = client.zones().find_id(domain).await?;
        let zone_id = zone_id.as_str();
        let mut snap = ZoneSnapshot::new(domain, zone_id);

        snap.dns_records = endpoint(cancel, domain, "dns_records", client.dns_records().list(zone_id)).await;

        let email = client.email_routing();
        snap.email_routing.config = endpoint(cancel, domain, "email_routing", email.settings(zone_id)).await;
        snap.email_routing.addresses =
            endpoint(cancel, domain, "email_addresses", email.addresses(zone_id)).await;
        snap.email_routing.rules = endpoint(cancel, domain, "email_rules", email.rules(zone_id)).await;
        snap.email_routing.destinations =
            endpoint(cancel, domain, "email_destinations", email.destinations(zone_id)).await;

        if !cancel.is_cancelled() {
            snap.dmarc = self.dns.dmarc(domain).await;
        }

        snap.health_checks =
            endpoint(cancel, domain, "health_checks", client.health_checks().list(zone_id)).await;
        snap.zone_settings = endpoint(cancel, domain, "zone_settings", client.settings().zone(zone_id)).await;
        snap.ssl_settings =
            endpoint(cancel, domain, "ssl_settings", client.settings().universal_ssl(zone_id)).await;
        if let Some(logs) = endpoint(cancel, domain, "logs", client.logs().received(zone_id)).await {
            snap.set_logs(logs);
        }

        snap.fetched_at = Utc::now();
        info!(domain, zone_id, cancelled = cancel.is_cancelled(), "zone fetch finished");
        Ok(snap)
    }
}

/// Run one sub-request unless cancelled; failures are logged and dropped
async fn endpoint<T>(
    cancel: &CancellationToken,
    domain: &str,
    name: &'static str,
    request: impl Future<Output = Result<T>>,
) -> Option<T> {
    if cancel.is_cancelled() {
        debug!(domain, endpoint = name, "skipped after cancellation");
        return None;
    }

    match request.await {
        Ok(value) => {
            debug!(domain, endpoint = name, "endpoint ok");
            Some(value)
        }
        Err(e) => {
            warn!(domain, endpoint = name, kind = %e.kind(), error = %e, "endpoint failed");
            None
        }
    }
}
