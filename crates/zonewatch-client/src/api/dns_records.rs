//! DNS record endpoints.

use crate::ZoneClient;
use zonewatch_core::{Result, ZoneDnsRecord};

/// DNS record endpoints
pub struct DnsRecordsApi<'a> {
    client: &'a ZoneClient,
}

impl<'a> DnsRecordsApi<'a> {
    pub(crate) const fn new(client: &'a ZoneClient) -> Self {
        Self { client }
    }

    /// List the DNS records stored for a zone
    pub async fn list(&self, zone_id: &str) -> Result<Vec<ZoneDnsRecord>> {
        self.client.get(&format!("/zones/{zone_id}/dns_records")).await
    }
}
