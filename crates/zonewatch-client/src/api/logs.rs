//! Log endpoints.

use crate::ZoneClient;
use serde_json::Value;
use zonewatch_core::Result;

/// Log endpoints
pub struct LogsApi<'a> {
    client: &'a ZoneClient,
}

impl<'a> LogsApi<'a> {
    pub(crate) const fn new(client: &'a ZoneClient) -> Self {
        Self { client }
    }

    /// Recently received request logs, newest first
    ///
    /// Note: many plans do not expose this endpoint; expect an error there
    pub async fn received(&self, zone_id: &str) -> Result<Vec<Value>> {
        self.client.get(&format!("/zones/{zone_id}/logs/received")).await
    }
}
