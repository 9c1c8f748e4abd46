//! Health check endpoints.

use crate::ZoneClient;
use zonewatch_core::{HealthCheck, Result};

/// Health check endpoints
pub struct HealthChecksApi<'a> {
    client: &'a ZoneClient,
}

impl<'a> HealthChecksApi<'a> {
    pub(crate) const fn new(client: &'a ZoneClient) -> Self {
        Self { client }
    }

    /// List health checks configured on a zone
    pub async fn list(&self, zone_id: &str) -> Result<Vec<HealthCheck>> {
        self.client.get(&format!("/zones/{zone_id}/healthchecks")).await
    }
}
