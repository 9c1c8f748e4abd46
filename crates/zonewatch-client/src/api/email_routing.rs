//! Email routing endpoints.

use crate::ZoneClient;
use zonewatch_core::{EmailAddress, EmailRoutingConfig, EmailRule, Result};

/// Email routing endpoints
pub struct EmailRoutingApi<'a> {
    client: &'a ZoneClient,
}

impl<'a> EmailRoutingApi<'a> {
    pub(crate) const fn new(client: &'a ZoneClient) -> Self {
        Self { client }
    }

    /// Email routing configuration
    pub async fn settings(&self, zone_id: &str) -> Result<EmailRoutingConfig> {
        self.client.get(&format!("/zones/{zone_id}/email/routing")).await
    }

    /// Addresses known to email routing
    pub async fn addresses(&self, zone_id: &str) -> Result<Vec<EmailAddress>> {
        self.client
            .get(&format!("/zones/{zone_id}/email/routing/addresses"))
            .await
    }

    /// Routing rules
    pub async fn rules(&self, zone_id: &str) -> Result<Vec<EmailRule>> {
        self.client
            .get(&format!("/zones/{zone_id}/email/routing/rules"))
            .await
    }

    /// Forward destinations
    pub async fn destinations(&self, zone_id: &str) -> Result<Vec<EmailAddress>> {
        self.client
            .get(&format!("/zones/{zone_id}/email/routing/destinations"))
            .await
    }
}
