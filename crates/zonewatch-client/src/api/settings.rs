//! Zone and SSL settings endpoints.

use crate::ZoneClient;
use zonewatch_core::{Result, SslSettings, ZoneSetting};

/// Zone and SSL settings endpoints
pub struct SettingsApi<'a> {
    client: &'a ZoneClient,
}

impl<'a> SettingsApi<'a> {
    pub(crate) const fn new(client: &'a ZoneClient) -> Self {
        Self { client }
    }

    /// All zone settings
    pub async fn zone(&self, zone_id: &str) -> Result<Vec<ZoneSetting>> {
        self.client.get(&format!("/zones/{zone_id}/settings")).await
    }

    /// Universal SSL settings
    pub async fn universal_ssl(&self, zone_id: &str) -> Result<SslSettings> {
        self.client
            .get(&format!("/zones/{zone_id}/ssl/universal/settings"))
            .await
    }
}
