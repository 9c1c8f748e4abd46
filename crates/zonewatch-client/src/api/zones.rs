//! Zone listing endpoints.

use crate::ZoneClient;
use tracing::debug;
use zonewatch_core::{Result, Zone, ZoneError};

/// Zone listing endpoints
pub struct ZonesApi<'a> {
    client: &'a ZoneClient,
}

impl<'a> ZonesApi<'a> {
    pub(crate) const fn new(client: &'a ZoneClient) -> Self {
        Self { client }
    }

    /// List zones, optionally filtered by exact domain name
    pub async fn list(&self, name: Option<&str>) -> Result<Vec<Zone>> {
        match name {
            Some(name) => self.client.get_with_query("/zones", &[("name", name)]).await,
            None => self.client.get("/zones").await,
        }
    }

    /// Names of all zones visible to the token
    pub async fn domain_names(&self) -> Result<Vec<String>> {
        let zones = self.list(None).await?;
        Ok(zones
            .into_iter()
            .map(|z| z.name)
            .filter(|name| !name.is_empty())
            .collect())
    }

    /// Resolve a domain to its zone identifier
    pub async fn find_id(&self, domain: &str) -> Result<String> {
        let zones = self.list(Some(domain)).await?;
        let zone = zones.into_iter().next().ok_or_else(|| ZoneError::ZoneNotFound {
            domain: domain.to_string(),
        })?;
        debug!(domain, zone_id = %zone.id, "resolved zone id");
        Ok(zone.id)
    }
}
