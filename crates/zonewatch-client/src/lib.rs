//! HTTP client for the zone-management API.
//!
//! This crate provides [`ZoneClient`], a bearer-authenticated client for the
//! JSON REST endpoints that describe a zone: DNS records, email routing,
//! health checks, settings and logs.
//!
//! ```rust,ignore
//! use zonewatch_client::ZoneClient;
//!
//! let client = ZoneClient::new("api-token")?;
//! let zone_id = client.zones().find_id("example.com").await?;
//! let records = client.dns_records().list(&zone_id).await?;
//! ```

mod client;
pub mod api;

pub use client::{ZoneClient, ZoneClientBuilder, DEFAULT_BASE_URL};
pub use zonewatch_core::{Result, ZoneError};
