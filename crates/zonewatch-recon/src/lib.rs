//! DNS resolution and zone metadata collection for zonewatch.
//!
//! Two collectors feed the lookup supervisor:
//!
//! - [`DnsRecordResolver`] queries NS, A, AAAA, MX and TXT records through a
//!   [`DnsService`] and always yields a [`DnsSnapshot`](zonewatch_core::DnsSnapshot)
//! - [`ZoneMetadataFetcher`] resolves the provider zone id and then collects
//!   every metadata category into a [`ZoneSnapshot`](zonewatch_core::ZoneSnapshot)

mod error;

pub mod dns;
pub mod fetcher;

pub use dns::{DnsRecordResolver, DnsResolution, DnsService, HickoryDns, ResolvedRecord};
pub use error::{ReconError, ReconResult};
pub use fetcher::ZoneMetadataFetcher;
