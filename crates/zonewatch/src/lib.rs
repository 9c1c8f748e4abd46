//! Background lookup orchestration for domain DNS and zone metadata.
//!
//! As a domain name or credential changes, [`LookupSupervisor`] starts,
//! supersedes and cancels the DNS and zone lookups, and [`ReportSession`]
//! merges whatever arrives for the current query into one report.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use zonewatch::{
//!     DnsRecordResolver, LookupSupervisor, MergedReport, ReportSession, ReportSink,
//!     SupervisorConfig, ZoneMetadataFetcher, ErrorKind, SlotKey,
//! };
//!
//! struct Print;
//!
//! impl ReportSink for Print {
//!     fn on_snapshot_updated(&mut self, report: &MergedReport) {
//!         println!("{report}");
//!     }
//!     fn on_task_failed(&mut self, slot: SlotKey, kind: ErrorKind, message: &str) {
//!         eprintln!("{slot}: {kind}: {message}");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> zonewatch::Result<()> {
//!     let dns = DnsRecordResolver::system()?;
//!     let zone = ZoneMetadataFetcher::new(dns.clone());
//!     let supervisor = LookupSupervisor::new(dns, zone, SupervisorConfig::default());
//!     let mut session = ReportSession::new(supervisor, Print);
//!
//!     session.submit_query("example.com", "api-token").await;
//!     while !session.is_settled() {
//!         session.step().await;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

mod session;
mod supervisor;

pub use session::{ReportSession, ReportSink};
pub use supervisor::{LookupSupervisor, SupervisorConfig, SupervisorEvent, DEFAULT_JOIN_TIMEOUT};

// Re-export core types
pub use zonewatch_core::*;

// Re-export the collectors
pub use zonewatch_client::{ZoneClient, ZoneClientBuilder, DEFAULT_BASE_URL};
pub use zonewatch_recon::{
    DnsRecordResolver, DnsResolution, DnsService, HickoryDns, ReconError, ResolvedRecord,
    ZoneMetadataFetcher,
};

// Re-export runtime for convenience
pub use tokio;
