//! Core types for zonewatch.
//!
//! This crate holds everything that is shared between the resolver, the
//! zone API client and the lookup supervisor:
//!
//! - **Types**: immutable snapshots produced by background lookups
//!   ([`DnsSnapshot`], [`ZoneSnapshot`]), the parsed [`DmarcPolicy`] and the
//!   query identity ([`DomainQuery`], [`SlotKey`])
//! - **Errors**: [`ZoneError`] and the coarse [`ErrorKind`] taxonomy
//! - **Merging**: [`merge`] combines the latest snapshots into a
//!   [`MergedReport`]
//!
//! # Example
//!
//! ```rust
//! use zonewatch_core::{merge, DnsSnapshot};
//!
//! let dns = DnsSnapshot::builder()
//!     .nameserver("ns1.example.com")
//!     .nameserver("ns2.example.com")
//!     .ipv4("93.184.216.34")
//!     .build();
//!
//! let report = merge(Some(&dns), None);
//! assert!(report.render().contains("NS1: ns1.example.com"));
//! ```

mod error;
pub mod report;
pub mod types;

pub use error::{ErrorKind, Result, ZoneError};
pub use report::{merge, MergedReport, ReportSection, SectionKind};
pub use types::*;
