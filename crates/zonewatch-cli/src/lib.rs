//! # zonewatch-cli
//!
//! Command-line interface for zonewatch.
//!
//! ## Features
//!
//! - **Lookups**: live DNS plus provider zone metadata, merged as results arrive
//! - **Watch mode**: type domains and tokens, every line supersedes running work
//! - **Derived views**: email addresses and routing rules of a zone
//! - **Output formats**: coloured text or JSON

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
