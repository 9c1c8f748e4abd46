//! API endpoint modules.

mod dns_records;
mod email_routing;
mod health_checks;
mod logs;
mod settings;
mod zones;

pub use dns_records::DnsRecordsApi;
pub use email_routing::EmailRoutingApi;
pub use health_checks::HealthChecksApi;
pub use logs::LogsApi;
pub use settings::SettingsApi;
pub use zones::ZonesApi;
