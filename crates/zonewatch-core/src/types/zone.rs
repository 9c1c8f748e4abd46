use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::DmarcPolicy;

/// Maximum number of log entries kept in a snapshot
pub const MAX_LOG_ENTRIES: usize = 10;

/// Standard response wrapper of the zone API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded
    #[serde(default)]
    pub success: bool,

    /// Payload
    pub result: Option<T>,

    /// Error messages
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
}

/// Error or informational message in an API response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Provider error code
    #[serde(default)]
    pub code: i64,

    /// Message text
    #[serde(default)]
    pub message: String,
}

/// Zone entry returned by the zone listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Provider-side zone identifier
    pub id: String,

    /// Domain name of the zone
    pub name: String,
}

/// DNS record stored at the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneDnsRecord {
    /// Record type
    #[serde(default, rename = "type")]
    pub record_type: String,

    /// Owner name
    #[serde(default)]
    pub name: String,

    /// Record content
    #[serde(default)]
    pub content: String,

    /// TTL in seconds (1 means automatic)
    #[serde(default)]
    pub ttl: Option<u32>,
}

/// Email routing configuration of a zone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRoutingConfig {
    /// Whether email routing is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Routing identifier
    #[serde(default)]
    pub tag: Option<String>,

    /// Domain name the routing applies to
    #[serde(default)]
    pub name: Option<String>,
}

/// An address or destination known to email routing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// The address
    #[serde(default)]
    pub email: Option<String>,

    /// Verification marker (timestamp, bool or null depending on endpoint)
    #[serde(default)]
    pub verified: Value,

    /// Creation timestamp
    #[serde(default)]
    pub created: Option<String>,
}

impl EmailAddress {
    /// Returns true if the address has been verified
    #[must_use]
    pub fn is_verified(&self) -> bool {
        match &self.verified {
            Value::Bool(b) => *b,
            Value::String(s) => !s.is_empty(),
            Value::Null => false,
            _ => true,
        }
    }
}

/// Email routing rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRule {
    /// Rule name
    #[serde(default)]
    pub name: Option<String>,

    /// Rule identifier
    #[serde(default)]
    pub tag: Option<String>,

    /// Whether the rule is active
    #[serde(default)]
    pub enabled: bool,

    /// Conditions selecting which mail the rule applies to
    #[serde(default)]
    pub matchers: Vec<RuleMatcher>,

    /// What happens to matching mail
    #[serde(default)]
    pub actions: Vec<RuleAction>,
}

impl EmailRule {
    /// Rule name, `Unnamed` when missing
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("Unnamed")
    }
}

/// Condition of an email routing rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMatcher {
    /// Matcher type (`literal`, `all`)
    #[serde(default, rename = "type")]
    pub matcher_type: String,

    /// Field inspected (`to`)
    #[serde(default)]
    pub field: Option<String>,

    /// Value compared against
    #[serde(default)]
    pub value: Option<String>,
}

/// Action of an email routing rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleAction {
    /// Action type (`forward`, `worker`, `drop`)
    #[serde(default, rename = "type")]
    pub action_type: String,

    /// Action arguments, e.g. forward targets
    #[serde(default)]
    pub value: Vec<String>,
}

/// Health check configured on a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Check name
    #[serde(default)]
    pub name: Option<String>,

    /// Current status (`healthy`, `unhealthy`, ...)
    #[serde(default)]
    pub status: Option<String>,

    /// Probed address
    #[serde(default)]
    pub address: Option<String>,
}

/// One zone setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSetting {
    /// Setting identifier
    pub id: String,

    /// Setting value (string, number or object)
    #[serde(default)]
    pub value: Value,
}

/// Universal SSL settings, kept as returned
pub type SslSettings = Map<String, Value>;

/// Email routing part of a zone snapshot; each field is filled independently
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailRouting {
    /// Routing configuration
    pub config: Option<EmailRoutingConfig>,
    /// Addresses
    pub addresses: Option<Vec<EmailAddress>>,
    /// Routing rules
    pub rules: Option<Vec<EmailRule>>,
    /// Verified destinations
    pub destinations: Option<Vec<EmailAddress>>,
}

impl EmailRouting {
    /// Returns true if no part carries any data.
    ///
    /// A returned config always counts, even a disabled one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.config.is_none()
            && is_none_or_empty(self.addresses.as_deref())
            && is_none_or_empty(self.rules.as_deref())
            && is_none_or_empty(self.destinations.as_deref())
    }
}

/// Provider-side metadata of one zone.
///
/// `None` in a field means the endpoint failed or was never reached. A
/// failed field never prevents the others from being filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSnapshot {
    /// Domain the snapshot describes
    pub domain: String,
    /// Provider zone identifier
    pub zone_id: String,
    /// DNS records stored at the provider
    pub dns_records: Option<Vec<ZoneDnsRecord>>,
    /// Email routing data
    pub email_routing: EmailRouting,
    /// DMARC policy published at `_dmarc.<domain>`
    pub dmarc: Option<DmarcPolicy>,
    /// Health checks
    pub health_checks: Option<Vec<HealthCheck>>,
    /// Zone settings
    pub zone_settings: Option<Vec<ZoneSetting>>,
    /// Universal SSL settings
    pub ssl_settings: Option<SslSettings>,
    /// Most recent log entries, at most [`MAX_LOG_ENTRIES`]
    pub logs: Option<Vec<Value>>,
    /// When the fetch finished
    pub fetched_at: DateTime<Utc>,
}

impl ZoneSnapshot {
    /// Create a snapshot with every field absent
    #[must_use]
    pub fn new(domain: impl Into<String>, zone_id: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            zone_id: zone_id.into(),
            dns_records: None,
            email_routing: EmailRouting::default(),
            dmarc: None,
            health_checks: None,
            zone_settings: None,
            ssl_settings: None,
            logs: None,
            fetched_at: Utc::now(),
        }
    }

    /// Store log entries, keeping only the most recent ones
    pub fn set_logs(&mut self, mut entries: Vec<Value>) {
        entries.truncate(MAX_LOG_ENTRIES);
        self.logs = Some(entries);
    }
}

pub(crate) fn is_none_or_empty<T>(items: Option<&[T]>) -> bool {
    items.map_or(true, <[T]>::is_empty)
}
