use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic identifier of a submitted query.
///
/// A task result is accepted only while its generation is the live one for
/// its slot; anything older is stale and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(pub u64);

impl Generation {
    /// The generation that follows this one
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Logical source of background work. Only one task per slot is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlotKey {
    /// Authoritative DNS resolution
    #[serde(rename = "dns")]
    Dns,
    /// Zone metadata from the provider API
    #[serde(rename = "zone")]
    Zone,
    /// Listing of the domains visible to the credential
    #[serde(rename = "provider-domain-list")]
    ProviderDomains,
}

impl SlotKey {
    /// All slots, in a fixed order
    pub const ALL: [Self; 3] = [Self::Dns, Self::Zone, Self::ProviderDomains];

    /// Stable string key of this slot
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dns => "dns",
            Self::Zone => "zone",
            Self::ProviderDomains => "provider-domain-list",
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-submitted lookup. Immutable once issued.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainQuery {
    domain: String,
    #[serde(skip)]
    credential: String,
    generation: Generation,
}

impl DomainQuery {
    /// Create a query; the domain is trimmed
    #[must_use]
    pub fn new(domain: impl AsRef<str>, credential: impl Into<String>, generation: Generation) -> Self {
        Self {
            domain: domain.as_ref().trim().to_string(),
            credential: credential.into(),
            generation,
        }
    }

    /// The domain being looked up
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The opaque API credential
    #[must_use]
    pub fn credential(&self) -> &str {
        &self.credential
    }

    /// The generation stamped on this query
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }
}

// Keep the credential out of logs.
impl fmt::Debug for DomainQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainQuery")
            .field("domain", &self.domain)
            .field("credential", &"<redacted>")
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generations_are_ordered() {
        let g = Generation::default();
        assert!(g.next() > g);
        assert_eq!(g.next().next(), Generation(2));
    }

    #[test]
    fn slot_keys_render_stable_names() {
        assert_eq!(SlotKey::Dns.to_string(), "dns");
        assert_eq!(SlotKey::Zone.to_string(), "zone");
        assert_eq!(SlotKey::ProviderDomains.to_string(), "provider-domain-list");
    }

    #[test]
    fn debug_redacts_credential() {
        let q = DomainQuery::new(" example.com ", "secret-token", Generation(3));
        assert_eq!(q.domain(), "example.com");
        let dbg = format!("{q:?}");
        assert!(!dbg.contains("secret-token"));
        assert!(dbg.contains("example.com"));
    }
}
