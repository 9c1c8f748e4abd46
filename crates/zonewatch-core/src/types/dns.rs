use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of nameservers kept in a snapshot
pub const MAX_NAMESERVERS: usize = 2;

/// Record types queried by the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// Nameserver
    Ns,
    /// IPv4 address
    A,
    /// IPv6 address
    Aaaa,
    /// Mail exchanger
    Mx,
    /// Text
    Txt,
}

impl RecordType {
    /// Types queried for every domain, in query order
    pub const QUERIED: [Self; 5] = [Self::Ns, Self::A, Self::Aaaa, Self::Mx, Self::Txt];

    /// Upper-case mnemonic
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ns => "NS",
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Mx => "MX",
            Self::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One resolved record, already rendered to its display value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecordLine {
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Rendered value (`10 mail.example.com` for MX)
    pub value: String,
}

impl DnsRecordLine {
    /// Render as a `TYPE value` line with the type padded to four columns
    #[must_use]
    pub fn rendered(&self) -> String {
        format!("{:<4} {}", self.record_type, self.value)
    }
}

/// Result of one resolution task. Built atomically, never mutated after.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsSnapshot {
    ns: Vec<String>,
    ipv4: Option<String>,
    records: Vec<DnsRecordLine>,
}

impl DnsSnapshot {
    /// Start building a snapshot
    #[must_use]
    pub fn builder() -> DnsSnapshotBuilder {
        DnsSnapshotBuilder::default()
    }

    /// An all-empty snapshot
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Up to two nameservers, in the order the resolver returned them
    #[must_use]
    pub fn nameservers(&self) -> &[String] {
        &self.ns
    }

    /// First A answer
    #[must_use]
    pub fn ipv4(&self) -> Option<&str> {
        self.ipv4.as_deref()
    }

    /// A, AAAA, MX and TXT records in query order
    #[must_use]
    pub fn records(&self) -> &[DnsRecordLine] {
        &self.records
    }

    /// Returns true if nothing was resolved
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ns.is_empty() && self.ipv4.is_none() && self.records.is_empty()
    }
}

/// Builder for [`DnsSnapshot`]
#[derive(Debug, Default)]
pub struct DnsSnapshotBuilder {
    inner: DnsSnapshot,
}

impl DnsSnapshotBuilder {
    /// Add a nameserver; anything past the second is ignored
    #[must_use]
    pub fn nameserver(mut self, name: impl AsRef<str>) -> Self {
        if self.inner.ns.len() < MAX_NAMESERVERS {
            self.inner.ns.push(strip_root(name.as_ref()));
        }
        self
    }

    /// Set the IPv4 address if none is set yet
    #[must_use]
    pub fn ipv4(mut self, addr: impl Into<String>) -> Self {
        if self.inner.ipv4.is_none() {
            self.inner.ipv4 = Some(addr.into());
        }
        self
    }

    /// Append a rendered record
    #[must_use]
    pub fn record(mut self, record_type: RecordType, value: impl Into<String>) -> Self {
        self.inner.records.push(DnsRecordLine {
            record_type,
            value: value.into(),
        });
        self
    }

    /// Finish the snapshot
    #[must_use]
    pub fn build(self) -> DnsSnapshot {
        self.inner
    }
}

/// Strip the trailing root dot from a fully-qualified name
#[must_use]
pub fn strip_root(name: &str) -> String {
    name.strip_suffix('.').unwrap_or(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_two_nameservers_in_order() {
        let snap = DnsSnapshot::builder()
            .nameserver("b.ns.example.")
            .nameserver("a.ns.example.")
            .nameserver("c.ns.example.")
            .build();
        assert_eq!(snap.nameservers(), ["b.ns.example", "a.ns.example"]);
    }

    #[test]
    fn first_ipv4_wins() {
        let snap = DnsSnapshot::builder().ipv4("192.0.2.1").ipv4("192.0.2.2").build();
        assert_eq!(snap.ipv4(), Some("192.0.2.1"));
    }

    #[test]
    fn record_lines_pad_type() {
        let snap = DnsSnapshot::builder()
            .record(RecordType::A, "192.0.2.1")
            .record(RecordType::Mx, "10 mail.example.com")
            .record(RecordType::Aaaa, "2001:db8::1")
            .build();
        let lines: Vec<_> = snap.records().iter().map(DnsRecordLine::rendered).collect();
        assert_eq!(
            lines,
            ["A    192.0.2.1", "MX   10 mail.example.com", "AAAA 2001:db8::1"]
        );
    }

    #[test]
    fn empty_snapshot() {
        assert!(DnsSnapshot::empty().is_empty());
        assert!(!DnsSnapshot::builder().ipv4("192.0.2.1").build().is_empty());
    }
}
