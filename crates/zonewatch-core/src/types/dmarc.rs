use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version tag a DMARC record must start with
pub const DMARC_VERSION_TAG: &str = "v=DMARC1";

/// Tags with a dedicated rendering in reports
pub const KNOWN_TAGS: [&str; 9] = ["p", "sp", "rua", "ruf", "pct", "aspf", "adkim", "fo", "ri"];

/// A parsed DMARC policy record.
///
/// Every `tag=value` pair is kept, including `v` and tags outside
/// [`KNOWN_TAGS`]; the raw record text is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmarcPolicy {
    raw: String,
    tags: BTreeMap<String, String>,
}

impl DmarcPolicy {
    /// Parse a TXT value. Returns `None` unless it starts with the
    /// complete `v=DMARC1` tag.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let rest = raw.strip_prefix(DMARC_VERSION_TAG)?;
        if !(rest.is_empty() || rest.starts_with(';') || rest.starts_with(char::is_whitespace)) {
            return None;
        }

        let tags = raw
            .split(';')
            .map(str::trim)
            .filter_map(|part| part.split_once('='))
            .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
            .collect();

        Some(Self {
            raw: raw.to_string(),
            tags,
        })
    }

    /// Pick the first DMARC record out of a set of TXT values
    #[must_use]
    pub fn from_txt_records<I, S>(records: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        records.into_iter().find_map(|r| Self::parse(r.as_ref()))
    }

    /// The record exactly as published
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Value of a tag
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.tags.get(tag).map(String::as_str)
    }

    /// All parsed tags
    #[must_use]
    pub const fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /// Requested policy (`p`), `none` when absent
    #[must_use]
    pub fn policy(&self) -> &str {
        self.get("p").unwrap_or("none")
    }
}

/// Human description of a `p`/`sp` value
#[must_use]
pub fn describe_policy(policy: &str) -> &'static str {
    match policy {
        "none" => "No action (monitoring only)",
        "quarantine" => "Quarantine messages",
        "reject" => "Reject messages",
        _ => "Unknown",
    }
}
