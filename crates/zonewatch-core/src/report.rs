//! Merging of DNS and zone snapshots into one ordered report.
//!
//! [`merge`] is a pure function of its inputs: the same snapshots always
//! produce a byte-identical report. Sections whose source data is missing
//! are left out rather than rendered empty, so a DNS-only report is valid and
//! grows once the zone snapshot arrives.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::types::{
    describe_policy, DmarcPolicy, DnsSnapshot, EmailAddress, EmailRouting, ZoneSnapshot,
    MAX_LOG_ENTRIES,
};

/// Report sections, in the order they appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Live DNS resolution
    Dns,
    /// DNS records stored at the provider
    ZoneRecords,
    /// Email routing config, addresses, rules and destinations
    EmailRouting,
    /// DMARC policy
    Dmarc,
    /// Health checks
    HealthChecks,
    /// Zone settings
    ZoneSettings,
    /// Universal SSL settings
    SslSettings,
    /// Recent logs
    Logs,
}

impl SectionKind {
    /// Heading printed above the section
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Dns => "DNS Lookup",
            Self::ZoneRecords => "Zone DNS Records",
            Self::EmailRouting => "Email Routing",
            Self::Dmarc => "DMARC Management",
            Self::HealthChecks => "Health Checks",
            Self::ZoneSettings => "Zone Settings",
            Self::SslSettings => "SSL/TLS Settings",
            Self::Logs => "Recent Logs",
        }
    }
}

/// One rendered section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    /// Which section this is
    pub kind: SectionKind,
    /// Rendered lines, without the heading
    pub lines: Vec<String>,
}

/// Ordered concatenation of the sections that have data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergedReport {
    sections: Vec<ReportSection>,
}

impl MergedReport {
    /// Sections in display order
    #[must_use]
    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    /// Look up a section by kind
    #[must_use]
    pub fn section(&self, kind: SectionKind) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Returns true if there is nothing to show
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Render to plain text
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MergedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "=== {} ===", section.kind.title())?;
            for line in &section.lines {
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}

/// Combine the latest snapshots of one query into a report
#[must_use]
pub fn merge(dns: Option<&DnsSnapshot>, zone: Option<&ZoneSnapshot>) -> MergedReport {
    let mut sections = Vec::new();
    let mut push = |kind, lines: Option<Vec<String>>| {
        if let Some(lines) = lines.filter(|l| !l.is_empty()) {
            sections.push(ReportSection { kind, lines });
        }
    };

    push(SectionKind::Dns, dns.map(dns_lines));
    if let Some(zone) = zone {
        push(SectionKind::ZoneRecords, zone_record_lines(zone));
        push(SectionKind::EmailRouting, email_routing_lines(&zone.email_routing));
        push(SectionKind::Dmarc, zone.dmarc.as_ref().map(dmarc_lines));
        push(SectionKind::HealthChecks, health_check_lines(zone));
        push(SectionKind::ZoneSettings, zone_setting_lines(zone));
        push(SectionKind::SslSettings, ssl_lines(zone));
        push(SectionKind::Logs, log_lines(zone));
    }

    MergedReport { sections }
}

fn dns_lines(dns: &DnsSnapshot) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, ns) in dns.nameservers().iter().enumerate() {
        lines.push(format!("NS{}: {ns}", i + 1));
    }
    if let Some(ip) = dns.ipv4() {
        lines.push(format!("IPv4: {ip}"));
    }
    lines.extend(dns.records().iter().map(|r| r.rendered()));
    lines
}

fn zone_record_lines(zone: &ZoneSnapshot) -> Option<Vec<String>> {
    let records = zone.dns_records.as_ref()?;
    Some(
        records
            .iter()
            .map(|r| {
                let ttl = r.ttl.map(|t| t.to_string()).unwrap_or_default();
                format!("{:6} {:30} {:30} TTL:{ttl}", r.record_type, r.name, r.content)
            })
            .collect(),
    )
}

fn email_routing_lines(routing: &EmailRouting) -> Option<Vec<String>> {
    if routing.is_empty() {
        return None;
    }

    let mut lines = Vec::new();
    if let Some(config) = routing.config.as_ref() {
        lines.push(format!(
            "Status: {}",
            if config.enabled { "Enabled" } else { "Disabled" }
        ));
        if let Some(tag) = config.tag.as_deref().filter(|t| !t.is_empty()) {
            lines.push(format!("Tag: {tag}"));
        }
        if let Some(name) = config.name.as_deref().filter(|n| !n.is_empty()) {
            lines.push(format!("Name: {name}"));
        }
    }

    address_block(&mut lines, "Addresses", routing.addresses.as_deref());

    if let Some(rules) = routing.rules.as_deref().filter(|r| !r.is_empty()) {
        lines.push(format!("  Rules ({}):", rules.len()));
        for rule in rules {
            lines.push(format!(
                "    - {} (Tag: {}, Enabled: {})",
                rule.display_name(),
                rule.tag.as_deref().unwrap_or("N/A"),
                rule.enabled
            ));
            for action in &rule.actions {
                lines.push(format!(
                    "      Action: {} -> [{}]",
                    or_na(&action.action_type),
                    action.value.join(", ")
                ));
            }
        }
    }

    address_block(&mut lines, "Destinations", routing.destinations.as_deref());
    Some(lines)
}

fn address_block(lines: &mut Vec<String>, label: &str, entries: Option<&[EmailAddress]>) {
    let Some(entries) = entries.filter(|e| !e.is_empty()) else {
        return;
    };
    lines.push(format!("  {label} ({}):", entries.len()));
    for entry in entries {
        lines.push(format!(
            "    - {} (Verified: {}, Created: {})",
            entry.email.as_deref().unwrap_or("N/A"),
            entry.is_verified(),
            entry.created.as_deref().unwrap_or("N/A")
        ));
    }
}

fn dmarc_lines(dmarc: &DmarcPolicy) -> Vec<String> {
    let mut lines = vec![format!("Raw Record: {}", dmarc.raw()), "  Parsed DMARC Policy:".to_string()];

    let policy = dmarc.policy();
    lines.push(format!("    Policy: {policy} ({})", describe_policy(policy)));

    for key in ["sp", "rua", "ruf", "pct", "aspf", "adkim", "fo", "ri"] {
        let Some(v) = dmarc.get(key) else { continue };
        let line = match key {
            "sp" => format!("Subdomain Policy: {v} ({})", describe_policy(v)),
            "rua" => format!("Aggregate Reports: {v}"),
            "ruf" => format!("Forensic Reports: {v}"),
            "pct" => format!("Percentage: {v}%"),
            "aspf" => format!("SPF Alignment: {v}"),
            "adkim" => format!("DKIM Alignment: {v}"),
            "fo" => format!("Failure Options: {v}"),
            _ => format!("Reporting Interval: {v} seconds"),
        };
        lines.push(format!("    {line}"));
    }

    lines
}

fn health_check_lines(zone: &ZoneSnapshot) -> Option<Vec<String>> {
    let checks = zone.health_checks.as_ref()?;
    Some(
        checks
            .iter()
            .map(|c| {
                format!(
                    "  {}: {} ({})",
                    c.name.as_deref().unwrap_or("Unknown"),
                    c.status.as_deref().unwrap_or("Unknown"),
                    c.address.as_deref().unwrap_or("N/A")
                )
            })
            .collect(),
    )
}

fn zone_setting_lines(zone: &ZoneSnapshot) -> Option<Vec<String>> {
    let settings = zone.zone_settings.as_ref()?;
    Some(
        settings
            .iter()
            .map(|s| format!("  {}: {}", s.id, display_value(&s.value)))
            .collect(),
    )
}

fn ssl_lines(zone: &ZoneSnapshot) -> Option<Vec<String>> {
    let settings = zone.ssl_settings.as_ref()?;
    Some(
        settings
            .iter()
            .map(|(key, value)| format!("  {key}: {}", display_value(value)))
            .collect(),
    )
}

fn log_lines(zone: &ZoneSnapshot) -> Option<Vec<String>> {
    let logs = zone.logs.as_ref()?;
    Some(
        logs.iter()
            .take(MAX_LOG_ENTRIES)
            .map(|entry| format!("  {}", display_value(entry)))
            .collect(),
    )
}

fn or_na(s: &str) -> &str {
    if s.is_empty() {
        "N/A"
    } else {
        s
    }
}

/// Strings print bare, everything else as compact JSON
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "N/A".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        EmailRoutingConfig, EmailRule, HealthCheck, RecordType, RuleAction, ZoneDnsRecord, ZoneSetting,
    };
    use serde_json::json;

    fn example_dns() -> DnsSnapshot {
        DnsSnapshot::builder()
            .nameserver("ns1.example.com.")
            .nameserver("ns2.example.com.")
            .ipv4("93.184.216.34")
            .record(RecordType::A, "93.184.216.34")
            .record(RecordType::Txt, "v=spf1 -all")
            .build()
    }

    fn full_zone() -> ZoneSnapshot {
        let mut zone = ZoneSnapshot::new("example.com", "023e105f4ecef8ad9ca31a8372d0c353");
        zone.dns_records = Some(vec![ZoneDnsRecord {
            record_type: "A".into(),
            name: "example.com".into(),
            content: "93.184.216.34".into(),
            ttl: Some(3600),
        }]);
        zone.email_routing.config = Some(EmailRoutingConfig {
            enabled: true,
            tag: Some("routing-tag".into()),
            name: Some("example.com".into()),
        });
        zone.email_routing.rules = Some(vec![EmailRule {
            name: Some("Support".into()),
            tag: Some("r1".into()),
            enabled: true,
            matchers: Vec::new(),
            actions: vec![RuleAction {
                action_type: "forward".into(),
                value: vec!["help@example.net".into()],
            }],
        }]);
        zone.dmarc = DmarcPolicy::parse("v=DMARC1; p=reject; pct=50; rua=mailto:d@example.com");
        zone.health_checks = Some(vec![HealthCheck {
            name: Some("origin".into()),
            status: Some("healthy".into()),
            address: Some("198.51.100.7".into()),
        }]);
        zone.zone_settings = Some(vec![
            ZoneSetting {
                id: "always_use_https".into(),
                value: json!("on"),
            },
            ZoneSetting {
                id: "min_tls_version".into(),
                value: json!(1.2),
            },
        ]);
        zone.ssl_settings = json!({"enabled": true}).as_object().cloned();
        zone.set_logs(vec![json!({"ray": "abc"})]);
        zone
    }

    #[test]
    fn dns_section_leads_with_nameservers_and_ipv4() {
        let report = merge(Some(&example_dns()), None);
        let dns = report.section(SectionKind::Dns).unwrap();
        assert_eq!(
            dns.lines[..3],
            ["NS1: ns1.example.com", "NS2: ns2.example.com", "IPv4: 93.184.216.34"]
        );
        assert_eq!(dns.lines[3], "A    93.184.216.34");
        assert_eq!(report.sections().len(), 1);
    }

    #[test]
    fn sections_follow_fixed_order() {
        let report = merge(Some(&example_dns()), Some(&full_zone()));
        let kinds: Vec<_> = report.sections().iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            [
                SectionKind::Dns,
                SectionKind::ZoneRecords,
                SectionKind::EmailRouting,
                SectionKind::Dmarc,
                SectionKind::HealthChecks,
                SectionKind::ZoneSettings,
                SectionKind::SslSettings,
                SectionKind::Logs,
            ]
        );
    }

    #[test]
    fn merge_is_deterministic() {
        let dns = example_dns();
        let zone = full_zone();
        assert_eq!(merge(Some(&dns), Some(&zone)).render(), merge(Some(&dns), Some(&zone)).render());
    }

    #[test]
    fn failed_endpoint_only_drops_its_section() {
        let mut zone = full_zone();
        zone.health_checks = None;
        let report = merge(Some(&example_dns()), Some(&zone));
        assert!(report.section(SectionKind::HealthChecks).is_none());
        assert_eq!(report.sections().len(), 7);
        assert!(!report.render().contains("=== Health Checks ==="));
    }

    #[test]
    fn zone_rows_use_fixed_columns() {
        let report = merge(None, Some(&full_zone()));
        let rows = &report.section(SectionKind::ZoneRecords).unwrap().lines;
        assert_eq!(
            rows[0],
            format!("{:6} {:30} {:30} TTL:3600", "A", "example.com", "93.184.216.34")
        );
    }

    #[test]
    fn rule_actions_are_indented_under_rule() {
        let report = merge(None, Some(&full_zone()));
        let lines = &report.section(SectionKind::EmailRouting).unwrap().lines;
        let rule = lines.iter().position(|l| l.starts_with("    - Support")).unwrap();
        assert_eq!(lines[rule + 1], "      Action: forward -> [help@example.net]");
        assert_eq!(lines[0], "Status: Enabled");
    }

    #[test]
    fn disabled_routing_config_still_renders_status() {
        let mut zone = ZoneSnapshot::new("example.com", "z");
        zone.email_routing.config = Some(EmailRoutingConfig::default());
        let report = merge(None, Some(&zone));
        let lines = &report.section(SectionKind::EmailRouting).unwrap().lines;
        assert_eq!(lines, &["Status: Disabled"]);
    }

    #[test]
    fn dmarc_section_describes_policy() {
        let report = merge(None, Some(&full_zone()));
        let lines = &report.section(SectionKind::Dmarc).unwrap().lines;
        assert_eq!(lines[0], "Raw Record: v=DMARC1; p=reject; pct=50; rua=mailto:d@example.com");
        assert!(lines.contains(&"    Policy: reject (Reject messages)".to_string()));
        assert!(lines.contains(&"    Percentage: 50%".to_string()));
        assert!(lines.contains(&"    Aggregate Reports: mailto:d@example.com".to_string()));
    }

    #[test]
    fn settings_render_scalars_bare() {
        let report = merge(None, Some(&full_zone()));
        let lines = &report.section(SectionKind::ZoneSettings).unwrap().lines;
        assert_eq!(lines, &["  always_use_https: on", "  min_tls_version: 1.2"]);
    }

    #[test]
    fn nothing_in_nothing_out() {
        assert!(merge(None, None).is_empty());
        assert!(merge(Some(&DnsSnapshot::empty()), None).is_empty());
        let bare = ZoneSnapshot::new("example.com", "z");
        assert!(merge(None, Some(&bare)).is_empty());
    }

    #[test]
    fn empty_lists_are_omitted() {
        let mut zone = ZoneSnapshot::new("example.com", "z");
        zone.health_checks = Some(Vec::new());
        zone.email_routing.addresses = Some(Vec::new());
        assert!(merge(None, Some(&zone)).is_empty());
    }
}
