//! Read-only views over a finished [`ZoneSnapshot`] used when choosing a
//! mailbox or routing rule.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use super::{EmailAddress, ZoneSnapshot};

/// Where an email candidate was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum EmailOrigin {
    /// Email routing address
    Address {
        /// Whether the address is verified
        verified: bool,
    },
    /// Verified forward destination
    Destination {
        /// Whether the destination is verified
        verified: bool,
    },
    /// Custom address matched by a rule
    RuleMatch {
        /// Name of the rule
        rule: String,
    },
    /// Forward target of a rule action
    RuleAction {
        /// Name of the rule
        rule: String,
    },
}

/// An email address offered to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailCandidate {
    /// The address itself
    pub email: String,
    /// Where it came from
    #[serde(flatten)]
    pub origin: EmailOrigin,
}

impl fmt::Display for EmailCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.origin {
            EmailOrigin::Address { verified } | EmailOrigin::Destination { verified } => {
                write!(f, "{} {}", self.email, if *verified { "✓" } else { "✗" })
            }
            EmailOrigin::RuleMatch { rule } => write!(f, "{} (Custom: {rule})", self.email),
            EmailOrigin::RuleAction { rule } => write!(f, "{} (Rule: {rule})", self.email),
        }
    }
}

/// An email routing rule offered to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleChoice {
    /// Rule name
    pub name: String,
    /// Rule identifier
    pub tag: Option<String>,
    /// Whether the rule is active
    pub enabled: bool,
}

impl fmt::Display for RuleChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(tag) = self.tag.as_deref().filter(|t| !t.is_empty()) {
            write!(f, " (Tag: {tag})")?;
        }
        write!(f, " {}", if self.enabled { "✓" } else { "✗" })
    }
}

impl ZoneSnapshot {
    /// Collect every address known to email routing.
    ///
    /// Addresses come first, then destinations, then rule matchers and
    /// rule actions. Duplicates are dropped, the first occurrence is kept.
    #[must_use]
    pub fn email_candidates(&self) -> Vec<EmailCandidate> {
        let routing = &self.email_routing;
        let mut out = Vec::new();

        out.extend(routing_entries(routing.addresses.as_ref(), false));
        out.extend(routing_entries(routing.destinations.as_ref(), true));

        for rule in routing.rules.iter().flatten() {
            let name = rule.display_name().to_string();
            for matcher in &rule.matchers {
                for candidate in [matcher.field.as_deref(), matcher.value.as_deref()]
                    .into_iter()
                    .flatten()
                    .filter(|v| v.contains('@'))
                {
                    out.push(EmailCandidate {
                        email: candidate.to_string(),
                        origin: EmailOrigin::RuleMatch { rule: name.clone() },
                    });
                }
            }
            for action in &rule.actions {
                for target in action.value.iter().filter(|v| v.contains('@')) {
                    out.push(EmailCandidate {
                        email: target.clone(),
                        origin: EmailOrigin::RuleAction { rule: name.clone() },
                    });
                }
            }
        }

        let mut seen = HashSet::new();
        out.retain(|c| seen.insert(c.email.clone()));
        out
    }

    /// One entry per email routing rule
    #[must_use]
    pub fn rule_choices(&self) -> Vec<RuleChoice> {
        self.email_routing
            .rules
            .iter()
            .flatten()
            .map(|rule| RuleChoice {
                name: rule.display_name().to_string(),
                tag: rule.tag.clone(),
                enabled: rule.enabled,
            })
            .collect()
    }
}

fn routing_entries(
    list: Option<&Vec<EmailAddress>>,
    destination: bool,
) -> impl Iterator<Item = EmailCandidate> + '_ {
    list.into_iter().flatten().filter_map(move |addr| {
        let email = addr.email.as_deref().filter(|e| !e.is_empty())?;
        let verified = addr.is_verified();
        let origin = if destination {
            EmailOrigin::Destination { verified }
        } else {
            EmailOrigin::Address { verified }
        };
        Some(EmailCandidate {
            email: email.to_string(),
            origin,
        })
    })
}

/// Loose plausibility check: a local part, `@`, and a dotted domain
#[must_use]
pub fn is_plausible_email(candidate: &str) -> bool {
    let address = candidate.split(' ').next().unwrap_or_default();
    address
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EmailRule, RuleAction, RuleMatcher};
    use serde_json::{json, Value};

    fn address(email: &str, verified: Value) -> EmailAddress {
        EmailAddress {
            email: Some(email.into()),
            verified,
            created: None,
        }
    }

    fn snapshot() -> ZoneSnapshot {
        let mut snap = ZoneSnapshot::new("example.com", "zone-1");
        snap.email_routing.addresses = Some(vec![
            address("owner@example.net", json!("2024-02-01T00:00:00Z")),
            address("pending@example.net", Value::Null),
        ]);
        snap.email_routing.destinations = Some(vec![address("owner@example.net", json!(true))]);
        snap.email_routing.rules = Some(vec![EmailRule {
            name: Some("Sales".into()),
            tag: Some("t1".into()),
            enabled: true,
            matchers: vec![RuleMatcher {
                matcher_type: "literal".into(),
                field: Some("to".into()),
                value: Some("sales@example.com".into()),
            }],
            actions: vec![RuleAction {
                action_type: "forward".into(),
                value: vec!["team@example.org".into(), "not-an-address".into()],
            }],
        }]);
        snap
    }

    #[test]
    fn candidates_are_deduplicated_in_order() {
        let rendered: Vec<String> = snapshot().email_candidates().iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            [
                "owner@example.net ✓",
                "pending@example.net ✗",
                "sales@example.com (Custom: Sales)",
                "team@example.org (Rule: Sales)",
            ]
        );
    }

    #[test]
    fn rule_choices_render_tag_and_state() {
        let mut snap = snapshot();
        snap.email_routing.rules.as_mut().unwrap().push(EmailRule {
            name: None,
            tag: None,
            enabled: false,
            matchers: Vec::new(),
            actions: Vec::new(),
        });
        let choices: Vec<String> = snap.rule_choices().iter().map(ToString::to_string).collect();
        assert_eq!(choices, ["Sales (Tag: t1) ✓", "Unnamed ✗"]);
    }

    #[test]
    fn missing_routing_yields_nothing() {
        let snap = ZoneSnapshot::new("example.com", "zone-1");
        assert!(snap.email_candidates().is_empty());
        assert!(snap.rule_choices().is_empty());
    }

    #[test]
    fn email_plausibility() {
        assert!(is_plausible_email("owner@example.net"));
        assert!(is_plausible_email("owner@example.net ✓"));
        assert!(!is_plausible_email("owner@localhost"));
        assert!(!is_plausible_email("example.net"));
        assert!(!is_plausible_email("@example.net"));
    }
}
