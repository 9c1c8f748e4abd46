//! Output formatting for different formats.

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use zonewatch::{ErrorKind, MergedReport, ReportSink, SlotKey};

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Coloured text
    #[default]
    Pretty,
    /// JSON, one document per line
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => anyhow::bail!(
                "Unknown output format: {s}\n\
                 Valid formats: pretty, json"
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Print a report with coloured headings
pub fn print_report(report: &MergedReport) {
    for (i, section) in report.sections().iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", format!("=== {} ===", section.kind.title()).bold().cyan());
        for line in &section.lines {
            println!("{line}");
        }
    }
}

/// Print one JSON document on its own line
pub fn print_json_line(value: &serde_json::Value) {
    println!("{value}");
}

/// Prints every update of a session as it happens
#[derive(Debug)]
pub struct ConsoleSink {
    format: OutputFormat,
    updates: usize,
    failures: usize,
}

impl ConsoleSink {
    /// Create a sink printing in `format`
    pub const fn new(format: OutputFormat) -> Self {
        Self {
            format,
            updates: 0,
            failures: 0,
        }
    }

    /// Number of task failures seen so far
    pub const fn failures(&self) -> usize {
        self.failures
    }
}

impl ReportSink for ConsoleSink {
    fn on_snapshot_updated(&mut self, report: &MergedReport) {
        self.updates += 1;
        match self.format {
            OutputFormat::Json => print_json_line(&json!({"event": "report", "report": report})),
            OutputFormat::Pretty => {
                if self.updates > 1 {
                    println!();
                    println!("{}", format!("--- update {} ---", self.updates).dimmed());
                }
                print_report(report);
            }
        }
    }

    fn on_task_failed(&mut self, slot: SlotKey, kind: ErrorKind, message: &str) {
        self.failures += 1;
        match self.format {
            OutputFormat::Json => print_json_line(&json!({
                "event": "failed",
                "slot": slot,
                "kind": kind,
                "message": message,
            })),
            OutputFormat::Pretty => {
                eprintln!("{} {slot}: {message} ({kind})", "Warning:".yellow().bold());
            }
        }
    }

    fn on_dns_unavailable(&mut self, message: &str) {
        match self.format {
            OutputFormat::Json => print_json_line(&json!({"event": "dns_unavailable", "message": message})),
            OutputFormat::Pretty => eprintln!("{}", format!("DNS lookup failed: {message}").dimmed()),
        }
    }

    fn on_domains_listed(&mut self, domains: &[String]) {
        match self.format {
            OutputFormat::Json => print_json_line(&json!({"event": "domains", "domains": domains})),
            OutputFormat::Pretty => {
                println!("{} ({})", "Domains:".bold(), domains.len());
                for domain in domains {
                    println!("  {}", domain.green());
                }
            }
        }
    }

    fn on_domain_selected(&mut self, domain: &str) {
        match self.format {
            OutputFormat::Json => print_json_line(&json!({"event": "selected", "domain": domain})),
            OutputFormat::Pretty => println!("{} {}", "Selected:".bold(), domain.cyan()),
        }
    }
}

/// Collects failures without printing anything
#[derive(Debug, Default)]
pub struct SilentSink {
    /// Failures in arrival order
    pub failures: Vec<(SlotKey, ErrorKind, String)>,
}

impl ReportSink for SilentSink {
    fn on_snapshot_updated(&mut self, _report: &MergedReport) {}

    fn on_task_failed(&mut self, slot: SlotKey, kind: ErrorKind, message: &str) {
        self.failures.push((slot, kind, message.to_string()));
    }
}
