//! Configuration management.

use anyhow::{bail, Context as _, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "ZONEWATCH_CONFIG";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Keys accepted by `zonewatch config set`
pub const KEYS: [(&str, &str); 5] = [
    ("api_token", "Zone API token"),
    ("api_base_url", "Zone API base URL"),
    ("request_timeout_secs", "Per-request timeout in seconds"),
    ("join_timeout_ms", "How long a restart waits for the previous lookup"),
    ("output_format", "Default output format (pretty/json)"),
];

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Zone API token.
    pub api_token: Option<String>,

    /// Zone API base URL.
    pub api_base_url: Option<String>,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,

    /// Bound on waiting for a superseded lookup, in milliseconds.
    pub join_timeout_ms: Option<u64>,

    /// Default output format.
    pub output_format: Option<OutputFormat>,
}

impl Config {
    /// Get the config file path.
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let dirs = ProjectDirs::from("dev", "zonewatch", "zonewatch")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from file.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Set one key from its string form
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_token" | "token" => self.api_token = Some(value.trim().to_string()),
            "api_base_url" | "api_url" => {
                self.api_base_url = Some(value.trim_end_matches('/').to_string());
            }
            "request_timeout_secs" => {
                self.request_timeout_secs = Some(parse_positive(key, value)?);
            }
            "join_timeout_ms" => self.join_timeout_ms = Some(parse_positive(key, value)?),
            "output_format" | "output" => self.output_format = Some(value.parse()?),
            _ => {
                let keys: Vec<String> = KEYS
                    .iter()
                    .map(|(k, help)| format!("  {k:<22} - {help}"))
                    .collect();
                bail!("Unknown config key: {key}\n\nAvailable keys:\n{}", keys.join("\n"));
            }
        }
        Ok(())
    }

    /// Request timeout, falling back to the default
    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    /// Join timeout, falling back to the supervisor default
    pub fn join_timeout_ms(&self) -> u64 {
        self.join_timeout_ms.unwrap_or_else(|| {
            u64::try_from(zonewatch::DEFAULT_JOIN_TIMEOUT.as_millis()).unwrap_or(u64::MAX)
        })
    }

    /// Token for display, never in full
    pub fn masked_token(&self) -> Option<String> {
        self.api_token.as_deref().map(mask)
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u64> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => bail!("{key} must be a positive integer, got {value:?}"),
    }
}

/// Keep the first and last four characters of long secrets
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}
