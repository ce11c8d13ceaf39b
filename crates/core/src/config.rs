use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::finding::Severity;
use crate::report::DEFAULT_MAX_FINDINGS;

/// Project-level configuration loaded from `.solguard.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub global: GlobalConfig,
    #[serde(default)]
    pub detectors: HashMap<String, DetectorConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub severity_threshold: String,
    pub output_format: String,
    pub max_findings: usize,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            severity_threshold: "informational".to_string(),
            output_format: "text".to_string(),
            max_findings: DEFAULT_MAX_FINDINGS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub enabled: Option<bool>,
}

impl Config {
    /// Load config from a TOML file path. Returns default config if file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Check if a detector is enabled according to config.
    pub fn is_detector_enabled(&self, name: &str) -> bool {
        self.detectors
            .get(name)
            .and_then(|d| d.enabled)
            .unwrap_or(true)
    }

    /// Parse the global severity threshold into a Severity value.
    pub fn severity_threshold(&self) -> Severity {
        parse_severity(&self.global.severity_threshold).unwrap_or(Severity::Informational)
    }

    /// Generate default config file content.
    pub fn default_toml() -> &'static str {
        r#"# solguard configuration
# See: https://github.com/safestackai/solguard

[global]
# Minimum severity to report: "critical", "high", "medium", "low", "informational"
severity_threshold = "informational"
# Output format: "text", "json", "sarif"
output_format = "text"
# Report size cap after dedup and ranking
max_findings = 10

# Per-detector overrides
# [detectors.gas-optimization]
# enabled = false
"#
    }
}

pub fn parse_severity(s: &str) -> Option<Severity> {
    match s.to_lowercase().as_str() {
        "critical" => Some(Severity::Critical),
        "high" => Some(Severity::High),
        "medium" => Some(Severity::Medium),
        "low" => Some(Severity::Low),
        "informational" | "info" => Some(Severity::Informational),
        _ => None,
    }
}
