// ABOUTME: Configuration for the authorization pipeline.
// ABOUTME: Reads ~/.clawgate/config.toml, falling back to built-in defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::patterns::{DANGEROUS_PATTERNS, SAFE_PATTERNS};

/// Policy knobs supplied at engine construction, immutable afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Approve low-risk calls without asking.
    pub auto_approve_low_risk: bool,
    /// Prefix patterns that classify a command as low risk.
    pub auto_approve_patterns: Vec<String>,
    /// Search patterns that classify a command as critical risk.
    pub deny_patterns: Vec<String>,
    /// Whether a human can be prompted. When false, medium risk and below
    /// passes and everything else is rejected.
    pub interactive: bool,
    /// Whitelist patterns seeded into the permanent scope.
    pub permanent_whitelist: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            auto_approve_low_risk: true,
            auto_approve_patterns: SAFE_PATTERNS.iter().map(|p| p.to_string()).collect(),
            deny_patterns: DANGEROUS_PATTERNS.iter().map(|p| p.to_string()).collect(),
            interactive: true,
            permanent_whitelist: Vec::new(),
        }
    }
}

impl GateConfig {
    /// Load config from ~/.clawgate/config.toml, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load config from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".clawgate")
            .join("config.toml")
    }
}
