//! Configuration handling for validation and polling

use crate::validation::ValidationConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// User configuration for the submission client
///
/// Every field is optional; an absent field keeps the built-in default.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Submission endpoint URL
    pub endpoint_url: Option<String>,
    /// Override for the accepted email domain zones
    pub accepted_email_domains: Option<Vec<String>>,
    /// Upper bound on poll attempts per submission (unbounded when unset)
    pub max_poll_attempts: Option<u32>,
    /// Upper bound on total polling time in milliseconds (unbounded when unset)
    pub max_poll_duration_ms: Option<u64>,
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults when
    /// the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            return Ok(config);
        }
        Ok(Self::default())
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validation configuration derived from this config
    pub fn validation_config(&self) -> ValidationConfig {
        match &self.accepted_email_domains {
            Some(domains) => ValidationConfig::with_domains(domains.clone()),
            None => ValidationConfig::default(),
        }
    }

    /// Polling limits derived from this config
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            max_attempts: self.max_poll_attempts,
            max_duration: self.max_poll_duration_ms.map(Duration::from_millis),
        }
    }
}

/// Limits on the poll loop; both off by default, so polling runs until
/// the server reports a terminal status
#[derive(Debug, Clone, Copy, Default)]
pub struct PollConfig {
    /// Fail the submission after this many poll attempts
    pub max_attempts: Option<u32>,
    /// Fail the submission once polling has run this long
    pub max_duration: Option<Duration>,
}
