//! Configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use walletsim::mock::LedgerConfig;
use walletsim::session::SessionConfig;

/// Looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "walletsim_config.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletsimConfig {
    pub ledger: LedgerConfig,
    pub session: SessionConfig,
}

impl WalletsimConfig {
    /// Reads `path` if given, else the default file if present, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.ledger.validate()?;
        config.session.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("writing config {}", path.display()))
    }

    /// Drops every simulated delay
    pub fn instant(mut self) -> Self {
        self.ledger = LedgerConfig {
            connect_delay_ms: 0,
            submit_delay_ms: 0,
            ..self.ledger
        };
        self.session.resolution_delay_ms = 0;
        self
    }
}
