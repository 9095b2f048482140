use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const CLI_CONFIG_FILE: &str = "cli.json";

/// Per-user preferences that never enter the shared pool document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    pub followed_slot: Option<u32>,
}

impl CliConfig {
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CLI_CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Invalid {}", path.display()))
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let path = data_dir.join(CLI_CONFIG_FILE);
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}
