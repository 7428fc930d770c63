//! Application configuration (~/.upkeep/config.toml)
//!
//! A missing file means defaults. Settings are loaded once per command and
//! passed explicitly to whoever needs them; nothing here is process-global.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_currency_symbol() -> String {
    "¥".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Symbol prefixed to formatted amounts
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    #[serde(default)]
    pub backup: BackupConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupConfig {
    /// API token for the gist service; UPKEEP_GITHUB_TOKEN overrides it
    pub token: Option<String>,
    /// Gist holding the backup snapshot, recorded after the first push
    pub gist_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            currency_symbol: default_currency_symbol(),
            backup: BackupConfig::default(),
        }
    }
}

impl Config {
    fn default_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        Ok(PathBuf::from(home).join(".upkeep").join("config.toml"))
    }

    /// Load from the default location; missing file yields defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let raw = std::fs::read_to_string(path)
            .context(format!("Failed to read config at {:?}", path))?;
        toml::from_str(&raw).context(format!("Failed to parse config at {:?}", path))
    }

    /// Persist to the default location, creating the directory if needed
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).context("Failed to create config directory")?;
        }
        let raw = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, raw).context(format!("Failed to write config at {:?}", path))?;
        Ok(())
    }
}
