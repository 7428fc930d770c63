//! Cloud backup of the local database via a gist service
//!
//! Push serializes the snapshot envelope and uploads it to a single secret
//! gist (created on first use, then updated in place); pull downloads the
//! envelope and replaces local data with it. The gist id is remembered in
//! the config file so later pushes and pulls find the same gist.

pub mod gist;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::config::Config;
use crate::error::UpkeepError;
use crate::transfer::{self, ImportCounts};
pub use gist::{GistClient, GistInfo, BACKUP_FILENAME};

/// Env var that overrides the configured backup token
pub const TOKEN_ENV_VAR: &str = "UPKEEP_GITHUB_TOKEN";

/// Resolve the API token: environment first, then the config file.
pub fn resolve_token(config: &Config) -> Result<String> {
    if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
        if !token.is_empty() {
            return Ok(token);
        }
    }
    config.backup.token.clone().ok_or_else(|| {
        UpkeepError::BackupError(format!(
            "no backup token configured; set {} or add backup.token to the config file",
            TOKEN_ENV_VAR
        ))
        .into()
    })
}

/// Upload the current data as a snapshot; creates the gist on first push
/// and records its id in the config.
pub async fn push(conn: &Connection, config: &mut Config) -> Result<GistInfo> {
    let snapshot = transfer::export_snapshot(conn)?;
    let content = transfer::snapshot_to_json(&snapshot)?;

    let client = GistClient::new(resolve_token(config)?)?;

    let info = match config.backup.gist_id.as_deref() {
        Some(gist_id) => client.update_backup(gist_id, &content).await?,
        None => {
            let info = client.create_backup(&content).await?;
            config.backup.gist_id = Some(info.id.clone());
            config
                .save()
                .context("Backup created but saving its gist id to the config failed")?;
            info
        }
    };

    Ok(info)
}

/// Download the backup snapshot and replace local data with it.
pub async fn pull(conn: &mut Connection, config: &Config) -> Result<ImportCounts> {
    let gist_id = config
        .backup
        .gist_id
        .as_deref()
        .context("No backup gist configured; run `upkeep backup push` first")?;

    let client = GistClient::new(resolve_token(config)?)?;
    let content = client.fetch_backup(gist_id).await?;
    let snapshot = transfer::parse_snapshot(&content)?;

    transfer::import_snapshot(conn, &snapshot)
}

/// Metadata of the configured backup gist.
pub async fn info(config: &Config) -> Result<GistInfo> {
    let gist_id = config
        .backup
        .gist_id
        .as_deref()
        .context("No backup gist configured; run `upkeep backup push` first")?;

    let client = GistClient::new(resolve_token(config)?)?;
    client.backup_info(gist_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_token_prefers_config_when_env_unset() {
        // Skip when the surrounding environment already provides a token
        if std::env::var(TOKEN_ENV_VAR).is_ok() {
            return;
        }
        let mut config = Config::default();
        assert!(resolve_token(&config).is_err());

        config.backup.token = Some("from-config".to_string());
        assert_eq!(resolve_token(&config).unwrap(), "from-config");
    }
}
