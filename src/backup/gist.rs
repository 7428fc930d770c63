//! GitHub gist API client for backup snapshots
//!
//! One secret gist holds the whole backup as a single JSON file. Create,
//! update, fetch and inspect map straight onto the gist endpoints; the
//! orchestration in the parent module decides which to call.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::info;

const API_BASE: &str = "https://api.github.com";

/// File name inside the backup gist
pub const BACKUP_FILENAME: &str = "upkeep-backup.json";

/// Gist API response (fields we care about)
#[derive(Debug, Deserialize)]
struct GistResponse {
    id: String,
    updated_at: DateTime<Utc>,
    html_url: Option<String>,
    files: HashMap<String, GistFile>,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    size: u64,
    truncated: Option<bool>,
    content: Option<String>,
    raw_url: Option<String>,
}

/// Backup gist metadata shown to the user
#[derive(Debug, Clone)]
pub struct GistInfo {
    pub id: String,
    pub updated_at: DateTime<Utc>,
    pub size_bytes: u64,
    pub url: Option<String>,
}

impl GistResponse {
    fn backup_file(&self) -> Result<&GistFile> {
        self.files
            .get(BACKUP_FILENAME)
            .ok_or_else(|| anyhow!("Gist {} has no {} file", self.id, BACKUP_FILENAME))
    }

    fn info(&self) -> Result<GistInfo> {
        let file = self.backup_file()?;
        Ok(GistInfo {
            id: self.id.clone(),
            updated_at: self.updated_at,
            size_bytes: file.size,
            url: self.html_url.clone(),
        })
    }
}

pub struct GistClient {
    client: Client,
    token: String,
}

impl GistClient {
    pub fn new(token: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent("upkeep-backup/0.1")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(GistClient { client, token })
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
    }

    async fn parse_response(&self, response: reqwest::Response) -> Result<GistResponse> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gist API returned {}: {}", status, body);
        }
        response
            .json::<GistResponse>()
            .await
            .context("Failed to parse gist API response")
    }

    /// Create the backup gist (secret) and return its metadata
    pub async fn create_backup(&self, content: &str) -> Result<GistInfo> {
        info!("Creating backup gist");

        let payload = serde_json::json!({
            "description": "upkeep asset tracker backup",
            "public": false,
            "files": { BACKUP_FILENAME: { "content": content } },
        });

        let response = self
            .authed(self.client.post(format!("{}/gists", API_BASE)))
            .json(&payload)
            .send()
            .await
            .context("Failed to send gist create request")?;

        self.parse_response(response).await?.info()
    }

    /// Overwrite the backup file in an existing gist
    pub async fn update_backup(&self, gist_id: &str, content: &str) -> Result<GistInfo> {
        info!("Updating backup gist {}", gist_id);

        let payload = serde_json::json!({
            "files": { BACKUP_FILENAME: { "content": content } },
        });

        let response = self
            .authed(self.client.patch(format!("{}/gists/{}", API_BASE, gist_id)))
            .json(&payload)
            .send()
            .await
            .context("Failed to send gist update request")?;

        self.parse_response(response).await?.info()
    }

    /// Fetch the backup file content. Large files come back truncated
    /// inline, in which case the raw URL has the full content.
    pub async fn fetch_backup(&self, gist_id: &str) -> Result<String> {
        info!("Fetching backup gist {}", gist_id);

        let response = self
            .authed(self.client.get(format!("{}/gists/{}", API_BASE, gist_id)))
            .send()
            .await
            .context("Failed to send gist fetch request")?;

        let gist = self.parse_response(response).await?;
        let file = gist.backup_file()?;

        if file.truncated.unwrap_or(false) {
            let raw_url = file
                .raw_url
                .as_ref()
                .ok_or_else(|| anyhow!("Truncated gist file has no raw URL"))?;
            let raw = self
                .client
                .get(raw_url)
                .send()
                .await
                .context("Failed to fetch raw gist content")?;
            let status = raw.status();
            if !status.is_success() {
                anyhow::bail!("Raw gist fetch returned {}", status);
            }
            return raw.text().await.context("Failed to read raw gist content");
        }

        file.content
            .clone()
            .ok_or_else(|| anyhow!("Gist file has no inline content"))
    }

    /// Backup gist metadata without downloading content
    pub async fn backup_info(&self, gist_id: &str) -> Result<GistInfo> {
        let response = self
            .authed(self.client.get(format!("{}/gists/{}", API_BASE, gist_id)))
            .send()
            .await
            .context("Failed to send gist info request")?;

        self.parse_response(response).await?.info()
    }
}
