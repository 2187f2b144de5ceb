//! Anonymous file hosting for the synthesized speech.
//!
//! The lipsync provider only accepts URLs, so the local audio has to be made
//! reachable first. Upload problems are expected and never raised: every
//! failure, transport errors included, comes back as `None`.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use crate::http::{provider_client, DEFAULT_CONNECT_TIMEOUT};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    files: Vec<UploadedFile>,
}

#[derive(Debug, Deserialize)]
struct UploadedFile {
    url: String,
}

/// Uploads files to a `files[]` multipart endpoint (uguu.se and compatible hosts).
#[derive(Debug, Clone)]
pub struct AssetPublisher {
    client: Client,
    upload_url: String,
    connect_timeout: Duration,
}

impl AssetPublisher {
    pub fn new(upload_url: impl Into<String>) -> Self {
        Self {
            client: provider_client(DEFAULT_CONNECT_TIMEOUT),
            upload_url: upload_url.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.client = provider_client(connect_timeout);
        self.connect_timeout = connect_timeout;
        self
    }

    /// Upload `file` and return its public URL, or `None` if anything went wrong.
    pub async fn publish(&self, file: &Path) -> Option<String> {
        match self.try_publish(file).await {
            Ok(url) => {
                info!(path = %file.display(), url = %url, "audio published");
                Some(url)
            }
            Err(reason) => {
                warn!(path = %file.display(), reason = %reason, "upload failed");
                None
            }
        }
    }

    async fn try_publish(&self, file: &Path) -> Result<String, String> {
        let bytes = tokio::fs::read(file)
            .await
            .map_err(|e| format!("cannot read file: {}", e))?;
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());

        let form = Form::new().part("files[]", Part::bytes(bytes).file_name(file_name));
        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("transport error: {}", e))?;

        let status = response.status();
        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| format!("HTTP {} with unreadable body: {}", status, e))?;

        if !body.success {
            return Err(format!("HTTP {} reported success=false", status));
        }

        body.files
            .into_iter()
            .next()
            .map(|f| f.url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| "response listed no files".to_string())
    }
}
