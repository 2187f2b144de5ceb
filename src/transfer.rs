//! Streaming HTTP downloads into the working directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use babelfish_av::Workspace;
use futures::StreamExt;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Default bound on connecting and receiving response headers.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads remote resources chunk by chunk.
///
/// The timeout bounds request setup (connect plus response headers) and
/// every wait for the next body chunk. A large body may take as long as it
/// needs overall, as long as it keeps flowing.
#[derive(Debug, Clone)]
pub struct Transfer {
    client: Client,
    setup_timeout: Duration,
}

impl Transfer {
    pub fn new(setup_timeout: Duration) -> Self {
        let client = Client::builder()
            .connect_timeout(setup_timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            setup_timeout,
        }
    }

    /// Download `url` into `workspace`, named after the URL's last path
    /// segment with a random suffix.
    pub async fn fetch_into(&self, url: &str, workspace: &Workspace) -> Result<PathBuf> {
        let name = filename_from_url(url)?;
        let dest = workspace.unique_variant(&sanitize_filename(&name));
        self.fetch_to(url, &dest).await
    }

    /// Download `url` to exactly `dest`, creating or overwriting it.
    pub async fn fetch_to(&self, url: &str, dest: &Path) -> Result<PathBuf> {
        debug!(url, dest = %dest.display(), "starting download");

        let response = tokio::time::timeout(self.setup_timeout, self.client.get(url).send())
            .await
            .map_err(|_| {
                Error::transfer(
                    url,
                    format!("no response within {}s", self.setup_timeout.as_secs()),
                )
            })?
            .map_err(|e| Error::transfer(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transfer(url, format!("HTTP {}", status)));
        }

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::File::create(dest).await?;
        match write_body(response, &mut file, self.setup_timeout).await {
            Ok(bytes) => {
                file.flush().await?;
                info!(url, path = %dest.display(), bytes, "download complete");
                Ok(dest.to_path_buf())
            }
            Err(message) => {
                drop(file);
                let _ = tokio::fs::remove_file(dest).await;
                Err(Error::transfer(url, message))
            }
        }
    }
}

impl Default for Transfer {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT)
    }
}

/// Stream the body to `file`. Each chunk must arrive within `idle`.
async fn write_body(
    response: reqwest::Response,
    file: &mut tokio::fs::File,
    idle: Duration,
) -> std::result::Result<u64, String> {
    let mut written = 0u64;
    let mut stream = response.bytes_stream();
    loop {
        let next = tokio::time::timeout(idle, stream.next())
            .await
            .map_err(|_| format!("no data for {:.1}s after {} bytes", idle.as_secs_f32(), written))?;
        let Some(chunk) = next else {
            return Ok(written);
        };
        let chunk = chunk.map_err(|e| format!("stream error: {}", e))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| format!("write error: {}", e))?;
        written += chunk.len() as u64;
    }
}

fn filename_from_url(url: &str) -> Result<String> {
    let parsed = reqwest::Url::parse(url).map_err(|e| Error::transfer(url, e))?;
    if let Some(seg) = parsed
        .path_segments()
        .and_then(|s| s.last())
        .filter(|s| !s.is_empty())
    {
        return Ok(seg.to_string());
    }
    Ok("download".to_string())
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if matches!(
                c,
                '/' | '\\' | '"' | '\n' | '\r' | '\t' | '<' | '>' | '|' | ':' | '*' | '?'
            ) {
                '_'
            } else {
                c
            }
        })
        .collect()
}
