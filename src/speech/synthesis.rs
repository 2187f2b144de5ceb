use std::path::PathBuf;
use std::time::Duration;

use babelfish_av::Workspace;
use futures::StreamExt;
use reqwest::Client;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::config::ElevenLabsConfig;
use crate::error::{Error, Result};
use crate::http::{provider_client, rejection, segment_url, DEFAULT_CONNECT_TIMEOUT};

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// Text-to-speech over the ElevenLabs `/text-to-speech/{voice}` endpoint.
#[derive(Clone)]
pub struct Synthesizer {
    client: Client,
    base_url: String,
    api_key: String,
    model_id: String,
    output_format: String,
    default_voice_id: String,
    connect_timeout: Duration,
}

impl Synthesizer {
    pub fn new(config: &ElevenLabsConfig, api_key: impl Into<String>) -> Self {
        Self {
            client: provider_client(DEFAULT_CONNECT_TIMEOUT),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model_id: config.model_id.clone(),
            output_format: config.output_format.clone(),
            default_voice_id: config.default_voice_id.clone(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.client = provider_client(connect_timeout);
        self.connect_timeout = connect_timeout;
        self
    }

    /// File extension implied by the output format, e.g. `mp3_44100_128` gives `mp3`.
    fn extension(&self) -> &str {
        self.output_format
            .split('_')
            .next()
            .filter(|e| !e.is_empty())
            .unwrap_or("mp3")
    }

    /// Synthesize `text` and stream the audio to `gen_<hex>.<ext>` in `workspace`.
    pub async fn synthesize(
        &self,
        text: &str,
        voice_id: Option<&str>,
        workspace: &Workspace,
    ) -> Result<PathBuf> {
        let voice = voice_id.unwrap_or(&self.default_voice_id);
        let url = segment_url(&self.base_url, &["text-to-speech", voice]).map_err(Error::Synthesis)?;
        debug!(voice, model = %self.model_id, chars = text.len(), "synthesizing speech");

        let response = self
            .client
            .post(url)
            .header("xi-api-key", &self.api_key)
            .query(&[
                ("output_format", self.output_format.as_str()),
                ("optimize_streaming_latency", "0"),
            ])
            .json(&SpeechRequest {
                text,
                model_id: &self.model_id,
            })
            .send()
            .await
            .map_err(|e| Error::Synthesis(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Synthesis(rejection(response).await));
        }

        let dest = workspace.unique_file("gen", 6, self.extension());
        let mut file = tokio::fs::File::create(&dest).await?;
        let written = match write_audio(response, &mut file).await {
            Ok(written) => written,
            Err(reason) => {
                drop(file);
                let _ = tokio::fs::remove_file(&dest).await;
                return Err(Error::Synthesis(reason));
            }
        };

        info!(path = %dest.display(), bytes = written, "speech synthesized");
        Ok(dest)
    }
}

async fn write_audio(
    response: reqwest::Response,
    file: &mut tokio::fs::File,
) -> std::result::Result<usize, String> {
    let mut stream = response.bytes_stream();
    let mut written = 0usize;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| format!("audio stream interrupted: {}", e))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| format!("failed to write audio: {}", e))?;
        written += chunk.len();
    }
    file.flush()
        .await
        .map_err(|e| format!("failed to write audio: {}", e))?;
    Ok(written)
}

impl std::fmt::Debug for Synthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synthesizer")
            .field("base_url", &self.base_url)
            .field("model_id", &self.model_id)
            .field("output_format", &self.output_format)
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}
