use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, info};

use super::openai::OpenAiClient;
use crate::error::{Error, Result};
use crate::http::rejection;

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Speech-to-text over the `/audio/transcriptions` endpoint.
#[derive(Debug, Clone)]
pub struct Transcriber {
    api: OpenAiClient,
    model: String,
}

impl Transcriber {
    pub fn new(api: OpenAiClient, model: impl Into<String>) -> Self {
        Self {
            api,
            model: model.into(),
        }
    }

    /// Upload the waveform and return the plain transcript.
    pub async fn transcribe(&self, waveform: &Path) -> Result<String> {
        let bytes = tokio::fs::read(waveform).await?;
        let file_name = waveform
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.wav".to_string());
        debug!(path = %waveform.display(), bytes = bytes.len(), model = %self.model, "transcribing");

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| Error::Transcription(e.to_string()))?;
        let form = Form::new()
            .text("model", self.model.clone())
            .part("file", part);

        let response = self
            .api
            .post("/audio/transcriptions")
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Transcription(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Transcription(rejection(response).await));
        }

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| Error::Transcription(format!("unreadable response: {}", e)))?;

        info!(chars = body.text.len(), "transcription complete");
        Ok(body.text)
    }
}
