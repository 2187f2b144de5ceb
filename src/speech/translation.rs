use serde::{Deserialize, Serialize};
use tracing::info;

use super::openai::OpenAiClient;
use crate::error::{Error, Result};
use crate::http::rejection;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// The single user message sent for a translation.
pub fn translation_prompt(target_language: &str, transcript: &str) -> String {
    format!(
        "Translate the following transcript to {} preserving tone and emotion:\n{}",
        target_language, transcript
    )
}

/// Transcript translation through one chat completion.
#[derive(Debug, Clone)]
pub struct Translator {
    api: OpenAiClient,
    model: String,
}

impl Translator {
    pub fn new(api: OpenAiClient, model: impl Into<String>) -> Self {
        Self {
            api,
            model: model.into(),
        }
    }

    /// Translate `transcript` into `target_language`, returning the trimmed reply.
    pub async fn translate(&self, transcript: &str, target_language: &str) -> Result<String> {
        let prompt = translation_prompt(target_language, transcript);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        let response = self
            .api
            .post("/chat/completions")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Translation(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Translation(rejection(response).await));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Translation(format!("unreadable response: {}", e)))?;

        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .ok_or_else(|| Error::Translation("response contained no completion".into()))?;

        info!(target_language, chars = text.len(), "translation complete");
        Ok(text)
    }
}
