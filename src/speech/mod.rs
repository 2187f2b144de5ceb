//! Speech pipeline: transcribe, translate, synthesize.
//!
//! The three calls run strictly in order, each consuming the previous
//! result. Transcription and translation share the OpenAI key; synthesis
//! uses the ElevenLabs key. Clients are built per run from the request's
//! own credentials.

mod openai;
mod synthesis;
mod transcription;
mod translation;

pub use openai::OpenAiClient;
pub use synthesis::Synthesizer;
pub use transcription::Transcriber;
pub use translation::{translation_prompt, Translator};

use std::path::{Path, PathBuf};
use std::time::Duration;

use babelfish_av::Workspace;

use crate::config::Config;
use crate::error::Result;
use crate::job::Credentials;

/// What the speech pipeline hands to the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechOutput {
    /// Transcript of the source audio.
    pub transcript: String,
    /// Transcript translated into the target language.
    pub translated_text: String,
    /// Synthesized translated speech on local disk.
    pub audio_path: PathBuf,
}

/// The three chained speech calls.
#[derive(Debug, Clone)]
pub struct SpeechPipeline {
    transcriber: Transcriber,
    translator: Translator,
    synthesizer: Synthesizer,
}

impl SpeechPipeline {
    pub fn new(transcriber: Transcriber, translator: Translator, synthesizer: Synthesizer) -> Self {
        Self {
            transcriber,
            translator,
            synthesizer,
        }
    }

    /// Build the clients for one run from configuration and its credentials.
    pub fn from_config(config: &Config, credentials: &Credentials) -> Self {
        let connect_timeout = Duration::from_secs(config.transfer.connect_timeout_secs);
        let openai = OpenAiClient::new(&config.openai.base_url, credentials.openai_api_key.clone())
            .with_connect_timeout(connect_timeout);
        Self::new(
            Transcriber::new(openai.clone(), config.openai.transcription_model.clone()),
            Translator::new(openai, config.openai.chat_model.clone()),
            Synthesizer::new(&config.elevenlabs, credentials.eleven_api_key.clone())
                .with_connect_timeout(connect_timeout),
        )
    }

    /// Turn a source waveform into translated speech.
    pub async fn run(
        &self,
        waveform: &Path,
        target_language: &str,
        voice_id: Option<&str>,
        workspace: &Workspace,
    ) -> Result<SpeechOutput> {
        let transcript = self.transcriber.transcribe(waveform).await?;
        let translated_text = self.translator.translate(&transcript, target_language).await?;
        let audio_path = self
            .synthesizer
            .synthesize(&translated_text, voice_id, workspace)
            .await?;

        Ok(SpeechOutput {
            transcript,
            translated_text,
            audio_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> Config {
        let mut config = Config::default();
        config.openai.base_url = server.uri();
        config.elevenlabs.base_url = server.uri();
        config
    }

    #[tokio::test]
    async fn chains_all_three_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "Thank you."})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "Danke."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/text-to-speech/21m00Tcm4TlvDq8ikWAM"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp3".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path()).unwrap();
        let wav = dir.path().join("clip.wav");
        std::fs::write(&wav, b"RIFF").unwrap();

        let speech = SpeechPipeline::from_config(
            &config_for(&server),
            &Credentials::new("s", "o", "e"),
        );
        let out = speech.run(&wav, "German", None, &workspace).await.unwrap();

        assert_eq!(out.transcript, "Thank you.");
        assert_eq!(out.translated_text, "Danke.");
        assert!(out.audio_path.exists());
    }

    #[tokio::test]
    async fn failed_transcription_skips_later_steps() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad audio"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path()).unwrap();
        let wav = dir.path().join("clip.wav");
        std::fs::write(&wav, b"RIFF").unwrap();

        let speech = SpeechPipeline::from_config(
            &config_for(&server),
            &Credentials::new("s", "o", "e"),
        );
        let err = speech.run(&wav, "German", None, &workspace).await.unwrap_err();
        assert!(matches!(err, Error::Transcription(_)));
    }

    #[test]
    fn provider_clients_take_configured_connect_timeout() {
        let mut config = Config::default();
        config.transfer.connect_timeout_secs = 7;

        let speech = SpeechPipeline::from_config(&config, &Credentials::new("s", "o", "e"));
        let rendered = format!("{:?}", speech);

        assert_eq!(rendered.matches("connect_timeout: 7s").count(), 3);
        assert!(!rendered.contains("connect_timeout: 30s"));
    }
}
