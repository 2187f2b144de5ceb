use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Directory shared by every run for intermediate and output files
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    #[serde(default)]
    pub transfer: TransferConfig,

    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub elevenlabs: ElevenLabsConfig,

    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

fn default_work_dir() -> PathBuf {
    std::env::temp_dir().join("sync_translate")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            transfer: TransferConfig::default(),
            openai: OpenAiConfig::default(),
            elevenlabs: ElevenLabsConfig::default(),
            upload: UploadConfig::default(),
            sync: SyncConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransferConfig {
    /// Bound on connecting and receiving response headers for downloads, and on
    /// connecting for every provider client (default: 30)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    30
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_openai_url")]
    pub base_url: String,

    /// Speech-to-text model (default: "whisper-1")
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,

    /// Chat model used for translation (default: "gpt-3.5-turbo")
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
}

fn default_openai_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_chat_model() -> String {
    "gpt-3.5-turbo".to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_url(),
            transcription_model: default_transcription_model(),
            chat_model: default_chat_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ElevenLabsConfig {
    #[serde(default = "default_elevenlabs_url")]
    pub base_url: String,

    /// Synthesis model (default: "eleven_multilingual_v2")
    #[serde(default = "default_tts_model")]
    pub model_id: String,

    /// Audio encoding requested from the provider (default: "mp3_44100_128")
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Voice used when a request names none
    #[serde(default = "default_voice_id")]
    pub default_voice_id: String,
}

fn default_elevenlabs_url() -> String {
    "https://api.elevenlabs.io/v1".to_string()
}

fn default_tts_model() -> String {
    "eleven_multilingual_v2".to_string()
}

fn default_output_format() -> String {
    "mp3_44100_128".to_string()
}

fn default_voice_id() -> String {
    "21m00Tcm4TlvDq8ikWAM".to_string()
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            base_url: default_elevenlabs_url(),
            model_id: default_tts_model(),
            output_format: default_output_format(),
            default_voice_id: default_voice_id(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// Anonymous file host accepting `files[]` multipart uploads
    #[serde(default = "default_upload_url")]
    pub url: String,
}

fn default_upload_url() -> String {
    "https://uguu.se/upload".to_string()
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            url: default_upload_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    #[serde(default = "default_sync_url")]
    pub base_url: String,

    /// Seconds between job status checks when a request names none (default: 10)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Give up on a job after this many seconds (default: wait forever)
    #[serde(default)]
    pub max_wait_secs: Option<u64>,
}

fn default_sync_url() -> String {
    "https://api.sync.so".to_string()
}

fn default_poll_interval() -> u64 {
    crate::job::DEFAULT_POLL_SECS
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: default_sync_url(),
            poll_interval_secs: default_poll_interval(),
            max_wait_secs: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,
}
