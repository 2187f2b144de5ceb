use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use babelfish::SyncMode;

#[derive(Parser)]
#[command(name = "babelfish")]
#[command(author, version, about = "Translate a video's speech and lip-sync the result")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate and lip-sync a video
    Translate(TranslateArgs),

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// URL of the source video
    #[arg(long)]
    pub video_url: String,

    /// Language to translate into, e.g. "Spanish"
    #[arg(long, default_value = "Spanish")]
    pub target_language: String,

    /// Language spoken in the source (empty to auto-detect)
    #[arg(long, default_value = "")]
    pub source_language: String,

    /// Synthesis voice (empty for the configured default)
    #[arg(long, default_value = "")]
    pub voice_id: String,

    /// Lipsync model, e.g. lipsync-2 or lipsync-1.9.0-beta
    #[arg(long, default_value = "lipsync-2")]
    pub lipsync_model: String,

    /// How to reconcile audio and video lengths
    #[arg(long, default_value = "bounce")]
    pub sync_mode: SyncMode,

    /// Segment start in seconds (-1 for the beginning)
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    pub segment_start: f64,

    /// Segment end in seconds (-1 for the end)
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    pub segment_end: f64,

    /// Seconds between lipsync status checks (3-60, default from config)
    #[arg(long)]
    pub poll_interval: Option<u64>,

    /// Give up on the lipsync job after this many seconds
    #[arg(long)]
    pub max_wait: Option<u64>,

    /// Write run metadata as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub output_json: Option<PathBuf>,

    /// sync.so API key
    #[arg(long, env = "SYNC_API_KEY", hide_env_values = true)]
    pub sync_api_key: Option<String>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// ElevenLabs API key
    #[arg(long, env = "ELEVEN_API_KEY", hide_env_values = true)]
    pub eleven_api_key: Option<String>,
}
