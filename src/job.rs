//! The immutable input bundle for one pipeline run.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Shortest accepted interval between lipsync status checks.
pub const MIN_POLL_SECS: u64 = 3;
/// Longest accepted interval between lipsync status checks.
pub const MAX_POLL_SECS: u64 = 60;
/// Interval used when the caller does not pick one.
pub const DEFAULT_POLL_SECS: u64 = 10;

/// API keys for the three providers a run talks to.
///
/// Each run carries its own keys into its own client objects; nothing is
/// stored process-wide.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Lipsync provider key.
    pub sync_api_key: String,
    /// Transcription and translation provider key.
    pub openai_api_key: String,
    /// Speech synthesis provider key.
    pub eleven_api_key: String,
}

impl Credentials {
    pub fn new(
        sync_api_key: impl Into<String>,
        openai_api_key: impl Into<String>,
        eleven_api_key: impl Into<String>,
    ) -> Self {
        Self {
            sync_api_key: sync_api_key.into(),
            openai_api_key: openai_api_key.into(),
            eleven_api_key: eleven_api_key.into(),
        }
    }

    /// Reject missing or blank keys, naming every one that is absent.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("sync_api_key", &self.sync_api_key),
            ("openai_api_key", &self.openai_api_key),
            ("eleven_api_key", &self.eleven_api_key),
        ]
        .into_iter()
        .filter(|(_, key)| key.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidRequest(format!(
                "missing credentials: {}",
                missing.join(", ")
            )))
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(key: &str) -> &'static str {
            if key.is_empty() {
                "<unset>"
            } else {
                "<redacted>"
            }
        }
        f.debug_struct("Credentials")
            .field("sync_api_key", &redact(&self.sync_api_key))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("eleven_api_key", &redact(&self.eleven_api_key))
            .finish()
    }
}

/// Lipsync model identifier.
///
/// Unknown identifiers are kept verbatim and forwarded to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LipsyncModel {
    #[default]
    Lipsync2,
    Lipsync19Beta,
    Other(String),
}

impl LipsyncModel {
    pub fn as_str(&self) -> &str {
        match self {
            LipsyncModel::Lipsync2 => "lipsync-2",
            LipsyncModel::Lipsync19Beta => "lipsync-1.9.0-beta",
            LipsyncModel::Other(name) => name,
        }
    }
}

impl From<&str> for LipsyncModel {
    fn from(s: &str) -> Self {
        match s {
            "lipsync-2" => LipsyncModel::Lipsync2,
            "lipsync-1.9.0-beta" => LipsyncModel::Lipsync19Beta,
            other => LipsyncModel::Other(other.to_string()),
        }
    }
}

impl From<String> for LipsyncModel {
    fn from(s: String) -> Self {
        LipsyncModel::from(s.as_str())
    }
}

impl From<LipsyncModel> for String {
    fn from(model: LipsyncModel) -> Self {
        model.as_str().to_string()
    }
}

impl std::str::FromStr for LipsyncModel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(LipsyncModel::from(s))
    }
}

impl fmt::Display for LipsyncModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the provider reconciles audio and video of different lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    Loop,
    #[default]
    Bounce,
    CutOff,
    Silence,
    Remap,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMode::Loop => "loop",
            SyncMode::Bounce => "bounce",
            SyncMode::CutOff => "cut_off",
            SyncMode::Silence => "silence",
            SyncMode::Remap => "remap",
        }
    }
}

impl std::str::FromStr for SyncMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "loop" => Ok(Self::Loop),
            "bounce" => Ok(Self::Bounce),
            "cut_off" | "cutoff" | "cut-off" => Ok(Self::CutOff),
            "silence" => Ok(Self::Silence),
            "remap" => Ok(Self::Remap),
            _ => Err(format!("Unknown sync mode: {}", s)),
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-range of the source video to lip-sync, in seconds.
///
/// `-1` on either end means "unset"; both unset means the whole video. The
/// values are forwarded to the provider as given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentWindow {
    pub start: f64,
    pub end: f64,
}

impl SegmentWindow {
    pub const UNSET: f64 = -1.0;

    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn whole_video() -> Self {
        Self::new(Self::UNSET, Self::UNSET)
    }

    pub fn is_whole_video(&self) -> bool {
        self.start == Self::UNSET && self.end == Self::UNSET
    }

    /// `[start, end]` as sent in `segments_secs`.
    pub fn as_pair(&self) -> [f64; 2] {
        [self.start, self.end]
    }

    fn validate(&self) -> Result<()> {
        let bound_ok = |v: f64| v == Self::UNSET || (v.is_finite() && v >= 0.0);
        if !bound_ok(self.start) || !bound_ok(self.end) {
            return Err(Error::InvalidRequest(format!(
                "segment bounds must be -1 or non-negative seconds, got [{}, {}]",
                self.start, self.end
            )));
        }
        if self.start != Self::UNSET && self.end != Self::UNSET && self.end <= self.start {
            return Err(Error::InvalidRequest(format!(
                "segment end {} is not after start {}",
                self.end, self.start
            )));
        }
        Ok(())
    }
}

impl Default for SegmentWindow {
    fn default() -> Self {
        Self::whole_video()
    }
}

/// Seconds between lipsync status checks, kept within 3..=60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PollInterval(u64);

impl PollInterval {
    /// Clamp `secs` into the accepted range.
    pub fn from_secs(secs: u64) -> Self {
        let clamped = secs.clamp(MIN_POLL_SECS, MAX_POLL_SECS);
        if clamped != secs {
            tracing::warn!(requested = secs, used = clamped, "poll interval out of range");
        }
        Self(clamped)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl Default for PollInterval {
    fn default() -> Self {
        Self(DEFAULT_POLL_SECS)
    }
}

/// Everything one run needs. Built once, never mutated by the pipeline.
#[derive(Debug, Clone)]
pub struct JobRequest {
    /// Remote source video. Also handed to the lipsync provider as-is.
    pub video_url: String,
    /// Free-form language name, e.g. "Spanish" or "Brazilian Portuguese".
    pub target_language: String,
    /// Empty means the upstream providers detect it.
    pub source_language: String,
    /// Empty falls back to the configured default voice.
    pub voice_id: String,
    pub lipsync_model: LipsyncModel,
    pub sync_mode: SyncMode,
    pub segment: SegmentWindow,
    pub poll_interval: PollInterval,
    /// Give up on the lipsync job after this long. `None` waits forever.
    pub max_wait: Option<Duration>,
    /// Where to write the JSON sidecar, if anywhere.
    pub metadata_path: Option<PathBuf>,
    pub credentials: Credentials,
}

impl JobRequest {
    /// Create a request with defaults for every optional field.
    pub fn new(
        video_url: impl Into<String>,
        target_language: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            video_url: video_url.into(),
            target_language: target_language.into(),
            source_language: String::new(),
            voice_id: String::new(),
            lipsync_model: LipsyncModel::default(),
            sync_mode: SyncMode::default(),
            segment: SegmentWindow::default(),
            poll_interval: PollInterval::default(),
            max_wait: None,
            metadata_path: None,
            credentials,
        }
    }

    /// Builder: set the source language hint.
    pub fn with_source_language(mut self, language: impl Into<String>) -> Self {
        self.source_language = language.into();
        self
    }

    /// Builder: set the synthesis voice.
    pub fn with_voice_id(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = voice_id.into();
        self
    }

    /// Builder: set the lipsync model.
    pub fn with_lipsync_model(mut self, model: impl Into<LipsyncModel>) -> Self {
        self.lipsync_model = model.into();
        self
    }

    /// Builder: set the sync mode.
    pub fn with_sync_mode(mut self, mode: SyncMode) -> Self {
        self.sync_mode = mode;
        self
    }

    /// Builder: set the segment window.
    pub fn with_segment(mut self, segment: SegmentWindow) -> Self {
        self.segment = segment;
        self
    }

    /// Builder: set the poll interval (clamped to 3..=60 seconds).
    pub fn with_poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval = PollInterval::from_secs(secs);
        self
    }

    /// Builder: bound how long to wait for the lipsync job.
    pub fn with_max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Builder: request a metadata sidecar at `path`. An empty path requests none.
    pub fn with_metadata_path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.metadata_path = (!path.as_os_str().is_empty()).then_some(path);
        self
    }

    /// The explicit voice, if one was given.
    pub fn voice(&self) -> Option<&str> {
        Some(self.voice_id.trim()).filter(|v| !v.is_empty())
    }

    /// Check every field that can be checked without touching the network.
    pub fn validate(&self) -> Result<()> {
        self.credentials.validate()?;

        let url = reqwest::Url::parse(&self.video_url).map_err(|e| {
            Error::InvalidRequest(format!("invalid video URL '{}': {}", self.video_url, e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::InvalidRequest(format!(
                "unsupported video URL scheme: {}",
                url.scheme()
            )));
        }

        if self.target_language.trim().is_empty() {
            return Err(Error::InvalidRequest("target language is empty".into()));
        }

        if self.lipsync_model.as_str().trim().is_empty() {
            return Err(Error::InvalidRequest("lipsync model is empty".into()));
        }

        self.segment.validate()
    }
}
