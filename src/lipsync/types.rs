//! Wire types for the lipsync generation API.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::job::{LipsyncModel, SegmentWindow, SyncMode};

/// Lifecycle state of a generation job.
///
/// Only `COMPLETED` and `FAILED` carry meaning. Every other status name the
/// provider reports (queued, processing, names added later) is kept verbatim
/// and treated as still running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Completed,
    Failed,
    Pending(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
            JobStatus::Pending(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "COMPLETED" => JobStatus::Completed,
            "FAILED" => JobStatus::Failed,
            _ => JobStatus::Pending(s),
        }
    }
}

impl From<&str> for JobStatus {
    fn from(s: &str) -> Self {
        JobStatus::from(s.to_string())
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One media reference in a generation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GenerationInput {
    Video {
        url: String,
        segments_secs: Vec<[f64; 2]>,
    },
    Audio {
        url: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOptions {
    pub sync_mode: SyncMode,
}

/// Body of the job-creation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub model: LipsyncModel,
    pub input: Vec<GenerationInput>,
    pub options: GenerationOptions,
}

impl GenerationRequest {
    /// Video first, then audio. The segment window is forwarded untouched,
    /// `-1` bounds included.
    pub fn new(
        video_url: impl Into<String>,
        segment: SegmentWindow,
        audio_url: impl Into<String>,
        model: LipsyncModel,
        sync_mode: SyncMode,
    ) -> Self {
        Self {
            model,
            input: vec![
                GenerationInput::Video {
                    url: video_url.into(),
                    segments_secs: vec![segment.as_pair()],
                },
                GenerationInput::Audio {
                    url: audio_url.into(),
                },
            ],
            options: GenerationOptions { sync_mode },
        }
    }
}

/// A job record as returned by create and get.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub output_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_terminality() {
        assert!(JobStatus::from("COMPLETED").is_terminal());
        assert!(JobStatus::from("FAILED").is_terminal());
        assert!(!JobStatus::from("PENDING").is_terminal());
        assert!(!JobStatus::from("PROCESSING").is_terminal());
        assert!(!JobStatus::from("completed").is_terminal());
        assert_eq!(JobStatus::from("PROCESSING").as_str(), "PROCESSING");
    }

    #[test]
    fn request_body_shape() {
        let req = GenerationRequest::new(
            "https://cdn.example.com/clip.mp4",
            SegmentWindow::whole_video(),
            "https://h.uguu.se/abc.mp3",
            LipsyncModel::Lipsync2,
            SyncMode::CutOff,
        );
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "lipsync-2",
                "input": [
                    {"type": "video", "url": "https://cdn.example.com/clip.mp4", "segments_secs": [[-1.0, -1.0]]},
                    {"type": "audio", "url": "https://h.uguu.se/abc.mp3"}
                ],
                "options": {"sync_mode": "cut_off"}
            })
        );
    }

    #[test]
    fn generation_parses_camel_case() {
        let gen: Generation = serde_json::from_str(
            r#"{"id":"6533643b","status":"COMPLETED","outputUrl":"https://cdn.sync.so/out.mp4","model":"lipsync-2"}"#,
        )
        .unwrap();
        assert_eq!(gen.status, JobStatus::Completed);
        assert_eq!(gen.output_url.as_deref(), Some("https://cdn.sync.so/out.mp4"));

        let pending: Generation =
            serde_json::from_str(r#"{"id":"x","status":"PROCESSING","outputUrl":null}"#).unwrap();
        assert_eq!(pending.status, JobStatus::Pending("PROCESSING".into()));
        assert!(pending.output_url.is_none());
    }
}
