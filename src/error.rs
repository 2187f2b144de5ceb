//! Error type for a pipeline run.
//!
//! Every stage funnels its failures into [`Error`]. The variants mirror the
//! stage that failed so callers can tell a bad download from a provider
//! rejecting the translated speech.

use std::path::PathBuf;
use std::time::Duration;

/// Errors raised by pipeline stages.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request was refused before any network call was made.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Fetching a remote resource failed.
    #[error("transfer failed for {url}: {message}")]
    Transfer {
        /// The resource that was being fetched.
        url: String,
        /// Human-readable error description.
        message: String,
    },

    /// The video's audio track could not be demuxed.
    #[error("audio extraction failed: {0}")]
    Extraction(String),

    /// The speech-to-text provider rejected the waveform.
    #[error("transcription failed: {0}")]
    Transcription(String),

    /// The text-generation provider rejected the translation prompt.
    #[error("translation failed: {0}")]
    Translation(String),

    /// The text-to-speech provider rejected the translated text.
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    /// The lipsync provider refused to create the generation job.
    #[error("lipsync submission rejected ({status}): {body}")]
    Submission {
        /// HTTP status returned by the provider.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The lipsync job reached its terminal failure state.
    #[error("lipsync job {job_id} failed: {status}")]
    JobFailed {
        /// Provider job identifier.
        job_id: String,
        /// Terminal status string.
        status: String,
    },

    /// The lipsync job did not finish within the configured deadline.
    #[error("lipsync job {job_id} still running after {}s", waited.as_secs())]
    JobTimeout {
        /// Provider job identifier.
        job_id: String,
        /// How long the controller waited.
        waited: Duration,
    },

    /// Talking to the lipsync provider failed outside of job submission.
    #[error("lipsync provider error: {0}")]
    Lipsync(String),

    /// Writing the metadata sidecar failed.
    #[error("failed to write metadata to {}: {message}", path.display())]
    Metadata {
        /// Requested sidecar path.
        path: PathBuf,
        /// Human-readable error description.
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Convenience constructor for [`Error::Transfer`].
    pub fn transfer(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Error::Transfer {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Convenience constructor for [`Error::JobFailed`].
    pub fn job_failed(job_id: impl Into<String>, status: impl Into<String>) -> Self {
        Error::JobFailed {
            job_id: job_id.into(),
            status: status.into(),
        }
    }

    /// Convenience constructor for [`Error::Metadata`].
    pub fn metadata(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Error::Metadata {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl From<babelfish_av::Error> for Error {
    fn from(err: babelfish_av::Error) -> Self {
        Error::Extraction(err.to_string())
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_display() {
        let err = Error::transfer("http://example.com/a.mp4", "HTTP 404 Not Found");
        assert_eq!(
            err.to_string(),
            "transfer failed for http://example.com/a.mp4: HTTP 404 Not Found"
        );
    }

    #[test]
    fn submission_display() {
        let err = Error::Submission {
            status: 422,
            body: "{\"message\":\"bad model\"}".into(),
        };
        assert_eq!(
            err.to_string(),
            "lipsync submission rejected (422): {\"message\":\"bad model\"}"
        );
    }

    #[test]
    fn job_timeout_display() {
        let err = Error::JobTimeout {
            job_id: "gen-1".into(),
            waited: Duration::from_secs(90),
        };
        assert_eq!(err.to_string(), "lipsync job gen-1 still running after 90s");
    }

    #[test]
    fn av_errors_become_extraction() {
        let err = Error::from(babelfish_av::Error::no_audio_track("/tmp/x.mp4"));
        assert!(matches!(err, Error::Extraction(ref m) if m.contains("no audio track")));
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
    }
}
