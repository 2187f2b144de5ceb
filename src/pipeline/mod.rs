//! One translate-and-lipsync run, end to end.
//!
//! [`Pipeline::run`] never returns a bare error: every run ends in a
//! [`RunOutcome`] that is either the output video, one of the three checked
//! failures, or a fault raised by a stage.

mod executor;

pub use executor::{Pipeline, ProgressCallback};

use std::path::PathBuf;

use crate::error::Error;

/// Recoverable failures the pipeline checks for explicitly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    /// The synthesized speech could not be published.
    #[error("Generated speech upload failed")]
    UploadFailed,

    /// The lipsync provider refused to create the job.
    #[error("Sync error – {status}: {body}")]
    SubmissionRejected { status: u16, body: String },

    /// The lipsync job ended in `FAILED`.
    #[error("Lipsync job {job_id} failed: {status}")]
    JobFailed { job_id: String, status: String },
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// The translated, lip-synced video on local disk.
    pub output_path: PathBuf,
    pub job_id: String,
    pub transcript: String,
    pub translated_text: String,
    /// Set when a sidecar was requested and written.
    pub metadata_path: Option<PathBuf>,
}

/// Result of one pipeline run.
#[derive(Debug)]
pub enum RunOutcome {
    Completed(RunSummary),
    Rejected(Failure),
    Fault(Error),
}

impl RunOutcome {
    /// The string a host shows for this run: the output path on success,
    /// the failure message otherwise.
    pub fn display_text(&self) -> String {
        match self {
            RunOutcome::Completed(summary) => summary.output_path.display().to_string(),
            RunOutcome::Rejected(failure) => failure.to_string(),
            RunOutcome::Fault(err) => err.to_string(),
        }
    }

    /// Process exit code: 0 success, 2 recoverable failure, 1 fault.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Completed(_) => 0,
            RunOutcome::Rejected(_) => 2,
            RunOutcome::Fault(_) => 1,
        }
    }

    pub fn into_result(self) -> anyhow::Result<RunSummary> {
        match self {
            RunOutcome::Completed(summary) => Ok(summary),
            RunOutcome::Rejected(failure) => Err(failure.into()),
            RunOutcome::Fault(err) => Err(err.into()),
        }
    }
}

impl From<Error> for RunOutcome {
    fn from(err: Error) -> Self {
        match err {
            Error::Submission { status, body } => {
                RunOutcome::Rejected(Failure::SubmissionRejected { status, body })
            }
            Error::JobFailed { job_id, status } => {
                RunOutcome::Rejected(Failure::JobFailed { job_id, status })
            }
            other => RunOutcome::Fault(other),
        }
    }
}

/// Intermediate artifacts of one run.
///
/// Owned by a single invocation. Each slot is filled once, by the stage that
/// produces it, and only read by later stages.
#[derive(Debug, Default)]
pub(crate) struct RunState {
    pub local_video: Option<PathBuf>,
    pub waveform: Option<PathBuf>,
    pub speech_audio: Option<PathBuf>,
    pub transcript: Option<String>,
    pub translated_text: Option<String>,
    pub audio_url: Option<String>,
    pub job_id: Option<String>,
    pub output_url: Option<String>,
    pub output_path: Option<PathBuf>,
}

/// Fill a [`RunState`] slot and hand back the stored value.
pub(crate) fn fill<T>(slot: &mut Option<T>, value: T) -> &T {
    debug_assert!(slot.is_none(), "run state slot written twice");
    slot.insert(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn failure_messages() {
        assert_eq!(
            Failure::UploadFailed.to_string(),
            "Generated speech upload failed"
        );
        assert_eq!(
            Failure::SubmissionRejected {
                status: 422,
                body: "{\"error\":\"bad segment\"}".into()
            }
            .to_string(),
            "Sync error – 422: {\"error\":\"bad segment\"}"
        );
        assert_eq!(
            Failure::JobFailed {
                job_id: "gen-42".into(),
                status: "FAILED".into()
            }
            .to_string(),
            "Lipsync job gen-42 failed: FAILED"
        );
    }

    #[test]
    fn provider_rejections_become_failures() {
        assert_matches!(
            RunOutcome::from(Error::Submission { status: 401, body: "nope".into() }),
            RunOutcome::Rejected(Failure::SubmissionRejected { status: 401, .. })
        );
        assert_matches!(
            RunOutcome::from(Error::job_failed("j", "FAILED")),
            RunOutcome::Rejected(Failure::JobFailed { .. })
        );
        assert_matches!(
            RunOutcome::from(Error::transfer("https://x", "HTTP 404")),
            RunOutcome::Fault(Error::Transfer { .. })
        );
    }

    #[test]
    fn exit_codes_and_text() {
        let done = RunOutcome::Completed(RunSummary {
            output_path: PathBuf::from("/tmp/translated_01234567.mp4"),
            job_id: "j".into(),
            transcript: "hi".into(),
            translated_text: "hola".into(),
            metadata_path: None,
        });
        assert_eq!(done.exit_code(), 0);
        assert_eq!(done.display_text(), "/tmp/translated_01234567.mp4");
        assert!(done.into_result().is_ok());

        let rejected = RunOutcome::Rejected(Failure::UploadFailed);
        assert_eq!(rejected.exit_code(), 2);
        let err = rejected.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Generated speech upload failed");

        let fault = RunOutcome::Fault(Error::Extraction("no audio".into()));
        assert_eq!(fault.exit_code(), 1);
        assert!(fault.display_text().contains("no audio"));
    }

    #[test]
    fn fill_returns_stored_value() {
        let mut state = RunState::default();
        let id = fill(&mut state.job_id, "gen-1".to_string());
        assert_eq!(id, "gen-1");
        assert_eq!(state.job_id.as_deref(), Some("gen-1"));
    }
}
