//! Babelfish - translated, lip-synced video from a source clip
//!
//! The library exposes the pipeline and its stages; the `babelfish` binary is
//! a thin CLI adapter over [`translate`].

pub mod config;
pub mod error;
pub mod extract;
mod http;
pub mod job;
pub mod lipsync;
pub mod package;
pub mod pipeline;
pub mod publish;
pub mod speech;
pub mod transfer;

pub use error::{Error, Result};
pub use job::{Credentials, JobRequest, LipsyncModel, SegmentWindow, SyncMode};
pub use pipeline::{Failure, Pipeline, RunOutcome, RunSummary};

/// Run one job with the default ffmpeg-backed extractor.
pub async fn translate(config: &config::Config, request: JobRequest) -> RunOutcome {
    Pipeline::new(config, request).run().await
}
