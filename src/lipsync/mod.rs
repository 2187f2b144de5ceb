//! Lipsync job submission and polling.
//!
//! The provider is reached through [`LipsyncApi`]; [`SyncClient`] talks to
//! the real service and [`LipsyncController`] owns the create, poll and
//! fetch-output sequence.

mod client;
mod controller;
mod types;

pub use client::{LipsyncApi, SyncClient};
pub use controller::LipsyncController;
pub use types::{Generation, GenerationInput, GenerationOptions, GenerationRequest, JobStatus};
