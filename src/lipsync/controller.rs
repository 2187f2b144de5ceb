use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::client::LipsyncApi;
use super::types::{GenerationRequest, JobStatus};
use crate::error::{Error, Result};

/// Drives one generation job from submission to a terminal state.
pub struct LipsyncController {
    api: Box<dyn LipsyncApi>,
    poll_interval: Duration,
    max_wait: Option<Duration>,
}

impl LipsyncController {
    pub fn new(api: Box<dyn LipsyncApi>, poll_interval: Duration) -> Self {
        Self {
            api,
            poll_interval,
            max_wait: None,
        }
    }

    /// Stop waiting and fail with [`Error::JobTimeout`] after `max_wait`.
    pub fn with_max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Create the job and return its identifier.
    pub async fn submit(&self, request: &GenerationRequest) -> Result<String> {
        let generation = self.api.create(request).await?;
        info!(job_id = %generation.id, status = %generation.status, "Lipsync job submitted");
        Ok(generation.id)
    }

    /// Poll until the job reaches `COMPLETED` or `FAILED`.
    ///
    /// Each iteration sleeps first, so the first status check happens one
    /// interval after submission. Non-terminal status names are not
    /// interpreted.
    pub async fn wait(&self, job_id: &str) -> Result<()> {
        let started = Instant::now();
        let mut last: Option<JobStatus> = None;

        loop {
            if let Some(max_wait) = self.max_wait {
                let waited = started.elapsed();
                if waited >= max_wait {
                    return Err(Error::JobTimeout {
                        job_id: job_id.to_string(),
                        waited,
                    });
                }
            }

            tokio::time::sleep(self.poll_interval).await;
            let status = self.api.get(job_id).await?.status;

            if last.as_ref() != Some(&status) {
                info!(job_id, status = %status, "Lipsync job status");
            } else {
                debug!(job_id, status = %status, "Lipsync job unchanged");
            }

            match status {
                JobStatus::Completed => return Ok(()),
                JobStatus::Failed => return Err(Error::job_failed(job_id, status.as_str())),
                JobStatus::Pending(_) => last = Some(status),
            }
        }
    }

    /// Fetch the finished job's output location.
    pub async fn output_url(&self, job_id: &str) -> Result<String> {
        self.api
            .get(job_id)
            .await?
            .output_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| Error::Lipsync(format!("job {} completed without an output URL", job_id)))
    }
}
