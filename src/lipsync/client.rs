use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::types::{Generation, GenerationRequest};
use crate::error::{Error, Result};
use crate::http::{provider_client, rejection, segment_url, DEFAULT_CONNECT_TIMEOUT};

/// The two calls the job controller needs from a lipsync provider.
#[async_trait]
pub trait LipsyncApi: Send + Sync {
    /// Create a generation job.
    ///
    /// A synchronous rejection is reported as [`Error::Submission`] with the
    /// provider's status code and body.
    async fn create(&self, request: &GenerationRequest) -> Result<Generation>;

    /// Fetch the current job record.
    async fn get(&self, job_id: &str) -> Result<Generation>;
}

/// Client for the sync.so v2 generation API.
pub struct SyncClient {
    client: Client,
    base_url: String,
    api_key: String,
    connect_timeout: Duration,
}

impl SyncClient {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            client: provider_client(DEFAULT_CONNECT_TIMEOUT),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.client = provider_client(connect_timeout);
        self.connect_timeout = connect_timeout;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v2{}", self.base_url, path)
    }

    fn job_url(&self, job_id: &str) -> Result<reqwest::Url> {
        segment_url(&self.base_url, &["v2", "generate", job_id]).map_err(Error::Lipsync)
    }
}

#[async_trait]
impl LipsyncApi for SyncClient {
    async fn create(&self, request: &GenerationRequest) -> Result<Generation> {
        debug!(model = %request.model, "creating lipsync generation");
        let response = self
            .client
            .post(self.url("/generate"))
            .header("x-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Lipsync(format!("failed to POST /generate: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Submission {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| Error::Lipsync(format!("unreadable generation record: {}", e)))
    }

    async fn get(&self, job_id: &str) -> Result<Generation> {
        let response = self
            .client
            .get(self.job_url(job_id)?)
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| Error::Lipsync(format!("failed to GET job {}: {}", job_id, e)))?;

        if !response.status().is_success() {
            return Err(Error::Lipsync(format!(
                "status check for job {} returned {}",
                job_id,
                rejection(response).await
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Lipsync(format!("unreadable generation record: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{LipsyncModel, SegmentWindow, SyncMode};
    use crate::lipsync::JobStatus;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> GenerationRequest {
        GenerationRequest::new(
            "https://cdn.example.com/clip.mp4",
            SegmentWindow::new(1.5, 9.0),
            "https://h.uguu.se/abc.mp3",
            LipsyncModel::Lipsync2,
            SyncMode::Bounce,
        )
    }

    #[tokio::test]
    async fn create_returns_job_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/generate"))
            .and(header("x-api-key", "sync-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "lipsync-2",
                "input": [{"type": "video", "segments_secs": [[1.5, 9.0]]}, {"type": "audio"}],
                "options": {"sync_mode": "bounce"}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "gen-42", "status": "PENDING", "outputUrl": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = SyncClient::new(&server.uri(), "sync-key");
        let gen = client.create(&request()).await.unwrap();
        assert_eq!(gen.id, "gen-42");
        assert_eq!(gen.status, JobStatus::Pending("PENDING".into()));
    }

    #[tokio::test]
    async fn create_rejection_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/generate"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string(r#"{"message":"Invalid API key"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = SyncClient::new(&server.uri(), "wrong");
        let err = client.create(&request()).await.unwrap_err();
        match err {
            Error::Submission { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, r#"{"message":"Invalid API key"}"#);
            }
            other => panic!("expected submission error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_reads_output_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/generate/gen-42"))
            .and(header("x-api-key", "sync-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "gen-42", "status": "COMPLETED", "outputUrl": "https://cdn.sync.so/gen-42.mp4"
            })))
            .mount(&server)
            .await;

        let client = SyncClient::new(&server.uri(), "sync-key");
        let gen = client.get("gen-42").await.unwrap();
        assert_eq!(gen.status, JobStatus::Completed);
        assert_eq!(gen.output_url.as_deref(), Some("https://cdn.sync.so/gen-42.mp4"));
    }

    #[tokio::test]
    async fn get_failure_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let client = SyncClient::new(&server.uri(), "sync-key");
        let err = client.get("missing").await.unwrap_err();
        assert!(matches!(err, Error::Lipsync(ref m) if m.contains("404")));
    }

    #[test]
    fn connect_timeout_override() {
        let client = SyncClient::new("http://localhost/v2", "k");
        assert_eq!(client.connect_timeout, Duration::from_secs(30));

        let client = client.with_connect_timeout(Duration::from_secs(5));
        assert_eq!(client.connect_timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn job_id_stays_one_path_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/generate/a%2Fb%3Fc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "a/b?c", "status": "PROCESSING", "outputUrl": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = SyncClient::new(&server.uri(), "sync-key");
        let gen = client.get("a/b?c").await.unwrap();
        assert_eq!(gen.id, "a/b?c");
    }
}
