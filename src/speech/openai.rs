use std::time::Duration;

use reqwest::{Client, RequestBuilder};

use crate::http::{provider_client, DEFAULT_CONNECT_TIMEOUT};

/// Transcription and chat endpoints share one host and one key.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    connect_timeout: Duration,
}

impl OpenAiClient {
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
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(self.url(path))
            .bearer_auth(&self.api_key)
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}
