// src/ingest/http.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;

use super::normalize_text;
use super::types::{Source, SourceFetcher};
use crate::error::{Result, TrackerError};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) scholarship-tracker/0.1";

/// Plain GET + HTML-to-text. One request per source, no retries.
pub struct HttpFetcher {
    client: Client,
    max_chars: usize,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, max_chars: usize) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .timeout(timeout)
            .build()
            .map_err(|e| TrackerError::Config(format!("http client: {e}")))?;
        Ok(Self { client, max_chars })
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, source: &Source) -> Result<String> {
        let resp = self.client.get(source.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(TrackerError::Network(format!("HTTP {status}")));
        }
        let body = resp.text().await?;
        let text = normalize_text(&body, self.max_chars);
        if text.is_empty() {
            return Err(TrackerError::Network("empty page".to_string()));
        }
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
