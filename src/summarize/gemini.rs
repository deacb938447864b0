// src/summarize/gemini.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::{build_prompt, strip_code_fence, SummaryReport, Summarizer};
use crate::error::{Result, TrackerError};

/// Google Gemini `generateContent` client.
pub struct GeminiSummarizer {
    http: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}
#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Req<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize)]
struct Resp {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}
#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}
#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<RespPart>,
}
#[derive(Deserialize)]
struct RespPart {
    #[serde(default)]
    text: String,
}
#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

impl GeminiSummarizer {
    /// `endpoint` is the API base, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent("scholarship-tracker/0.1")
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .timeout(timeout)
            .build()
            .map_err(|e| TrackerError::Config(format!("http client: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    async fn summarize(&self, content: &str) -> Result<SummaryReport> {
        let prompt = build_prompt(content);
        let req = Req {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: &prompt }],
            }],
            generation_config: GenerationConfig { temperature: 0.2 },
        };

        let resp = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| TrackerError::AiService(format!("request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| TrackerError::AiService(format!("reading body: {e}")))?;
        if !status.is_success() {
            let detail = serde_json::from_str::<Resp>(&body)
                .ok()
                .and_then(|r| r.error)
                .map(|e| e.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| body.chars().take(200).collect());
            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => {
                    TrackerError::AiService(format!("rate limited: {detail}"))
                }
                _ => TrackerError::AiService(format!("HTTP {status}: {detail}")),
            });
        }

        let parsed: Resp = serde_json::from_str(&body)
            .map_err(|e| TrackerError::AiService(format!("malformed response: {e}")))?;
        if let Some(err) = parsed.error {
            return Err(TrackerError::AiService(err.message));
        }

        // Blank text is passed through; the pipeline treats it as degenerate.
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        Ok(SummaryReport::new(strip_code_fence(&text)))
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
