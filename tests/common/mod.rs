// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use scholarship_tracker::error::{Result, TrackerError};
use scholarship_tracker::ingest::types::{Source, SourceFetcher};
use scholarship_tracker::notify::{Mailer, OutgoingEmail};
use scholarship_tracker::runlog::{MemoryRunLog, RunLog};
use scholarship_tracker::summarize::{Summarizer, SummaryReport};
use scholarship_tracker::Pipeline;

pub const RECIPIENT: &str = "student@example.com";

/// Serves canned page text per URL; unknown URLs fail like a refused connection.
#[derive(Default)]
pub struct StubFetcher {
    pages: HashMap<&'static str, String>,
}

impl StubFetcher {
    pub fn with(mut self, url: &'static str, text: &str) -> Self {
        self.pages.insert(url, text.to_string());
        self
    }
}

#[async_trait]
impl SourceFetcher for StubFetcher {
    async fn fetch(&self, source: &Source) -> Result<String> {
        self.pages
            .get(source.url)
            .cloned()
            .ok_or_else(|| TrackerError::Network("connection refused".to_string()))
    }
    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Deterministic summarizer that records what it was asked.
pub struct StubSummarizer {
    reply: Result<String>,
    pub inputs: Mutex<Vec<String>>,
}

impl StubSummarizer {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            reply: Err(TrackerError::AiService(msg.to_string())),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.inputs.lock().unwrap().len()
    }
}

#[async_trait]
impl Summarizer for StubSummarizer {
    async fn summarize(&self, content: &str) -> Result<SummaryReport> {
        self.inputs.lock().unwrap().push(content.to_string());
        self.reply.clone().map(SummaryReport::new)
    }
    fn provider_name(&self) -> &'static str {
        "stub"
    }
}

/// Records every email; optionally fails every send.
#[derive(Default)]
pub struct RecordingMailer {
    pub fail_with: Option<TrackerError>,
    pub sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    pub fn failing(err: TrackerError) -> Self {
        Self {
            fail_with: Some(err),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
    fn name(&self) -> &'static str {
        "recording"
    }
}

pub struct Harness {
    pub summarizer: Arc<StubSummarizer>,
    pub mailer: Arc<RecordingMailer>,
    pub log: Arc<MemoryRunLog>,
    pub pipeline: Pipeline,
}

pub fn harness(
    sources: &[Source],
    fetcher: StubFetcher,
    summarizer: StubSummarizer,
    mailer: RecordingMailer,
) -> Harness {
    let summarizer = Arc::new(summarizer);
    let mailer = Arc::new(mailer);
    let log = Arc::new(MemoryRunLog::new());
    let pipeline = Pipeline {
        sources: sources.to_vec(),
        fetcher: Arc::new(fetcher),
        summarizer: summarizer.clone(),
        mailer: mailer.clone(),
        log: log.clone() as Arc<dyn RunLog>,
        recipient: RECIPIENT.parse().unwrap(),
    };
    Harness {
        summarizer,
        mailer,
        log,
        pipeline,
    }
}

/// Spawn an axum app on an ephemeral port and return its base URL.
pub async fn serve(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// `Source` wants `'static` strings; tests build URLs at runtime.
pub fn leak(s: String) -> &'static str {
    Box::leak(s.into_boxed_str())
}
