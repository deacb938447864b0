// src/ingest/types.rs
use crate::error::Result;

/// One trusted site. The list is fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Source {
    pub name: &'static str,
    pub url: &'static str,
}

/// Per-source outcome of one fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub source: Source,
    /// Normalized page text, or the error message.
    pub outcome: std::result::Result<String, String>,
}

impl FetchResult {
    pub fn ok(source: Source, text: impl Into<String>) -> Self {
        Self {
            source,
            outcome: Ok(text.into()),
        }
    }

    pub fn failed(source: Source, message: impl Into<String>) -> Self {
        Self {
            source,
            outcome: Err(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn text(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }
}

#[async_trait::async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Return page text for `source`, or a `TrackerError::Network`.
    async fn fetch(&self, source: &Source) -> Result<String>;
    fn name(&self) -> &'static str;
}
