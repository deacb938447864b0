// src/summarize/mod.rs
//! Summarizer seam: successful fetches in, one digest out.

pub mod gemini;

use async_trait::async_trait;

use crate::error::Result;
use crate::ingest::types::Source;

pub use gemini::GeminiSummarizer;

/// Instruction sent ahead of the scraped content.
pub const SUMMARY_PROMPT: &str = "You are preparing a daily scholarship update for Indian students. \
Below is text scraped today from trusted scholarship websites. Extract every scholarship, fellowship \
or grant that is currently open or upcoming. Answer with an HTML fragment only (no <html> or <body> \
tags, no markdown fences). Use one <h2> per category, in this order: Urgent deadlines (next 30 days), \
Government scholarships, Program-specific (Bachelor's, Master's, PhD), Special categories \
(merit, need, women, SC/ST/OBC), International. Skip empty categories. For each scholarship write \
<div class=\"scholarship\"> with an <h3> name, <p class=\"deadline\">Deadline: ...</p>, \
<p class=\"amount\">Amount: ...</p>, a <ul> of eligibility points and an <a href=\"...\">Apply</a> link. \
Leave out a field the text does not state. Do not invent scholarships that are not in the text. \
If nothing relevant is present, reply with exactly: No new scholarship updates today.";

/// Body used when no source could be fetched.
pub const NO_UPDATES: &str = "No scholarship updates today: no source could be fetched.";

/// The digest of one pass. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryReport {
    pub text: String,
}

impl SummaryReport {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Stand-in report when every fetch failed.
    pub fn no_updates() -> Self {
        Self::new(NO_UPDATES)
    }

    /// Blank output from the AI service. Not worth an email.
    pub fn is_degenerate(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// `content` is never empty; callers skip this stage instead.
    async fn summarize(&self, content: &str) -> Result<SummaryReport>;
    fn provider_name(&self) -> &'static str;
}

/// Concatenate successful fetches into one prompt body, each block labelled with its source.
pub fn combine_content<'a, I>(fetched: I) -> String
where
    I: IntoIterator<Item = (&'a Source, &'a str)>,
{
    let mut out = String::new();
    for (source, text) in fetched {
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str(&format!("### {} ({})\n{}", source.name, source.url, text));
    }
    out
}

/// Models like to wrap markup in a ```html fence even when told not to.
pub(crate) fn strip_code_fence(text: &str) -> &str {
    let t = text.trim();
    let Some(rest) = t.strip_prefix("```") else {
        return t;
    };
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Full text sent to the model.
pub fn build_prompt(content: &str) -> String {
    format!("{SUMMARY_PROMPT}\n\n--- SCRAPED CONTENT ---\n{content}")
}
