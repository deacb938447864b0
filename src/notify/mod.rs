// src/notify/mod.rs
pub mod email;

use async_trait::async_trait;
use lettre::message::Mailbox;
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::error::Result;
use crate::ingest::normalize_text;
use crate::summarize::SummaryReport;

pub use email::SmtpMailer;

pub const SUBJECT: &str = "Daily Scholarship Update";

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<style>
body { font-family: Arial, sans-serif; color: #333; line-height: 1.5; }
.container { max-width: 800px; margin: 0 auto; padding: 16px; }
h1 { color: #1a5276; border-bottom: 2px solid #1a5276; }
h2 { color: #1f618d; margin-top: 24px; }
.scholarship { border: 1px solid #ddd; border-radius: 4px;
  padding: 12px; margin: 12px 0; }
.deadline { color: #c0392b; font-weight: bold; }
.amount { color: #27ae60; font-weight: bold; }
pre { white-space: pre-wrap; font-family: inherit; }
@media (max-width: 600px) { .container { padding: 8px; } }
</style>
</head>
<body>
<div class="container">
<h1>Daily Scholarship Update</h1>
"#;

const HTML_TAIL: &str = "</div>\n</body>\n</html>\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: Mailbox,
    pub subject: String,
    pub body: String,
}

impl OutgoingEmail {
    /// One digest email: fixed subject, report text as the body.
    pub fn digest(to: &Mailbox, report: &SummaryReport) -> Self {
        Self {
            to: to.clone(),
            subject: SUBJECT.to_string(),
            body: report.text.clone(),
        }
    }

    /// The report came back as markup rather than prose.
    pub fn is_html(&self) -> bool {
        static RE_MARKUP: OnceCell<Regex> = OnceCell::new();
        let re = RE_MARKUP.get_or_init(|| {
            Regex::new(r"(?i)<(div|p|h[1-6]|ul|ol|li|table|section|a|br)\b[^>]*>").unwrap()
        });
        re.is_match(&self.body)
    }

    /// Text part for clients that don't render HTML.
    pub fn plain_text(&self) -> String {
        if self.is_html() {
            normalize_text(&self.body, usize::MAX)
        } else {
            self.body.clone()
        }
    }

    /// Styled HTML part. Prose reports are escaped and kept preformatted.
    pub fn html(&self) -> String {
        let content = if self.is_html() {
            self.body.clone()
        } else {
            format!("<pre>{}</pre>", html_escape::encode_text(&self.body))
        };
        format!("{HTML_HEAD}{content}\n{HTML_TAIL}")
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Writes the email to the log instead of delivering it (`DRY_RUN=1`).
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            body_chars = email.body.chars().count(),
            "dry run, email not sent:\n{}",
            email.body
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
