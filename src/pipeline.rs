//! One pass: fetch → summarize → email, with a run log entry for every stage.

use std::fmt;
use std::sync::Arc;

use lettre::message::Mailbox;
use metrics::{counter, gauge};

use crate::config::Config;
use crate::error::{Result, TrackerError};
use crate::ingest::http::HttpFetcher;
use crate::ingest::sources::TRUSTED_SOURCES;
use crate::ingest::{self, types::Source, types::SourceFetcher};
use crate::notify::{LogMailer, Mailer, OutgoingEmail, SmtpMailer};
use crate::runlog::{FileRunLog, Outcome, RunLog, RunLogEntry, Stage};
use crate::summarize::{self, GeminiSummarizer, Summarizer, SummaryReport};

/// How a pass ended. Only `Sent` delivered an email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    Sent,
    NoUpdates,
    SummarizeFailed(String),
    EmptySummary,
    EmailFailed(String),
}

impl PassOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, PassOutcome::Sent)
    }

}

impl fmt::Display for PassOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassOutcome::Sent => f.write_str("sent"),
            PassOutcome::NoUpdates => f.write_str("no updates"),
            PassOutcome::SummarizeFailed(e) => write!(f, "summarize failed ({e})"),
            PassOutcome::EmptySummary => f.write_str("empty summary"),
            PassOutcome::EmailFailed(e) => write!(f, "email failed ({e})"),
        }
    }
}

/// Everything a pass needs, wired once at startup.
pub struct Pipeline {
    pub sources: Vec<Source>,
    pub fetcher: Arc<dyn SourceFetcher>,
    pub summarizer: Arc<dyn Summarizer>,
    pub mailer: Arc<dyn Mailer>,
    pub log: Arc<dyn RunLog>,
    pub recipient: Mailbox,
}

impl Pipeline {
    /// Production wiring: trusted sources, reqwest fetcher, Gemini, SMTP (or log in dry-run), file log.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let s = &cfg.settings;
        let log = FileRunLog::open(&s.log_path).map_err(|e| {
            TrackerError::Config(format!("cannot open log {}: {e}", s.log_path.display()))
        })?;
        let mailer: Arc<dyn Mailer> = if cfg.dry_run {
            Arc::new(LogMailer)
        } else {
            Arc::new(SmtpMailer::from_config(cfg)?)
        };
        Ok(Self {
            sources: TRUSTED_SOURCES.to_vec(),
            fetcher: Arc::new(HttpFetcher::new(s.fetch_timeout(), s.max_chars_per_source)?),
            summarizer: Arc::new(GeminiSummarizer::new(
                &s.ai_endpoint,
                &s.ai_model,
                &cfg.api_key,
                s.ai_timeout(),
            )?),
            mailer,
            log: Arc::new(log),
            recipient: cfg.recipient.clone(),
        })
    }

    /// Stage entries only go to the run log; the overall outcome is returned and traced.
    pub async fn run_pass(&self) -> PassOutcome {
        let outcome = self.run_stages().await;
        let label = if outcome.is_sent() { "sent" } else { "not_sent" };
        counter!("tracker_passes_total", "outcome" => label).increment(1);
        gauge!("tracker_last_pass_ts").set(chrono::Utc::now().timestamp() as f64);
        outcome
    }

    async fn run_stages(&self) -> PassOutcome {
        // Fetch
        let results = ingest::fetch_all(self.fetcher.as_ref(), &self.sources).await;
        for r in results.iter().filter(|r| !r.is_success()) {
            let msg = r.outcome.as_ref().err().cloned().unwrap_or_default();
            self.record(
                Stage::Fetch,
                Outcome::Error(format!("{} ({}): {msg}", r.source.name, r.source.url)),
            );
        }
        let ok = results.iter().filter(|r| r.is_success()).count();
        if ok == 0 {
            self.record(Stage::Fetch, Outcome::Error("no successful fetches".to_string()));
            let substitute = SummaryReport::no_updates();
            self.record(Stage::Summarize, Outcome::Skipped(substitute.text));
            return PassOutcome::NoUpdates;
        }
        self.record(
            Stage::Fetch,
            Outcome::Success(format!("{ok}/{} sources", results.len())),
        );

        // Summarize
        let content = summarize::combine_content(ingest::successful(&results));
        let report = match self.summarizer.summarize(&content).await {
            Ok(r) => r,
            Err(e) => {
                self.record(Stage::Summarize, Outcome::Error(e.to_string()));
                return PassOutcome::SummarizeFailed(e.to_string());
            }
        };
        if report.is_degenerate() {
            self.record(
                Stage::Summarize,
                Outcome::Error(format!("empty summary from {}", self.summarizer.provider_name())),
            );
            return PassOutcome::EmptySummary;
        }
        self.record(
            Stage::Summarize,
            Outcome::Success(format!("{} chars", report.text.chars().count())),
        );

        // Email
        let email = OutgoingEmail::digest(&self.recipient, &report);
        match self.mailer.send(&email).await {
            Ok(()) => {
                counter!("tracker_emails_sent_total").increment(1);
                self.record(Stage::Email, Outcome::Success(format!("sent to {}", email.to)));
                PassOutcome::Sent
            }
            Err(e) => {
                self.record(Stage::Email, Outcome::Error(e.to_string()));
                PassOutcome::EmailFailed(e.to_string())
            }
        }
    }

    fn record(&self, stage: Stage, outcome: Outcome) {
        self.log.append(RunLogEntry::now(stage, outcome));
    }
}
