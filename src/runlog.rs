//! runlog.rs: append-only record of stage outcomes, one human-readable line per entry.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Summarize,
    Email,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::Summarize => "summarize",
            Stage::Email => "email",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Error(String),
    Skipped(String),
}

impl Outcome {
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::Error(_) => "error",
            Outcome::Skipped(_) => "skipped",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Outcome::Success(m) | Outcome::Error(m) | Outcome::Skipped(m) => m,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLogEntry {
    pub timestamp: DateTime<Utc>,
    pub stage: Stage,
    pub outcome: Outcome,
}

impl RunLogEntry {
    pub fn now(stage: Stage, outcome: Outcome) -> Self {
        Self {
            timestamp: Utc::now(),
            stage,
            outcome,
        }
    }

    /// `fetch:success` style tag, handy for asserting sequences.
    pub fn tag(&self) -> String {
        format!("{}:{}", self.stage, self.outcome.kind())
    }

    /// `<rfc3339> <stage> <outcome>[: <message>]`, newlines flattened.
    pub fn to_line(&self) -> String {
        let ts = self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
        let msg = self.outcome.message().replace(['\r', '\n'], " ");
        if msg.is_empty() {
            format!("{ts} {} {}", self.stage, self.outcome.kind())
        } else {
            format!("{ts} {} {}: {msg}", self.stage, self.outcome.kind())
        }
    }
}

/// Sink for run log entries. Appending never fails the caller.
pub trait RunLog: Send + Sync {
    fn append(&self, entry: RunLogEntry);
}

/// Append-only text file.
pub struct FileRunLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileRunLog {
    /// Open (creating parent directories) in append mode.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RunLog for FileRunLog {
    fn append(&self, entry: RunLogEntry) {
        trace_entry(&entry);
        let line = entry.to_line();
        let mut f = match self.file.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(f, "{line}").and_then(|_| f.flush()) {
            tracing::warn!(path = %self.path.display(), error = %e, "run log write failed");
        }
    }
}

/// In-memory sink. Tests assert on it.
#[derive(Debug, Default)]
pub struct MemoryRunLog {
    inner: Mutex<Vec<RunLogEntry>>,
}

impl MemoryRunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<RunLogEntry> {
        self.inner.lock().expect("run log mutex poisoned").clone()
    }

    pub fn tags(&self) -> Vec<String> {
        self.entries().iter().map(RunLogEntry::tag).collect()
    }
}

impl RunLog for MemoryRunLog {
    fn append(&self, entry: RunLogEntry) {
        trace_entry(&entry);
        self.inner.lock().expect("run log mutex poisoned").push(entry);
    }
}

fn trace_entry(entry: &RunLogEntry) {
    let stage = entry.stage.as_str();
    let msg = entry.outcome.message();
    match &entry.outcome {
        Outcome::Success(_) => tracing::info!(target: "runlog", stage, "{msg}"),
        Outcome::Skipped(_) => tracing::warn!(target: "runlog", stage, skipped = true, "{msg}"),
        Outcome::Error(_) => tracing::error!(target: "runlog", stage, "{msg}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(stage: Stage, outcome: Outcome) -> RunLogEntry {
        RunLogEntry {
            timestamp: Utc.with_ymd_and_hms(2025, 1, 15, 7, 30, 0).unwrap(),
            stage,
            outcome,
        }
    }

    #[test]
    fn line_format_is_stable() {
        let e = at(Stage::Fetch, Outcome::Error("AICTE: HTTP 503\nretry later".into()));
        assert_eq!(
            e.to_line(),
            "2025-01-15T07:30:00Z fetch error: AICTE: HTTP 503 retry later"
        );
        assert_eq!(e.tag(), "fetch:error");

        let bare = at(Stage::Email, Outcome::Success(String::new()));
        assert_eq!(bare.to_line(), "2025-01-15T07:30:00Z email success");
    }

    #[test]
    fn file_log_appends_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("tracker.log");

        let log = FileRunLog::open(&path).unwrap();
        log.append(at(Stage::Fetch, Outcome::Success("1/1 sources".into())));
        drop(log);

        let log = FileRunLog::open(&path).unwrap();
        log.append(at(Stage::Summarize, Outcome::Skipped("no successful fetches".into())));

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("fetch success: 1/1 sources"));
        assert!(lines[1].ends_with("summarize skipped: no successful fetches"));
    }

    #[test]
    fn memory_log_keeps_order() {
        let log = MemoryRunLog::new();
        log.append(RunLogEntry::now(Stage::Fetch, Outcome::Success("ok".into())));
        log.append(RunLogEntry::now(Stage::Email, Outcome::Error("boom".into())));
        assert_eq!(log.tags(), vec!["fetch:success", "email:error"]);
    }
}
