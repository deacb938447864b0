// tests/run_log_file.rs
mod common;

use std::fs;
use std::sync::Arc;

use common::{harness, RecordingMailer, StubFetcher, StubSummarizer};
use scholarship_tracker::ingest::types::Source;
use scholarship_tracker::runlog::FileRunLog;
use scholarship_tracker::{CountedTrigger, Pipeline, Scheduler};

const EDU: Source = Source {
    name: "Example University",
    url: "https://example.edu/scholarships",
};
const DOWN: Source = Source {
    name: "Down",
    url: "https://down.example/",
};

#[tokio::test]
async fn passes_append_readable_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs/scholarship_tracker.log");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "pre-existing line\n").unwrap();

    let h = harness(
        &[DOWN, EDU],
        StubFetcher::default().with(EDU.url, "Scholarship A open until June"),
        StubSummarizer::replying("1 new scholarship: A"),
        RecordingMailer::default(),
    );
    let pipeline = Pipeline {
        log: Arc::new(FileRunLog::open(&path).unwrap()),
        ..h.pipeline
    };

    let mut scheduler = Scheduler::new(pipeline, CountedTrigger::new(2));
    scheduler.run().await;

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "pre-existing line");
    // 4 entries per pass: fetch error, fetch success, summarize, email.
    assert_eq!(lines.len(), 1 + 2 * 4);

    let first_pass: Vec<&str> = lines[1..5]
        .iter()
        .map(|l| l.split_once(' ').unwrap().1)
        .collect();
    assert_eq!(
        first_pass,
        vec![
            "fetch error: Down (https://down.example/): network error: connection refused",
            "fetch success: 1/2 sources",
            "summarize success: 20 chars",
            "email success: sent to student@example.com",
        ]
    );
    assert!(lines[1].contains('T') && lines[1].split(' ').next().unwrap().ends_with('Z'));
}
