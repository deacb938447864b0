// src/ingest/mod.rs
pub mod http;
pub mod sources;
pub mod types;

use metrics::counter;
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::ingest::types::{FetchResult, Source, SourceFetcher};

/// Turn an HTML page into a single line of readable text.
pub fn normalize_text(s: &str, max_chars: usize) -> String {
    // 1) Drop blocks whose content is never prose
    static RE_BLOCKS: OnceCell<Regex> = OnceCell::new();
    let re_blocks = RE_BLOCKS.get_or_init(|| {
        Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<!--.*?-->").unwrap()
    });
    let out = re_blocks.replace_all(s, " ");

    // 2) Strip tags (space-separated so adjacent blocks don't glue together)
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?s)</?[a-zA-Z!][^>]*>").unwrap());
    let out = re_tags.replace_all(&out, " ");

    // 3) HTML entity decode
    let out = html_escape::decode_html_entities(&out);

    // 4) Normalize curly quotes to ASCII
    let out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 5) Collapse whitespace (incl. nbsp)
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    let out = re_ws.replace_all(&out, " ");
    let out = out.trim();

    // 6) Length cap
    if out.chars().count() > max_chars {
        out.chars().take(max_chars).collect::<String>().trim_end().to_string()
    } else {
        out.to_string()
    }
}

/// Fetch every source in order. A failing source never aborts the batch.
pub async fn fetch_all(fetcher: &dyn SourceFetcher, sources: &[Source]) -> Vec<FetchResult> {
    let mut results = Vec::with_capacity(sources.len());
    for source in sources {
        match fetcher.fetch(source).await {
            Ok(text) => {
                tracing::debug!(source = source.name, chars = text.chars().count(), "fetched");
                results.push(FetchResult::ok(*source, text));
            }
            Err(e) => {
                tracing::warn!(source = source.name, url = source.url, error = %e, "fetch failed");
                counter!("tracker_fetch_errors_total").increment(1);
                results.push(FetchResult::failed(*source, e.to_string()));
            }
        }
    }
    results
}

pub fn successful(results: &[FetchResult]) -> impl Iterator<Item = (&Source, &str)> {
    results
        .iter()
        .filter_map(|r| r.text().map(|t| (&r.source, t)))
}
