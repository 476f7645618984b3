// src/summary/summarizer.rs
// =============================================================================
// Collects the results of a scan and prints the final report.
//
// `add` is called for every result coming off the scanner's channel:
// - duplicates (same URL + method) are counted but not stored again
// - first occurrences are logged right away, so the user sees findings live
//
// `summarize` prints, in order:
// - "N requests made, M results found"
// - the directory tree
// - one "<url> [<status>] [<method>]" line per result
//
// One RwLock guards everything, so a summary never interleaves with an add.
// =============================================================================

use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::{PoisonError, RwLock};

use super::ResultTree;
use crate::scan::ScanResult;

#[derive(Debug, Default)]
struct SummaryState {
    results: Vec<ScanResult>,
    seen: HashSet<String>,
    received: usize,
}

#[derive(Debug, Default)]
pub struct ResultSummarizer {
    state: RwLock<SummaryState>,
}

impl ResultSummarizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, result: ScanResult) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        state.received += 1;

        if !state.seen.insert(result.dedup_key()) {
            return;
        }

        log_result(&result);
        state.results.push(result);
    }

    pub fn results_found(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .results
            .len()
    }

    pub fn summarize(&self, out: &mut dyn Write) -> io::Result<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        state
            .results
            .sort_by(|a, b| a.target.path.cmp(&b.target.path));

        writeln!(
            out,
            "{} requests made, {} results found",
            state.received,
            state.results.len()
        )?;

        write!(out, "{}", ResultTree::from_results(&state.results))?;

        for result in &state.results {
            writeln!(
                out,
                "{} [{}] [{}]",
                result.url, result.status_code, result.target.method
            )?;
        }

        Ok(())
    }
}

fn log_result(result: &ScanResult) {
    if result.status_code >= 500 {
        tracing::warn!(
            status_code = result.status_code,
            method = %result.target.method,
            url = %result.url,
            "found something breaking"
        );
    } else {
        tracing::info!(
            status_code = result.status_code,
            method = %result.target.method,
            url = %result.url,
            "found"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::Target;
    use url::Url;

    fn result(path: &str, method: &str, status_code: u16) -> ScanResult {
        ScanResult {
            target: Target::new(path, method, 1),
            status_code,
            url: Url::parse(&format!("http://mysite{}", path)).unwrap(),
            content_length: 10,
            body: None,
        }
    }

    #[test]
    fn test_deduplicates_by_url_and_method() {
        let summarizer = ResultSummarizer::new();

        summarizer.add(result("/home", "GET", 200));
        summarizer.add(result("/home", "GET", 200));
        summarizer.add(result("/home", "POST", 200));

        assert_eq!(summarizer.results_found(), 2);
    }

    #[test]
    fn test_summary_output() {
        let summarizer = ResultSummarizer::new();

        summarizer.add(result("/home/about", "GET", 200));
        summarizer.add(result("/contacts", "POST", 500));
        summarizer.add(result("/home", "GET", 301));
        summarizer.add(result("/home", "GET", 301));

        let mut out = Vec::new();
        summarizer.summarize(&mut out).unwrap();

        let expected = "\
4 requests made, 3 results found
/
├── contacts
└── home
    └── about
http://mysite/contacts [500] [POST]
http://mysite/home [301] [GET]
http://mysite/home/about [200] [GET]
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_empty_summary() {
        let mut out = Vec::new();
        ResultSummarizer::new().summarize(&mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "0 requests made, 0 results found\n/\n");
    }
}
