// src/scan/filter.rs
// =============================================================================
// Decides which results are worth reporting.
//
// Two separate questions are answered here:
// - should_ignore: hide this result from the output?
// - should_expand: may the scanner follow its redirect / recurse into it?
//
// By default a hidden result is also not expanded (recursing into every 404
// would replay the dictionary under paths that do not exist). The
// `expand_ignored` switch keeps the two decisions apart.
//
// Soft 404s: some servers answer 200 with a "page not found" body. Body
// patterns map a regex to the status the page should be treated as, so
// "(?i)not found" => 404 hides those pages when 404 is ignored.
// =============================================================================

use std::collections::HashSet;

use regex::Regex;

use super::ScanResult;

pub trait ResultFilter: Send + Sync {
    fn should_ignore(&self, result: &ScanResult) -> bool;

    // Whether the scanner must keep response bodies around for this filter
    fn should_read_body(&self) -> bool;

    fn should_expand(&self, result: &ScanResult) -> bool {
        !self.should_ignore(result)
    }
}

// A body regex and the status a matching page is assumed to have
#[derive(Debug, Clone)]
pub struct BodyPattern {
    pub regex: Regex,
    pub assumed_status: u16,
}

#[derive(Debug, Clone, Default)]
pub struct HttpStatusResultFilter {
    statuses_to_ignore: HashSet<u16>,
    ignore_empty_body: bool,
    body_patterns: Vec<BodyPattern>,
    expand_ignored: bool,
}

impl HttpStatusResultFilter {
    pub fn new(
        statuses_to_ignore: impl IntoIterator<Item = u16>,
        ignore_empty_body: bool,
        body_patterns: Vec<BodyPattern>,
        expand_ignored: bool,
    ) -> Self {
        Self {
            statuses_to_ignore: statuses_to_ignore.into_iter().collect(),
            ignore_empty_body,
            body_patterns,
            expand_ignored,
        }
    }

    // The status the result should be judged by: the real one unless the
    // body gives the page away
    fn effective_status(&self, result: &ScanResult) -> u16 {
        if let Some(body) = result.body.as_deref() {
            let text = String::from_utf8_lossy(body);
            if let Some(pattern) = self.body_patterns.iter().find(|p| p.regex.is_match(&text)) {
                return pattern.assumed_status;
            }
        }
        result.status_code
    }
}

impl ResultFilter for HttpStatusResultFilter {
    fn should_ignore(&self, result: &ScanResult) -> bool {
        if self.ignore_empty_body
            && (200..=299).contains(&result.status_code)
            && result.content_length == 0
        {
            return true;
        }

        self.statuses_to_ignore.contains(&self.effective_status(result))
    }

    fn should_read_body(&self) -> bool {
        !self.body_patterns.is_empty()
    }

    fn should_expand(&self, result: &ScanResult) -> bool {
        self.expand_ignored || !self.should_ignore(result)
    }
}
