// src/scan/target.rs
// =============================================================================
// The two value types flowing through the scan engine.
//
// - Target: a unit of work (path + HTTP method + remaining depth)
// - ScanResult: what came back when a Target was probed
//
// Both serialize with PascalCase field names so a result file written by an
// older scan can still be loaded by `result-view` and `result-diff`.
// =============================================================================

use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::ProbeResponse;
use crate::output::wire_url;

// A path to probe with a given method
//
// `depth` is a remaining budget, not an absolute level: every target derived
// from this one (by recursion or by following a redirect) gets `depth - 1`,
// and nothing is derived once it reaches 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Target {
    pub path: String,
    pub method: String,
    pub depth: i32,
}

impl Target {
    pub fn new(path: impl Into<String>, method: impl Into<String>, depth: i32) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            depth,
        }
    }
}

// The outcome of probing one Target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanResult {
    pub target: Target,
    pub status_code: u16,
    /// Effective URL of the request that produced the response
    #[serde(rename = "URL", with = "wire_url")]
    pub url: Url,
    /// -1 when the server did not announce a length
    pub content_length: i64,
    /// Only filled in when the filter needs to look at the body
    #[serde(skip)]
    pub body: Option<Vec<u8>>,
}

impl ScanResult {
    // Builds a result from the target that was probed and the response
    pub fn new(target: Target, response: &ProbeResponse) -> Self {
        Self {
            target,
            status_code: response.status,
            url: response.url.clone(),
            content_length: response.content_length.map_or(-1, |len| len as i64),
            body: response.body.clone(),
        }
    }

    // Key used to spot the same finding reported twice
    pub fn dedup_key(&self) -> String {
        format!("{}~{}", self.url, self.target.method)
    }
}
