// src/dictionary/load.rs
// =============================================================================
// Loads a dictionary from a local file or from a URL.
//
// Anything that parses as an http(s) URL is downloaded with the Doer given;
// everything else is treated as a path on disk. Blank lines and lines
// starting with '#' are skipped.
// =============================================================================

use anyhow::{bail, Context, Result};
use reqwest::Method;
use url::Url;

use crate::client::{Doer, ProbeRequest};

const COMMENT_PREFIX: char = '#';

pub async fn load(source: &str, doer: &dyn Doer) -> Result<Vec<String>> {
    match Url::parse(source) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => load_remote(url, doer).await,
        _ => load_local(source).await,
    }
}

async fn load_local(path: &str) -> Result<Vec<String>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("dictionary: unable to open: {}", path))?;

    Ok(parse_dictionary(&contents))
}

async fn load_remote(url: Url, doer: &dyn Doer) -> Result<Vec<String>> {
    let request = ProbeRequest {
        method: Method::GET,
        url: url.clone(),
        read_body: true,
    };

    let response = doer
        .perform(request)
        .await
        .with_context(|| format!("dictionary: failed to get `{}`", url))?;

    if !(200..=299).contains(&response.status) {
        bail!(
            "dictionary: failed to retrieve from `{}`, status code {}",
            url,
            response.status
        );
    }

    let body = response.body.unwrap_or_default();
    Ok(parse_dictionary(&String::from_utf8_lossy(&body)))
}

pub fn parse_dictionary(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_PREFIX))
        .map(str::to_string)
        .collect()
}
