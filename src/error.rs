// src/error.rs
// =============================================================================
// Typed errors for the library parts of dirhound.
//
// The command layer (main.rs, dictionary loading, output files) works with
// anyhow::Result and adds context as errors bubble up. The two places where
// callers need to tell errors apart get their own enums:
// - DoerError: the scanner treats a redundant request differently from a
//   network failure
// - ConfigError: invalid command-line options, reported before scanning
// =============================================================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DoerError {
    /// The same (method, host, path) was already requested with this client
    #[error("this request has been made already")]
    RedundantRequest,

    /// Anything reqwest reports: timeouts, refused connections, TLS, proxy
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl DoerError {
    pub fn is_redundant(&self) -> bool {
        matches!(self, DoerError::RedundantRequest)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("the first argument must be a valid http(s) url: {0}")]
    InvalidUrl(String),

    #[error("threads must be at least 1")]
    NoThreads,

    #[error("at least one http method is required")]
    NoMethods,

    #[error("invalid http method `{0}`")]
    InvalidMethod(String),

    #[error("invalid cookie `{0}`, expected name=value")]
    InvalidCookie(String),

    #[error("invalid header `{0}`, expected \"Name: value\"")]
    InvalidHeader(String),

    #[error("invalid value for socks5: {0}")]
    InvalidSocks5(String),

    #[error("invalid body pattern `{0}`, expected CODE=REGEX")]
    InvalidBodyPattern(String),

    #[error("invalid regex `{pattern}`: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
