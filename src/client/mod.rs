// src/client/mod.rs
// =============================================================================
// The HTTP side of the scanner.
//
// The scanner never talks to reqwest directly. It talks to a `Doer`: give
// it a request, get back the few response fields a scan cares about. That
// seam lets us:
// - wrap the real client in decorators (the request cache)
// - drive the scanner with an in-memory fake in tests
//
// Submodules:
// - http: the reqwest-backed Doer and its configuration
// - cache: the "at most once per (method, host, path)" decorator
// - cookie: replaying a fixed set of cookies without storing new ones
// =============================================================================

mod cache;
mod cookie;
mod http;

pub use cache::RequestCache;
pub use cookie::StatelessJar;
pub use http::{build_doer, ClientConfig, HttpDoer};

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use url::Url;

use crate::error::DoerError;

// What the scanner wants to send
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub method: Method,
    pub url: Url,
    /// Keep the response body (only needed by body-based filters)
    pub read_body: bool,
}

// What the scanner keeps from a response
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: u16,
    /// Effective URL of the request
    pub url: Url,
    pub content_length: Option<u64>,
    /// Raw Location header, if any
    pub location: Option<String>,
    pub body: Option<Vec<u8>>,
}

#[async_trait]
pub trait Doer: Send + Sync {
    async fn perform(&self, request: ProbeRequest) -> Result<ProbeResponse, DoerError>;
}

// A shared Doer is still a Doer, so decorators can wrap an Arc
#[async_trait]
impl<T: Doer + ?Sized> Doer for Arc<T> {
    async fn perform(&self, request: ProbeRequest) -> Result<ProbeResponse, DoerError> {
        (**self).perform(request).await
    }
}

// "host" or "host:port" when the URL spells out a port
pub fn host_with_port(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}
