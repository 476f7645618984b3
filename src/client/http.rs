// src/client/http.rs
// =============================================================================
// The real Doer, backed by reqwest.
//
// Everything about HOW requests are sent lives in the client built here:
// - timeout per request
// - redirects are NOT followed by reqwest; the scanner decides what to follow
// - user agent and static headers on every request
// - cookies: a real jar, or a fixed set replayed on every request
// - optional SOCKS5 proxy and optional TLS certificate bypass
//
// `build_doer` wraps the client in the request cache when asked to.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, LOCATION};
use reqwest::{redirect, Client, Proxy};
use url::Url;

use super::{Doer, ProbeRequest, ProbeResponse, RequestCache, StatelessJar};
use crate::error::DoerError;

// Everything needed to build the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub socks5: Option<Url>,
    pub user_agent: Option<String>,
    pub use_cookie_jar: bool,
    pub cookies: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub cache_requests: bool,
    pub skip_tls_verification: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(5000),
            socks5: None,
            user_agent: None,
            use_cookie_jar: false,
            cookies: Vec::new(),
            headers: Vec::new(),
            cache_requests: false,
            skip_tls_verification: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpDoer {
    client: Client,
}

impl HttpDoer {
    // `target` is where fixed cookies are scoped when a real jar is used
    pub fn new(config: &ClientConfig, target: &Url) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .redirect(redirect::Policy::none())
            .danger_accept_invalid_certs(config.skip_tls_verification);

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        if !config.headers.is_empty() {
            builder = builder.default_headers(header_map(&config.headers)?);
        }

        if config.use_cookie_jar {
            let jar = Jar::default();
            for (name, value) in &config.cookies {
                jar.add_cookie_str(&format!("{}={}", name, value), target);
            }
            builder = builder.cookie_provider(Arc::new(jar));
        } else if !config.cookies.is_empty() {
            builder = builder.cookie_provider(Arc::new(StatelessJar::new(&config.cookies)));
        }

        if let Some(socks5) = &config.socks5 {
            let proxy = Proxy::all(socks5.as_str())
                .with_context(|| format!("failed to create socks5 proxy for {}", socks5))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("failed to build http client")?;

        Ok(Self { client })
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .with_context(|| format!("invalid header name `{}`", name))?;
        let value = HeaderValue::from_str(value)
            .with_context(|| format!("invalid value for header `{}`", name))?;
        map.insert(name, value);
    }
    Ok(map)
}

// What the server announced, which for HEAD differs from what reqwest
// received (reqwest reports 0 for an empty HEAD body)
fn announced_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

#[async_trait]
impl Doer for HttpDoer {
    async fn perform(&self, request: ProbeRequest) -> Result<ProbeResponse, DoerError> {
        let response = self.client.request(request.method, request.url).send().await?;

        let status = response.status().as_u16();
        let url = response.url().clone();
        let content_length = announced_length(response.headers()).or(response.content_length());
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Dropping the response closes it; the body is only read when needed
        let body = if request.read_body {
            match response.bytes().await {
                Ok(bytes) => Some(bytes.to_vec()),
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "failed to read response body");
                    None
                }
            }
        } else {
            None
        };

        Ok(ProbeResponse {
            status,
            url,
            content_length,
            location,
            body,
        })
    }
}

// Builds the Doer used for scanning: the reqwest client, wrapped in the
// request cache when `cache_requests` is set
pub fn build_doer(config: &ClientConfig, target: &Url) -> Result<Arc<dyn Doer>> {
    let doer = HttpDoer::new(config, target)?;

    if config.cache_requests {
        Ok(Arc::new(RequestCache::new(doer)))
    } else {
        Ok(Arc::new(doer))
    }
}
