// src/config.rs
// =============================================================================
// Turns the raw `scan` arguments into a validated ScanConfig.
//
// Everything that can be wrong with the options is caught here, before a
// single request is sent: a bad URL, zero threads, an unknown HTTP method,
// a malformed cookie/header, an unparseable proxy or regex.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;
use reqwest::Method;
use url::Url;

use crate::cli::ScanArgs;
use crate::client::ClientConfig;
use crate::error::ConfigError;
use crate::scan::{BodyPattern, HttpStatusResultFilter};

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub url: Url,
    pub dictionary: String,
    pub dictionary_timeout: Duration,
    pub methods: Vec<String>,
    pub statuses_to_ignore: Vec<u16>,
    pub threads: usize,
    pub depth: i32,
    pub client: ClientConfig,
    pub out: Option<PathBuf>,
    pub ignore_empty_body: bool,
    pub body_patterns: Vec<BodyPattern>,
    pub expand_ignored: bool,
}

impl ScanConfig {
    pub fn from_args(args: &ScanArgs) -> Result<Self, ConfigError> {
        let url = parse_url(&args.url)?;

        if args.threads == 0 {
            return Err(ConfigError::NoThreads);
        }

        let methods = parse_methods(&args.http_methods)?;

        let cookies = args
            .cookies
            .iter()
            .map(|c| parse_cookie(c))
            .collect::<Result<Vec<_>, _>>()?;

        let headers = args
            .headers
            .iter()
            .map(|h| parse_header(h))
            .collect::<Result<Vec<_>, _>>()?;

        let socks5 = args.socks5.as_deref().map(parse_socks5).transpose()?;

        let mut body_patterns = Vec::new();
        if let Some(pattern) = &args.assume_404_regex {
            body_patterns.push(BodyPattern {
                regex: compile(pattern)?,
                assumed_status: 404,
            });
        }
        for raw in &args.assume_statuses {
            body_patterns.push(parse_body_pattern(raw)?);
        }

        Ok(Self {
            url,
            dictionary: args.dictionary.clone(),
            dictionary_timeout: Duration::from_millis(args.dictionary_get_timeout),
            methods,
            statuses_to_ignore: args.http_statuses_to_ignore.clone(),
            threads: args.threads,
            depth: args.scan_depth,
            client: ClientConfig {
                timeout: Duration::from_millis(args.http_timeout),
                socks5,
                user_agent: args.user_agent.clone(),
                use_cookie_jar: args.use_cookie_jar,
                cookies,
                headers,
                cache_requests: args.http_cache_requests,
                skip_tls_verification: args.no_check_certificate,
            },
            out: args.out.clone(),
            ignore_empty_body: args.ignore_empty_body,
            body_patterns,
            expand_ignored: args.expand_ignored,
        })
    }

    pub fn result_filter(&self) -> HttpStatusResultFilter {
        HttpStatusResultFilter::new(
            self.statuses_to_ignore.iter().copied(),
            self.ignore_empty_body,
            self.body_patterns.clone(),
            self.expand_ignored,
        )
    }

    // Same client settings, with the dictionary timeout and no request cache
    pub fn dictionary_client(&self) -> ClientConfig {
        ClientConfig {
            timeout: self.dictionary_timeout,
            cache_requests: false,
            ..self.client.clone()
        }
    }
}

fn parse_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(format!("{} ({})", raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(raw.to_string()));
    }

    Ok(url)
}

fn parse_methods(raw: &[String]) -> Result<Vec<String>, ConfigError> {
    let methods: Vec<String> = raw
        .iter()
        .map(|m| m.trim().to_uppercase())
        .filter(|m| !m.is_empty())
        .collect();

    if methods.is_empty() {
        return Err(ConfigError::NoMethods);
    }

    for method in &methods {
        Method::from_bytes(method.as_bytes())
            .map_err(|_| ConfigError::InvalidMethod(method.clone()))?;
    }

    Ok(methods)
}

fn parse_cookie(raw: &str) -> Result<(String, String), ConfigError> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(ConfigError::InvalidCookie(raw.to_string())),
    }
}

// Accepts "Name: value" as well as "Name=value", split at whichever
// separator comes first
fn parse_header(raw: &str) -> Result<(String, String), ConfigError> {
    let separator = raw.find([':', '=']);

    match separator {
        Some(index) if !raw[..index].trim().is_empty() => Ok((
            raw[..index].trim().to_string(),
            raw[index + 1..].trim().to_string(),
        )),
        _ => Err(ConfigError::InvalidHeader(raw.to_string())),
    }
}

fn parse_socks5(host: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(&format!("socks5://{}", host))
        .map_err(|e| ConfigError::InvalidSocks5(format!("{} ({})", host, e)))?;

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidSocks5(host.to_string()));
    }

    Ok(url)
}

// "CODE=REGEX", e.g. "404=page not found"
fn parse_body_pattern(raw: &str) -> Result<BodyPattern, ConfigError> {
    let (code, pattern) = raw
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidBodyPattern(raw.to_string()))?;

    let assumed_status = code
        .trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::InvalidBodyPattern(raw.to_string()))?;

    Ok(BodyPattern {
        regex: compile(pattern)?,
        assumed_status,
    })
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidRegex {
        pattern: pattern.to_string(),
        source,
    })
}
