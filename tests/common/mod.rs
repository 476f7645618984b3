// Shared helpers for the integration tests: an in-memory site the scanner
// can be pointed at, and a few constructors.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use dirhound::client::{Doer, ProbeRequest, ProbeResponse};
use dirhound::error::DoerError;
use dirhound::scan::{
    DictionaryProducer, HttpStatusResultFilter, Producer, ReProducer, ResultFilter, ScanResult,
    Scanner,
};

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub location: Option<String>,
    pub body: Option<String>,
}

impl Route {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            location: None,
            body: None,
        }
    }

    pub fn redirect(status: u16, location: &str) -> Self {
        Self {
            status,
            location: Some(location.to_string()),
            body: None,
        }
    }

    pub fn body(status: u16, body: &str) -> Self {
        Self {
            status,
            location: None,
            body: Some(body.to_string()),
        }
    }
}

// Answers from a route table keyed by path; unknown paths get `fallback`.
// Every request is recorded as "METHOD path".
#[derive(Debug)]
pub struct FakeSite {
    routes: HashMap<String, Route>,
    fallback: Route,
    latency: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakeSite {
    pub fn new(routes: &[(&str, Route)]) -> Self {
        Self {
            routes: routes
                .iter()
                .map(|(path, route)| (path.to_string(), route.clone()))
                .collect(),
            fallback: Route::status(404),
            latency: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    // Every path exists
    pub fn always(status: u16) -> Self {
        Self {
            fallback: Route::status(status),
            ..Self::new(&[])
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Doer for FakeSite {
    async fn perform(&self, request: ProbeRequest) -> Result<ProbeResponse, DoerError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let path = request.url.path().to_string();
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {}", request.method, path));

        let route = self.routes.get(&path).unwrap_or(&self.fallback);
        let body = route.body.clone().unwrap_or_default().into_bytes();

        Ok(ProbeResponse {
            status: route.status,
            url: request.url.clone(),
            content_length: Some(body.len() as u64),
            location: route.location.clone(),
            body: request.read_body.then_some(body),
        })
    }
}

pub fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

pub fn scanner(
    doer: Arc<dyn Doer>,
    methods: &[&str],
    dictionary: &[&str],
    depth: i32,
    filter: impl ResultFilter + 'static,
) -> Scanner {
    let producer: Arc<dyn Producer> = Arc::new(DictionaryProducer::new(
        words(methods),
        words(dictionary),
        depth,
    ));
    let reproducer = Arc::new(ReProducer::new(Arc::clone(&producer)));

    Scanner::new(doer, producer, reproducer, Arc::new(filter))
}

pub fn ignore_404() -> HttpStatusResultFilter {
    HttpStatusResultFilter::new([404], false, Vec::new(), false)
}

pub fn url(raw: &str) -> Url {
    Url::parse(raw).unwrap()
}

// Drains the scan, sorted by path then method so assertions don't depend on
// worker scheduling
pub async fn collect(mut results: tokio::sync::mpsc::Receiver<ScanResult>) -> Vec<ScanResult> {
    let mut collected = Vec::new();
    while let Some(result) = results.recv().await {
        collected.push(result);
    }
    collected.sort_by(|a, b| {
        (&a.target.path, &a.target.method).cmp(&(&b.target.path, &b.target.method))
    });
    collected
}

pub fn paths(results: &[ScanResult]) -> Vec<String> {
    results.iter().map(|r| r.target.path.clone()).collect()
}
