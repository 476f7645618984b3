// src/scan/scanner.rs
// =============================================================================
// The scanner: a pool of workers probing targets.
//
// How a scan runs:
// 1. The base URL gets a trailing slash so paths join under it
// 2. The producer starts emitting seed targets
// 3. N workers pull seed targets until the producer is done (or the scan is
//    cancelled)
// 4. For every target a worker sends one request. An accepted result goes
//    out on the result channel, then the worker follows its redirect and
//    recurses into it, depth first, before pulling the next seed
// 5. When every worker has returned, the result channel closes
//
// Concurrency is bounded by the number of workers, never by the number of
// targets: recursion happens inside the worker that found the path.
//
// Rust concepts:
// - tokio::spawn / JoinSet: one task per worker plus a supervisor
// - tokio::select!: wait for a target OR for cancellation
// - BoxFuture: async recursion needs a boxed future
// =============================================================================

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use reqwest::Method;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::filter::ResultFilter;
use super::producer::Producer;
use super::reproducer::{Reproduce, ReproduceFn};
use super::urlpath;
use super::{ScanResult, Target};
use crate::client::{host_with_port, Doer, ProbeRequest, ProbeResponse};

#[derive(Clone)]
pub struct Scanner {
    doer: Arc<dyn Doer>,
    producer: Arc<dyn Producer>,
    reproducer: Arc<dyn Reproduce>,
    filter: Arc<dyn ResultFilter>,
}

impl Scanner {
    pub fn new(
        doer: Arc<dyn Doer>,
        producer: Arc<dyn Producer>,
        reproducer: Arc<dyn Reproduce>,
        filter: Arc<dyn ResultFilter>,
    ) -> Self {
        Self {
            doer,
            producer,
            reproducer,
            filter,
        }
    }

    // Starts the scan and returns the channel results arrive on
    //
    // The channel closes once all the work (seed targets, redirects and
    // recursion) is done, or once the scan is cancelled and every worker has
    // wound down. Draining it with `while let Some(..)` always terminates.
    pub fn scan(
        &self,
        token: CancellationToken,
        base_url: &Url,
        workers: usize,
    ) -> mpsc::Receiver<ScanResult> {
        let (results, receiver) = mpsc::channel(workers.max(1));

        let base_url = normalize_base_url(base_url);
        let seeds = Arc::new(Mutex::new(self.producer.produce(token.clone())));
        let reproduce = self.reproducer.reproduce(token.clone());

        let mut pool = JoinSet::new();
        for id in 0..workers {
            let worker = Worker {
                id,
                doer: Arc::clone(&self.doer),
                filter: Arc::clone(&self.filter),
                reproduce: Arc::clone(&reproduce),
                base_url: base_url.clone(),
                results: results.clone(),
                token: token.clone(),
            };
            pool.spawn(worker.run(Arc::clone(&seeds)));
        }

        // Closing the channel waits for every worker: each one holds a sender
        // clone, and this task drops the last one after the join
        tokio::spawn(async move {
            while let Some(joined) = pool.join_next().await {
                if let Err(e) = joined {
                    tracing::error!(error = %e, "worker terminated abnormally");
                }
            }
            tracing::debug!("all workers finished, closing result channel");
            drop(results);
        });

        receiver
    }
}

struct Worker {
    id: usize,
    doer: Arc<dyn Doer>,
    filter: Arc<dyn ResultFilter>,
    reproduce: ReproduceFn,
    base_url: Url,
    results: mpsc::Sender<ScanResult>,
    token: CancellationToken,
}

impl Worker {
    async fn run(self, seeds: Arc<Mutex<mpsc::Receiver<Target>>>) {
        loop {
            let next = tokio::select! {
                biased;
                _ = self.token.cancelled() => {
                    tracing::debug!(worker = self.id, "terminating worker: cancellation requested");
                    return;
                }
                next = async { seeds.lock().await.recv().await } => next,
            };

            match next {
                Some(target) => self.process_target(target).await,
                None => {
                    tracing::debug!(worker = self.id, "terminating worker: producer channel closed");
                    return;
                }
            }
        }
    }

    // Probes one target, reports it, then follows its redirect and recurses
    // into it. Everything happens on this worker, depth first.
    fn process_target(&self, target: Target) -> BoxFuture<'_, ()> {
        async move {
            tracing::debug!(
                method = %target.method,
                depth = target.depth,
                path = %target.path,
                "working"
            );

            let url = build_url(&self.base_url, &target);

            let method = match Method::from_bytes(target.method.as_bytes()) {
                Ok(method) => method,
                Err(e) => {
                    tracing::error!(
                        method = %target.method,
                        path = %target.path,
                        error = %e,
                        "failed to build request"
                    );
                    return;
                }
            };

            let request = ProbeRequest {
                method: method.clone(),
                url: url.clone(),
                read_body: self.filter.should_read_body(),
            };

            let outcome = tokio::select! {
                biased;
                _ = self.token.cancelled() => {
                    tracing::debug!(path = %target.path, "request abandoned: cancellation requested");
                    return;
                }
                outcome = self.doer.perform(request) => outcome,
            };

            let response = match outcome {
                Ok(response) => response,
                Err(e) if e.is_redundant() => {
                    tracing::debug!(
                        method = %target.method,
                        path = %target.path,
                        "skipping, request was already made"
                    );
                    return;
                }
                Err(e) => {
                    tracing::error!(
                        method = %target.method,
                        depth = target.depth,
                        path = %target.path,
                        error = %e,
                        "failed to perform request"
                    );
                    return;
                }
            };

            let result = ScanResult::new(target.clone(), &response);

            if !self.filter.should_ignore(&result) {
                let reported = ScanResult {
                    body: None,
                    ..result.clone()
                };
                if self.results.send(reported).await.is_err() {
                    tracing::debug!("result receiver dropped, stopping");
                    return;
                }
            }

            if !self.filter.should_expand(&result) {
                return;
            }

            if let Some(redirect) =
                redirect_target(&url, &method, &response, target.depth, self.base_url.path())
            {
                self.process_target(redirect).await;
            }

            let mut children = (self.reproduce)(&result);
            while let Some(child) = children.recv().await {
                self.process_target(child).await;
            }
        }
        .boxed()
    }
}

// Decides whether a response is a redirect worth following, and to where
//
// - never once the depth budget is spent
// - 301, 302 and 303 are followed; methods other than GET and HEAD are
//   replayed as GET, like browsers do
// - 307 and 308 are not followed
// - a Location on another host is never followed
fn redirect_target(
    request_url: &Url,
    method: &Method,
    response: &ProbeResponse,
    depth: i32,
    base_path: &str,
) -> Option<Target> {
    if depth <= 0 {
        tracing::debug!(url = %request_url, "depth is 0, not following any redirect");
        return None;
    }

    let location = response.location.as_deref().filter(|l| !l.is_empty())?;

    match response.status {
        301..=303 => {}
        307 | 308 => {
            tracing::debug!(url = %request_url, status_code = response.status, "not following redirect");
            return None;
        }
        _ => return None,
    }

    let redirect_method = if *method != Method::GET && *method != Method::HEAD {
        Method::GET
    } else {
        method.clone()
    };

    let resolved = match request_url.join(location) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::warn!(location, error = %e, "failed to parse location for redirect");
            return None;
        }
    };

    if host_with_port(&resolved) != host_with_port(request_url) {
        tracing::debug!(location, "skipping redirect, pointing to a different host");
        return None;
    }

    Some(Target {
        path: path_under_base(base_path, resolved.path()),
        method: redirect_method.to_string(),
        depth: depth - 1,
    })
}

// Location paths are absolute; targets are relative to the base path.
// "/app/login" under base "/app/" becomes "/login".
fn path_under_base(base_path: &str, location_path: &str) -> String {
    if base_path == "/" {
        return location_path.to_string();
    }

    match location_path.strip_prefix(base_path.trim_end_matches('/')) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => {
            if rest.is_empty() {
                "/".to_string()
            } else {
                rest.to_string()
            }
        }
        _ => location_path.to_string(),
    }
}

fn normalize_base_url(base_url: &Url) -> Url {
    let mut url = base_url.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn build_url(base_url: &Url, target: &Target) -> Url {
    let mut url = base_url.clone();
    url.set_path(&urlpath::join(&[base_url.path(), &target.path]));
    url
}
