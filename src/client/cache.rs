// src/client/cache.rs
// =============================================================================
// Request cache: never send the same request twice.
//
// Different redirect chains often land on the same location, and the same
// directory can be discovered from several places. The cache remembers every
// (method, host, path) it let through and refuses repeats with
// DoerError::RedundantRequest, without touching the network.
//
// Workers call this concurrently, so the key set is a DashSet: insert() both
// checks and records in one step.
// =============================================================================

use async_trait::async_trait;
use dashmap::DashSet;

use super::{host_with_port, Doer, ProbeRequest, ProbeResponse};
use crate::error::DoerError;

pub struct RequestCache<D> {
    inner: D,
    seen: DashSet<String>,
}

impl<D: Doer> RequestCache<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            seen: DashSet::new(),
        }
    }

    fn key_for(request: &ProbeRequest) -> String {
        format!(
            "{}~{}~{}",
            request.method,
            host_with_port(&request.url),
            request.url.path()
        )
    }
}

#[async_trait]
impl<D: Doer> Doer for RequestCache<D> {
    async fn perform(&self, request: ProbeRequest) -> Result<ProbeResponse, DoerError> {
        if !self.seen.insert(Self::key_for(&request)) {
            return Err(DoerError::RedundantRequest);
        }

        self.inner.perform(request).await
    }
}
