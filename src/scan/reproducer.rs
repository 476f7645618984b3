// src/scan/reproducer.rs
// =============================================================================
// Recursion: going deeper into a path that turned out to exist.
//
// When "/admin" answers, we replay the whole dictionary under it
// ("/admin/home", "/admin/login", ...) with one less level of depth.
//
// Three things stop a result from being expanded:
// 1. its depth budget is used up
// 2. it looks like a file ("/index.php/admin" makes no sense)
// 3. its path was already expanded during this scan
//
// The third rule needs state shared by every worker, so `reproduce` builds
// a closure that owns a concurrent registry for the whole scan.
// =============================================================================

use std::sync::Arc;

use dashmap::DashSet;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::producer::Producer;
use super::urlpath;
use super::{ScanResult, Target};

const REPRODUCER_BUFFER: usize = 25;

// Expansion function built once per scan
pub type ReproduceFn = Arc<dyn Fn(&ScanResult) -> mpsc::Receiver<Target> + Send + Sync>;

pub trait Reproduce: Send + Sync {
    fn reproduce(&self, token: CancellationToken) -> ReproduceFn;
}

// Replays a producer's targets under already discovered paths
pub struct ReProducer {
    producer: Arc<dyn Producer>,
}

impl ReProducer {
    pub fn new(producer: Arc<dyn Producer>) -> Self {
        Self { producer }
    }
}

impl Reproduce for ReProducer {
    fn reproduce(&self, token: CancellationToken) -> ReproduceFn {
        let registry: Arc<DashSet<String>> = Arc::new(DashSet::new());
        let producer = Arc::clone(&self.producer);

        Arc::new(move |result: &ScanResult| {
            let (sender, receiver) = mpsc::channel(REPRODUCER_BUFFER);

            let parent = result.target.clone();

            if parent.depth <= 0 || urlpath::has_extension(&parent.path) {
                return receiver;
            }

            // insert() is the load-or-store: false means another call got here first
            if !registry.insert(parent.path.clone()) {
                return receiver;
            }

            let mut children = producer.produce(token.clone());

            tokio::spawn(async move {
                while let Some(child) = children.recv().await {
                    let target = Target {
                        path: urlpath::join(&[&parent.path, &child.path]),
                        method: child.method,
                        depth: parent.depth - 1,
                    };

                    if sender.send(target).await.is_err() {
                        return;
                    }
                }
            });

            receiver
        })
    }
}
