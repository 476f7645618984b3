// src/scan/producer.rs
// =============================================================================
// Produces the seed targets of a scan.
//
// The dictionary producer emits every (dictionary entry, HTTP method) pair
// as a Target. It runs on its own tokio task and pushes into a small bounded
// channel, so workers can start probing before production is finished and
// the producer waits whenever the workers fall behind.
//
// Rust concepts:
// - Traits: the scanner only knows about `Producer`, not the dictionary
// - mpsc channels: a bounded queue between tasks
// - CancellationToken: stop producing when the user presses Ctrl+C
// =============================================================================

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::Target;

const PRODUCER_BUFFER: usize = 10;

// Anything able to hand out a fresh stream of targets
//
// Every call returns a NEW stream; a stream is consumed once.
pub trait Producer: Send + Sync {
    fn produce(&self, token: CancellationToken) -> mpsc::Receiver<Target>;
}

// Cartesian product of a dictionary and a list of HTTP methods
#[derive(Debug, Clone)]
pub struct DictionaryProducer {
    methods: Arc<Vec<String>>,
    dictionary: Arc<Vec<String>>,
    depth: i32,
}

impl DictionaryProducer {
    pub fn new(methods: Vec<String>, dictionary: Vec<String>, depth: i32) -> Self {
        Self {
            methods: Arc::new(methods),
            dictionary: Arc::new(dictionary),
            depth,
        }
    }
}

impl Producer for DictionaryProducer {
    fn produce(&self, token: CancellationToken) -> mpsc::Receiver<Target> {
        let (sender, receiver) = mpsc::channel(PRODUCER_BUFFER);

        let methods = Arc::clone(&self.methods);
        let dictionary = Arc::clone(&self.dictionary);
        let depth = self.depth;

        tokio::spawn(async move {
            for entry in dictionary.iter() {
                for method in methods.iter() {
                    let target = Target::new(entry.as_str(), method.as_str(), depth);

                    tokio::select! {
                        biased;
                        _ = token.cancelled() => {
                            tracing::debug!("producer stopped: cancellation requested");
                            return;
                        }
                        sent = sender.send(target) => {
                            // Receiver dropped: nobody wants more targets
                            if sent.is_err() {
                                return;
                            }
                        }
                    }
                }
            }
        });

        receiver
    }
}
