// src/scan/mod.rs
// =============================================================================
// The scan engine.
//
// Submodules:
// - target: the Target and ScanResult value types
// - urlpath: joining URL paths, spotting file extensions
// - producer: the seed targets (dictionary x methods)
// - reproducer: recursion into discovered paths
// - filter: which results are reported / expanded
// - scanner: the worker pool tying it all together
//
// Data flow:
//   producer -> workers -> (filter) -> result channel -> caller
//                  ^          |
//                  +- redirects / reproducer
// =============================================================================

mod filter;
mod producer;
mod reproducer;
mod scanner;
mod target;
pub mod urlpath;

pub use filter::{BodyPattern, HttpStatusResultFilter, ResultFilter};
pub use producer::{DictionaryProducer, Producer};
pub use reproducer::{ReProducer, Reproduce, ReproduceFn};
pub use scanner::Scanner;
pub use target::{ScanResult, Target};
