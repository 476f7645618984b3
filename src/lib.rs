// src/lib.rs
// =============================================================================
// Library root for dirhound.
//
// The binary (src/main.rs) is a thin layer over these modules; keeping them
// in a library lets the integration tests under tests/ drive the scan engine
// directly.
//
// Module map:
// - scan: targets, results, producers, filter and the scanner itself
// - client: the HTTP "doer" abstraction, reqwest wiring and request cache
// - summary: result deduplication, tree rendering and tree diffing
// - dictionary: loading and generating dictionaries
// - output: saving results as JSON lines and loading them back
// - config / cli: command-line options turned into a validated config
// - termination: the "press Ctrl+C twice" policy
// - logging / error: ambient plumbing
// =============================================================================

pub mod cli;
pub mod client;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod logging;
pub mod output;
pub mod scan;
pub mod summary;
pub mod termination;
