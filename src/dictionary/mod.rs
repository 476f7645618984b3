// src/dictionary/mod.rs
// =============================================================================
// Dictionaries: the list of path segments a scan tries.
//
// Submodules:
// - load: read a dictionary from a local file or a remote URL
// - generate: build a dictionary from the files in a local directory
// =============================================================================

mod generate;
mod load;

pub use generate::generate;
pub use load::{load, parse_dictionary};
