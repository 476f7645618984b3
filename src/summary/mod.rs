// src/summary/mod.rs
// =============================================================================
// Turning a stream of results into something a human reads.
//
// Submodules:
// - summarizer: dedup + live logging + final report
// - tree: directory tree rendering
// - diff: comparing two rendered trees
// =============================================================================

mod diff;
mod summarizer;
mod tree;

pub use diff::{diff_trees, Change, DiffLine, TreeDiff};
pub use summarizer::ResultSummarizer;
pub use tree::ResultTree;
