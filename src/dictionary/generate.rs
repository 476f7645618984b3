// src/dictionary/generate.rs
// =============================================================================
// Builds a dictionary out of a local directory.
//
// Handy when the layout of the target is known (an open source CMS, a
// framework skeleton): point it at a checkout and scan for the same names.
//
// Two modes:
// - names (default): every distinct file or directory name, once
// - absolute_only: the full path of every file
// =============================================================================

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

pub fn generate(root: &Path, absolute_only: bool, out: &mut dyn Write) -> Result<()> {
    let entries = if absolute_only {
        file_paths(root)?
    } else {
        file_names(root)?
    };

    for entry in entries {
        writeln!(out, "{}", entry).context("failed to write dictionary entry")?;
    }

    Ok(())
}

fn file_paths(root: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.context("failed to walk directory")?;
        if !entry.file_type().is_dir() {
            files.push(entry.path().display().to_string());
        }
    }

    Ok(files)
}

fn file_names(root: &Path) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.context("failed to walk directory")?;
        let name = entry.file_name().to_string_lossy().to_string();

        if seen.insert(name.clone()) {
            names.push(name);
        }
    }

    Ok(names)
}
