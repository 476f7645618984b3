// src/output/mod.rs
// =============================================================================
// Saving scan results to disk, and reading them back.
//
// The format is JSON lines: one ScanResult object per line, appended as the
// results arrive. A scan that gets interrupted still leaves a valid file
// with everything found so far.
//
// `result-view` and `result-diff` read these files back with load_results.
// =============================================================================

pub mod wire_url;

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};

use crate::scan::ScanResult;

// Somewhere results can be written to as the scan goes
pub trait ResultSaver {
    fn save(&mut self, result: &ScanResult) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}

// Used when no --out was given
#[derive(Debug, Default)]
pub struct NullSaver;

impl ResultSaver for NullSaver {
    fn save(&mut self, _result: &ScanResult) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct FileSaver {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileSaver {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)
            .with_context(|| format!("failed to create file `{}` for output", path.display()))?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }
}

impl ResultSaver for FileSaver {
    fn save(&mut self, result: &ScanResult) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| anyhow!("output file `{}` is already closed", self.path.display()))?;

        let line = serde_json::to_string(result).context("failed to convert result")?;

        // Flushed per record so an interrupted scan keeps what it found
        writeln!(writer, "{}", line)
            .and_then(|_| writer.flush())
            .with_context(|| format!("failed to write result: {}", line))
    }

    fn close(&mut self) -> Result<()> {
        match self.writer.take() {
            Some(mut writer) => writer
                .flush()
                .with_context(|| format!("failed to close `{}`", self.path.display())),
            None => Ok(()),
        }
    }
}

// Picks the saver for an optional --out path
pub fn saver_for(path: Option<&Path>) -> Result<Box<dyn ResultSaver>> {
    match path {
        Some(path) => Ok(Box::new(FileSaver::create(path)?)),
        None => Ok(Box::new(NullSaver)),
    }
}

// Reads a result file written by FileSaver
pub fn load_results(path: impl AsRef<Path>) -> Result<Vec<ScanResult>> {
    let path = path.as_ref();

    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let metadata = file
        .metadata()
        .with_context(|| format!("failed to read properties of {}", path.display()))?;
    if metadata.is_dir() {
        bail!(
            "`{}` is a directory, you need to specify a valid result file",
            path.display()
        );
    }

    let mut results = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.context("an error occurred while reading the result file")?;
        if line.trim().is_empty() {
            continue;
        }

        let result: ScanResult = serde_json::from_str(&line)
            .with_context(|| format!("unable to read line {}", index + 1))?;
        results.push(result);
    }

    Ok(results)
}
