//! Append-only journal for MRS questionnaire results.
//!
//! Results are immutable once recorded, so they go to a JSONL (JSON Lines)
//! file with file locking rather than the replace-by-key store. Malformed
//! lines are skipped on read, never fatal.

use crate::types::MrsResult;
use crate::Result;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// JSONL-based journal for immutable MRS results
pub struct MrsJournal {
    path: PathBuf,
}

impl MrsJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append one result as a JSON line
    pub fn append(&mut self, result: &MrsResult) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(result)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Appended MRS result {} to journal", result.id);
        Ok(())
    }
}

/// Read all results from a journal file, in recorded order
pub fn read_results(path: &Path) -> Result<Vec<MrsResult>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut results = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<MrsResult>(&line) {
            Ok(result) => results.push(result),
            Err(e) => {
                tracing::warn!("Failed to parse MRS result at line {}: {}", line_num + 1, e);
                // Keep reading, the rest of the journal is still good
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} MRS results from journal", results.len());
    Ok(results)
}

/// Default journal path inside a data directory
pub fn journal_path(data_dir: &Path) -> PathBuf {
    data_dir.join("mrs_results.jsonl")
}
