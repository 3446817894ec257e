//! Conversion counters for files and runs.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rewrite::{RewriteStats, Strategy};

use super::source::{SourceFile, SourceFormat};

/// What happened to one input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: SourceFormat,
    /// SHA-256 of the input bytes.
    pub input_hash: String,
    pub size_bytes: u64,
    /// Records parsed and rewritten.
    pub records: usize,
    /// Lines emitted unchanged because they did not parse.
    pub malformed_lines: usize,
    /// Substitution counters.
    pub stats: RewriteStats,
}

impl FileReport {
    pub(crate) fn new(source: &SourceFile, output: PathBuf, stats: RewriteStats) -> Self {
        Self {
            input: source.path.clone(),
            output,
            format: source.format,
            input_hash: source.hash.clone(),
            size_bytes: source.size_bytes,
            records: source.record_count(),
            malformed_lines: source.malformed_lines(),
            stats,
        }
    }

    /// String values whose contents changed.
    pub fn values_rewritten(&self) -> usize {
        self.stats.values_rewritten()
    }
}

/// Summary of a whole conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub strategy: Strategy,
    pub files: Vec<FileReport>,
    /// Where the mapping audit file was written.
    pub mapping_path: PathBuf,
    /// Entries in the final mapping.
    pub mapping_entries: usize,
    /// Entries minted during this run (excludes reused ones).
    pub entries_created: usize,
}

impl RunReport {
    pub fn total_records(&self) -> usize {
        self.files.iter().map(|f| f.records).sum()
    }

    pub fn total_values_rewritten(&self) -> usize {
        self.files.iter().map(FileReport::values_rewritten).sum()
    }

    pub fn total_malformed_lines(&self) -> usize {
        self.files.iter().map(|f| f.malformed_lines).sum()
    }
}
