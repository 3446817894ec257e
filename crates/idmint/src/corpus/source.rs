//! Input files and their two serializations.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{IdmintError, Result};

/// How an input file was serialized. Output uses the same mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// The whole file is one JSON document (array or object).
    Document,
    /// Newline-delimited JSON, one record per line.
    Lines,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Document => write!(f, "document"),
            SourceFormat::Lines => write!(f, "ndjson"),
        }
    }
}

/// One unit of a parsed file.
#[derive(Debug, Clone, PartialEq)]
pub enum Unit {
    /// A parsed JSON record.
    Record(Value),
    /// A line that failed to parse (invalid JSON or invalid UTF-8);
    /// emitted byte-for-byte.
    Malformed { line: usize, raw: Vec<u8> },
    /// A whitespace-only line; emitted unchanged.
    Blank(Vec<u8>),
}

/// Terminator of one NDJSON line, written back as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEnding {
    Lf,
    CrLf,
    /// Last line of a file without a final newline.
    Missing,
}

impl LineEnding {
    fn as_bytes(self) -> &'static [u8] {
        match self {
            LineEnding::Lf => b"\n",
            LineEnding::CrLf => b"\r\n",
            LineEnding::Missing => b"",
        }
    }
}

/// A parsed input file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Where the file was read from.
    pub path: PathBuf,
    /// Detected serialization.
    pub format: SourceFormat,
    /// Records and pass-through lines, in file order.
    pub units: Vec<Unit>,
    /// SHA-256 of the raw bytes (`sha256:<hex>`).
    pub hash: String,
    /// Size of the raw file in bytes.
    pub size_bytes: u64,
    /// One per unit in `Lines` format; empty for a document.
    endings: Vec<LineEnding>,
}

impl SourceFile {
    /// Read and parse a file. Failing to read it is fatal; failing to parse
    /// parts of it is not.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let bytes = fs::read(path).map_err(|e| IdmintError::io(path, e))?;
        Ok(Self::parse(path, &bytes))
    }

    /// Parse file contents: first as a single document, then line by line.
    pub fn parse(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Self {
        let path = path.as_ref().to_path_buf();
        let contents = contents.as_ref();

        let mut hasher = Sha256::new();
        hasher.update(contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let source = |format, units, endings| SourceFile {
            path: path.clone(),
            format,
            units,
            hash: hash.clone(),
            size_bytes: contents.len() as u64,
            endings,
        };

        match serde_json::from_slice::<Value>(contents) {
            Ok(value @ (Value::Array(_) | Value::Object(_))) => {
                return source(SourceFormat::Document, vec![Unit::Record(value)], Vec::new());
            }
            Ok(_) => {
                tracing::debug!(path = %path.display(), "top-level scalar, reading as lines");
            }
            Err(e) => {
                tracing::debug!(
                    path = %path.display(),
                    error = %e,
                    "not a single JSON document, reading as lines"
                );
            }
        }

        let (units, endings) = parse_lines(&path, contents);
        source(SourceFormat::Lines, units, endings)
    }

    /// Parsed records, skipping pass-through lines.
    pub fn records(&self) -> impl Iterator<Item = &Value> {
        self.units.iter().filter_map(|unit| match unit {
            Unit::Record(value) => Some(value),
            Unit::Malformed { .. } | Unit::Blank(_) => None,
        })
    }

    /// Number of records in the file.
    ///
    /// A document that is an array counts its elements; an object with a
    /// `docs` array (bulk-docs format) counts those; any other object is a
    /// single record.
    pub fn record_count(&self) -> usize {
        match self.format {
            SourceFormat::Lines => self.records().count(),
            SourceFormat::Document => self.records().map(document_record_count).sum(),
        }
    }

    /// Number of lines passed through because they did not parse.
    pub fn malformed_lines(&self) -> usize {
        self.units
            .iter()
            .filter(|unit| matches!(unit, Unit::Malformed { .. }))
            .count()
    }

    /// Replace every record with `f(record)`, leaving pass-through lines as
    /// they are.
    pub fn rewrite_records<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(Value) -> Result<Value>,
    {
        for unit in &mut self.units {
            if let Unit::Record(value) = unit {
                let taken = std::mem::take(value);
                *value = f(taken)?;
            }
        }
        Ok(())
    }

    /// Serialize in the file's own format.
    ///
    /// A document is pretty-printed and always ends with a newline. Lines
    /// keep their own terminators, so pass-through lines come back
    /// byte-for-byte.
    pub fn render(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        match self.format {
            SourceFormat::Document => {
                for value in self.records() {
                    serde_json::to_writer_pretty(&mut out, value)?;
                    out.push(b'\n');
                }
            }
            SourceFormat::Lines => {
                for (unit, ending) in self.units.iter().zip(&self.endings) {
                    match unit {
                        Unit::Record(value) => serde_json::to_writer(&mut out, value)?,
                        Unit::Malformed { raw, .. } | Unit::Blank(raw) => {
                            out.extend_from_slice(raw)
                        }
                    }
                    out.extend_from_slice(ending.as_bytes());
                }
            }
        }
        Ok(out)
    }
}

fn parse_lines(path: &Path, contents: &[u8]) -> (Vec<Unit>, Vec<LineEnding>) {
    let mut units = Vec::new();
    let mut endings = Vec::new();
    let mut rest = contents;

    while !rest.is_empty() {
        let (line, ending) = match rest.iter().position(|&b| b == b'\n') {
            Some(i) => {
                let line = &rest[..i];
                rest = &rest[i + 1..];
                match line.strip_suffix(b"\r".as_slice()) {
                    Some(line) => (line, LineEnding::CrLf),
                    None => (line, LineEnding::Lf),
                }
            }
            None => {
                let line = rest;
                rest = &[];
                (line, LineEnding::Missing)
            }
        };

        units.push(parse_line(path, units.len() + 1, line));
        endings.push(ending);
    }

    (units, endings)
}

fn parse_line(path: &Path, number: usize, line: &[u8]) -> Unit {
    if line.iter().all(u8::is_ascii_whitespace) {
        return Unit::Blank(line.to_vec());
    }

    match serde_json::from_slice::<Value>(line) {
        Ok(value) => Unit::Record(value),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                line = number,
                error = %e,
                "malformed line passed through unchanged"
            );
            Unit::Malformed {
                line: number,
                raw: line.to_vec(),
            }
        }
    }
}

fn document_record_count(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => match map.get("docs") {
            Some(Value::Array(docs)) => docs.len(),
            _ => 1,
        },
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => 1,
    }
}
