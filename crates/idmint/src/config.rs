//! Run configuration, loadable from a JSON file.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::ClassifierConfig;
use crate::error::{IdmintError, Result};
use crate::rewrite::RewriteConfig;

/// Everything an operator can tune without a rebuild.
///
/// Missing sections and fields take their defaults, so
/// `{"classifier": {"preserve": ["keep-me"]}}` is a complete file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdmintConfig {
    pub classifier: ClassifierConfig,
    pub rewrite: RewriteConfig,
}

impl IdmintConfig {
    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| IdmintError::io(path, e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            IdmintError::Config(format!(
                "Failed to parse configuration '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Write this configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| IdmintError::io(parent, e))?;
            }
        }

        let file = File::create(path).map_err(|e| IdmintError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer
            .write_all(b"\n")
            .and_then(|()| writer.flush())
            .map_err(|e| IdmintError::io(path, e))
    }
}
