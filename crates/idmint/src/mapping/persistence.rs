//! Persistence for mapping tables - the audit file and reuse across runs.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;

use crate::error::{IdmintError, Result};

use super::table::{MappingTable, is_uuid_v4};

impl MappingTable {
    /// Write the mapping as a pretty-printed JSON object with sorted keys.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use idmint::MappingTable;
    /// # fn example(table: &MappingTable) -> idmint::Result<()> {
    /// table.save("out/id_mapping.json")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| IdmintError::io(parent, e))?;
            }
        }

        let file = File::create(path).map_err(|e| IdmintError::io(path, e))?;
        let mut writer = BufWriter::new(file);

        let sorted: BTreeMap<String, String> = self.export();
        serde_json::to_writer_pretty(&mut writer, &sorted)?;
        writer
            .write_all(b"\n")
            .and_then(|()| writer.flush())
            .map_err(|e| IdmintError::io(path, e))?;

        Ok(())
    }

    /// Load a mapping written by [`save`](Self::save) to seed a new run.
    ///
    /// Every value must be a UUID v4 and no two old ids may share a new id.
    /// Loaded entries are not counted by
    /// [`created_this_run`](Self::created_this_run).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| IdmintError::io(path, e))?;
        let entries: IndexMap<String, String> =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                IdmintError::Mapping(format!(
                    "Failed to parse mapping '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        let mut table = MappingTable::new();
        for (old_id, new_id) in entries {
            if old_id.is_empty() {
                return Err(IdmintError::Mapping(format!(
                    "Empty old id in '{}'",
                    path.display()
                )));
            }
            if !is_uuid_v4(&new_id) {
                return Err(IdmintError::Mapping(format!(
                    "'{}' maps to '{}', which is not a UUID v4",
                    old_id, new_id
                )));
            }
            if table.is_issued(&new_id) {
                return Err(IdmintError::Mapping(format!(
                    "'{}' is assigned to more than one old id",
                    new_id
                )));
            }
            table.insert_loaded(old_id, new_id);
        }

        Ok(table)
    }
}
