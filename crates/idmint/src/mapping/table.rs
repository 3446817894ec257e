//! The run-wide old-id → new-id table.

use std::collections::BTreeMap;

use indexmap::{IndexMap, IndexSet};
use uuid::Uuid;

use crate::error::Result;

use super::substitutions::Substitutions;

/// Append-only mapping from legacy ids to freshly minted UUID v4 strings.
///
/// One table lives for exactly one conversion run and is shared by every
/// file in it, so an id maps to the same UUID wherever it appears. Entries
/// are never updated or removed. Iteration follows discovery order; the
/// audit [`export`](Self::export) is sorted by old id.
///
/// # Example
///
/// ```
/// use idmint::MappingTable;
///
/// let mut table = MappingTable::new();
/// let first = table.get_or_create("adminuser00000000000000000000000").to_string();
/// let again = table.get_or_create("adminuser00000000000000000000000").to_string();
/// assert_eq!(first, again);
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: IndexMap<String, String>,
    issued: IndexSet<String>,
    created: usize,
}

impl MappingTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the new id for `old_id`, minting one on first sight.
    pub fn get_or_create(&mut self, old_id: &str) -> &str {
        if !self.entries.contains_key(old_id) {
            let new_id = self.mint();
            self.entries.insert(old_id.to_string(), new_id);
            self.created += 1;
        }
        self.entries[old_id].as_str()
    }

    /// Mint entries for every id not yet in the table.
    ///
    /// Ids are minted in iteration order, so callers merging parallel
    /// discovery results should pass a sorted set. Returns the number of
    /// entries created.
    pub fn extend_discovered<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.entries.len();
        for id in ids {
            self.get_or_create(id.as_ref());
        }
        self.entries.len() - before
    }

    /// Look up an existing mapping.
    pub fn get(&self, old_id: &str) -> Option<&str> {
        self.entries.get(old_id).map(String::as_str)
    }

    pub fn contains(&self, old_id: &str) -> bool {
        self.entries.contains_key(old_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries minted by this table, excluding any loaded from a
    /// previous run.
    pub fn created_this_run(&self) -> usize {
        self.created
    }

    /// Entries in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The full mapping sorted by old id, for the audit file.
    pub fn export(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Build a read-only substitution snapshot of the current entries.
    pub fn substitutions(&self) -> Result<Substitutions> {
        Substitutions::build(self.iter())
    }

    /// Insert a previously persisted entry without counting it as created.
    pub(super) fn insert_loaded(&mut self, old_id: String, new_id: String) {
        self.issued.insert(new_id.clone());
        self.entries.insert(old_id, new_id);
    }

    pub(super) fn is_issued(&self, new_id: &str) -> bool {
        self.issued.contains(new_id)
    }

    fn mint(&mut self) -> String {
        loop {
            let candidate = Uuid::new_v4().to_string();
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

/// Whether `value` is a hyphenated UUID v4 string.
pub fn is_uuid_v4(value: &str) -> bool {
    value.len() == 36
        && Uuid::parse_str(value).is_ok_and(|u| u.get_version() == Some(uuid::Version::Random))
}
