//! Read-only substitution snapshot of a mapping table.

use std::collections::HashMap;

use aho_corasick::{AhoCorasick, MatchKind};

use crate::error::{IdmintError, Result};

/// Frozen view of a mapping used by the rewrite pass.
///
/// Whole-value lookups go through a hash map; substring replacement uses a
/// single Aho-Corasick automaton with leftmost-longest semantics, so an id
/// that is a prefix of a longer id never splits the longer one and text is
/// scanned once no matter how many ids are known.
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    exact: HashMap<String, String>,
    automaton: Option<AhoCorasick>,
    replacements: Vec<String>,
}

impl Substitutions {
    /// Build a snapshot from `(old_id, new_id)` pairs.
    pub fn build<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut exact = HashMap::new();
        let mut patterns = Vec::new();
        let mut replacements = Vec::new();

        for (old_id, new_id) in entries {
            if old_id.is_empty() {
                continue;
            }
            exact.insert(old_id.to_string(), new_id.to_string());
            patterns.push(old_id.to_string());
            replacements.push(new_id.to_string());
        }

        let automaton = if patterns.is_empty() {
            None
        } else {
            let automaton = AhoCorasick::builder()
                .match_kind(MatchKind::LeftmostLongest)
                .build(&patterns)
                .map_err(|e| IdmintError::Automaton(e.to_string()))?;
            Some(automaton)
        };

        Ok(Self {
            exact,
            automaton,
            replacements,
        })
    }

    /// New id for a value that is exactly a known old id.
    pub fn get(&self, old_id: &str) -> Option<&str> {
        self.exact.get(old_id).map(String::as_str)
    }

    /// Replace every known old id occurring inside `text`.
    ///
    /// Returns `None` when `text` contains no known id.
    pub fn replace_within(&self, text: &str) -> Option<String> {
        let automaton = self.automaton.as_ref()?;
        if !automaton.is_match(text) {
            return None;
        }
        Some(automaton.replace_all(text, &self.replacements))
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}
