//! Tree rewriter: discovers systematic ids and substitutes them.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::classify::IdClassifier;
use crate::error::Result;
use crate::mapping::{MappingTable, Substitutions};

use super::config::{RewriteConfig, SubstringScope};
use super::path::JsonPath;

/// A string value met during traversal, with where it was found.
#[derive(Debug, Clone, Copy)]
pub struct IdentifierCandidate<'a> {
    /// The string itself.
    pub value: &'a str,
    /// Nearest enclosing object key; array elements inherit the array's.
    pub field: Option<&'a str>,
    /// Location in the document.
    pub path: &'a JsonPath<'a>,
}

/// Counters collected while applying substitutions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteStats {
    /// String values that were a known id and were replaced whole.
    pub ids_replaced: usize,
    /// String values that had one or more ids substituted inside them.
    pub strings_patched: usize,
}

impl RewriteStats {
    /// Total string values whose contents changed.
    pub fn values_rewritten(&self) -> usize {
        self.ids_replaced + self.strings_patched
    }

    pub fn merge(&mut self, other: RewriteStats) {
        self.ids_replaced += other.ids_replaced;
        self.strings_patched += other.strings_patched;
    }
}

/// Rewrites one document at a time.
///
/// The rewriter never adds, removes, or reorders keys, never changes array
/// lengths, and never touches non-string scalars; only string contents
/// change. Object keys are never rewritten.
///
/// # Example
///
/// ```
/// use idmint::classify::{ClassifierConfig, IdClassifier};
/// use idmint::rewrite::{RewriteConfig, RewriteStats, Rewriter, SubstitutionCache};
/// use idmint::MappingTable;
/// use serde_json::json;
///
/// let classifier = IdClassifier::from_config(&ClassifierConfig::default()).unwrap();
/// let config = RewriteConfig::default();
/// let rewriter = Rewriter::new(&classifier, &config);
///
/// let mut table = MappingTable::new();
/// let mut cache = SubstitutionCache::new();
/// let mut stats = RewriteStats::default();
/// let doc = json!({
///     "_id": "adminuser00000000000000000000000",
///     "owner": "adminuser00000000000000000000000"
/// });
///
/// let out = rewriter.rewrite(doc, &mut table, &mut cache, &mut stats).unwrap();
/// assert_eq!(out["_id"], out["owner"]);
/// assert_eq!(table.len(), 1);
/// ```
pub struct Rewriter<'a> {
    classifier: &'a IdClassifier,
    config: &'a RewriteConfig,
    id_fields: HashSet<&'a str>,
}

impl<'a> Rewriter<'a> {
    pub fn new(classifier: &'a IdClassifier, config: &'a RewriteConfig) -> Self {
        let id_fields = config.id_fields.iter().map(String::as_str).collect();
        Self {
            classifier,
            config,
            id_fields,
        }
    }

    /// Collect every systematic id in `value` into `found`.
    ///
    /// Returns the number of ids that were not already in `found`.
    pub fn discover(&self, value: &Value, found: &mut BTreeSet<String>) -> usize {
        let before = found.len();
        let root = JsonPath::root();
        self.discover_node(value, None, &root, found);
        found.len() - before
    }

    fn discover_node(
        &self,
        value: &Value,
        field: Option<&str>,
        path: &JsonPath<'_>,
        found: &mut BTreeSet<String>,
    ) {
        match value {
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
            Value::String(s) => {
                let candidate = IdentifierCandidate {
                    value: s,
                    field,
                    path,
                };
                self.discover_candidate(candidate, found);
            }
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    let child = path.index(i);
                    self.discover_node(item, field, &child, found);
                }
            }
            Value::Object(map) => {
                for (key, item) in map {
                    let child = path.key(key);
                    self.discover_node(item, Some(key.as_str()), &child, found);
                }
            }
        }
    }

    fn discover_candidate(&self, candidate: IdentifierCandidate<'_>, found: &mut BTreeSet<String>) {
        if !self.classifies(candidate.field) || found.contains(candidate.value) {
            return;
        }

        let verdict = self.classifier.classify(candidate.value, candidate.field);
        if verdict.is_systematic() {
            tracing::trace!(
                path = %candidate.path,
                field = candidate.field.unwrap_or(""),
                reason = %verdict.reason(),
                "discovered systematic id"
            );
            found.insert(candidate.value.to_string());
        }
    }

    /// Apply a substitution snapshot to `value`, returning a document of
    /// identical shape.
    pub fn apply(&self, value: Value, subs: &Substitutions, stats: &mut RewriteStats) -> Value {
        self.apply_node(value, None, subs, stats)
    }

    fn apply_node(
        &self,
        value: Value,
        field: Option<&str>,
        subs: &Substitutions,
        stats: &mut RewriteStats,
    ) -> Value {
        match value {
            Value::Null | Value::Bool(_) | Value::Number(_) => value,
            Value::String(s) => match self.substitute(&s, field, subs, stats) {
                Some(replaced) => Value::String(replaced),
                None => Value::String(s),
            },
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.apply_node(item, field, subs, stats))
                    .collect(),
            ),
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (key, item) in map {
                    let item = self.apply_node(item, Some(key.as_str()), subs, stats);
                    out.insert(key, item);
                }
                Value::Object(out)
            }
        }
    }

    fn substitute(
        &self,
        s: &str,
        field: Option<&str>,
        subs: &Substitutions,
        stats: &mut RewriteStats,
    ) -> Option<String> {
        if subs.is_empty() || self.classifier.is_preserved(s) {
            return None;
        }

        if self.classifies(field) {
            if let Some(new_id) = subs.get(s) {
                stats.ids_replaced += 1;
                return Some(new_id.to_string());
            }
        }

        let patch = match self.config.substring_scope {
            SubstringScope::AllStrings => true,
            SubstringScope::IdFieldsOnly => self.is_id_field(field),
        };
        if !patch {
            return None;
        }

        let patched = subs.replace_within(s)?;
        stats.strings_patched += 1;
        Some(patched)
    }

    /// Discover, mint, and apply for a single document.
    ///
    /// Ids found in `value` are added to `table` before any substitution,
    /// so every occurrence within the document is patched, including free
    /// text that precedes the id-bearing field.
    pub fn rewrite(
        &self,
        value: Value,
        table: &mut MappingTable,
        cache: &mut SubstitutionCache,
        stats: &mut RewriteStats,
    ) -> Result<Value> {
        let mut found = BTreeSet::new();
        if self.discover(&value, &mut found) > 0 {
            table.extend_discovered(&found);
        }
        let subs = cache.current(table)?;
        Ok(self.apply(value, subs, stats))
    }

    /// Whether a string under `field` is subject to whole-value
    /// classification.
    fn classifies(&self, field: Option<&str>) -> bool {
        !self.config.field_aware || self.is_id_field(field)
    }

    fn is_id_field(&self, field: Option<&str>) -> bool {
        field.is_some_and(|f| self.id_fields.contains(f))
    }
}

/// Substitution snapshot rebuilt only when the table has grown.
///
/// The table is append-only, so its length identifies its contents.
#[derive(Debug, Default)]
pub struct SubstitutionCache {
    snapshot: Substitutions,
    built_for: usize,
}

impl SubstitutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot matching the table's current contents.
    pub fn current(&mut self, table: &MappingTable) -> Result<&Substitutions> {
        if self.built_for != table.len() {
            self.snapshot = table.substitutions()?;
            self.built_for = table.len();
        }
        Ok(&self.snapshot)
    }
}
