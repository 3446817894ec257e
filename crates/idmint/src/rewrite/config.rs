//! Rewrite policy configuration.

use serde::{Deserialize, Serialize};

/// Which string leaves receive substring substitution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstringScope {
    /// Every string leaf, whatever its field.
    #[default]
    AllStrings,
    /// Only leaves under an id-bearing field.
    IdFieldsOnly,
}

impl std::str::FromStr for SubstringScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "all" | "all_strings" => Ok(SubstringScope::AllStrings),
            "id_fields" | "id_fields_only" => Ok(SubstringScope::IdFieldsOnly),
            _ => Err(format!("Unknown substring scope: {}. Use all or id-fields.", s)),
        }
    }
}

/// How the corpus is traversed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Discover every id in the corpus first, then rewrite with the
    /// complete mapping. Substring occurrences are always patched.
    #[default]
    TwoPass,
    /// Rewrite record by record. An id first seen late in the corpus is
    /// not patched into free text that was already written.
    ///
    /// The unit is one parsed record: an NDJSON line, or a whole document
    /// file. A document file is therefore discovered as a whole before it
    /// is rewritten, which behaves like two-pass within that file.
    Streaming,
}

/// Controls which strings are classified and which are patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Restrict whole-value classification to `id_fields`.
    pub field_aware: bool,

    /// Field names whose string values (or array elements) carry ids.
    pub id_fields: Vec<String>,

    /// Which leaves get substring substitution.
    pub substring_scope: SubstringScope,

    /// Traversal strategy.
    pub strategy: Strategy,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            field_aware: true,
            id_fields: default_id_fields(),
            substring_scope: SubstringScope::default(),
            strategy: Strategy::default(),
        }
    }
}

fn default_id_fields() -> Vec<String> {
    [
        "_id",
        "id",
        "objectId",
        "parentId",
        "parentIds",
        "sourceId",
        "targetId",
        "versionSeriesId",
        "attachmentNodeId",
        "renditionIds",
        "detailNodeId",
        "principalId",
        "members",
        "users",
        "groups",
        "rootFolderIds",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
