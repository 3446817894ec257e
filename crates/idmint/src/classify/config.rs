//! Classifier configuration.

use serde::{Deserialize, Serialize};

use super::rules::{RuleKind, ShapeRule};

/// Tunable inputs of the identifier classifier.
///
/// Every field has a default, so a configuration file only needs to name
/// what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Exact strings that are never systematic ids.
    pub preserve: Vec<String>,

    /// Shortest value (in characters) that may be a systematic id.
    pub min_length: usize,

    /// Longest value (in characters) that may be a systematic id.
    pub max_length: usize,

    /// Ordered shape rules; the first match decides.
    pub rules: Vec<ShapeRule>,

    /// Heuristics consulted when no shape rule matches.
    pub fallback: FallbackConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            preserve: default_preserve(),
            min_length: 20,
            max_length: 40,
            rules: default_rules(),
            fallback: FallbackConfig::default(),
        }
    }
}

impl ClassifierConfig {
    /// Add an exact string to the preserve set.
    pub fn with_preserved(mut self, value: impl Into<String>) -> Self {
        self.preserve.push(value.into());
        self
    }

    /// Append a shape rule to the end of the catalog.
    pub fn with_rule(mut self, rule: ShapeRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Set the length window.
    pub fn with_length_window(mut self, min_length: usize, max_length: usize) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }
}

/// Heuristic fallback settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Whether the fallback runs at all.
    pub enabled: bool,
    /// A zero run at least this long marks a value as systematic.
    pub min_zero_run: usize,
    /// A lowercase/underscore prefix followed by at least this many digits
    /// marks a value as systematic.
    pub min_suffix_digits: usize,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_zero_run: 8,
            min_suffix_digits: 10,
        }
    }
}

fn default_preserve() -> Vec<String> {
    [
        // Base type ids
        "cmis:document",
        "cmis:folder",
        "cmis:item",
        "cmis:policy",
        "cmis:relationship",
        "cmis:secondary",
        // Repository / tenant markers
        "bedroom",
        "canopy",
        "system",
        // Relationship and aspect type names long enough to enter the window
        "nemaki:parentChildRelationship",
        "nemaki:commentable",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_rules() -> Vec<ShapeRule> {
    vec![
        ShapeRule {
            name: "marker_zero_run".to_string(),
            kind: RuleKind::MarkerZeroRun {
                markers: [
                    "admin", "user", "group", "folder", "document", "type", "root", "system",
                    "repository", "archive", "template",
                ]
                .into_iter()
                .map(String::from)
                .collect(),
                min_zeros: 10,
            },
            fields: Vec::new(),
        },
        ShapeRule {
            name: "zero_padded".to_string(),
            kind: RuleKind::ZeroPadded {
                min_zeros: 8,
                max_trailing_digits: 6,
            },
            fields: Vec::new(),
        },
        ShapeRule {
            name: "prefix_underscore_digits".to_string(),
            kind: RuleKind::PrefixUnderscoreDigits { min_digits: 10 },
            fields: Vec::new(),
        },
        ShapeRule {
            name: "prefix_digits".to_string(),
            kind: RuleKind::PrefixDigits { min_digits: 12 },
            fields: Vec::new(),
        },
        ShapeRule {
            name: "hex32".to_string(),
            kind: RuleKind::Hex { length: 32 },
            fields: Vec::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ClassifierConfig =
            serde_json::from_str(r#"{"min_length": 16, "preserve": ["keep-me"]}"#).unwrap();

        assert_eq!(config.min_length, 16);
        assert_eq!(config.max_length, 40);
        assert_eq!(config.preserve, vec!["keep-me".to_string()]);
        assert_eq!(config.rules, default_rules());
        assert!(config.fallback.enabled);
    }

    #[test]
    fn test_default_round_trips_through_json() {
        let config = ClassifierConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: ClassifierConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
