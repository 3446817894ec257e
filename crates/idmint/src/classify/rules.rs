//! Shape rules for systematic identifiers.
//!
//! A rule is plain data (so it can live in a configuration file) and is
//! compiled into a [`Regex`] once, when the classifier is built.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{IdmintError, Result};

/// One entry in the ordered rule catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeRule {
    /// Name reported when this rule decides a classification.
    pub name: String,

    /// The shape this rule recognizes.
    #[serde(flatten)]
    pub kind: RuleKind,

    /// Field names this rule is restricted to. Empty = every field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

/// Recognized identifier shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleKind {
    /// Letters followed by at least `min_digits` digits (e.g. `doc000000000042`).
    PrefixDigits { min_digits: usize },

    /// Alphanumeric prefix, underscore, then at least `min_digits` digits
    /// (e.g. `folder_0000000000017`).
    PrefixUnderscoreDigits { min_digits: usize },

    /// Lowercase hex string of exactly `length` characters.
    Hex { length: usize },

    /// Optional letter/underscore prefix, a run of at least `min_zeros`
    /// zeros, then up to `max_trailing_digits` digits
    /// (e.g. `repositoryinfo0000000000000001`).
    ZeroPadded {
        min_zeros: usize,
        max_trailing_digits: usize,
    },

    /// A role or type keyword followed by a long zero run
    /// (e.g. `adminuser00000000000000000000000`). Markers match
    /// case-insensitively.
    MarkerZeroRun { markers: Vec<String>, min_zeros: usize },

    /// Operator-supplied regular expression.
    Pattern { regex: String },
}

impl RuleKind {
    /// Render this shape as an anchored regular expression.
    pub fn to_regex(&self) -> Result<String> {
        let pattern = match self {
            RuleKind::PrefixDigits { min_digits } => {
                require_positive("min_digits", *min_digits)?;
                format!(r"^[A-Za-z]+[0-9]{{{min_digits},}}$")
            }
            RuleKind::PrefixUnderscoreDigits { min_digits } => {
                require_positive("min_digits", *min_digits)?;
                format!(r"^[A-Za-z][A-Za-z0-9]*_[0-9]{{{min_digits},}}$")
            }
            RuleKind::Hex { length } => {
                require_positive("length", *length)?;
                format!(r"^[0-9a-f]{{{length}}}$")
            }
            RuleKind::ZeroPadded {
                min_zeros,
                max_trailing_digits,
            } => {
                require_positive("min_zeros", *min_zeros)?;
                require_positive("max_trailing_digits", *max_trailing_digits)?;
                format!(r"^[A-Za-z_]*0{{{min_zeros},}}[0-9]{{1,{max_trailing_digits}}}$")
            }
            RuleKind::MarkerZeroRun { markers, min_zeros } => {
                require_positive("min_zeros", *min_zeros)?;
                if markers.is_empty() {
                    return Err(IdmintError::Config(
                        "marker_zero_run rule needs at least one marker".to_string(),
                    ));
                }
                let alternation = markers
                    .iter()
                    .map(|m| regex::escape(m))
                    .collect::<Vec<_>>()
                    .join("|");
                format!(r"^(?i:{alternation})[A-Za-z_]*0{{{min_zeros},}}[0-9]*$")
            }
            RuleKind::Pattern { regex } => regex.clone(),
        };
        Ok(pattern)
    }
}

fn require_positive(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(IdmintError::Config(format!("{name} must be greater than zero")));
    }
    Ok(())
}

/// A shape rule with its regex compiled.
#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    pub name: String,
    pub regex: Regex,
    pub fields: Vec<String>,
}

impl CompiledRule {
    pub fn compile(rule: &ShapeRule) -> Result<Self> {
        let regex = Regex::new(&rule.kind.to_regex()?)?;
        Ok(Self {
            name: rule.name.clone(),
            regex,
            fields: rule.fields.clone(),
        })
    }

    /// Whether this rule applies to a value found under `field`.
    pub fn applies_to(&self, field: Option<&str>) -> bool {
        if self.fields.is_empty() {
            return true;
        }
        field.is_some_and(|f| self.fields.iter().any(|allowed| allowed == f))
    }

    pub fn matches(&self, value: &str, field: Option<&str>) -> bool {
        self.applies_to(field) && self.regex.is_match(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(kind: RuleKind) -> CompiledRule {
        CompiledRule::compile(&ShapeRule {
            name: "test".to_string(),
            kind,
            fields: Vec::new(),
        })
        .unwrap()
    }

    #[test]
    fn test_prefix_digits() {
        let rule = compile(RuleKind::PrefixDigits { min_digits: 12 });
        assert!(rule.matches("document000000000042", None));
        assert!(!rule.matches("document42", None));
        assert!(!rule.matches("000000000000042", None));
    }

    #[test]
    fn test_prefix_underscore_digits() {
        let rule = compile(RuleKind::PrefixUnderscoreDigits { min_digits: 10 });
        assert!(rule.matches("folder_0000000000017", None));
        assert!(rule.matches("type2_1234567890", None));
        assert!(!rule.matches("_1234567890", None));
        assert!(!rule.matches("folder_12345", None));
    }

    #[test]
    fn test_hex() {
        let rule = compile(RuleKind::Hex { length: 32 });
        assert!(rule.matches("0a1b2c3d4e5f60718293a4b5c6d7e8f9", None));
        assert!(!rule.matches("0A1B2C3D4E5F60718293A4B5C6D7E8F9", None));
        assert!(!rule.matches("0a1b2c3d", None));
    }

    #[test]
    fn test_zero_padded() {
        let rule = compile(RuleKind::ZeroPadded {
            min_zeros: 8,
            max_trailing_digits: 4,
        });
        assert!(rule.matches("repositoryinfo0000000000000001", None));
        assert!(rule.matches("00000000000000000000042", None));
        assert!(!rule.matches("repositoryinfo0000001", None));
        assert!(!rule.matches("repositoryinfo0000000000123456", None));
    }

    #[test]
    fn test_marker_zero_run_case_insensitive() {
        let rule = compile(RuleKind::MarkerZeroRun {
            markers: vec!["admin".to_string(), "group".to_string()],
            min_zeros: 10,
        });
        assert!(rule.matches("adminuser00000000000000000000000", None));
        assert!(rule.matches("GROUP_everyone0000000000001", None));
        assert!(!rule.matches("guest00000000000000000000", None));
    }

    #[test]
    fn test_marker_escapes_metacharacters() {
        let rule = compile(RuleKind::MarkerZeroRun {
            markers: vec!["a.b".to_string()],
            min_zeros: 4,
        });
        assert!(rule.matches("a.b0000", None));
        assert!(!rule.matches("axb0000", None));
    }

    #[test]
    fn test_field_restriction() {
        let rule = CompiledRule::compile(&ShapeRule {
            name: "owners".to_string(),
            kind: RuleKind::Pattern {
                regex: "^owner-[0-9]+$".to_string(),
            },
            fields: vec!["owner".to_string()],
        })
        .unwrap();

        assert!(rule.matches("owner-12", Some("owner")));
        assert!(!rule.matches("owner-12", Some("creator")));
        assert!(!rule.matches("owner-12", None));
    }

    #[test]
    fn test_invalid_rules_rejected() {
        assert!(RuleKind::Hex { length: 0 }.to_regex().is_err());
        assert!(
            RuleKind::MarkerZeroRun {
                markers: Vec::new(),
                min_zeros: 8
            }
            .to_regex()
            .is_err()
        );
        let bad = ShapeRule {
            name: "bad".to_string(),
            kind: RuleKind::Pattern {
                regex: "([".to_string(),
            },
            fields: Vec::new(),
        };
        assert!(matches!(
            CompiledRule::compile(&bad),
            Err(IdmintError::Regex(_))
        ));
    }

    #[test]
    fn test_rule_serde_shape() {
        let json = r#"{"name": "zeros", "kind": "zero_padded", "min_zeros": 8, "max_trailing_digits": 4}"#;
        let rule: ShapeRule = serde_json::from_str(json).unwrap();
        assert_eq!(
            rule.kind,
            RuleKind::ZeroPadded {
                min_zeros: 8,
                max_trailing_digits: 4
            }
        );
        assert!(rule.fields.is_empty());
    }
}
