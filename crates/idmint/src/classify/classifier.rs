//! The identifier classifier.

use std::collections::HashSet;

use regex::Regex;

use crate::error::{IdmintError, Result};

use super::config::{ClassifierConfig, FallbackConfig};
use super::rules::CompiledRule;

/// Which fallback heuristic recognized a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeuristicKind {
    /// The value contains a long run of zeros.
    ZeroRun,
    /// Lowercase/underscore prefix followed by a long digit suffix.
    DigitSuffix,
}

impl HeuristicKind {
    pub fn label(&self) -> &'static str {
        match self {
            HeuristicKind::ZeroRun => "zero_run",
            HeuristicKind::DigitSuffix => "digit_suffix",
        }
    }
}

/// Outcome of classifying one value, naming the step that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'c> {
    /// Exact member of the preserve set.
    Preserved,
    /// Character count outside the configured window.
    OutsideLengthWindow { length: usize },
    /// Matched the named shape rule.
    Rule(&'c str),
    /// Matched a fallback heuristic.
    Heuristic(HeuristicKind),
    /// Nothing matched.
    NoMatch,
}

impl Classification<'_> {
    /// Whether the value should be replaced by a UUID.
    pub fn is_systematic(&self) -> bool {
        matches!(self, Classification::Rule(_) | Classification::Heuristic(_))
    }

    /// Short description of the deciding step.
    pub fn reason(&self) -> String {
        match self {
            Classification::Preserved => "preserved".to_string(),
            Classification::OutsideLengthWindow { length } => {
                format!("length {length} outside window")
            }
            Classification::Rule(name) => format!("rule '{name}'"),
            Classification::Heuristic(kind) => format!("heuristic '{}'", kind.label()),
            Classification::NoMatch => "no match".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledFallback {
    zero_run: Regex,
    digit_suffix: Regex,
}

impl CompiledFallback {
    fn compile(config: &FallbackConfig) -> Result<Option<Self>> {
        if !config.enabled {
            return Ok(None);
        }
        if config.min_zero_run == 0 || config.min_suffix_digits == 0 {
            return Err(IdmintError::Config(
                "fallback thresholds must be greater than zero".to_string(),
            ));
        }
        Ok(Some(Self {
            zero_run: Regex::new(&format!("0{{{},}}", config.min_zero_run))?,
            digit_suffix: Regex::new(&format!(
                r"^[a-z_]+[0-9]{{{},}}$",
                config.min_suffix_digits
            ))?,
        }))
    }

    fn check(&self, value: &str) -> Option<HeuristicKind> {
        if self.zero_run.is_match(value) {
            Some(HeuristicKind::ZeroRun)
        } else if self.digit_suffix.is_match(value) {
            Some(HeuristicKind::DigitSuffix)
        } else {
            None
        }
    }
}

/// Decides whether a string is a systematic (legacy, generated) identifier.
///
/// Rules are evaluated in a fixed order and the first decisive step wins:
/// preserve set, length window, shape rules, fallback heuristics.
///
/// # Example
///
/// ```
/// use idmint::classify::{ClassifierConfig, IdClassifier};
///
/// let classifier = IdClassifier::from_config(&ClassifierConfig::default()).unwrap();
/// assert!(classifier.is_systematic("repositoryinfo0000000000000001", None));
/// assert!(!classifier.is_systematic("cmis:folder", None));
/// assert!(!classifier.is_systematic("short123", None));
/// ```
#[derive(Debug, Clone)]
pub struct IdClassifier {
    preserve: HashSet<String>,
    min_length: usize,
    max_length: usize,
    rules: Vec<CompiledRule>,
    fallback: Option<CompiledFallback>,
}

impl IdClassifier {
    /// Compile a classifier from configuration.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        if config.min_length > config.max_length {
            return Err(IdmintError::Config(format!(
                "min_length ({}) is greater than max_length ({})",
                config.min_length, config.max_length
            )));
        }

        let rules = config
            .rules
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            preserve: config.preserve.iter().cloned().collect(),
            min_length: config.min_length,
            max_length: config.max_length,
            rules,
            fallback: CompiledFallback::compile(&config.fallback)?,
        })
    }

    /// Whether `value`, found under `field`, is a systematic id.
    pub fn is_systematic(&self, value: &str, field: Option<&str>) -> bool {
        self.classify(value, field).is_systematic()
    }

    /// Classify `value` and report the deciding step.
    pub fn classify(&self, value: &str, field: Option<&str>) -> Classification<'_> {
        if self.is_preserved(value) {
            return Classification::Preserved;
        }

        let length = value.chars().count();
        if length < self.min_length || length > self.max_length {
            return Classification::OutsideLengthWindow { length };
        }

        if let Some(rule) = self.rules.iter().find(|r| r.matches(value, field)) {
            return Classification::Rule(&rule.name);
        }

        match self.fallback.as_ref().and_then(|f| f.check(value)) {
            Some(kind) => Classification::Heuristic(kind),
            None => Classification::NoMatch,
        }
    }

    /// Whether `value` is an exact preserve-set member.
    pub fn is_preserved(&self, value: &str) -> bool {
        self.preserve.contains(value)
    }

    /// Names of the compiled shape rules, in evaluation order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::rules::{RuleKind, ShapeRule};

    fn default_classifier() -> IdClassifier {
        IdClassifier::from_config(&ClassifierConfig::default()).unwrap()
    }

    #[test]
    fn test_examples() {
        let classifier = default_classifier();

        assert!(classifier.is_systematic("repositoryinfo0000000000000001", None));
        assert!(classifier.is_systematic("adminuser00000000000000000000000", Some("_id")));
        assert!(!classifier.is_systematic("cmis:folder", None));
        assert!(!classifier.is_systematic("short123", None));
    }

    #[test]
    fn test_classification_order() {
        let classifier = default_classifier();

        assert_eq!(classifier.classify("cmis:folder", None), Classification::Preserved);
        assert_eq!(
            classifier.classify("short123", None),
            Classification::OutsideLengthWindow { length: 8 }
        );
        assert_eq!(
            classifier.classify("adminuser00000000000000000000000", None),
            Classification::Rule("marker_zero_run")
        );
        assert_eq!(
            classifier.classify("repositoryinfo0000000000000001", None),
            Classification::Rule("marker_zero_run")
        );
        assert_eq!(
            classifier.classify("attachment0000000000000001", None),
            Classification::Rule("zero_padded")
        );
        assert_eq!(
            classifier.classify("The quick brown fox jumps over", None),
            Classification::NoMatch
        );
    }

    #[test]
    fn test_preserve_beats_shape_rules() {
        let config = ClassifierConfig::default().with_preserved("adminuser00000000000000000000000");
        let classifier = IdClassifier::from_config(&config).unwrap();

        assert_eq!(
            classifier.classify("adminuser00000000000000000000000", Some("_id")),
            Classification::Preserved
        );
    }

    #[test]
    fn test_length_window_is_inclusive() {
        let classifier = default_classifier();

        let at_min = "00000000000000000001";
        assert_eq!(at_min.len(), 20);
        assert!(classifier.is_systematic(at_min, None));

        let over_max = format!("user{}", "0".repeat(37));
        assert_eq!(over_max.len(), 41);
        assert!(!classifier.is_systematic(&over_max, None));
    }

    #[test]
    fn test_uuids_are_not_systematic() {
        let classifier = default_classifier();
        assert!(!classifier.is_systematic("8c1f3a52-7d7e-4f8a-9a4e-3b9d0c6f2e11", Some("_id")));
    }

    #[test]
    fn test_fallback_heuristics() {
        let classifier = default_classifier();

        assert_eq!(
            classifier.classify("Report-00000000-final-x", None),
            Classification::Heuristic(HeuristicKind::ZeroRun)
        );
        assert_eq!(
            classifier.classify("ab_cd1234567891", None),
            Classification::OutsideLengthWindow { length: 15 }
        );
        assert_eq!(
            classifier.classify("legacykey_9876543210123", None),
            Classification::Rule("prefix_underscore_digits")
        );
        assert_eq!(
            classifier.classify("legacy-key-x9876543210123", None),
            Classification::NoMatch
        );
    }

    #[test]
    fn test_digit_suffix_heuristic() {
        let config = ClassifierConfig {
            rules: Vec::new(),
            ..ClassifierConfig::default()
        };
        let classifier = IdClassifier::from_config(&config).unwrap();

        assert_eq!(
            classifier.classify("attachment9876543210123", None),
            Classification::Heuristic(HeuristicKind::DigitSuffix)
        );
    }

    #[test]
    fn test_fallback_disabled() {
        let mut config = ClassifierConfig::default();
        config.fallback.enabled = false;
        let classifier = IdClassifier::from_config(&config).unwrap();

        assert_eq!(
            classifier.classify("Report-00000000-final-x", None),
            Classification::NoMatch
        );
    }

    #[test]
    fn test_field_scoped_rule() {
        let config = ClassifierConfig {
            rules: vec![ShapeRule {
                name: "ticket".to_string(),
                kind: RuleKind::Pattern {
                    regex: "^TCK-[A-Z]{16}$".to_string(),
                },
                fields: vec!["ticketId".to_string()],
            }],
            ..ClassifierConfig::default()
        };
        let classifier = IdClassifier::from_config(&config).unwrap();

        assert!(classifier.is_systematic("TCK-ABCDEFGHIJKLMNOP", Some("ticketId")));
        assert!(!classifier.is_systematic("TCK-ABCDEFGHIJKLMNOP", Some("title")));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let config = ClassifierConfig::default().with_length_window(40, 20);
        assert!(matches!(
            IdClassifier::from_config(&config),
            Err(IdmintError::Config(_))
        ));
    }

    #[test]
    fn test_length_counts_characters() {
        let classifier = default_classifier();
        // 19 multi-byte characters stay below the window even though they
        // are more than 20 bytes.
        let value = "é".repeat(19);
        assert_eq!(
            classifier.classify(&value, None),
            Classification::OutsideLengthWindow { length: 19 }
        );
    }
}
