//! Classification of systematic identifiers.
//!
//! The legacy scheme zero-pads a short counter into a long deterministic
//! string. Real UUIDs and business keys do not share that shape, so a small
//! ordered catalog of shape rules separates the two. The catalog, the
//! preserve set, and the length window all come from configuration.

mod classifier;
mod config;
mod rules;

pub use classifier::{Classification, HeuristicKind, IdClassifier};
pub use config::{ClassifierConfig, FallbackConfig};
pub use rules::{RuleKind, ShapeRule};
