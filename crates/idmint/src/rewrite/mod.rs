//! Shape-preserving rewriting of JSON documents.

mod config;
mod engine;
mod path;

pub use config::{RewriteConfig, Strategy, SubstringScope};
pub use engine::{IdentifierCandidate, RewriteStats, Rewriter, SubstitutionCache};
pub use path::JsonPath;
