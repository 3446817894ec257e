//! idmint: replace legacy systematic identifiers with UUIDs across a JSON corpus.
//!
//! Legacy exports embed deterministic, zero-padded identifiers such as
//! `adminuser00000000000000000000000`. idmint finds them, mints a random
//! UUID v4 for each, and rewrites every occurrence (whole values and
//! substrings of free text) in every file of the corpus.
//!
//! # Guarantees
//!
//! - **One id, one UUID**: the same legacy id maps to the same UUID in every
//!   document and file of a run
//! - **Shape preserved**: keys, key order, array lengths, and value types are
//!   untouched; only string contents change
//! - **Degrades, never aborts, on bad records**: a line that does not parse
//!   is copied through unchanged
//!
//! # Example
//!
//! ```no_run
//! use idmint::{ConversionJob, CorpusProcessor, IdmintConfig, MappingTable};
//!
//! let processor = CorpusProcessor::new(&IdmintConfig::default()).unwrap();
//! let mut table = MappingTable::new();
//! let report = processor
//!     .run(&[ConversionJob::derived("dump.json")], &mut table, "id_mapping.json")
//!     .unwrap();
//!
//! println!("Records: {}", report.total_records());
//! println!("Ids mapped: {}", report.mapping_entries);
//! ```

pub mod classify;
pub mod config;
pub mod corpus;
pub mod error;
pub mod mapping;
pub mod rewrite;

pub use classify::{Classification, ClassifierConfig, IdClassifier};
pub use config::IdmintConfig;
pub use corpus::{ConversionJob, CorpusProcessor, FileReport, RunReport, SourceFormat};
pub use error::{IdmintError, Result};
pub use mapping::{MappingTable, Substitutions};
pub use rewrite::{RewriteConfig, RewriteStats, Rewriter, Strategy, SubstringScope};
