//! Reading, converting, and writing whole corpora.

mod paths;
mod processor;
mod report;
mod source;

pub use paths::{DEFAULT_MAPPING_FILE, converted_path, converted_path_in, default_mapping_path};
pub use processor::{ConversionJob, CorpusProcessor};
pub use report::{FileReport, RunReport};
pub use source::{SourceFile, SourceFormat, Unit};
