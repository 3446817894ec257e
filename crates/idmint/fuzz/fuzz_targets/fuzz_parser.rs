//! Fuzz target for corpus parsing and conversion.
//!
//! This fuzzer tests that reading and rewriting a file:
//! 1. Never panics on malformed JSON, NDJSON, or invalid UTF-8
//! 2. Always produces JSON for documents that parsed whole
//! 3. Keeps every line terminator of an NDJSON input

#![no_main]

use idmint::corpus::{SourceFile, SourceFormat};
use idmint::{IdClassifier, MappingTable, RewriteConfig, Rewriter};
use idmint::rewrite::{RewriteStats, SubstitutionCache};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let mut source = SourceFile::parse("fuzz.ndjson", data);
    let _ = source.record_count();
    let _ = source.malformed_lines();

    let Ok(classifier) = IdClassifier::from_config(&Default::default()) else {
        return;
    };
    let config = RewriteConfig::default();
    let rewriter = Rewriter::new(&classifier, &config);
    let mut table = MappingTable::new();
    let mut cache = SubstitutionCache::new();
    let mut stats = RewriteStats::default();

    if source
        .rewrite_records(|record| rewriter.rewrite(record, &mut table, &mut cache, &mut stats))
        .is_err()
    {
        return;
    }

    if let Ok(rendered) = source.render() {
        match source.format {
            SourceFormat::Document => {
                assert!(serde_json::from_slice::<serde_json::Value>(&rendered).is_ok());
            }
            SourceFormat::Lines => {
                let newlines = |bytes: &[u8]| bytes.iter().filter(|&&b| b == b'\n').count();
                assert_eq!(newlines(&rendered), newlines(data));
            }
        }
    }
});
