//! Fuzz target for IdClassifier.
//!
//! This fuzzer tests that the classifier:
//! 1. Never panics on any input, including multi-byte text
//! 2. Never reports a value outside the length window as systematic

#![no_main]

use idmint::classify::{ClassifierConfig, IdClassifier};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let config = ClassifierConfig::default();
    let Ok(classifier) = IdClassifier::from_config(&config) else {
        return;
    };

    let input = String::from_utf8_lossy(data);
    let length = input.chars().count();

    for field in [None, Some("_id"), Some("description")] {
        let verdict = classifier.classify(&input, field);
        let _ = verdict.reason();

        if length < config.min_length || length > config.max_length {
            assert!(!verdict.is_systematic());
        }
    }
});
