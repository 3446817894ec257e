//! Property-based tests for the classifier and rewriter.
//!
//! Properties checked:
//! 1. **No panics**: classification never crashes on any input
//! 2. **Shape**: rewriting changes string contents only
//! 3. **Bijection**: distinct ids get distinct UUIDs, equal ids equal ones
//! 4. **Preservation**: preserved values are never substituted
//!
//! ```bash
//! cargo test -p idmint --test property_tests
//! PROPTEST_CASES=10000 cargo test -p idmint --test property_tests
//! ```

use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;
use serde_json::{Map, Value, json};

use idmint::classify::{ClassifierConfig, IdClassifier};
use idmint::mapping::is_uuid_v4;
use idmint::rewrite::{RewriteConfig, RewriteStats, Rewriter, SubstitutionCache};
use idmint::MappingTable;

// =============================================================================
// Test Strategies
// =============================================================================

/// Strings shaped like legacy systematic ids.
fn systematic_id() -> impl Strategy<Value = String> {
    prop_oneof![
        "(admin|user|group|folder|document|root)[a-z]{0,6}0{10,20}[1-9]{1,3}",
        "[a-z]{3,10}0{8,12}[0-9]{1,6}",
        "[a-f0-9]{32}",
    ]
    .prop_filter("length window", |s| (20..=40).contains(&s.chars().count()))
}

/// Arbitrary short strings, including unicode.
fn any_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9_:\\-\\. ]{0,50}",
        "\\PC{0,60}",
        systematic_id(),
    ]
}

fn field_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("_id".to_string()),
        Just("parentId".to_string()),
        Just("members".to_string()),
        Just("name".to_string()),
        Just("description".to_string()),
        "[a-z]{1,10}",
    ]
}

/// Arbitrary JSON trees with id-bearing fields sprinkled in.
fn json_tree() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        any_string().prop_map(Value::String),
    ];

    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((field_name(), inner), 0..6).prop_map(|entries| {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key, value);
                }
                Value::Object(map)
            }),
        ]
    })
}

fn classifier() -> IdClassifier {
    IdClassifier::from_config(&ClassifierConfig::default()).unwrap()
}

/// Same structure, keys, and non-string scalars.
fn same_shape(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(_), Value::String(_)) => true,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| same_shape(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y)
                    .all(|((lk, lv), (rk, rv))| lk == rk && same_shape(lv, rv))
        }
        (l, r) => l == r,
    }
}

// =============================================================================
// Classifier Properties
// =============================================================================

proptest! {
    #[test]
    fn classifier_never_panics(value in "\\PC{0,80}", field in prop::option::of("[a-zA-Z_]{0,12}")) {
        let classifier = classifier();
        let _ = classifier.classify(&value, field.as_deref());
    }

    #[test]
    fn classifier_is_deterministic(value in any_string()) {
        let classifier = classifier();
        prop_assert_eq!(
            classifier.is_systematic(&value, Some("_id")),
            classifier.is_systematic(&value, Some("_id"))
        );
    }

    #[test]
    fn values_outside_window_never_systematic(value in "[a-z0]{0,19}|[a-z0]{41,60}") {
        let classifier = classifier();
        prop_assert!(!classifier.is_systematic(&value, Some("_id")));
    }

    #[test]
    fn generated_ids_are_systematic(value in systematic_id()) {
        let classifier = classifier();
        prop_assert!(classifier.is_systematic(&value, Some("_id")));
    }
}

// =============================================================================
// Rewriter Properties
// =============================================================================

proptest! {
    #[test]
    fn rewrite_preserves_shape(doc in json_tree()) {
        let classifier = classifier();
        let config = RewriteConfig::default();
        let rewriter = Rewriter::new(&classifier, &config);

        let mut table = MappingTable::new();
        let mut cache = SubstitutionCache::new();
        let mut stats = RewriteStats::default();
        let out = rewriter.rewrite(doc.clone(), &mut table, &mut cache, &mut stats).unwrap();

        prop_assert!(same_shape(&doc, &out));
    }

    #[test]
    fn discovered_ids_get_distinct_uuids(ids in prop::collection::btree_set(systematic_id(), 1..30)) {
        let classifier = classifier();
        let config = RewriteConfig::default();
        let rewriter = Rewriter::new(&classifier, &config);

        let doc = Value::Array(ids.iter().map(|id| json!({"_id": id, "parentId": id})).collect());
        let mut table = MappingTable::new();
        let mut cache = SubstitutionCache::new();
        let mut stats = RewriteStats::default();
        let out = rewriter.rewrite(doc, &mut table, &mut cache, &mut stats).unwrap();

        prop_assert_eq!(table.len(), ids.len());

        let mut seen = HashSet::new();
        for record in out.as_array().unwrap() {
            let new_id = record["_id"].as_str().unwrap();
            prop_assert!(is_uuid_v4(new_id));
            prop_assert_eq!(&record["parentId"], &record["_id"]);
            prop_assert!(seen.insert(new_id.to_string()));
        }
    }

    #[test]
    fn preserved_values_never_substituted(id in systematic_id()) {
        let classifier = IdClassifier::from_config(
            &ClassifierConfig::default().with_preserved(id.clone()),
        ).unwrap();
        let config = RewriteConfig::default();
        let rewriter = Rewriter::new(&classifier, &config);

        let doc = json!({"_id": id, "members": [id]});
        let mut found = BTreeSet::new();
        prop_assert_eq!(rewriter.discover(&doc, &mut found), 0);

        let mut table = MappingTable::new();
        table.get_or_create(&id);
        let subs = table.substitutions().unwrap();
        let mut stats = RewriteStats::default();
        let out = rewriter.apply(doc.clone(), &subs, &mut stats);
        prop_assert_eq!(out, doc);
    }
}
