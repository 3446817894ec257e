//! Rewrite performance benchmarks.
//!
//! Measures classification, substitution, and whole-corpus conversion.

use std::fs;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};
use tempfile::TempDir;

use idmint::classify::{ClassifierConfig, IdClassifier};
use idmint::rewrite::{RewriteConfig, RewriteStats, Rewriter};
use idmint::{ConversionJob, CorpusProcessor, IdmintConfig, MappingTable};

/// Generate synthetic CMIS-style records that reference each other.
fn generate_records(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let id = format!("document{:020}", i + 1);
            let parent = format!("folder{:022}", i % 50 + 1);
            json!({
                "_id": id,
                "type": "cmis:document",
                "name": format!("Report {i}"),
                "parentId": parent,
                "description": format!("Filed under {parent} by adminuser00000000000000000000000"),
                "creator": "adminuser00000000000000000000000",
                "version": i % 7,
                "renditionIds": [format!("rendition{:019}", i + 1)]
            })
        })
        .collect()
}

fn generate_ndjson(count: usize) -> String {
    let mut data = String::new();
    for record in generate_records(count) {
        data.push_str(&record.to_string());
        data.push('\n');
    }
    data
}

/// Benchmark classifying mixed values.
fn bench_classify(c: &mut Criterion) {
    let classifier = IdClassifier::from_config(&ClassifierConfig::default()).unwrap();
    let values = [
        "adminuser00000000000000000000000",
        "rootfolder0000000000000000001",
        "0123456789abcdef0123456789abcdef",
        "legacykey_9876543210123",
        "Quarterly report, final draft",
        "cmis:folder",
    ];

    c.bench_function("classify_mixed", |b| {
        b.iter(|| {
            for value in &values {
                black_box(classifier.is_systematic(value, Some("_id")));
            }
        })
    });
}

/// Benchmark applying a fixed substitution table to records.
fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");
    let classifier = IdClassifier::from_config(&ClassifierConfig::default()).unwrap();
    let config = RewriteConfig::default();
    let rewriter = Rewriter::new(&classifier, &config);

    for count in [100, 1_000, 10_000].iter() {
        let records = generate_records(*count);

        let mut found = Default::default();
        for record in &records {
            rewriter.discover(record, &mut found);
        }
        let mut table = MappingTable::new();
        table.extend_discovered(&found);
        let subs = table.substitutions().unwrap();

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("records", count), &records, |b, records| {
            b.iter_with_setup(
                || records.clone(),
                |records| {
                    let mut stats = RewriteStats::default();
                    for record in records {
                        black_box(rewriter.apply(record, &subs, &mut stats));
                    }
                },
            )
        });
    }

    group.finish();
}

/// Benchmark a full two-pass conversion run from disk.
fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");
    group.sample_size(20);

    for count in [1_000, 10_000].iter() {
        let data = generate_ndjson(*count);
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("docs.ndjson");
        fs::write(&input, &data).unwrap();
        let jobs = vec![ConversionJob::derived(&input)];
        let mapping = dir.path().join("id_mapping.json");
        let processor = CorpusProcessor::new(&IdmintConfig::default()).unwrap();

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("ndjson_records", count), &jobs, |b, jobs| {
            b.iter(|| {
                let mut table = MappingTable::new();
                black_box(processor.run(jobs, &mut table, &mapping).unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_apply, bench_convert);
criterion_main!(benches);
