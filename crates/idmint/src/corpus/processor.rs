//! Drives the rewriter over a whole corpus.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::classify::IdClassifier;
use crate::config::IdmintConfig;
use crate::error::{IdmintError, Result};
use crate::mapping::MappingTable;
use crate::rewrite::{RewriteConfig, RewriteStats, Rewriter, Strategy, SubstitutionCache};

use super::paths::converted_path;
use super::report::{FileReport, RunReport};
use super::source::SourceFile;

/// One input file and where its converted form goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl ConversionJob {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Job writing to `<stem>.converted.<ext>` next to the input.
    pub fn derived(input: impl Into<PathBuf>) -> Self {
        let input = input.into();
        let output = converted_path(&input);
        Self { input, output }
    }
}

/// A file after rewriting, ready to be written.
struct Converted {
    report: FileReport,
    bytes: Vec<u8>,
}

/// Converts a set of files under one shared [`MappingTable`].
///
/// Every input is read before any output is written, so a missing or
/// unreadable input, or an output path that collides with another path of
/// the run, aborts without side effects. The mapping audit file is saved
/// before the first output, so converted files never exist on disk without
/// their record of old ids. Malformed lines inside an input are passed
/// through and counted instead.
///
/// # Example
///
/// ```no_run
/// use idmint::{ConversionJob, CorpusProcessor, IdmintConfig, MappingTable};
///
/// let processor = CorpusProcessor::new(&IdmintConfig::default()).unwrap();
/// let jobs = vec![ConversionJob::derived("dump/users.json"), ConversionJob::derived("dump/docs.ndjson")];
/// let mut table = MappingTable::new();
///
/// let report = processor.run(&jobs, &mut table, "dump/id_mapping.json").unwrap();
/// println!("{} records, {} ids", report.total_records(), report.mapping_entries);
/// ```
pub struct CorpusProcessor {
    classifier: IdClassifier,
    config: RewriteConfig,
}

impl CorpusProcessor {
    /// Build a processor, compiling the classifier rules.
    pub fn new(config: &IdmintConfig) -> Result<Self> {
        Ok(Self {
            classifier: IdClassifier::from_config(&config.classifier)?,
            config: config.rewrite.clone(),
        })
    }

    /// Build a processor from an already compiled classifier.
    pub fn with_classifier(classifier: IdClassifier, config: RewriteConfig) -> Self {
        Self { classifier, config }
    }

    pub fn classifier(&self) -> &IdClassifier {
        &self.classifier
    }

    pub fn strategy(&self) -> Strategy {
        self.config.strategy
    }

    /// Convert every job, save the mapping audit file, then write the
    /// converted outputs.
    pub fn run(
        &self,
        jobs: &[ConversionJob],
        table: &mut MappingTable,
        mapping_path: impl AsRef<Path>,
    ) -> Result<RunReport> {
        let mapping_path = mapping_path.as_ref();
        let started_at = Utc::now();
        let created_before = table.created_this_run();

        for job in jobs {
            if !job.input.is_file() {
                return Err(IdmintError::MissingInput(job.input.clone()));
            }
        }
        check_destinations(jobs, mapping_path)?;

        let sources = jobs
            .par_iter()
            .map(|job| SourceFile::read(&job.input))
            .collect::<Result<Vec<_>>>()?;

        for source in &sources {
            tracing::debug!(
                path = %source.path.display(),
                format = %source.format,
                records = source.record_count(),
                malformed = source.malformed_lines(),
                "read input"
            );
        }

        let converted = match self.config.strategy {
            Strategy::TwoPass => self.convert_two_pass(jobs, sources, table)?,
            Strategy::Streaming => self.convert_streaming(jobs, sources, table)?,
        };

        table.save(mapping_path)?;

        let mut files = Vec::with_capacity(converted.len());
        for Converted { report, bytes } in converted {
            write_output(&report.output, &bytes)?;
            tracing::info!(
                input = %report.input.display(),
                output = %report.output.display(),
                records = report.records,
                rewritten = report.values_rewritten(),
                "converted file"
            );
            files.push(report);
        }

        let report = RunReport {
            started_at,
            finished_at: Utc::now(),
            strategy: self.config.strategy,
            files,
            mapping_path: mapping_path.to_path_buf(),
            mapping_entries: table.len(),
            entries_created: table.created_this_run() - created_before,
        };

        tracing::info!(
            files = report.files.len(),
            records = report.total_records(),
            mapping_entries = report.mapping_entries,
            created = report.entries_created,
            "conversion run complete"
        );

        Ok(report)
    }

    /// Discover ids across the whole corpus, mint them, then rewrite every
    /// file against the finished mapping.
    fn convert_two_pass(
        &self,
        jobs: &[ConversionJob],
        sources: Vec<SourceFile>,
        table: &mut MappingTable,
    ) -> Result<Vec<Converted>> {
        let rewriter = Rewriter::new(&self.classifier, &self.config);

        let discovered = sources
            .par_iter()
            .map(|source| {
                let mut local = BTreeSet::new();
                for record in source.records() {
                    rewriter.discover(record, &mut local);
                }
                local
            })
            .reduce(BTreeSet::new, |mut merged, local| {
                merged.extend(local);
                merged
            });

        let created = table.extend_discovered(&discovered);
        tracing::debug!(
            discovered = discovered.len(),
            created,
            "discovery pass complete"
        );

        let subs = table.substitutions()?;

        sources
            .into_par_iter()
            .zip(jobs.par_iter())
            .map(|(mut source, job)| {
                let mut stats = RewriteStats::default();
                source.rewrite_records(|record| Ok(rewriter.apply(record, &subs, &mut stats)))?;
                finish(source, job, stats)
            })
            .collect()
    }

    /// Rewrite record by record, minting ids as they are met.
    fn convert_streaming(
        &self,
        jobs: &[ConversionJob],
        sources: Vec<SourceFile>,
        table: &mut MappingTable,
    ) -> Result<Vec<Converted>> {
        let rewriter = Rewriter::new(&self.classifier, &self.config);
        let mut cache = SubstitutionCache::new();

        sources
            .into_iter()
            .zip(jobs)
            .map(|(mut source, job)| {
                let mut stats = RewriteStats::default();
                source.rewrite_records(|record| {
                    rewriter.rewrite(record, table, &mut cache, &mut stats)
                })?;
                finish(source, job, stats)
            })
            .collect()
    }
}

fn finish(source: SourceFile, job: &ConversionJob, stats: RewriteStats) -> Result<Converted> {
    let bytes = source.render()?;
    let report = FileReport::new(&source, job.output.clone(), stats);
    Ok(Converted { report, bytes })
}

/// Reject runs where one write would land on another job's output, on an
/// input, or on the mapping file.
fn check_destinations(jobs: &[ConversionJob], mapping_path: &Path) -> Result<()> {
    let mut claimed: HashMap<PathBuf, String> = HashMap::new();
    for job in jobs {
        claimed.insert(
            normalize(&job.input),
            format!("it is the input '{}'", job.input.display()),
        );
    }

    let mut destinations: Vec<(&Path, String)> = jobs
        .iter()
        .map(|job| {
            let owner = format!("it is the output of '{}'", job.input.display());
            (job.output.as_path(), owner)
        })
        .collect();
    destinations.push((mapping_path, "it is the mapping file".to_string()));

    for (path, owner) in destinations {
        if let Some(existing) = claimed.insert(normalize(path), owner) {
            return Err(IdmintError::OutputConflict {
                path: path.to_path_buf(),
                reason: existing,
            });
        }
    }
    Ok(())
}

/// Absolute form of `path` for comparison; the file itself need not exist.
fn normalize(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), path.file_name()) {
        (Ok(parent), Some(name)) => parent.join(name),
        _ => std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| IdmintError::io(parent, e))?;
        }
    }
    fs::write(path, bytes).map_err(|e| IdmintError::io(path, e))
}
