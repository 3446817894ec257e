//! Convert command - rewrite a corpus and write the mapping audit file.

use std::path::PathBuf;

use colored::Colorize;
use idmint::corpus::{converted_path_in, default_mapping_path};
use idmint::{
    ConversionJob, CorpusProcessor, IdmintConfig, MappingTable, RunReport, Strategy, SubstringScope,
};

/// Arguments for `idmint convert`.
pub struct ConvertArgs {
    pub inputs: Vec<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub mapping: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub streaming: bool,
    pub all_fields: bool,
    pub substring_scope: Option<SubstringScope>,
    pub reuse_mapping: Option<PathBuf>,
    pub json_output: bool,
}

pub fn run(args: ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let Some(first) = args.inputs.first() else {
        return Err("No input files given".into());
    };

    let config = effective_config(&args)?;
    let mapping_path = args
        .mapping
        .clone()
        .unwrap_or_else(|| default_mapping_path(first));
    let jobs = plan_jobs(&args);

    let mut table = match &args.reuse_mapping {
        Some(path) => {
            let table = MappingTable::load(path)?;
            if !args.json_output {
                println!(
                    "{} {} ({} entries)",
                    "Reusing mapping".cyan().bold(),
                    path.display().to_string().white(),
                    table.len()
                );
            }
            table
        }
        None => MappingTable::new(),
    };

    if !args.json_output {
        println!(
            "{} {} file(s) ({})",
            "Converting".cyan().bold(),
            jobs.len().to_string().white().bold(),
            strategy_label(config.rewrite.strategy)
        );
    }

    let processor = CorpusProcessor::new(&config)?;
    let report = processor.run(&jobs, &mut table, &mapping_path)?;

    if args.json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Loaded configuration with command-line overrides applied.
fn effective_config(args: &ConvertArgs) -> idmint::Result<IdmintConfig> {
    let mut config = super::load_config(args.config.as_deref())?;

    if args.streaming {
        config.rewrite.strategy = Strategy::Streaming;
    }
    if args.all_fields {
        config.rewrite.field_aware = false;
    }
    if let Some(scope) = args.substring_scope {
        config.rewrite.substring_scope = scope;
    }

    Ok(config)
}

fn plan_jobs(args: &ConvertArgs) -> Vec<ConversionJob> {
    args.inputs
        .iter()
        .map(|input| match &args.output_dir {
            Some(dir) => ConversionJob::new(input, converted_path_in(input, dir)),
            None => ConversionJob::derived(input),
        })
        .collect()
}

fn strategy_label(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::TwoPass => "two-pass",
        Strategy::Streaming => "streaming",
    }
}

fn print_report(report: &RunReport) {
    println!();
    for file in &report.files {
        println!(
            "  {} {} {}",
            file.input.display().to_string().white(),
            "→".dimmed(),
            file.output.display().to_string().white()
        );
        print!(
            "    {:6} {} records, {} ids replaced, {} strings patched",
            file.format.to_string().dimmed(),
            file.records.to_string().white().bold(),
            file.stats.ids_replaced.to_string().green(),
            file.stats.strings_patched.to_string().green()
        );
        if file.malformed_lines > 0 {
            print!(
                ", {}",
                format!("{} malformed lines passed through", file.malformed_lines).yellow()
            );
        }
        println!();
    }

    let elapsed = report.finished_at - report.started_at;

    println!();
    println!(
        "Converted {} records in {} files ({} values rewritten) in {}ms",
        report.total_records().to_string().white().bold(),
        report.files.len(),
        report.total_values_rewritten().to_string().green(),
        elapsed.num_milliseconds()
    );
    if report.total_malformed_lines() > 0 {
        println!(
            "{}",
            format!(
                "{} malformed lines were copied through unchanged",
                report.total_malformed_lines()
            )
            .yellow()
        );
    }
    println!(
        "{} {} ({} entries, {} new)",
        "Mapping saved to".green().bold(),
        report.mapping_path.display().to_string().white(),
        report.mapping_entries,
        report.entries_created
    );
}
