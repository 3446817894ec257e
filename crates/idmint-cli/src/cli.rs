//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use idmint::SubstringScope;

use crate::logging::LogFormat;

/// idmint: replace legacy systematic identifiers with UUIDs
#[derive(Parser)]
#[command(name = "idmint")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: LogFormatChoice,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert JSON/NDJSON files, replacing systematic ids with UUIDs
    Convert {
        /// Input files (JSON document or newline-delimited JSON)
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for converted files (default: next to each input)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Mapping audit file (default: id_mapping.json next to the first input)
        #[arg(short, long)]
        mapping: Option<PathBuf>,

        /// Configuration file (see `idmint init-config`)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Mint ids record by record instead of discovering the whole corpus first
        #[arg(long)]
        streaming: bool,

        /// Classify string values under every field, not only id fields
        #[arg(long)]
        all_fields: bool,

        /// Which strings get ids substituted inside free text
        #[arg(long)]
        substring_scope: Option<SubstringScopeChoice>,

        /// Seed the run with a mapping file from an earlier run
        #[arg(long, value_name = "FILE")]
        reuse_mapping: Option<PathBuf>,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how values would be classified
    Classify {
        /// Values to classify
        #[arg(value_name = "VALUE", required = true)]
        values: Vec<String>,

        /// Field name the values appear under
        #[arg(short, long)]
        field: Option<String>,

        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write the default configuration to a file
    InitConfig {
        /// Output path
        #[arg(value_name = "PATH", default_value = "idmint.json")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormatChoice {
    /// Human-readable multi-line output
    Pretty,
    /// Single-line output
    Compact,
    /// JSON lines for machine parsing
    Json,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Compact => LogFormat::Compact,
            LogFormatChoice::Json => LogFormat::Json,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SubstringScopeChoice {
    /// Substitute inside every string value
    All,
    /// Substitute only inside id-field values
    IdFields,
}

impl From<SubstringScopeChoice> for SubstringScope {
    fn from(choice: SubstringScopeChoice) -> Self {
        match choice {
            SubstringScopeChoice::All => SubstringScope::AllStrings,
            SubstringScopeChoice::IdFields => SubstringScope::IdFieldsOnly,
        }
    }
}
