//! idmint CLI - convert legacy systematic identifiers to UUIDs.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use logging::{LogConfig, init_logging};

fn main() {
    let cli = Cli::parse();

    init_logging(&LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format.into()));

    let result = match cli.command {
        Commands::Convert {
            inputs,
            output_dir,
            mapping,
            config,
            streaming,
            all_fields,
            substring_scope,
            reuse_mapping,
            json,
        } => commands::convert::run(commands::convert::ConvertArgs {
            inputs,
            output_dir,
            mapping,
            config,
            streaming,
            all_fields,
            substring_scope: substring_scope.map(Into::into),
            reuse_mapping,
            json_output: json,
        }),

        Commands::Classify {
            values,
            field,
            config,
        } => commands::classify::run(values, field, config),

        Commands::InitConfig { path, force } => commands::init_config::run(path, force),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
