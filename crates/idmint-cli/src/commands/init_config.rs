//! Init-config command - write the default configuration for tuning.

use std::path::PathBuf;

use colored::Colorize;
use idmint::IdmintConfig;

pub fn run(path: PathBuf, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() && !force {
        return Err(format!(
            "{} already exists\nUse --force to overwrite it.",
            path.display()
        )
        .into());
    }

    IdmintConfig::default().save(&path)?;

    println!(
        "{} {}",
        "Wrote default configuration to".green().bold(),
        path.display().to_string().white()
    );
    println!(
        "Pass it with {}",
        format!("idmint convert --config {} <INPUT>...", path.display())
            .cyan()
            .bold()
    );

    Ok(())
}
