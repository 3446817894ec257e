//! Classify command - show the verdict and deciding rule for values.

use std::path::PathBuf;

use colored::Colorize;
use idmint::IdClassifier;

pub fn run(
    values: Vec<String>,
    field: Option<String>,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config.as_deref())?;
    let classifier = IdClassifier::from_config(&config.classifier)?;

    let width = values
        .iter()
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .min(40);

    for value in &values {
        let verdict = classifier.classify(value, field.as_deref());
        let label = if verdict.is_systematic() {
            "systematic".green().bold()
        } else {
            "keep".dimmed()
        };
        println!(
            "{:width$}  {:10}  {}",
            value.white(),
            label,
            verdict.reason(),
            width = width
        );
    }

    Ok(())
}
