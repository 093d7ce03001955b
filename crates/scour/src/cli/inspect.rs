//! The `scour inspect` command: report metadata without modifying anything.

use clap::Args;
use scour_core::{ImageContainer, MetadataExtractor};
use std::path::PathBuf;

/// Arguments for the `inspect` command.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Image file to inspect
    pub input: PathBuf,

    /// Emit the report as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Execute the inspect command.
pub async fn execute(args: InspectArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.input)?;
    let container = ImageContainer::parse(&bytes)?;
    let report = MetadataExtractor::extract(&container);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.is_empty() {
        println!("No metadata found in {}", args.input.display());
        return Ok(());
    }

    // Aligned table; sensitive items are flagged with "!".
    let width = report
        .items
        .iter()
        .map(|item| item.label.chars().count())
        .max()
        .unwrap_or(0);
    for item in &report.items {
        let flag = if item.sensitive { "!" } else { " " };
        println!("{flag} {:<width$}  {}", item.label, item.value);
    }
    if report.has_sensitive() {
        eprintln!();
        eprintln!("Items marked ! identify the device, time, or location of capture.");
    }

    Ok(())
}
