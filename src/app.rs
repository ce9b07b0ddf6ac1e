// Declare modules
pub mod classifier;
pub mod cli;
pub mod config;
pub mod filter;
pub mod formatter;
pub mod models;
pub mod scanner;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};

use self::cli::Cli;
use self::config::load_config;
use self::formatter::OutputGenerator;
use self::scanner::Scanner;

/// Initializes components and orchestrates data flow.
pub fn run(args: Cli) -> Result<()> {
    // 1. Load and validate configuration
    let mut config = load_config(&args.input)?;
    if let Some(heading) = args.heading {
        config.heading = heading;
    }
    config.validate().context("Invalid configuration")?;
    log::debug!(
        "Scanning {} ({:?} scheme, {} includes)",
        config.base_dir.display(),
        config.scheme,
        config.includes.len()
    );

    // 2. Select files
    let files = Scanner::new(&config)?
        .scan()
        .context("Error finding files")?;

    if files.is_empty() {
        log::warn!("No files found matching the include/exclude rules");
    }

    if args.dry_run {
        if !files.is_empty() {
            println!("{}", OutputGenerator::listing(&files));
        }
        return Ok(());
    }

    // 3. Write the document
    let output = File::create(&args.output)
        .with_context(|| format!("Error creating output file {:?}", args.output))?;
    let mut writer = BufWriter::new(output);
    OutputGenerator::render(&config, &files, &mut writer)
        .with_context(|| format!("Error writing output to {:?}", args.output))?;
    writer
        .flush()
        .with_context(|| format!("Error writing output to {:?}", args.output))?;

    log::info!("Successfully processed {} files", files.len());
    log::info!("Output written to: {}", args.output.display());

    Ok(())
}
