//! Fetch command - download CRDs from the configured sources

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tfk8s_fetch::{Fetcher, SourcesConfig};

use crate::display::pluralize;
use crate::error::{CliError, Result};

pub async fn run(config_path: Option<&Path>, output: &Path, jobs: usize) -> Result<()> {
    let config = match config_path {
        Some(path) => SourcesConfig::load_from(path)?,
        None => SourcesConfig::load()?,
    };

    if config.sources.is_empty() {
        let location = match config_path {
            Some(path) => path.to_path_buf(),
            None => SourcesConfig::default_path()?,
        };
        println!(
            "{} No sources configured in {}",
            style("⚠").yellow(),
            location.display()
        );
        return Ok(());
    }

    println!(
        "{} Fetching CRDs from {} into {}",
        style("→").blue(),
        pluralize(config.sources.len(), "source", "sources"),
        output.display()
    );

    let fetcher = Fetcher::new(output)?.with_concurrency(jobs);

    let pb = ProgressBar::new(config.sources.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map_err(|e| CliError::other(e.to_string()))?
            .progress_chars("#>-"),
    );

    let report = fetcher
        .fetch_all(&config.sources, |source| {
            pb.set_message(source.display_name().to_string());
            pb.inc(1);
        })
        .await;
    pb.finish_and_clear();

    for path in &report.written {
        println!("  {} {}", style("✓").green(), path.display());
    }
    for failed in &report.failed {
        println!(
            "  {} {}: {}",
            style("✗").red(),
            failed.source,
            failed.error
        );
    }

    println!();
    println!(
        "{} {} written, {} unchanged",
        style("✓").green().bold(),
        pluralize(report.written.len(), "CRD", "CRDs"),
        report.unchanged.len()
    );

    if !report.is_success() {
        return Err(CliError::other(format!(
            "{} could not be fetched",
            pluralize(report.failed.len(), "source", "sources")
        )));
    }

    Ok(())
}
