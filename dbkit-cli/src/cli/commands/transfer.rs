//! Transfer command handler

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::*;

use crate::config::Config;
use crate::db;
use crate::transfer::{run_transfer, TransferSpec};

#[derive(Debug, Args)]
pub struct TransferArgs {
    /// Path to the configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the source connection URL
    #[arg(long)]
    pub source_url: Option<String>,

    /// Override the destination connection URL
    #[arg(long)]
    pub dest_url: Option<String>,

    /// Validate the spec and print the plan without connecting
    #[arg(long)]
    pub dry: bool,
}

pub async fn handle(args: TransferArgs) -> Result<()> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(url) = args.source_url {
        config.source.url = Some(url);
    }
    if let Some(url) = args.dest_url {
        config.destination.url = Some(url);
    }

    let spec = config
        .transfer
        .as_ref()
        .context("config file has no [transfer] section")?;
    spec.validate()?;

    if args.dry {
        print_plan(spec);
        return Ok(());
    }

    let source = db::connect(&config.source.url())
        .await
        .context("failed to connect to the source database")?;
    let dest = db::connect(&config.destination.url())
        .await
        .context("failed to connect to the destination database")?;

    let report = run_transfer(&source, &dest, spec).await?;

    println!(
        "{} {} -> {}: {} read, {} skipped, {} inserted",
        spec.name.bold(),
        spec.source_table.cyan(),
        spec.target_table.cyan(),
        report.rows_read,
        report.rows_skipped.to_string().yellow(),
        report.rows_inserted.to_string().green(),
    );
    for failure in report.failures() {
        let key = failure.dedupe_key.as_deref().unwrap_or("-");
        println!(
            "  {} row {} (key {}): {}",
            "failed".red(),
            failure.row,
            key,
            failure.error
        );
    }

    if !report.is_clean() {
        anyhow::bail!(
            "{} row(s) failed during the transfer",
            report.failures().len()
        );
    }
    Ok(())
}

fn print_plan(spec: &TransferSpec) {
    println!(
        "{} {} -> {}",
        spec.name.bold(),
        spec.source_table.cyan(),
        spec.target_table.cyan()
    );
    let width = spec.columns.iter().map(|m| m.target.len()).max().unwrap_or(0);
    for mapping in &spec.columns {
        println!(
            "  {:width$} <- {}",
            mapping.target,
            mapping.rule.describe().dimmed(),
            width = width
        );
    }
    let dedupe = spec.dedupe_key();
    println!(
        "  dedupe: {} = source.{}",
        dedupe.target_column, dedupe.source_column
    );
}
