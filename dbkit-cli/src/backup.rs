//! Dump and restore wrappers around the external mysqldump tool

use std::path::Path;

use anyhow::{bail, Context, Result};
use sqlx::AnyPool;
use tokio::process::Command;

use crate::config::Endpoint;
use crate::db;

/// Dump one table to a SQL file with mysqldump
///
/// The password travels in the child's `MYSQL_PWD` environment, never on
/// the command line.
pub async fn dump(endpoint: &Endpoint, table: &str, out_path: &Path) -> Result<()> {
    if !db::is_valid_identifier(table) {
        bail!("'{}' is not a valid table name", table);
    }

    log::info!("dumping {}.{}", endpoint.database, table);
    let output = Command::new("mysqldump")
        .args(dump_args(endpoint, table))
        .env("MYSQL_PWD", &endpoint.password)
        .output()
        .await
        .context("failed to run mysqldump; is it on PATH?")?;

    if !output.status.success() {
        bail!(
            "mysqldump exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    tokio::fs::write(out_path, &output.stdout)
        .await
        .with_context(|| format!("failed to write dump file {}", out_path.display()))?;
    Ok(())
}

fn dump_args(endpoint: &Endpoint, table: &str) -> Vec<String> {
    vec![
        format!("-h{}", endpoint.host),
        format!("-u{}", endpoint.user),
        format!("-P{}", endpoint.port),
        "--single-transaction".to_string(),
        "--skip-lock-tables".to_string(),
        endpoint.database.clone(),
        table.to_string(),
    ]
}

/// Replay a dump file statement by statement, then remove it
pub async fn restore(pool: &AnyPool, dump_path: &Path) -> Result<u64> {
    let sql = tokio::fs::read_to_string(dump_path)
        .await
        .with_context(|| format!("failed to read dump file {}", dump_path.display()))?;

    let mut executed = 0u64;
    for statement in split_statements(&sql) {
        sqlx::query(&statement)
            .execute(pool)
            .await
            .with_context(|| format!("failed to execute statement: {}", summarize(&statement)))?;
        executed += 1;
    }

    if let Err(err) = tokio::fs::remove_file(dump_path).await {
        log::warn!(
            "could not remove dump file {}: {}",
            dump_path.display(),
            err
        );
    }

    Ok(executed)
}

/// Split a dump into executable statements, dropping comment-only lines
pub fn split_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|chunk| {
            chunk
                .lines()
                .filter(|line| {
                    let trimmed = line.trim();
                    !trimmed.is_empty() && !trimmed.starts_with("--")
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .map(|statement| statement.trim().to_string())
        .filter(|statement| !statement.is_empty())
        .collect()
}

fn summarize(statement: &str) -> String {
    const MAX: usize = 80;
    if statement.len() <= MAX {
        statement.to_string()
    } else {
        let mut truncated: String = statement.chars().take(MAX).collect();
        truncated.push_str("...");
        truncated
    }
}
