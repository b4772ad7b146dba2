//! Dump and restore command handlers

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::*;

use crate::backup;
use crate::config::{Config, Endpoint};
use crate::db;

#[derive(Debug, Args)]
pub struct DumpArgs {
    /// Path to the configuration file (the [source] endpoint is used)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Database host
    #[arg(long)]
    pub host: Option<String>,

    /// Database port
    #[arg(long)]
    pub port: Option<u16>,

    /// Database user
    #[arg(long)]
    pub user: Option<String>,

    /// Database name
    #[arg(long)]
    pub database: Option<String>,

    /// Table to dump
    #[arg(long)]
    pub table: String,

    /// File the dump is written to
    #[arg(long)]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct RestoreArgs {
    /// Path to the configuration file (the [destination] endpoint is used)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Database host
    #[arg(long)]
    pub host: Option<String>,

    /// Database port
    #[arg(long)]
    pub port: Option<u16>,

    /// Database user
    #[arg(long)]
    pub user: Option<String>,

    /// Database name
    #[arg(long)]
    pub database: Option<String>,

    /// Full connection URL, overriding the discrete fields
    #[arg(long)]
    pub url: Option<String>,

    /// Dump file to replay (removed after a successful restore)
    #[arg(long)]
    pub input: PathBuf,
}

pub async fn handle_dump(args: DumpArgs) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let mut endpoint = merge(config.source, args.host, args.port, args.user, args.database);
    ensure_password(&mut endpoint)?;

    backup::dump(&endpoint, &args.table, &args.output).await?;
    println!(
        "dumped {} to {}",
        format!("{}.{}", endpoint.database, args.table).cyan(),
        args.output.display().to_string().green()
    );
    Ok(())
}

pub async fn handle_restore(args: RestoreArgs) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let mut endpoint = merge(
        config.destination,
        args.host,
        args.port,
        args.user,
        args.database,
    );
    if let Some(url) = args.url {
        endpoint.url = Some(url);
    }
    if endpoint.url.is_none() {
        ensure_password(&mut endpoint)?;
    }

    let pool = db::connect(&endpoint.url())
        .await
        .context("failed to connect to the destination database")?;
    let executed = backup::restore(&pool, &args.input).await?;
    println!(
        "restored {} statement(s) from {}",
        executed.to_string().green(),
        args.input.display()
    );
    Ok(())
}

fn merge(
    mut endpoint: Endpoint,
    host: Option<String>,
    port: Option<u16>,
    user: Option<String>,
    database: Option<String>,
) -> Endpoint {
    if let Some(host) = host {
        endpoint.host = host;
    }
    if let Some(port) = port {
        endpoint.port = port;
    }
    if let Some(user) = user {
        endpoint.user = user;
    }
    if let Some(database) = database {
        endpoint.database = database;
    }
    endpoint
}

fn ensure_password(endpoint: &mut Endpoint) -> Result<()> {
    if endpoint.password.is_empty() {
        if let Ok(password) = std::env::var("MYSQL_PWD") {
            endpoint.password = password;
        } else {
            endpoint.password =
                rpassword::prompt_password("Database password: ").context("failed to read password")?;
        }
    }
    Ok(())
}
