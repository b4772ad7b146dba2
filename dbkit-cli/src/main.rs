//! dbkit - a command-line toolkit for transferring, dumping and inspecting
//! relational data

mod backup;
mod cli;
mod config;
mod db;
mod password;
mod sqlcheck;
mod token;
mod transfer;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    db::install_drivers();

    let cli = cli::Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    cli::run(cli.command).await
}
