//! Command-line interface

pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use self::commands::backup::{DumpArgs, RestoreArgs};
use self::commands::password::PasswordArgs;
use self::commands::sqlcheck::CheckQueryArgs;
use self::commands::token::DecodeTokenArgs;
use self::commands::transfer::TransferArgs;

#[derive(Parser)]
#[command(
    name = "dbkit",
    version,
    about = "A command-line toolkit for transferring, dumping and inspecting relational data"
)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a configured row transfer between two databases
    Transfer(TransferArgs),
    /// Dump a table to a SQL file with mysqldump
    Dump(DumpArgs),
    /// Replay a SQL dump file against a database
    Restore(RestoreArgs),
    /// Decode a JWT and report its claims and expiry
    DecodeToken(DecodeTokenArgs),
    /// Generate a random password
    Password(PasswordArgs),
    /// Check whether a SQL query is a read-only SELECT
    CheckQuery(CheckQueryArgs),
}

/// Dispatch a parsed command to its handler
pub async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Transfer(args) => commands::transfer::handle(args).await,
        Commands::Dump(args) => commands::backup::handle_dump(args).await,
        Commands::Restore(args) => commands::backup::handle_restore(args).await,
        Commands::DecodeToken(args) => commands::token::handle(args),
        Commands::Password(args) => commands::password::handle(args),
        Commands::CheckQuery(args) => commands::sqlcheck::handle(args),
    }
}
