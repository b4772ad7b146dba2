//! Token inspection command handler

use anyhow::Result;
use clap::Args;
use colored::*;

use crate::token::decode_token;

#[derive(Debug, Args)]
pub struct DecodeTokenArgs {
    /// The JWT, with or without a `Bearer ` prefix
    pub token: String,
}

pub fn handle(args: DecodeTokenArgs) -> Result<()> {
    let report = decode_token(&args.token)?;

    println!("{}", "header".bold());
    println!("{}", serde_json::to_string_pretty(&report.header)?);
    println!("{}", "claims".bold());
    println!("{}", serde_json::to_string_pretty(&report.claims)?);

    match report.expires_at {
        Some(at) if report.expired => println!("expired at {}", at.to_rfc3339().red()),
        Some(at) => println!("valid until {}", at.to_rfc3339().green()),
        None => println!("{}", "no expiry claim".dimmed()),
    }
    Ok(())
}
