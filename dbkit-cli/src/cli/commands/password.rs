//! Password command handler

use anyhow::Result;
use clap::Args;

use crate::password;

#[derive(Debug, Args)]
pub struct PasswordArgs {
    /// Password length
    #[arg(long, default_value_t = password::DEFAULT_LENGTH)]
    pub length: usize,
}

pub fn handle(args: PasswordArgs) -> Result<()> {
    println!("{}", password::generate(args.length));
    Ok(())
}
