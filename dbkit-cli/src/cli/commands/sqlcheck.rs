//! Query check command handler

use anyhow::Result;
use clap::Args;
use colored::*;

use crate::sqlcheck::is_select_only;

#[derive(Debug, Args)]
pub struct CheckQueryArgs {
    /// SQL text to classify
    pub query: String,
}

pub fn handle(args: CheckQueryArgs) -> Result<()> {
    if is_select_only(&args.query) {
        println!("{}", "read-only SELECT".green());
        Ok(())
    } else {
        anyhow::bail!("query is not a read-only SELECT")
    }
}
