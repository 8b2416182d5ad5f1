//! Unset command
//!
//! Usage: keva unset <KEY> [--push]

use clap::Args;
use keva_engine::EngineCommand;

use super::{run, CliResult, GlobalArgs};

#[derive(Debug, Args)]
pub struct UnsetArgs {
    /// Key to unset; unsetting a key that is not set is not an error
    pub key: String,

    /// Push the annotations to the remote afterwards
    #[arg(long)]
    pub push: bool,
}

pub fn execute(args: UnsetArgs, global: &GlobalArgs) -> CliResult {
    run(
        EngineCommand::Unset {
            key: args.key,
            push: args.push,
        },
        global,
    )?;
    Ok(())
}
