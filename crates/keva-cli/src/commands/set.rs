//! Set command
//!
//! Usage: keva set <KEY> <VALUE> [--push]

use clap::Args;
use keva_engine::EngineCommand;

use super::{run, CliResult, GlobalArgs};

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Key to set
    pub key: String,

    /// Value to store
    pub value: String,

    /// Push the annotations to the remote afterwards
    #[arg(long)]
    pub push: bool,
}

pub fn execute(args: SetArgs, global: &GlobalArgs) -> CliResult {
    run(
        EngineCommand::Set {
            key: args.key,
            value: args.value,
            push: args.push,
        },
        global,
    )?;
    Ok(())
}
