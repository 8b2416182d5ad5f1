//! Get command
//!
//! Usage: keva get <KEY>

use std::io::Write;

use clap::Args;
use keva_engine::{render_value, EngineCommand, EngineCommandResult};

use super::{run, unexpected, CliResult, GlobalArgs};

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Key to look up
    pub key: String,
}

/// Print the value without a trailing newline; nothing if the key is unset
pub fn execute(args: GetArgs, global: &GlobalArgs) -> CliResult {
    match run(EngineCommand::Get { key: args.key }, global)? {
        EngineCommandResult::Value(value) => {
            let mut stdout = std::io::stdout().lock();
            write!(stdout, "{}", render_value(value.as_ref()))?;
            stdout.flush()?;
            Ok(())
        }
        other => Err(unexpected(other)),
    }
}
