//! List command
//!
//! Usage: keva list [--output plain|json|raw]

use std::io::Write;

use clap::Args;
use keva_core::errors::ExError;
use keva_engine::{render_snapshot, EngineCommand, EngineCommandResult, OutputFormat};

use super::{run, unexpected, CliResult, GlobalArgs};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format: plain, json or raw
    #[arg(short, long, default_value = "plain")]
    pub output: String,
}

pub fn execute(args: ListArgs, global: &GlobalArgs) -> CliResult {
    // Checked before touching the repository
    let format: OutputFormat = args.output.parse().map_err(ExError::from)?;

    match run(EngineCommand::List, global)? {
        EngineCommandResult::Snapshot(snapshot) => {
            let text = render_snapshot(&snapshot, format).map_err(ExError::from)?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
        other => Err(unexpected(other)),
    }
}
