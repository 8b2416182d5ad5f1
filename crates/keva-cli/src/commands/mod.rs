//! Subcommands and the flags they share

pub mod get;
pub mod list;
pub mod set;
pub mod unset;
pub mod version;

use clap::{ArgAction, Args, ValueEnum};
use keva_core::config::{DEFAULT_MAX_DEPTH, DEFAULT_NOTES_REF, DEFAULT_REMOTE};
use keva_core::errors::ExError;
use keva_core::KevaConfig;
use keva_engine::{apply_engine_command, EngineCommand, EngineCommandResult};
use keva_git::GitCli;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Human,
    Json,
}

/// Flags accepted by every subcommand, each with an environment fallback
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Notes ref holding the annotations (refs/notes/<REF>)
    #[arg(long = "ref", global = true, env = "KEVA_REF", default_value = DEFAULT_NOTES_REF)]
    pub notes_ref: String,

    /// Remote to fetch from and push to
    #[arg(long, global = true, env = "KEVA_REMOTE", default_value = DEFAULT_REMOTE)]
    pub remote: String,

    /// How many ancestors of HEAD to search for annotations
    #[arg(
        long,
        global = true,
        env = "KEVA_MAX_DEPTH",
        default_value_t = DEFAULT_MAX_DEPTH
    )]
    pub max_depth: u32,

    /// Fetch annotations from the remote before reading
    #[arg(
        long,
        global = true,
        env = "KEVA_FETCH",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub fetch: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true, env = "KEVA_VERBOSE")]
    pub verbose: bool,

    /// Log line format
    #[arg(
        long,
        global = true,
        env = "KEVA_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Human
    )]
    pub log_format: LogFormat,
}

impl GlobalArgs {
    pub fn config(&self) -> KevaConfig {
        KevaConfig::default()
            .with_notes_ref(self.notes_ref.clone())
            .with_remote(self.remote.clone())
            .with_max_depth(self.max_depth)
            .with_fetch(self.fetch)
    }
}

/// Run an engine command against the repository in the working directory
pub fn run(
    cmd: EngineCommand,
    global: &GlobalArgs,
) -> Result<EngineCommandResult, Box<dyn std::error::Error>> {
    let mut backend = GitCli::new(std::env::current_dir()?, global.remote.clone());
    let result =
        apply_engine_command(cmd, &mut backend, &global.config()).map_err(ExError::from)?;
    Ok(result)
}

fn unexpected(result: EngineCommandResult) -> Box<dyn std::error::Error> {
    format!("unexpected engine result: {:?}", result).into()
}
