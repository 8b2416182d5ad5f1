//! keva Git - `NotesBackend` backed by the `git` executable
//!
//! Provides:
//! - `GitCli`, which runs git subcommands in a working tree
//! - Classification of git diagnostics into keva error kinds

pub mod classify;
pub mod errors;
pub mod git_cli;

pub use classify::classify_failure;
pub use git_cli::GitCli;
