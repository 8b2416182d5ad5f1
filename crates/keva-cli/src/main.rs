//! keva CLI
//!
//! Command-line interface for keva

use clap::{Parser, Subcommand};
use keva_core::logging_facility::{self, Profile};

mod commands;

use commands::{GlobalArgs, LogFormat};

#[derive(Debug, Parser)]
#[command(name = "keva")]
#[command(about = "keva - key/value store on git notes", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the value of a key
    Get(commands::get::GetArgs),
    /// List all keys and values
    List(commands::list::ListArgs),
    /// Set a key on the current commit
    Set(commands::set::SetArgs),
    /// Unset a key on the current commit
    Unset(commands::unset::UnsetArgs),
    /// Print version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    logging_facility::init(Profile::select(
        cli.global.verbose,
        cli.global.log_format == LogFormat::Json,
    ));

    let result = match cli.command {
        Commands::Get(args) => commands::get::execute(args, &cli.global),
        Commands::List(args) => commands::list::execute(args, &cli.global),
        Commands::Set(args) => commands::set::execute(args, &cli.global),
        Commands::Unset(args) => commands::unset::execute(args, &cli.global),
        Commands::Version => commands::version::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
