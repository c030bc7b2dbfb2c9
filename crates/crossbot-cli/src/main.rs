//! Crossbot CLI
//!
//! Terminal transport for the Crossbot dispatcher

use clap::{Parser, Subcommand};
use crossbot_core::logging_facility::{self, Profile};

mod commands;
mod config;
mod runtime;
mod terminal;

#[derive(Debug, Parser)]
#[command(name = "crossbot")]
#[command(about = "Crossbot - crossword companion bot", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: config::GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one bot command, e.g. `crossbot exec missed 3`
    Exec(commands::exec::ExecArgs),
    /// Read bot commands from stdin, one per line
    Shell(commands::shell::ShellArgs),
    /// Record a completed puzzle
    Record(commands::record::RecordArgs),
    /// Serve saved queries for the executor (spawned internally)
    #[command(hide = true)]
    QueryWorker(commands::query_worker::QueryWorkerArgs),
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::QueryWorker(args) => {
            logging_facility::init(Profile::Production);
            commands::query_worker::execute(args, cli.global.db.as_deref())
        }
        Commands::Exec(args) => with_config(&cli.global, |c| commands::exec::execute(args, c)),
        Commands::Shell(args) => with_config(&cli.global, |c| commands::shell::execute(args, c)),
        Commands::Record(args) => with_config(&cli.global, |c| commands::record::execute(args, c)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration, start logging, then run `f`
fn with_config<F>(global: &config::GlobalArgs, f: F) -> CliResult
where
    F: FnOnce(&config::BotConfig) -> CliResult,
{
    let config = config::BotConfig::load(global)?;
    logging_facility::init(config.log_profile);
    f(&config)
}
