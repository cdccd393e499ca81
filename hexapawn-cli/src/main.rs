//! Hexapawn CLI - Command-line interface
//!
//! Commands:
//! - play: Play a single game between humans and/or agents
//! - states: Enumerate reachable positions and their legal moves

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod play_cmd;
mod states_cmd;

#[derive(Parser)]
#[command(name = "hexapawn")]
#[command(about = "Hexapawn with pluggable human and agent players")]
struct Cli {
    /// Seed for agent randomness (reproducible games)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log every move (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game
    Play(play_cmd::PlayArgs),
    /// Enumerate reachable states and their legal moves
    States(states_cmd::StatesArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::States(args) => states_cmd::run(args),
    }
}

/// Logs go to stderr so the board and JSON output stay clean on stdout
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
