//! States command - enumerate reachable positions for external learners
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_table(), export_json(), print_summary()
//! - Level 3: select_entries()
//! - Level 4: formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use hexapawn_core::{Board, Side, StateEntry, StateTable, DEFAULT_BOARD_SIZE};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct StatesArgs {
    /// Board size (N for an NxN board)
    #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
    pub size: usize,

    /// Starting position as a board string (defaults to the standard setup)
    #[arg(long)]
    pub board: Option<String>,

    /// Side that moves first (1 or 2)
    #[arg(long, default_value = "1")]
    pub start: Side,

    /// Only list positions where this side is to move
    #[arg(long)]
    pub side: Option<Side>,

    /// Write the table as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the table as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Serialized form of a (possibly filtered) state table
#[derive(serde::Serialize)]
struct JsonTable<'a> {
    size: usize,
    side: Option<Side>,
    count: usize,
    states: Vec<&'a StateEntry>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run states command
///
/// 1. Enumerate the table
/// 2. Export or print it
pub fn run(args: StatesArgs) -> Result<()> {
    let table = build_table(&args)?;
    let entries = select_entries(&table, args.side);

    tracing::info!(
        "Enumerated {} states ({} selected) on a {}x{} board",
        table.len(),
        entries.len(),
        table.size(),
        table.size()
    );

    if let Some(path) = &args.output {
        export_json(&table, &entries, args.side, path)?;
        println!("Wrote {} states to {}", entries.len(), path.display());
    } else if args.json {
        println!("{}", to_json(&table, &entries, args.side)?);
    } else {
        print_summary(&table, &entries);
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_table(args: &StatesArgs) -> Result<StateTable> {
    let board = match &args.board {
        Some(s) => Board::deserialize(s, args.size)
            .with_context(|| format!("Invalid starting board {:?}", s))?,
        None => Board::new(args.size).context("Invalid board size")?,
    };
    Ok(StateTable::enumerate(&board, args.start))
}

fn export_json(
    table: &StateTable,
    entries: &[&StateEntry],
    side: Option<Side>,
    path: &Path,
) -> Result<()> {
    let json = to_json(table, entries, side)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write state table: {}", path.display()))
}

fn print_summary(table: &StateTable, entries: &[&StateEntry]) {
    println!("\n=== State Table ({}x{}) ===", table.size(), table.size());
    for side in Side::BOTH {
        println!("{} to move: {}", side, table.for_side(side).count());
    }

    println!("\nStates:");
    for entry in entries {
        println!(
            "  {} ({} to move): {}",
            entry.board,
            entry.to_move.number(),
            format_moves(entry)
        );
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn select_entries(table: &StateTable, side: Option<Side>) -> Vec<&StateEntry> {
    table
        .entries()
        .iter()
        .filter(|entry| side.map_or(true, |s| entry.to_move == s))
        .collect()
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn to_json(table: &StateTable, entries: &[&StateEntry], side: Option<Side>) -> Result<String> {
    let output = JsonTable {
        size: table.size(),
        side,
        count: entries.len(),
        states: entries.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

fn format_moves(entry: &StateEntry) -> String {
    entry
        .moves
        .iter()
        .map(|mv| {
            format!(
                "{},{}->{},{}",
                mv.from.row, mv.from.col, mv.to.row, mv.to.col
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// TESTS
// ============================================================================
