//! Play command - run one game between two configured players
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), report_outcome()
//! - Level 3: parse_player_spec()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hexapawn_core::{
    Game, GameConfig, GameOutcome, HistoryEntry, PlayerConfig, PlayerKind, PromptStream, Side,
    StrategyKind, Termination, WinReason,
};

/// Player spec that selects a console human
const HUMAN: &str = "human";

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Game configuration JSON file (flags below override it)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Player one: "human" or a strategy (first, random, greedy)
    #[arg(long, value_name = "SPEC")]
    pub player1: Option<String>,

    /// Player two: "human" or a strategy (first, random, greedy)
    #[arg(long, value_name = "SPEC")]
    pub player2: Option<String>,

    /// Display name for player one
    #[arg(long)]
    pub name1: Option<String>,

    /// Display name for player two
    #[arg(long)]
    pub name2: Option<String>,

    /// Board size (N for an NxN board)
    #[arg(long)]
    pub size: Option<usize>,

    /// Starting position as a board string, e.g. 222000111
    #[arg(long)]
    pub board: Option<String>,

    /// Side that moves first (1 or 2)
    #[arg(long)]
    pub start: Option<Side>,

    /// Illegal moves tolerated per turn before the game is abandoned
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Output the result and move history as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Merge the config file with command-line overrides
/// 2. Play the game
/// 3. Report the outcome
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args, seed)?;
    // JSON goes to stdout, so humans are prompted on stderr
    let prompts = if args.json {
        PromptStream::Stderr
    } else {
        PromptStream::Stdout
    };
    let mut game = config
        .build_game_with_prompts(prompts)
        .context("Invalid game configuration")?;

    if !args.json {
        println!("\nStarting game...");
    }

    let outcome = game.play();
    report_outcome(&game, outcome, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load the config file (or defaults) and apply flag overrides
fn build_config(args: &PlayArgs, seed: Option<u64>) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => GameConfig::default(),
    };

    if let Some(size) = args.size {
        config.board_size = size;
    }
    if let Some(board) = &args.board {
        config.initial_board = Some(board.clone());
    }
    if let Some(start) = args.start {
        config.starting_side = start;
    }
    if let Some(max_retries) = args.max_retries {
        config.max_retries = max_retries;
    }

    let overrides = [
        (&args.player1, &args.name1),
        (&args.player2, &args.name2),
    ];
    for (seat, (spec, name)) in config.players.iter_mut().zip(overrides) {
        if let Some(spec) = spec {
            let name = name.clone().unwrap_or_else(|| seat.name.clone());
            *seat = parse_player_spec(spec, &name)?;
        } else if let Some(name) = name {
            seat.name = name.clone();
        }
    }

    // A global seed makes agents reproducible unless the config pinned one
    if let Some(seed) = seed {
        for (i, seat) in config.players.iter_mut().enumerate() {
            if let PlayerKind::Agent { seed: agent_seed, .. } = &mut seat.kind {
                agent_seed.get_or_insert(seed.wrapping_add(i as u64));
            }
        }
    }

    config.validate().context("Invalid game configuration")?;
    Ok(config)
}

/// Print the result as text or JSON
fn report_outcome(game: &Game, outcome: GameOutcome, json: bool) -> Result<()> {
    if json {
        print_json_outcome(game, outcome)
    } else {
        print_text_outcome(game, outcome);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// "human" or a strategy name
fn parse_player_spec(spec: &str, name: &str) -> Result<PlayerConfig> {
    if spec.trim().eq_ignore_ascii_case(HUMAN) {
        return Ok(PlayerConfig::human(name));
    }
    let strategy: StrategyKind = spec
        .parse()
        .with_context(|| format!("Invalid player spec {:?}", spec))?;
    Ok(PlayerConfig::agent(name, strategy, None))
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn describe(game: &Game, outcome: GameOutcome) -> String {
    match outcome {
        GameOutcome::Won { winner, reason } => {
            let how = match reason {
                WinReason::Promotion => "by promotion",
                WinReason::NoLegalMoves => "by leaving the opponent without moves",
            };
            format!("Game over! {} wins {}!", game.player_name(winner), how)
        }
        GameOutcome::Terminated { side, reason } => match reason {
            Termination::Quit => format!("{} quit. Quitting...", game.player_name(side)),
            Termination::RetriesExhausted => format!(
                "{} made too many illegal moves. Game abandoned.",
                game.player_name(side)
            ),
        },
    }
}

/// Print results as text
fn print_text_outcome(game: &Game, outcome: GameOutcome) {
    if outcome.winner().is_some() {
        println!("\n{}", game.board());
    }
    println!("{}", describe(game, outcome));
}

/// Print results as JSON
fn print_json_outcome(game: &Game, outcome: GameOutcome) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        outcome: GameOutcome,
        winner_name: Option<&'a str>,
        player_one: &'a str,
        player_two: &'a str,
        final_board: String,
        history: &'a [HistoryEntry],
    }

    let output = JsonOutput {
        outcome,
        winner_name: outcome.winner().map(|side| game.player_name(side)),
        player_one: game.player_name(Side::One),
        player_two: game.player_name(Side::Two),
        final_board: game.board().serialize(),
        history: game.history(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
