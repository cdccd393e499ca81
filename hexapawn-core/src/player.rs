//! Player abstraction over human and agent move selection

use std::io::{self, BufRead, Stderr, Stdin, Stdout, Write};

use tracing::{error, warn};

use crate::board::{Board, Move, Side};
use crate::error::{ParseMoveError, StrategyError};
use crate::game::HistoryEntry;
use crate::strategy::Strategy;

/// Consecutive malformed lines a human may type before we give up on them
pub const DEFAULT_MAX_PROMPTS: u32 = 10;

/// Token that requests the game to stop
pub const QUIT_TOKEN: &str = "q";

/// What a player wants to do this turn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Move(Move),
    Quit,
}

/// Anything that can choose moves for one side
pub trait Player {
    fn name(&self) -> &str;

    /// Choose a move. Legality is checked by the controller.
    fn get_move(&mut self, board: &Board, side: Side) -> Decision;

    /// Called when the controller refused the last move as illegal
    fn move_rejected(&mut self, _mv: Move) {}

    /// Called after the other side's move has been applied
    fn opponent_moved(&mut self, _opponent: &str, _mv: Move) {}

    /// Called once with the full history after somebody wins
    fn game_report(&mut self, _history: &[HistoryEntry], _side: Side, _winner: Side) {}
}

// ============================================================================
// HUMAN
// ============================================================================

/// Parsed line of human input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Move(Move),
    Quit,
}

/// Parse `from_row,from_col,to_row,to_col`, or `q` to quit
pub fn parse_input(line: &str) -> Result<Input, ParseMoveError> {
    let first = line.split(',').next().unwrap_or_default().trim();
    if first == QUIT_TOKEN {
        return Ok(Input::Quit);
    }
    line.parse().map(Input::Move)
}

/// Source of typed lines
pub trait LineInput {
    /// Append one raw line to `buf`; returns 0 at end of input
    fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize>;
}

impl<R: BufRead> LineInput for R {
    fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        self.read_until(b'\n', buf)
    }
}

/// Process stdin, locked per line so two humans can share it
pub struct Console(Stdin);

impl LineInput for Console {
    fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        self.0.lock().read_until(b'\n', buf)
    }
}

/// Where console humans see the board and prompts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PromptStream {
    #[default]
    Stdout,
    /// Keeps stdout free for machine-readable output
    Stderr,
}

/// A player typing moves on a console
pub struct HumanPlayer<R, W> {
    name: String,
    input: R,
    output: W,
    max_prompts: u32,
}

impl HumanPlayer<Console, Stdout> {
    /// Human on the process's stdin/stdout
    pub fn stdio(name: impl Into<String>) -> Self {
        Self::with_io(name, Console(io::stdin()), io::stdout())
    }
}

impl HumanPlayer<Console, Stderr> {
    /// Human reading stdin and prompting on stderr
    pub fn stdin_stderr(name: impl Into<String>) -> Self {
        Self::with_io(name, Console(io::stdin()), io::stderr())
    }
}

/// Console human on the chosen prompt stream
pub fn console_human(name: impl Into<String>, prompts: PromptStream) -> Box<dyn Player> {
    match prompts {
        PromptStream::Stdout => Box::new(HumanPlayer::stdio(name)),
        PromptStream::Stderr => Box::new(HumanPlayer::stdin_stderr(name)),
    }
}

impl<R: LineInput, W: Write> HumanPlayer<R, W> {
    pub fn with_io(name: impl Into<String>, input: R, output: W) -> Self {
        Self {
            name: name.into(),
            input,
            output,
            max_prompts: DEFAULT_MAX_PROMPTS,
        }
    }

    pub fn with_max_prompts(mut self, max_prompts: u32) -> Self {
        self.max_prompts = max_prompts.max(1);
        self
    }

    /// Recover the writer (handy for inspecting captured output)
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_move(&mut self, board: &Board, side: Side) -> io::Result<Decision> {
        write!(self.output, "\n{}", board)?;
        writeln!(self.output, "{}'s turn ({}).", self.name, side)?;

        for _ in 0..self.max_prompts {
            write!(self.output, "Enter your move: ")?;
            self.output.flush()?;

            let mut raw = Vec::new();
            if self.input.read_line(&mut raw)? == 0 {
                // End of input
                return Ok(Decision::Quit);
            }

            // Undecodable bytes become U+FFFD and fail to parse like any typo
            let line = String::from_utf8_lossy(&raw);
            match parse_input(&line) {
                Ok(Input::Quit) => return Ok(Decision::Quit),
                Ok(Input::Move(mv)) => return Ok(Decision::Move(mv)),
                Err(err) => {
                    warn!(player = %self.name, input = line.trim(), %err, "Malformed move input");
                    writeln!(self.output, "Invalid input! {}. Enter four comma separated numbers in this format:", err)?;
                    writeln!(self.output, "  from_row,from_column,to_row,to_column")?;
                }
            }
        }

        warn!(player = %self.name, "Too many malformed inputs, quitting");
        Ok(Decision::Quit)
    }
}

impl<R: LineInput, W: Write> Player for HumanPlayer<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(&mut self, board: &Board, side: Side) -> Decision {
        match self.read_move(board, side) {
            Ok(decision) => decision,
            Err(err) => {
                error!(player = %self.name, %err, "Console I/O failed");
                Decision::Quit
            }
        }
    }

    fn move_rejected(&mut self, mv: Move) {
        // Nothing useful to do if the console is gone; the next read will notice
        let _ = writeln!(self.output, "Move {} is not legal!", mv);
    }

    fn opponent_moved(&mut self, opponent: &str, mv: Move) {
        let _ = writeln!(
            self.output,
            "Moved {}'s piece from {} to {}",
            opponent, mv.from, mv.to
        );
    }
}

// ============================================================================
// AGENT
// ============================================================================

/// A player driven by a [`Strategy`]
pub struct AgentPlayer {
    name: String,
    strategy: Box<dyn Strategy>,
}

impl AgentPlayer {
    pub fn new(name: impl Into<String>, strategy: Box<dyn Strategy>) -> Self {
        Self {
            name: name.into(),
            strategy,
        }
    }
}

impl Player for AgentPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    /// A strategy failure or an off-board move ends the session
    fn get_move(&mut self, board: &Board, side: Side) -> Decision {
        let selected = self
            .strategy
            .select_move(board, side)
            .and_then(|mv| StrategyError::check_move(mv, board.size()));

        match selected {
            Ok(mv) => Decision::Move(mv),
            Err(err) => {
                error!(player = %self.name, %err, "Agent returned an invalid move");
                eprintln!("{}: invalid move format ({}). Quitting.", self.name, err);
                Decision::Quit
            }
        }
    }

    fn game_report(&mut self, history: &[HistoryEntry], side: Side, winner: Side) {
        self.strategy.game_report(history, side, winner);
    }
}
