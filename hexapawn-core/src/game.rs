//! Game controller: turn sequencing, move application and win detection

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::board::{Board, Move, Side};
use crate::player::{Decision, Player};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Attempts a player gets to produce a legal move before the session ends
pub const DEFAULT_MAX_RETRIES: u32 = 10;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Why a game was won
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    /// A piece reached the opponent's home row
    Promotion,
    /// The opponent cannot move
    NoLegalMoves,
}

/// Why a session stopped without a winner
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The player asked to quit (or could not produce a well-formed move)
    Quit,
    /// The player kept proposing illegal moves
    RetriesExhausted,
}

/// How a session ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum GameOutcome {
    Won { winner: Side, reason: WinReason },
    Terminated { side: Side, reason: Termination },
}

impl GameOutcome {
    pub fn winner(&self) -> Option<Side> {
        match self {
            GameOutcome::Won { winner, .. } => Some(*winner),
            GameOutcome::Terminated { .. } => None,
        }
    }
}

/// Controller state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Finished(GameOutcome),
}

/// One applied move together with the board it was played on
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Board encoding before the move
    pub board: String,
    pub mv: Move,
}

/// Decide whether `mover` has just won on `board`.
///
/// Promotion takes precedence over the opponent being stuck.
pub fn check_winner(board: &Board, mover: Side) -> Option<WinReason> {
    if board.is_promoted(mover) {
        Some(WinReason::Promotion)
    } else if board.get_legal_moves(mover.opponent()).is_empty() {
        Some(WinReason::NoLegalMoves)
    } else {
        None
    }
}

// ============================================================================
// GAME
// ============================================================================

/// A single Hexapawn session between two players
pub struct Game {
    players: [Box<dyn Player>; 2],
    board: Board,
    current: Side,
    status: GameStatus,
    history: Vec<HistoryEntry>,
    max_retries: u32,
}

impl Game {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// New game on the default board, player one to move
    pub fn new(player_one: Box<dyn Player>, player_two: Box<dyn Player>) -> Self {
        Self {
            players: [player_one, player_two],
            board: Board::default(),
            current: Side::One,
            status: GameStatus::InProgress,
            history: Vec::new(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Start from a custom position
    pub fn with_board(mut self, board: Board) -> Self {
        self.board = board;
        self
    }

    pub fn with_starting_side(mut self, side: Side) -> Self {
        self.current = side;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_side(&self) -> Side {
        self.current
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn player_name(&self, side: Side) -> &str {
        self.players[side.index()].name()
    }

    /// True once somebody has won (not when a player quit)
    pub fn is_game_over(&self) -> bool {
        self.winner().is_some()
    }

    pub fn winner(&self) -> Option<Side> {
        match self.status {
            GameStatus::Finished(outcome) => outcome.winner(),
            GameStatus::InProgress => None,
        }
    }

    // ========================================================================
    // GAME LOOP
    // ========================================================================

    /// Run turns until the session ends
    pub fn play(&mut self) -> GameOutcome {
        info!(
            player_one = self.player_name(Side::One),
            player_two = self.player_name(Side::Two),
            board = %self.board.serialize(),
            "Starting game"
        );

        loop {
            if let Some(outcome) = self.play_turn() {
                return outcome;
            }
        }
    }

    /// Play one turn for the side to move. Returns the outcome once the
    /// session has ended.
    pub fn play_turn(&mut self) -> Option<GameOutcome> {
        if let GameStatus::Finished(outcome) = self.status {
            return Some(outcome);
        }

        let side = self.current;
        let legal = self.board.get_legal_moves(side);

        // Only reachable from a custom starting board
        if legal.is_empty() {
            return Some(self.finish(side.opponent(), WinReason::NoLegalMoves));
        }

        let mv = match self.request_legal_move(side, &legal) {
            Ok(mv) => mv,
            Err(reason) => return Some(self.terminate(side, reason)),
        };

        let before = self.board.serialize();
        self.board.move_piece(mv.from, mv.to);
        self.history.push(HistoryEntry { board: before, mv });

        let mover = self.player_name(side).to_string();
        self.players[side.opponent().index()].opponent_moved(&mover, mv);

        debug!(
            player = self.player_name(side),
            %side,
            %mv,
            board = %self.board.serialize(),
            "Move applied"
        );

        if let Some(reason) = check_winner(&self.board, side) {
            return Some(self.finish(side, reason));
        }

        self.current = side.opponent();
        None
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn request_legal_move(&mut self, side: Side, legal: &[Move]) -> Result<Move, Termination> {
        let player = &mut self.players[side.index()];

        for attempt in 1..=self.max_retries {
            match player.get_move(&self.board, side) {
                Decision::Quit => return Err(Termination::Quit),
                Decision::Move(mv) if legal.contains(&mv) => return Ok(mv),
                Decision::Move(mv) => {
                    warn!(player = player.name(), %mv, attempt, "Illegal move rejected");
                    player.move_rejected(mv);
                }
            }
        }

        Err(Termination::RetriesExhausted)
    }

    fn finish(&mut self, winner: Side, reason: WinReason) -> GameOutcome {
        let outcome = GameOutcome::Won { winner, reason };
        self.status = GameStatus::Finished(outcome);

        for (player, side) in self.players.iter_mut().zip(Side::BOTH) {
            player.game_report(&self.history, side, winner);
        }

        info!(
            winner = self.player_name(winner),
            ?reason,
            moves = self.history.len(),
            "Game over"
        );
        outcome
    }

    fn terminate(&mut self, side: Side, reason: Termination) -> GameOutcome {
        let outcome = GameOutcome::Terminated { side, reason };
        self.status = GameStatus::Finished(outcome);

        info!(player = self.player_name(side), ?reason, "Game terminated");
        outcome
    }
}

// ============================================================================
// TESTS
// ============================================================================
