//! Built-in move-selection strategies for agent players
//!
//! Agents are picked by name from configuration. An external learner plugs
//! in by implementing [`Strategy`] and handing it to an [`AgentPlayer`].
//!
//! [`AgentPlayer`]: crate::player::AgentPlayer

use std::fmt;
use std::str::FromStr;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Move, Side};
use crate::error::{ConfigError, StrategyError};
use crate::game::HistoryEntry;

/// Move-selection capability for agent players
pub trait Strategy {
    /// Pick a move for `side`. Returning an illegal move gets it rejected by
    /// the controller; returning an error ends the session.
    fn select_move(&mut self, board: &Board, side: Side) -> Result<Move, StrategyError>;

    /// Post-game callback with the full history, this agent's side and the winner
    fn game_report(&mut self, _history: &[HistoryEntry], _side: Side, _winner: Side) {}
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Names of the strategies compiled into this crate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    First,
    Random,
    Greedy,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [StrategyKind::First, StrategyKind::Random, StrategyKind::Greedy];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::First => "first",
            StrategyKind::Random => "random",
            StrategyKind::Greedy => "greedy",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownStrategy(s.to_string()))
    }
}

/// Build a strategy by kind. `seed` makes the random ones reproducible.
pub fn create_strategy(kind: StrategyKind, seed: Option<u64>) -> Box<dyn Strategy> {
    match kind {
        StrategyKind::First => Box::new(FirstLegal),
        StrategyKind::Random => Box::new(RandomMover::new(seed)),
        StrategyKind::Greedy => Box::new(Greedy::new(seed)),
    }
}

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

// ============================================================================
// STRATEGIES
// ============================================================================

/// Always plays the first generated move
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstLegal;

impl Strategy for FirstLegal {
    fn select_move(&mut self, board: &Board, side: Side) -> Result<Move, StrategyError> {
        board
            .get_legal_moves(side)
            .first()
            .copied()
            .ok_or(StrategyError::NoLegalMoves)
    }
}

/// Uniformly random legal move
pub struct RandomMover {
    rng: ChaCha8Rng,
}

impl RandomMover {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: create_rng(seed),
        }
    }
}

impl Strategy for RandomMover {
    fn select_move(&mut self, board: &Board, side: Side) -> Result<Move, StrategyError> {
        board
            .get_legal_moves(side)
            .choose(&mut self.rng)
            .copied()
            .ok_or(StrategyError::NoLegalMoves)
    }
}

/// Promotes when it can, captures when it can, otherwise moves at random
pub struct Greedy {
    rng: ChaCha8Rng,
}

impl Greedy {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: create_rng(seed),
        }
    }

    fn score(board: &Board, side: Side, mv: &Move) -> u8 {
        if mv.to.row == side.opponent().home_row(board.size()) {
            2
        } else if board.get_piece(mv.to) == Some(side.opponent()) {
            1
        } else {
            0
        }
    }
}

impl Strategy for Greedy {
    fn select_move(&mut self, board: &Board, side: Side) -> Result<Move, StrategyError> {
        let moves = board.get_legal_moves(side);
        let best = moves
            .iter()
            .map(|mv| Self::score(board, side, mv))
            .max()
            .ok_or(StrategyError::NoLegalMoves)?;

        let candidates: Vec<Move> = moves
            .into_iter()
            .filter(|mv| Self::score(board, side, mv) == best)
            .collect();

        candidates
            .choose(&mut self.rng)
            .copied()
            .ok_or(StrategyError::NoLegalMoves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;

    fn mv(fr: i8, fc: i8, tr: i8, tc: i8) -> Move {
        Move::new(Position::new(fr, fc), Position::new(tr, tc))
    }

    #[test]
    fn test_kind_lookup() {
        assert_eq!("random".parse::<StrategyKind>().unwrap(), StrategyKind::Random);
        assert_eq!(" Greedy ".parse::<StrategyKind>().unwrap(), StrategyKind::Greedy);
        assert!(matches!(
            "menace".parse::<StrategyKind>(),
            Err(ConfigError::UnknownStrategy(name)) if name == "menace"
        ));
        for kind in StrategyKind::ALL {
            assert_eq!(kind.to_string().parse::<StrategyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_first_legal() {
        let mut strategy = FirstLegal;
        assert_eq!(
            strategy.select_move(&Board::default(), Side::Two),
            Ok(mv(0, 0, 1, 0))
        );

        let stuck = Board::deserialize("020010000", 3).unwrap();
        assert_eq!(
            strategy.select_move(&stuck, Side::One),
            Err(StrategyError::NoLegalMoves)
        );
    }

    #[test]
    fn test_random_is_seeded_and_legal() {
        let board = Board::default();
        let legal = board.get_legal_moves(Side::One);

        let mut a = RandomMover::new(Some(7));
        let mut b = RandomMover::new(Some(7));
        for _ in 0..20 {
            let picked = a.select_move(&board, Side::One).unwrap();
            assert!(legal.contains(&picked));
            assert_eq!(b.select_move(&board, Side::One).unwrap(), picked);
        }
    }

    #[test]
    fn test_greedy_prefers_promotion_then_capture() {
        // 2 . 2
        // . 1 .
        // 1 . 1
        let board = Board::deserialize("202010101", 3).unwrap();
        let mut greedy = Greedy::new(Some(1));
        for _ in 0..10 {
            let picked = greedy.select_move(&board, Side::One).unwrap();
            assert_eq!(picked.from, Position::new(1, 1));
        }

        // . 2 .
        // 1 . .
        // . . .    player two can capture at (1,0) but nothing promotes yet
        let board = Board::deserialize("020100000", 3).unwrap();
        let picked = greedy.select_move(&board, Side::Two).unwrap();
        assert_eq!(picked, mv(0, 1, 1, 0));
    }

    #[test]
    fn test_factory_builds_each_kind() {
        let board = Board::default();
        for kind in StrategyKind::ALL {
            let mut strategy = create_strategy(kind, Some(3));
            let picked = strategy.select_move(&board, Side::One).unwrap();
            assert!(board.get_legal_moves(Side::One).contains(&picked));
        }
    }
}
