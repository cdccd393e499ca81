//! Reachable-state enumeration ("matchboxes")
//!
//! Walks every position reachable from a starting board and records the legal
//! moves of the side to move. External learners use the table to seed one
//! matchbox per position.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::board::{Board, Move, Side};
use crate::error::BoardError;
use crate::game::check_winner;

/// A non-terminal position and every legal move in it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    pub board: String,
    pub to_move: Side,
    pub moves: Vec<Move>,
}

/// All reachable non-terminal positions, in depth-first discovery order
#[derive(Clone, Debug, Serialize)]
pub struct StateTable {
    size: usize,
    entries: Vec<StateEntry>,
    #[serde(skip)]
    index: FxHashMap<(String, Side), usize>,
}

impl StateTable {
    /// Enumerate from the standard starting board with player one to move
    pub fn from_start(size: usize) -> Result<Self, BoardError> {
        Ok(Self::enumerate(&Board::new(size)?, Side::One))
    }

    /// Exhaustive depth-first walk with an explicit stack. A position is the
    /// board string plus the side to move; each is visited once. Children are
    /// pushed in reverse so moves are explored in generation order.
    pub fn enumerate(initial: &Board, first: Side) -> Self {
        let mut entries = Vec::new();
        let mut index = FxHashMap::default();
        let mut seen: FxHashSet<(String, Side)> = FxHashSet::default();
        let mut stack = vec![(initial.clone(), first)];

        while let Some((board, to_move)) = stack.pop() {
            let key = (board.serialize(), to_move);
            if !seen.insert(key.clone()) {
                continue;
            }

            let moves = board.get_legal_moves(to_move);
            if moves.is_empty() {
                continue;
            }

            for mv in moves.iter().rev() {
                let mut next = board.clone();
                next.move_piece(mv.from, mv.to);
                if check_winner(&next, to_move).is_none() {
                    stack.push((next, to_move.opponent()));
                }
            }

            index.insert(key.clone(), entries.len());
            entries.push(StateEntry {
                board: key.0,
                to_move,
                moves,
            });
        }

        tracing::debug!(states = entries.len(), "Enumerated reachable states");

        Self {
            size: initial.size(),
            entries,
            index,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[StateEntry] {
        &self.entries
    }

    /// Legal moves for `to_move` on the encoded board, if reachable
    pub fn get(&self, board: &str, to_move: Side) -> Option<&[Move]> {
        self.index
            .get(&(board.to_string(), to_move))
            .map(|&i| self.entries[i].moves.as_slice())
    }

    /// Positions where `side` is to move (one matchbox per entry)
    pub fn for_side(&self, side: Side) -> impl Iterator<Item = &StateEntry> + '_ {
        self.entries.iter().filter(move |entry| entry.to_move == side)
    }
}
