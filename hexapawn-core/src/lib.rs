//! Hexapawn Core - Game engine and players
//!
//! This crate provides the core game logic for Hexapawn:
//! - Square board with digit-string encoding and pawn move generation
//! - Game controller with promotion / no-move win detection
//! - Player trait over console humans and strategy-driven agents
//! - Built-in agent strategies selected by name
//! - Reachable-state enumeration for external learners
//! - JSON game configuration

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod player;
pub mod states;
pub mod strategy;

// Re-exports for convenient access
pub use board::{Board, Move, Position, Side, DEFAULT_BOARD_SIZE};
pub use config::{GameConfig, PlayerConfig, PlayerKind};
pub use error::{BoardError, ConfigError, ParseMoveError, StrategyError};
pub use game::{check_winner, Game, GameOutcome, GameStatus, HistoryEntry, Termination, WinReason};
pub use player::{console_human, AgentPlayer, Decision, HumanPlayer, Player, PromptStream};
pub use states::{StateEntry, StateTable};
pub use strategy::{create_strategy, Strategy, StrategyKind};
