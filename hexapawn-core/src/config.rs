//! Game configuration, loadable from JSON

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Side, DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::error::ConfigError;
use crate::game::{Game, DEFAULT_MAX_RETRIES};
use crate::player::{console_human, AgentPlayer, Player, PromptStream};
use crate::strategy::{create_strategy, StrategyKind};

/// How a seat is controlled
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlayerKind {
    Human,
    Agent {
        strategy: StrategyKind,
        #[serde(default)]
        seed: Option<u64>,
    },
}

/// One seat at the table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    pub kind: PlayerKind,
}

impl PlayerConfig {
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PlayerKind::Human,
        }
    }

    pub fn agent(name: impl Into<String>, strategy: StrategyKind, seed: Option<u64>) -> Self {
        Self {
            name: name.into(),
            kind: PlayerKind::Agent { strategy, seed },
        }
    }

    /// Humans are wired to stdin/stdout
    pub fn build(&self) -> Box<dyn Player> {
        self.build_with_prompts(PromptStream::Stdout)
    }

    /// Humans read stdin and prompt on `prompts`
    pub fn build_with_prompts(&self, prompts: PromptStream) -> Box<dyn Player> {
        match &self.kind {
            PlayerKind::Human => console_human(self.name.clone(), prompts),
            PlayerKind::Agent { strategy, seed } => Box::new(AgentPlayer::new(
                self.name.clone(),
                create_strategy(*strategy, *seed),
            )),
        }
    }
}

/// Top-level game configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_size: usize,
    pub max_retries: u32,
    pub starting_side: Side,
    /// Custom starting position as a board string
    pub initial_board: Option<String>,
    pub players: [PlayerConfig; 2],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            starting_side: Side::One,
            initial_board: None,
            players: [
                PlayerConfig::human("Player 1"),
                PlayerConfig::agent("Computer", StrategyKind::Greedy, None),
            ],
        }
    }
}

impl GameConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(ConfigError::Validation(format!(
                "board_size must be in {}..={}",
                MIN_BOARD_SIZE, MAX_BOARD_SIZE
            )));
        }
        if self.max_retries == 0 {
            return Err(ConfigError::Validation("max_retries must be >= 1".into()));
        }
        if self.players.iter().any(|p| p.name.trim().is_empty()) {
            return Err(ConfigError::Validation("player names must not be empty".into()));
        }
        self.board()?;
        Ok(())
    }

    /// Starting board: the custom position if given, else the standard one
    pub fn board(&self) -> Result<Board, ConfigError> {
        let board = match &self.initial_board {
            Some(s) => Board::deserialize(s, self.board_size)?,
            None => Board::new(self.board_size)?,
        };
        Ok(board)
    }

    /// Build a ready-to-play game from this configuration
    pub fn build_game(&self) -> Result<Game, ConfigError> {
        self.build_game_with_prompts(PromptStream::Stdout)
    }

    /// Same as [`GameConfig::build_game`], with human prompts on `prompts`
    pub fn build_game_with_prompts(&self, prompts: PromptStream) -> Result<Game, ConfigError> {
        self.validate()?;
        let [one, two] = &self.players;
        Ok(Game::new(
            one.build_with_prompts(prompts),
            two.build_with_prompts(prompts),
        )
            .with_board(self.board()?)
            .with_starting_side(self.starting_side)
            .with_max_retries(self.max_retries))
    }
}
