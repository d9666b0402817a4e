//! Headless game loop: one agent plays one board to completion.

use crate::ai::MinesweeperAi;
use crate::board::Board;
use crate::config::GameConfig;
use crate::error::{ConfigError, KnowledgeError};
use crate::moves::MoveKind;
use crate::rng::GameRng;
use crate::types::Cell;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameResult {
    Won,
    Lost,
}

/// Result of a finished game.
#[derive(Debug, Clone, Serialize)]
pub struct GameOutcome {
    pub result: GameResult,
    /// Revealed cells in the order they were played.
    pub moves: Vec<Cell>,
    /// How many of `moves` were random guesses.
    pub guesses: usize,
    /// The mine that ended the game, if any.
    pub exploded: Option<Cell>,
}

/// Errors from a simulated game.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("invalid game config: {0}")]
    Config(#[from] ConfigError),

    #[error("agent and board disagree on dimensions")]
    DimensionMismatch,

    #[error("knowledge base rejected an observation: {0}")]
    Knowledge(#[from] KnowledgeError),
}

/// Play `ai` against `board` until it hits a mine or clears the board.
pub fn play(board: &Board, ai: &mut MinesweeperAi) -> Result<GameOutcome, GameError> {
    if board.dimensions() != ai.dimensions() {
        return Err(GameError::DimensionMismatch);
    }
    let dims = board.dimensions();
    let safe_cells = dims.area() - board.mines().len();

    let mut moves = Vec::new();
    let mut guesses = 0usize;

    loop {
        let cleared = ai.moves_made().len() == safe_cells;
        let flagged = !board.mines().is_empty() && board.won(ai.mines());
        if cleared || flagged {
            info!(moves = moves.len(), guesses, "game won");
            return Ok(GameOutcome {
                result: GameResult::Won,
                moves,
                guesses,
                exploded: None,
            });
        }

        let Some(next) = ai.next_move() else {
            // Only mines are left unplayed, so every safe cell was revealed.
            info!(moves = moves.len(), guesses, "no moves left");
            return Ok(GameOutcome {
                result: GameResult::Won,
                moves,
                guesses,
                exploded: None,
            });
        };
        if next.kind == MoveKind::Random {
            guesses += 1;
        }
        moves.push(next.cell);

        if board.is_mine(next.cell) {
            info!(cell = %next.cell, moves = moves.len(), guesses, "game lost");
            return Ok(GameOutcome {
                result: GameResult::Lost,
                moves,
                guesses,
                exploded: Some(next.cell),
            });
        }

        let count = board.nearby_mines(next.cell);
        debug!(cell = %next.cell, count, kind = ?next.kind, "revealed");
        ai.add_knowledge(next.cell, count)?;
    }
}

/// Generate a board from `config` and play a fresh agent on it.
pub fn simulate(config: &GameConfig) -> Result<GameOutcome, GameError> {
    let mut rng = GameRng::from_optional_seed(config.seed);
    let board = Board::new(config, &mut rng)?;
    let mut ai = MinesweeperAi::with_rng(config.height, config.width, rng);
    play(&board, &mut ai)
}
