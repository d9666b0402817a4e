//! The game board the agent plays against: mine placement and clue counts.
//!
//! The knowledge base never reads this; it only sees `(cell, nearby_mines)`
//! observations handed over by the game driver.

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::rng::GameRng;
use crate::types::{Cell, Dimensions};
use std::collections::BTreeSet;
use tracing::debug;

/// True mine layout of one game.
#[derive(Debug, Clone)]
pub struct Board {
    dims: Dimensions,
    mines: BTreeSet<Cell>,
}

impl Board {
    /// Place `config.mines` mines uniformly at random.
    pub fn new(config: &GameConfig, rng: &mut GameRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let dims = config.dimensions();
        let mines = place_mines_random(dims, config.mines, rng);
        debug!(height = dims.height, width = dims.width, mines = mines.len(), "board generated");
        Ok(Self { dims, mines })
    }

    /// Board with a fixed layout. Out-of-bounds cells are rejected.
    pub fn from_mines(
        dims: Dimensions,
        mines: impl IntoIterator<Item = Cell>,
    ) -> Result<Self, ConfigError> {
        let mines: BTreeSet<Cell> = mines.into_iter().collect();
        if let Some(cell) = mines.iter().find(|&&c| !dims.contains(c)) {
            return Err(ConfigError::Validation(format!(
                "mine {} is outside the {}x{} board",
                cell, dims.height, dims.width
            )));
        }
        Ok(Self { dims, mines })
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    #[inline(always)]
    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    /// Number of mines among the in-bounds neighbors of `cell`, not counting `cell` itself.
    pub fn nearby_mines(&self, cell: Cell) -> usize {
        self.dims.neighbors(cell).filter(|n| self.is_mine(*n)).count()
    }

    /// A game is won when the flagged cells are exactly the mines.
    pub fn won(&self, flagged: &BTreeSet<Cell>) -> bool {
        *flagged == self.mines
    }
}

/// Rejection-sample `count` distinct mine cells. Callers guarantee `count < area`.
fn place_mines_random(dims: Dimensions, count: usize, rng: &mut GameRng) -> BTreeSet<Cell> {
    let mut mines = BTreeSet::new();
    while mines.len() < count {
        mines.insert(rng.cell_in(dims));
    }
    mines
}
