//! Move selection on top of the knowledge base.

use crate::ai::MinesweeperAi;
use crate::types::Cell;
use serde::Serialize;

/// Which selector produced a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoveKind {
    /// Known to be safe.
    Safe,
    /// Unconstrained guess among untried, unflagged cells.
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Move {
    pub cell: Cell,
    pub kind: MoveKind,
}

impl MinesweeperAi {
    /// The first (row-major) cell known to be safe that has not been played yet.
    ///
    /// Reads `safes` and `moves_made` only.
    pub fn make_safe_move(&self) -> Option<Cell> {
        self.safes.difference(&self.moves_made).next().copied()
    }

    /// A uniformly random cell that is neither played nor a known mine.
    ///
    /// Advances the agent's RNG but none of its fact sets.
    pub fn make_random_move(&mut self) -> Option<Cell> {
        let candidates: Vec<Cell> = self
            .dims
            .cells()
            .filter(|c| !self.moves_made.contains(c) && !self.mines.contains(c))
            .collect();
        self.rng.choose(&candidates).copied()
    }

    /// Safe move when one exists, otherwise a guess.
    pub fn next_move(&mut self) -> Option<Move> {
        if let Some(cell) = self.make_safe_move() {
            return Some(Move { cell, kind: MoveKind::Safe });
        }
        self.make_random_move().map(|cell| Move { cell, kind: MoveKind::Random })
    }
}
