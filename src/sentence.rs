//! The knowledge unit: "exactly `count` of these `cells` are mines".

use crate::error::KnowledgeError;
use crate::types::Cell;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// A logical statement about the board.
///
/// Invariant: `count <= cells.len()`. The only mutations are [`Sentence::mark_mine`]
/// and [`Sentence::mark_safe`], both of which preserve it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Sentence {
    cells: BTreeSet<Cell>,
    count: usize,
}

impl Sentence {
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: usize) -> Result<Self, KnowledgeError> {
        let cells: BTreeSet<Cell> = cells.into_iter().collect();
        if count > cells.len() {
            return Err(KnowledgeError::InvalidSentence {
                cells: cells.len(),
                count,
            });
        }
        Ok(Self { cells, count })
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// True once every cell has been resolved; such a sentence carries no information.
    pub fn is_trivial(&self) -> bool {
        self.cells.is_empty()
    }

    /// All remaining cells, if every one of them must be a mine.
    pub fn known_mines(&self) -> Option<&BTreeSet<Cell>> {
        (self.cells.len() == self.count).then_some(&self.cells)
    }

    /// All remaining cells, if none of them can be a mine.
    pub fn known_safes(&self) -> Option<&BTreeSet<Cell>> {
        (self.count == 0).then_some(&self.cells)
    }

    /// Whether `cell` being a mine is consistent with this sentence.
    pub fn admits_mine(&self, cell: Cell) -> bool {
        !self.cells.contains(&cell) || self.count > 0
    }

    /// Whether `cell` being safe is consistent with this sentence.
    pub fn admits_safe(&self, cell: Cell) -> bool {
        !self.cells.contains(&cell) || self.count < self.cells.len()
    }

    /// Drop `cell` from the sentence knowing it is a mine. No-op if absent.
    ///
    /// Callers check [`Sentence::admits_mine`] first; the count never underflows.
    pub fn mark_mine(&mut self, cell: Cell) {
        if self.cells.remove(&cell) {
            self.count = self.count.saturating_sub(1);
        }
    }

    /// Drop `cell` from the sentence knowing it is safe. No-op if absent.
    pub fn mark_safe(&mut self, cell: Cell) {
        self.cells.remove(&cell);
    }

    /// Subset rule: if one sentence's cells strictly contain the other's, the
    /// difference holds exactly the difference of their counts.
    ///
    /// Returns `Ok(None)` when neither cell set strictly contains the other.
    pub fn subtract(&self, other: &Sentence) -> Result<Option<Sentence>, KnowledgeError> {
        let (outer, inner) = if other.cells.len() < self.cells.len() && other.cells.is_subset(&self.cells) {
            (self, other)
        } else if self.cells.len() < other.cells.len() && self.cells.is_subset(&other.cells) {
            (other, self)
        } else {
            return Ok(None);
        };

        let cells: BTreeSet<Cell> = outer.cells.difference(&inner.cells).copied().collect();
        match outer.count.checked_sub(inner.count) {
            Some(count) if count <= cells.len() => Ok(Some(Sentence { cells, count })),
            _ => Err(KnowledgeError::inconsistent(outer)),
        }
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", cell)?;
        }
        write!(f, "}} = {}", self.count)
    }
}
