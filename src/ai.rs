//! Knowledge base of the Minesweeper agent.
//!
//! Every revealed cell becomes a [`Sentence`] over its still-unknown
//! neighbors. Two rules are applied together until nothing changes:
//! - Trivial rule: `count == 0` makes every cell safe, `count == |cells|`
//!   makes every cell a mine.
//! - Subset rule: if `A.cells ⊂ B.cells` then `B.cells \ A.cells` holds
//!   exactly `B.count - A.count` mines.
//!
//! No probabilities and no general integer solving are involved.

use crate::error::KnowledgeError;
use crate::rng::GameRng;
use crate::sentence::Sentence;
use crate::types::{Cell, Dimensions};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, trace, warn};

/// What the knowledge base currently knows about a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CellState {
    Unknown,
    Safe,
    Mine,
}

/// The agent: fact sets plus the sentences they were derived from.
///
/// Invariants: `mines` and `safes` are disjoint, `moves_made ⊆ safes`, and
/// every cell of every stored sentence is still unknown.
#[derive(Debug, Clone)]
pub struct MinesweeperAi {
    pub(crate) dims: Dimensions,
    pub(crate) moves_made: BTreeSet<Cell>,
    pub(crate) safes: BTreeSet<Cell>,
    pub(crate) mines: BTreeSet<Cell>,
    pub(crate) knowledge: Vec<Sentence>,
    pub(crate) rng: GameRng,
}

impl MinesweeperAi {
    pub fn new(height: usize, width: usize) -> Self {
        Self::with_rng(height, width, GameRng::new())
    }

    /// Agent whose random moves come from `rng` (seed it for replays).
    pub fn with_rng(height: usize, width: usize, rng: GameRng) -> Self {
        Self {
            dims: Dimensions::new(height, width),
            moves_made: BTreeSet::new(),
            safes: BTreeSet::new(),
            mines: BTreeSet::new(),
            knowledge: Vec::new(),
            rng,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn moves_made(&self) -> &BTreeSet<Cell> {
        &self.moves_made
    }

    pub fn safes(&self) -> &BTreeSet<Cell> {
        &self.safes
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn knowledge(&self) -> &[Sentence] {
        &self.knowledge
    }

    pub fn cell_state(&self, cell: Cell) -> CellState {
        if self.mines.contains(&cell) {
            CellState::Mine
        } else if self.safes.contains(&cell) {
            CellState::Safe
        } else {
            CellState::Unknown
        }
    }

    /// Record `cell` as a mine and remove it from every sentence.
    pub fn mark_mine(&mut self, cell: Cell) -> Result<(), KnowledgeError> {
        if self.mines.contains(&cell) {
            return Ok(());
        }
        if self.safes.contains(&cell) || !self.knowledge.iter().all(|s| s.admits_mine(cell)) {
            return Err(KnowledgeError::Contradiction { cell });
        }
        trace!(cell = %cell, "marking mine");
        self.mines.insert(cell);
        for sentence in &mut self.knowledge {
            sentence.mark_mine(cell);
        }
        Ok(())
    }

    /// Record `cell` as safe and remove it from every sentence.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<(), KnowledgeError> {
        if self.safes.contains(&cell) {
            return Ok(());
        }
        if self.mines.contains(&cell) || !self.knowledge.iter().all(|s| s.admits_safe(cell)) {
            return Err(KnowledgeError::Contradiction { cell });
        }
        trace!(cell = %cell, "marking safe");
        self.safes.insert(cell);
        for sentence in &mut self.knowledge {
            sentence.mark_safe(cell);
        }
        Ok(())
    }

    /// Ingest a revealed cell and the number of mines around it, then
    /// propagate until no further fact or sentence can be derived.
    ///
    /// Invalid input is rejected before anything is recorded. Reporting a
    /// cell that was already played is a no-op. If propagation runs into a
    /// contradiction the knowledge base is rolled back to its prior state.
    pub fn add_knowledge(&mut self, cell: Cell, count: usize) -> Result<(), KnowledgeError> {
        if !self.dims.contains(cell) {
            warn!(cell = %cell, "observation outside the board");
            return Err(KnowledgeError::OutOfBounds {
                cell,
                height: self.dims.height,
                width: self.dims.width,
            });
        }
        let neighbors = self.dims.neighbor_count(cell);
        if count > neighbors {
            warn!(cell = %cell, count, neighbors, "observation exceeds neighbor count");
            return Err(KnowledgeError::CountTooLarge { cell, count, neighbors });
        }
        if self.moves_made.contains(&cell) {
            debug!(cell = %cell, "cell already played, ignoring");
            return Ok(());
        }
        if self.mines.contains(&cell) {
            return Err(KnowledgeError::Contradiction { cell });
        }

        let unplayed = self
            .dims
            .neighbors(cell)
            .filter(|n| !self.moves_made.contains(n));
        let sentence = Sentence::new(unplayed, count).map_err(|_| KnowledgeError::Inconsistent {
            sentence: format!("{} = {}", cell, count),
        })?;
        let sentence = self.reduce(sentence)?;
        debug!(cell = %cell, count, sentence = %sentence, "adding observation");

        self.atomically(|ai| {
            ai.mark_safe(cell)?;
            ai.moves_made.insert(cell);
            ai.knowledge.push(sentence);
            ai.infer()?;
            Ok(())
        })
    }

    /// Add a constraint learned from outside the board's clues.
    pub fn add_sentence(&mut self, sentence: Sentence) -> Result<(), KnowledgeError> {
        if let Some(&cell) = sentence.cells().iter().find(|&&c| !self.dims.contains(c)) {
            return Err(KnowledgeError::OutOfBounds {
                cell,
                height: self.dims.height,
                width: self.dims.width,
            });
        }
        let sentence = self.reduce(sentence)?;
        debug!(sentence = %sentence, "adding sentence");
        self.atomically(|ai| {
            ai.knowledge.push(sentence);
            ai.infer()?;
            Ok(())
        })
    }

    /// Apply `update`, restoring the fact sets and sentences if it fails.
    fn atomically<F>(&mut self, update: F) -> Result<(), KnowledgeError>
    where
        F: FnOnce(&mut Self) -> Result<(), KnowledgeError>,
    {
        let moves_made = self.moves_made.clone();
        let safes = self.safes.clone();
        let mines = self.mines.clone();
        let knowledge = self.knowledge.clone();

        if let Err(err) = update(self) {
            warn!(error = %err, "rolling back knowledge base");
            self.moves_made = moves_made;
            self.safes = safes;
            self.mines = mines;
            self.knowledge = knowledge;
            return Err(err);
        }
        Ok(())
    }

    /// Run trivial marking and subset inference together until a full pass
    /// produces neither a new fact nor a new sentence.
    ///
    /// Returns whether anything changed; a converged knowledge base returns `false`.
    pub fn infer(&mut self) -> Result<bool, KnowledgeError> {
        let mut changed_any = false;
        let mut passes = 0usize;

        loop {
            passes += 1;
            let mut changed = self.mark_known_cells()?;
            self.prune()?;

            // Compare snapshots only, never a sentence mutated in this pass.
            let snapshot = self.knowledge.clone();
            let mut derived: Vec<Sentence> = Vec::new();
            for (i, a) in snapshot.iter().enumerate() {
                for b in &snapshot[i + 1..] {
                    if let Some(sentence) = a.subtract(b)? {
                        if !snapshot.contains(&sentence) && !derived.contains(&sentence) {
                            trace!(from = %a, and = %b, derived = %sentence, "subset inference");
                            derived.push(sentence);
                        }
                    }
                }
            }
            if !derived.is_empty() {
                self.knowledge.extend(derived);
                changed = true;
            }

            if !changed {
                break;
            }
            changed_any = true;
        }

        debug!(
            passes,
            sentences = self.knowledge.len(),
            safes = self.safes.len(),
            mines = self.mines.len(),
            "inference converged"
        );
        Ok(changed_any)
    }

    /// Apply the trivial rule to every sentence. Returns whether a new fact was recorded.
    fn mark_known_cells(&mut self) -> Result<bool, KnowledgeError> {
        let mut safe_cells = BTreeSet::new();
        let mut mine_cells = BTreeSet::new();
        for sentence in &self.knowledge {
            if let Some(cells) = sentence.known_safes() {
                safe_cells.extend(cells.iter().copied());
            }
            if let Some(cells) = sentence.known_mines() {
                mine_cells.extend(cells.iter().copied());
            }
        }

        let mut changed = false;
        for cell in safe_cells {
            if !self.safes.contains(&cell) {
                self.mark_safe(cell)?;
                changed = true;
            }
        }
        for cell in mine_cells {
            if !self.mines.contains(&cell) {
                self.mark_mine(cell)?;
                changed = true;
            }
        }
        Ok(changed)
    }

    /// Drop trivial sentences and exact duplicates, keeping first occurrences.
    ///
    /// Two sentences over the same cells with different counts cannot both hold.
    fn prune(&mut self) -> Result<(), KnowledgeError> {
        let keep = {
            let mut seen: HashMap<&BTreeSet<Cell>, usize> = HashMap::new();
            let mut keep = Vec::with_capacity(self.knowledge.len());
            for sentence in &self.knowledge {
                if sentence.is_trivial() {
                    keep.push(false);
                    continue;
                }
                match seen.entry(sentence.cells()) {
                    Entry::Occupied(e) => {
                        if *e.get() != sentence.count() {
                            return Err(KnowledgeError::inconsistent(sentence));
                        }
                        keep.push(false);
                    }
                    Entry::Vacant(e) => {
                        e.insert(sentence.count());
                        keep.push(true);
                    }
                }
            }
            keep
        };

        let mut keep = keep.into_iter();
        self.knowledge.retain(|_| keep.next().unwrap_or(false));
        Ok(())
    }

    /// Strip cells whose status is already known so the sentence only
    /// mentions unknown cells.
    fn reduce(&self, mut sentence: Sentence) -> Result<Sentence, KnowledgeError> {
        let known: Vec<Cell> = sentence
            .cells()
            .iter()
            .filter(|c| self.mines.contains(c) || self.safes.contains(c))
            .copied()
            .collect();

        for cell in known {
            if self.mines.contains(&cell) {
                if !sentence.admits_mine(cell) {
                    return Err(KnowledgeError::inconsistent(&sentence));
                }
                sentence.mark_mine(cell);
            } else {
                if !sentence.admits_safe(cell) {
                    return Err(KnowledgeError::inconsistent(&sentence));
                }
                sentence.mark_safe(cell);
            }
        }
        Ok(sentence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: usize, col: usize) -> Cell {
        Cell::new(row, col)
    }

    fn assert_invariants(ai: &MinesweeperAi) {
        assert!(ai.mines.is_disjoint(&ai.safes));
        assert!(ai.moves_made.is_subset(&ai.safes));
        for sentence in &ai.knowledge {
            assert!(sentence.count() <= sentence.cells().len());
            for cell in sentence.cells() {
                assert_eq!(ai.cell_state(*cell), CellState::Unknown);
            }
        }
    }

    #[test]
    fn test_zero_sentence_marks_all_safe() {
        let mut ai = MinesweeperAi::new(4, 4);
        ai.add_sentence(Sentence::new([c(2, 2), c(2, 3)], 0).unwrap()).unwrap();
        assert!(ai.safes().contains(&c(2, 2)));
        assert!(ai.safes().contains(&c(2, 3)));
        assert!(ai.knowledge().is_empty());
        assert_invariants(&ai);
    }

    #[test]
    fn test_subset_rule_isolates_mine() {
        let mut ai = MinesweeperAi::new(4, 4);
        let (a, b, cc) = (c(0, 0), c(0, 1), c(0, 2));
        ai.add_sentence(Sentence::new([a, b, cc], 2).unwrap()).unwrap();
        assert!(ai.mines().is_empty());
        ai.add_sentence(Sentence::new([a, b], 1).unwrap()).unwrap();
        assert_eq!(ai.mines(), &BTreeSet::from([cc]));
        assert_eq!(ai.cell_state(a), CellState::Unknown);
        assert_invariants(&ai);
    }

    #[test]
    fn test_corner_zero_reveals_neighbors() {
        let mut ai = MinesweeperAi::new(4, 4);
        ai.add_knowledge(c(0, 0), 0).unwrap();
        for cell in [c(0, 1), c(1, 0), c(1, 1)] {
            assert!(ai.safes().contains(&cell), "{} should be safe", cell);
        }
        assert!(ai.moves_made().contains(&c(0, 0)));
        assert_invariants(&ai);
    }

    #[test]
    fn test_scenario_isolates_true_mine() {
        // Single mine at (0, 2) on a 4x4 board.
        let mut ai = MinesweeperAi::new(4, 4);
        ai.add_knowledge(c(0, 0), 0).unwrap();
        ai.add_knowledge(c(0, 1), 1).unwrap();
        assert!(ai
            .knowledge()
            .contains(&Sentence::new([c(0, 2), c(1, 2)], 1).unwrap()));

        ai.add_knowledge(c(1, 1), 1).unwrap();
        for cell in [c(2, 0), c(2, 1), c(2, 2)] {
            assert!(ai.safes().contains(&cell));
        }
        assert!(ai.mines().is_empty());

        ai.add_knowledge(c(2, 1), 0).unwrap();
        assert_eq!(ai.mines(), &BTreeSet::from([c(0, 2)]));
        assert!(ai.safes().contains(&c(1, 2)));
        assert_invariants(&ai);
    }

    #[test]
    fn test_infer_is_idempotent_after_convergence() {
        let mut ai = MinesweeperAi::new(4, 4);
        ai.add_knowledge(c(0, 0), 0).unwrap();
        ai.add_knowledge(c(0, 1), 1).unwrap();
        ai.add_knowledge(c(1, 1), 1).unwrap();

        let knowledge = ai.knowledge().to_vec();
        let safes = ai.safes().clone();
        let mines = ai.mines().clone();
        assert!(!ai.infer().unwrap());
        assert_eq!(ai.knowledge(), knowledge.as_slice());
        assert_eq!(ai.safes(), &safes);
        assert_eq!(ai.mines(), &mines);
    }

    #[test]
    fn test_known_mines_reduce_new_sentence() {
        let mut ai = MinesweeperAi::new(3, 3);
        ai.mark_mine(c(0, 1)).unwrap();
        // (0,0) sees (0,1), (1,0), (1,1); one mine is already known.
        ai.add_knowledge(c(0, 0), 1).unwrap();
        assert!(ai.safes().contains(&c(1, 0)));
        assert!(ai.safes().contains(&c(1, 1)));
        assert_invariants(&ai);
    }

    #[test]
    fn test_rejects_out_of_bounds() {
        let mut ai = MinesweeperAi::new(4, 4);
        let err = ai.add_knowledge(c(4, 0), 0).unwrap_err();
        assert!(matches!(err, KnowledgeError::OutOfBounds { .. }));
        assert!(ai.moves_made().is_empty());
    }

    #[test]
    fn test_rejects_count_above_neighbors() {
        let mut ai = MinesweeperAi::new(4, 4);
        let err = ai.add_knowledge(c(0, 0), 4).unwrap_err();
        assert_eq!(
            err,
            KnowledgeError::CountTooLarge {
                cell: c(0, 0),
                count: 4,
                neighbors: 3
            }
        );
        assert!(ai.safes().is_empty());
    }

    #[test]
    fn test_rejects_revealing_known_mine() {
        let mut ai = MinesweeperAi::new(4, 4);
        ai.mark_mine(c(1, 1)).unwrap();
        assert_eq!(
            ai.add_knowledge(c(1, 1), 0),
            Err(KnowledgeError::Contradiction { cell: c(1, 1) })
        );
    }

    #[test]
    fn test_mark_safe_on_mine_is_contradiction() {
        let mut ai = MinesweeperAi::new(4, 4);
        ai.mark_mine(c(2, 2)).unwrap();
        assert!(ai.mark_safe(c(2, 2)).is_err());
        assert!(!ai.safes().contains(&c(2, 2)));
    }

    #[test]
    fn test_conflicting_observations_are_reported() {
        let mut ai = MinesweeperAi::new(4, 4);
        ai.add_knowledge(c(0, 0), 0).unwrap();
        // (0,1) and (1,0) are known safe, so (1,1) claiming 8 is impossible on
        // its remaining unknown neighbors.
        let err = ai.add_knowledge(c(1, 1), 8).unwrap_err();
        assert!(matches!(err, KnowledgeError::Inconsistent { .. }));
    }

    #[test]
    fn test_contradiction_rolls_back_state() {
        let mut ai = MinesweeperAi::new(3, 3);
        ai.add_knowledge(c(0, 0), 1).unwrap();
        let moves = ai.moves_made().clone();
        let safes = ai.safes().clone();
        let mines = ai.mines().clone();
        let knowledge = ai.knowledge().to_vec();

        // A zero at (0,1) clears every candidate for the mine next to (0,0).
        assert_eq!(
            ai.add_knowledge(c(0, 1), 0),
            Err(KnowledgeError::Contradiction { cell: c(1, 1) })
        );
        assert_eq!(ai.moves_made(), &moves);
        assert_eq!(ai.safes(), &safes);
        assert_eq!(ai.mines(), &mines);
        assert_eq!(ai.knowledge(), knowledge.as_slice());

        // The agent keeps working after the rejected observation.
        ai.add_knowledge(c(2, 2), 0).unwrap();
        assert!(ai.safes().contains(&c(1, 1)));
        assert!(ai
            .knowledge()
            .contains(&Sentence::new([c(0, 1), c(1, 0)], 1).unwrap()));
        assert_invariants(&ai);
    }

    #[test]
    fn test_conflicting_sentence_rolls_back() {
        let mut ai = MinesweeperAi::new(4, 4);
        ai.add_sentence(Sentence::new([c(3, 3), c(3, 2)], 1).unwrap()).unwrap();
        let knowledge = ai.knowledge().to_vec();
        let err = ai
            .add_sentence(Sentence::new([c(3, 3), c(3, 2)], 2).unwrap())
            .unwrap_err();
        assert_eq!(err, KnowledgeError::Contradiction { cell: c(3, 3) });
        assert_eq!(ai.knowledge(), knowledge.as_slice());
        assert!(ai.mines().is_empty());
    }

    #[test]
    fn test_replaying_played_cell_is_noop() {
        let mut ai = MinesweeperAi::new(4, 4);
        ai.add_knowledge(c(0, 0), 0).unwrap();
        let before = ai.knowledge().to_vec();
        ai.add_knowledge(c(0, 0), 0).unwrap();
        assert_eq!(ai.knowledge(), before.as_slice());
        assert_eq!(ai.moves_made().len(), 1);
    }
}
