//! Random source for mine placement and the agent's guesses.
//!
//! Backed by `SmallRng`; on wasm32 the entropy seed comes through `getrandom`
//! with the `wasm_js` backend.

use rand::rngs::SmallRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};

use crate::types::{Cell, Dimensions};

/// Shared by the board and the agent. A fixed seed replays the same game.
#[derive(Debug, Clone)]
pub struct GameRng {
    inner: SmallRng,
}

impl GameRng {
    pub fn new() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::from_seed)
    }

    /// Uniform in `0..bound`. `bound` must be non-zero.
    #[inline]
    pub fn below(&mut self, bound: usize) -> usize {
        self.inner.random_range(0..bound)
    }

    /// Any cell of a non-empty board, uniformly.
    pub fn cell_in(&mut self, dims: Dimensions) -> Cell {
        Cell::new(self.below(dims.height), self.below(dims.width))
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.inner)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new()
    }
}
