//! Knowledge-based Minesweeper agent.
//!
//! The agent keeps propositional "sentences" about the board (exactly N of
//! these cells are mines) and resolves them with set reasoning to find safe
//! moves. WASM exports wrap the agent for JavaScript callers; cells cross the
//! boundary as `{ row, col }` objects and `cellStates` is a flat row-major
//! `Int8Array` (`-1` unknown, `0` safe, `1` mine).

pub mod ai;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod moves;
pub mod rng;
pub mod sentence;
pub mod types;

pub use ai::{CellState, MinesweeperAi};
pub use board::Board;
pub use config::GameConfig;
pub use error::{ConfigError, KnowledgeError};
pub use game::{play, simulate, GameError, GameOutcome, GameResult};
pub use moves::{Move, MoveKind};
pub use rng::GameRng;
pub use sentence::Sentence;
pub use types::{Cell, Dimensions};

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use wasm_bindgen::prelude::*;
    use crate::ai::{CellState, MinesweeperAi};
    use crate::config::GameConfig;
    use crate::game;
    use crate::rng::GameRng;
    use crate::types::Cell;

    /// Knowledge-based agent handle for JavaScript.
    #[wasm_bindgen(js_name = "Agent")]
    pub struct WasmAgent {
        inner: MinesweeperAi,
    }

    #[wasm_bindgen(js_class = "Agent")]
    impl WasmAgent {
        #[wasm_bindgen(constructor)]
        pub fn new(height: usize, width: usize) -> WasmAgent {
            WasmAgent { inner: MinesweeperAi::new(height, width) }
        }

        /// Agent with deterministic random moves.
        #[wasm_bindgen(js_name = "withSeed")]
        pub fn with_seed(height: usize, width: usize, seed: u64) -> WasmAgent {
            WasmAgent { inner: MinesweeperAi::with_rng(height, width, GameRng::from_seed(seed)) }
        }

        /// Feed a revealed cell and its neighbor mine count. Throws on invalid input.
        #[wasm_bindgen(js_name = "addKnowledge")]
        pub fn add_knowledge(&mut self, row: usize, col: usize, count: usize) -> Result<(), JsError> {
            self.inner.add_knowledge(Cell::new(row, col), count)?;
            Ok(())
        }

        /// Returns `{ row, col }` or `null`.
        #[wasm_bindgen(js_name = "makeSafeMove")]
        pub fn make_safe_move(&self) -> Result<JsValue, JsError> {
            Ok(serde_wasm_bindgen::to_value(&self.inner.make_safe_move())?)
        }

        /// Returns `{ row, col }` or `null`.
        #[wasm_bindgen(js_name = "makeRandomMove")]
        pub fn make_random_move(&mut self) -> Result<JsValue, JsError> {
            Ok(serde_wasm_bindgen::to_value(&self.inner.make_random_move())?)
        }

        /// Returns `{ cell: { row, col }, kind: "Safe" | "Random" }` or `null`.
        #[wasm_bindgen(js_name = "nextMove")]
        pub fn next_move(&mut self) -> Result<JsValue, JsError> {
            Ok(serde_wasm_bindgen::to_value(&self.inner.next_move())?)
        }

        pub fn mines(&self) -> Result<JsValue, JsError> {
            Ok(serde_wasm_bindgen::to_value(self.inner.mines())?)
        }

        pub fn safes(&self) -> Result<JsValue, JsError> {
            Ok(serde_wasm_bindgen::to_value(self.inner.safes())?)
        }

        /// Current sentences as `{ cells, count }` objects.
        pub fn knowledge(&self) -> Result<JsValue, JsError> {
            Ok(serde_wasm_bindgen::to_value(self.inner.knowledge())?)
        }

        #[wasm_bindgen(js_name = "cellStates")]
        pub fn cell_states(&self) -> js_sys::Int8Array {
            let dims = self.inner.dimensions();
            let mut states = vec![-1i8; dims.area()];
            for cell in dims.cells() {
                states[dims.index(cell)] = match self.inner.cell_state(cell) {
                    CellState::Unknown => -1,
                    CellState::Safe => 0,
                    CellState::Mine => 1,
                };
            }

            let arr = js_sys::Int8Array::new_with_length(states.len() as u32);
            arr.copy_from(&states);
            arr
        }
    }

    /// Play a full game on a random board.
    /// Takes `{ height, width, mines, seed? }`, returns the game outcome object.
    #[wasm_bindgen(js_name = "simulateGame")]
    pub fn wasm_simulate_game(config: JsValue) -> Result<JsValue, JsError> {
        let config: GameConfig = serde_wasm_bindgen::from_value(config)?;
        let outcome = game::simulate(&config)?;
        Ok(serde_wasm_bindgen::to_value(&outcome)?)
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM agent ready".to_string()
    }
}
