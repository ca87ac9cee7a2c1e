//! Minesweeper round engine with a rule-based opponent.
//!
//! The [`board::Grid`] holds cells and places mines around a safe first
//! click, [`game::GameState`] runs a round (reveal cascade, flags, win/loss),
//! and [`solver::Solver`] plays turns through the same actions a person
//! would. [`duel::Duel`] alternates the two.
//!
//! On wasm32 the engine is exported to JavaScript as the `Game` class. Grids
//! are row-major: `cells[row * size + col]`.

pub mod board;
pub mod config;
pub mod duel;
pub mod error;
pub mod game;
pub mod pattern;
pub mod rng;
pub mod solver;
pub mod types;

pub use board::Grid;
pub use config::GameConfig;
pub use duel::{Duel, Side};
pub use error::{EngineError, Result};
pub use game::{GameState, Snapshot};
pub use rng::GameRng;
pub use solver::{Actions, Solver};
pub use types::{ActionOutcome, Cell, Coord, Decision, Difficulty, FlagToggle, Intent, Phase};

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use wasm_bindgen::prelude::*;
    use crate::config::GameConfig;
    use crate::duel::Duel;
    use crate::error::EngineError;

    fn js_error(err: EngineError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    /// A round against the optional solver.
    ///
    /// Constructed from a config object `{ size, mine_count, difficulty, seed }`;
    /// every field is optional.
    #[wasm_bindgen(js_name = "Game")]
    pub struct WasmGame {
        duel: Duel,
    }

    #[wasm_bindgen(js_class = "Game")]
    impl WasmGame {
        #[wasm_bindgen(constructor)]
        pub fn new(config: JsValue) -> Result<WasmGame, JsValue> {
            let config: GameConfig = if config.is_undefined() || config.is_null() {
                GameConfig::default()
            } else {
                serde_wasm_bindgen::from_value(config)?
            };
            let duel = Duel::from_config(&config).map_err(js_error)?;
            Ok(WasmGame { duel })
        }

        /// Reveal for the player. Returns the newly revealed `[row, col]` pairs.
        pub fn reveal(&mut self, row: usize, col: usize) -> Result<JsValue, JsValue> {
            let cells = self.duel.player_reveal(row, col).map_err(js_error)?;
            Ok(serde_wasm_bindgen::to_value(&cells)?)
        }

        /// +1 placed, -1 removed, 0 rejected.
        #[wasm_bindgen(js_name = "toggleFlag")]
        pub fn toggle_flag(&mut self, row: usize, col: usize) -> Result<i8, JsValue> {
            let toggle = self.duel.player_flag(row, col).map_err(js_error)?;
            Ok(toggle.delta())
        }

        /// Play the solver's turn. Returns the decisions it applied.
        #[wasm_bindgen(js_name = "aiTurn")]
        pub fn ai_turn(&mut self) -> Result<JsValue, JsValue> {
            let decisions = self.duel.solver_turn().map_err(js_error)?;
            Ok(serde_wasm_bindgen::to_value(&decisions)?)
        }

        pub fn reset(&mut self, mine_count: usize) -> Result<(), JsValue> {
            self.duel.reset(mine_count).map_err(js_error)
        }

        /// Returns JS object: `{ state, turn, winner }`.
        pub fn snapshot(&self) -> Result<JsValue, JsValue> {
            let obj = js_sys::Object::new();
            let state = serde_wasm_bindgen::to_value(&self.duel.game().snapshot())?;
            js_sys::Reflect::set(&obj, &"state".into(), &state)?;
            let turn = serde_wasm_bindgen::to_value(&self.duel.turn())?;
            js_sys::Reflect::set(&obj, &"turn".into(), &turn)?;
            let winner = serde_wasm_bindgen::to_value(&self.duel.winner())?;
            js_sys::Reflect::set(&obj, &"winner".into(), &winner)?;
            Ok(obj.into())
        }

        /// Row-major visible values: -1 hidden, -2 flagged, 0-8 revealed, 9 mine.
        #[wasm_bindgen(js_name = "visibleCells")]
        pub fn visible_cells(&self) -> js_sys::Int8Array {
            let values: Vec<i8> = self
                .duel
                .game()
                .grid()
                .cells()
                .iter()
                .map(|c| c.visible_value())
                .collect();
            let arr = js_sys::Int8Array::new_with_length(values.len() as u32);
            arr.copy_from(&values);
            arr
        }
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM engine ready".to_string()
    }
}
