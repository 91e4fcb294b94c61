//! Browser bindings
//!
//! The page owns the animation frame loop and feeds elapsed time into
//! `WebBattle::advance`; everything it draws comes from `snapshot_json`.
//! The page keeps the economy, so the battle hands its result to a JS
//! callback.

use std::time::Duration;

use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::clock::BattleClock;
use crate::economy::HostReporter;
use crate::highscores::SurvivalBoard;
use crate::settings::Settings;
use crate::sim::{Battle, BattleOutcome, DefenseSnapshot};

/// Longest frame gap we accept from the host (a backgrounded tab)
const MAX_FRAME_MS: f64 = 1_000.0;

type JsNotify = Box<dyn FnMut(BattleOutcome, u32)>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Night Siege (web) ready");
}

#[wasm_bindgen]
pub struct WebBattle {
    clock: BattleClock<HostReporter<JsNotify>>,
    settings: Settings,
}

#[wasm_bindgen]
impl WebBattle {
    /// `defense_json` is `{"tower_level", "archers", "wall_health"}`.
    /// `on_end(outcome, remaining_wall_health)` runs once when the night
    /// is decided, never after `cancel`.
    #[wasm_bindgen(constructor)]
    pub fn new(defense_json: &str, streak: u32, seed: u64, on_end: Function) -> Result<WebBattle, JsError> {
        let defense: DefenseSnapshot = serde_json::from_str(defense_json)?;
        let settings = Settings::load();
        let battle = Battle::new(defense, streak, settings.timing(), seed);

        let notify: JsNotify = Box::new(move |outcome, wall_health| {
            let outcome = JsValue::from_str(outcome.as_str());
            if let Err(e) = on_end.call2(&JsValue::NULL, &outcome, &JsValue::from(wall_health)) {
                log::error!("Battle end callback threw: {:?}", e);
            }
        });
        let reporter = HostReporter::new(&defense, streak, SurvivalBoard::load(), notify);

        Ok(Self {
            clock: BattleClock::new(battle, reporter),
            settings,
        })
    }

    /// Feed frame time. Returns false once the battle has stopped.
    pub fn advance(&mut self, elapsed_ms: f64) -> bool {
        let elapsed_ms = if elapsed_ms.is_finite() {
            elapsed_ms.clamp(0.0, MAX_FRAME_MS)
        } else {
            0.0
        };
        self.clock.advance(Duration::from_secs_f64(elapsed_ms / 1000.0));
        self.clock.is_running()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn snapshot_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.clock.snapshot())?)
    }

    /// Events since the last call, as a JSON array
    pub fn events_json(&mut self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.clock.drain_events())?)
    }

    /// Wall impact shake, with the player's motion preferences applied
    pub fn shake_active(&self) -> bool {
        self.settings.shake_active(&self.clock.snapshot())
    }

    /// `{"outcome", "remaining_wall_health"}` once the battle is over
    pub fn result_json(&self) -> Option<String> {
        let result = self.clock.battle().result()?;
        serde_json::to_string(&result).ok()
    }

    /// Leave the battle screen without a result
    pub fn cancel(&mut self) {
        self.clock.cancel();
    }
}

/// Stored survival leaderboard as a JSON array, best first
#[wasm_bindgen]
pub fn survival_board_json() -> Result<String, JsError> {
    Ok(serde_json::to_string(&SurvivalBoard::load())?)
}

#[wasm_bindgen]
pub fn settings_json() -> Result<String, JsError> {
    Ok(serde_json::to_string(&Settings::load())?)
}

/// Validate and store settings; the next battle picks them up
#[wasm_bindgen]
pub fn save_settings(json: &str) -> Result<(), JsError> {
    let settings = Settings::from_json(json)?;
    settings.save();
    Ok(())
}
