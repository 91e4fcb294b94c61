//! Battle settings and preferences
//!
//! Persisted in LocalStorage on the web; read from a JSON file on native.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::{BattleSnapshot, BattleTiming};
use crate::storage;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Battle timing ===
    /// Fixed tick interval in milliseconds
    pub tick_ms: u32,
    /// Length of a night in milliseconds
    pub battle_ms: u32,
    /// The boss comes once less than this much of the night remains
    pub boss_trigger_ms: u32,
    pub boss_warning_ms: u32,
    pub impact_flash_ms: u32,

    // === Visual Effects ===
    /// Screen shake on wall hits
    pub screen_shake: bool,

    // === Accessibility ===
    /// Reduced motion (minimize shake, flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            battle_ms: BATTLE_DURATION_MS,
            boss_trigger_ms: BOSS_TRIGGER_MS,
            boss_warning_ms: BOSS_WARNING_MS,
            impact_flash_ms: IMPACT_FLASH_MS,
            screen_shake: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Environment variable naming a native settings file
    pub const ENV_PATH: &'static str = "NIGHT_SIEGE_SETTINGS";

    const STORAGE_KEY: &'static str = "night_siege_settings";

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_ms == 0 {
            return Err(SettingsError::Invalid("tick_ms must be positive"));
        }
        if self.battle_ms < self.tick_ms {
            return Err(SettingsError::Invalid("battle must last at least one tick"));
        }
        if self.boss_trigger_ms > self.battle_ms {
            return Err(SettingsError::Invalid("boss trigger is longer than the battle"));
        }
        Ok(())
    }

    /// Battle timing in ticks
    pub fn timing(&self) -> BattleTiming {
        BattleTiming::from_millis(
            self.tick_ms,
            self.battle_ms,
            self.boss_trigger_ms,
            self.boss_warning_ms,
            self.impact_flash_ms,
        )
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Whether the presenter should shake the screen for this frame
    pub fn shake_active(&self, snapshot: &BattleSnapshot) -> bool {
        snapshot.wall_impact && self.effective_screen_shake()
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        if let Some(json) = storage::read(Self::STORAGE_KEY) {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring stored settings: {}", e),
            }
        }
        log::info!("Using default settings");
        Self::default()
    }

    /// Persist to LocalStorage (no-op on native)
    pub fn save(&self) {
        match serde_json::to_string(self) {
            Ok(json) => {
                storage::write(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Settings not saved: {}", e),
        }
    }

    /// Load from the file named by `NIGHT_SIEGE_SETTINGS`, if any
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(Self::ENV_PATH) else {
            return Self::default();
        };
        match Self::load_file(std::path::Path::new(&path)) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.to_string_lossy());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
