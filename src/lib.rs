//! Night Siege - the night battle of a study-quiz tower defense game
//!
//! Core modules:
//! - `sim`: Deterministic battle simulation (spawning, movement, collisions, outcome)
//! - `clock`: Fixed-interval driver that runs a battle and reports its result once
//! - `economy`: In-memory economy collaborator (energy, shop, survival streak)
//! - `highscores`: Survival streak leaderboard
//! - `settings`: Battle timing and presentation preferences

pub mod clock;
pub mod economy;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;
mod storage;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use clock::{BattleClock, BattleReporter, ClockState, LogReporter};
pub use economy::{DefenseLedger, HostReporter, ShopItem};
pub use error::{DefenseError, SettingsError, ShopError};
pub use highscores::SurvivalBoard;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (25 Hz)
    pub const TICK_MS: u32 = 40;
    /// Maximum ticks per `advance` call to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Length of one night
    pub const BATTLE_DURATION_MS: u32 = 30_000;
    /// The boss shows up once less than this much of the night remains
    pub const BOSS_TRIGGER_MS: u32 = 15_000;
    /// "Boss incoming" banner lifetime
    pub const BOSS_WARNING_MS: u32 = 3_000;
    /// Screen shake / red flash lifetime after a wall hit
    pub const IMPACT_FLASH_MS: u32 = 400;

    /// Battlefield axis: attackers enter at 100 and walk toward 0
    pub const SPAWN_EDGE: f32 = 100.0;
    /// Attackers at or below this position have reached the wall
    pub const WALL_LINE: f32 = 8.0;
    /// Where arrows leave the archers
    pub const ARCHER_MUZZLE: f32 = 15.0;
    /// Arrow speed (axis units per tick)
    pub const PROJECTILE_SPEED: f32 = 4.0;
    /// Cosmetic arrow lane band (height above ground, percent)
    pub const LANE_MIN: f32 = 25.0;
    pub const LANE_SPAN: f32 = 20.0;

    /// Hitbox depth behind an arrow tip
    pub const HIT_RADIUS: f32 = 6.0;
    pub const BOSS_HIT_RADIUS: f32 = 15.0;
    /// Damage per arrow
    pub const SHOT_DAMAGE: u32 = 1;
    /// Push-back for non-boss attackers that survive a hit
    pub const KNOCKBACK: f32 = 2.0;

    /// Per-archer chance of loosing an arrow each tick
    pub const ARCHER_FIRE_CHANCE: f32 = 0.08;
    /// Chance that a spawned attacker is reinforced
    pub const REINFORCED_CHANCE: f32 = 0.1;
    pub const REINFORCED_HP_MULT: u32 = 3;
    pub const REINFORCED_SPEED_MULT: f32 = 0.5;
    pub const BOSS_HP_MULT: u32 = 20;
    pub const BOSS_SPEED_MULT: f32 = 0.4;

    /// Wall damage: flat for the boss, per tower level for everyone else
    pub const BOSS_WALL_DAMAGE: u32 = 100;
    pub const WALL_DAMAGE_PER_LEVEL: u32 = 10;

    /// Consecutive survived nights before the boss comes
    pub const BOSS_STREAK: u32 = 3;
}
