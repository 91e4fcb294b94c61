//! Deterministic battle simulation
//!
//! All combat logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, timers or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod movement;
pub mod rng;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod wall;

pub use collision::{Hit, resolve_collisions};
pub use difficulty::{Difficulty, base_attacker_hp, base_attacker_speed, boss_eligible, spawn_rate};
pub use rng::{Dice, seeded};
pub use snapshot::{AttackerView, BattleSnapshot, HealthBand, ProjectileView, WallCondition};
pub use spawn::{SpawnReport, Spawner};
pub use state::{
    Attacker, AttackerKind, Battle, BattleEvent, BattleOutcome, BattlePhase, BattleResult,
    BattleTiming, DefenseSnapshot, EntityId, EntityRegistry, Projectile,
};
pub use tick::tick;
pub use wall::{Breach, resolve_breaches};
