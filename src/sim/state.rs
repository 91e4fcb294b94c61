//! Battle state and core simulation types
//!
//! A [`Battle`] is the single owner of everything that changes during a
//! night. Presenters read it through snapshots; nothing outside `sim`
//! mutates it except by ticking.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::rng::{self, Dice};
use super::spawn::Spawner;
use crate::consts::*;

/// Battle-unique entity id, never reused within a battle
pub type EntityId = u64;
use crate::error::DefenseError;

/// Defense stats handed over by the economy at battle start.
///
/// Only constructible through validation, so a battle never starts with a
/// dead wall or a level-0 tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDefense")]
pub struct DefenseSnapshot {
    tower_level: u32,
    archers: u32,
    wall_health: u32,
}

/// Unvalidated defense stats, as they arrive over the wire
#[derive(Debug, Clone, Copy, Deserialize)]
struct RawDefense {
    tower_level: i64,
    archers: i64,
    wall_health: i64,
}

impl TryFrom<RawDefense> for DefenseSnapshot {
    type Error = DefenseError;

    fn try_from(raw: RawDefense) -> Result<Self, Self::Error> {
        Self::from_raw(raw.tower_level, raw.archers, raw.wall_health)
    }
}

impl DefenseSnapshot {
    pub fn new(tower_level: u32, archers: u32, wall_health: u32) -> Result<Self, DefenseError> {
        if tower_level == 0 {
            return Err(DefenseError::InvalidTowerLevel(0));
        }
        if wall_health == 0 {
            return Err(DefenseError::NonPositiveWallHealth(0));
        }
        Ok(Self {
            tower_level,
            archers,
            wall_health,
        })
    }

    /// Validate signed input (JSON, command line)
    pub fn from_raw(tower_level: i64, archers: i64, wall_health: i64) -> Result<Self, DefenseError> {
        if tower_level < 1 {
            return Err(DefenseError::InvalidTowerLevel(tower_level));
        }
        if archers < 0 {
            return Err(DefenseError::NegativeArchers(archers));
        }
        if wall_health < 1 {
            return Err(DefenseError::NonPositiveWallHealth(wall_health));
        }
        let narrow = |field: &'static str, value: i64| {
            u32::try_from(value).map_err(|_| DefenseError::OutOfRange { field, value })
        };
        Self::new(
            narrow("tower_level", tower_level)?,
            narrow("archers", archers)?,
            narrow("wall_health", wall_health)?,
        )
    }

    pub fn tower_level(&self) -> u32 {
        self.tower_level
    }

    pub fn archers(&self) -> u32 {
        self.archers
    }

    pub fn wall_health(&self) -> u32 {
        self.wall_health
    }
}

/// Attacker categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackerKind {
    Regular,
    /// Slow, thick-skinned
    Reinforced,
    /// One per night at most
    Boss,
}

impl AttackerKind {
    pub fn is_boss(self) -> bool {
        self == AttackerKind::Boss
    }

    pub fn max_hp(self, base_hp: u32) -> u32 {
        match self {
            AttackerKind::Regular => base_hp,
            AttackerKind::Reinforced => base_hp.saturating_mul(REINFORCED_HP_MULT),
            AttackerKind::Boss => base_hp.saturating_mul(BOSS_HP_MULT),
        }
    }

    pub fn speed(self, base_speed: f32) -> f32 {
        match self {
            AttackerKind::Regular => base_speed,
            AttackerKind::Reinforced => base_speed * REINFORCED_SPEED_MULT,
            AttackerKind::Boss => base_speed * BOSS_SPEED_MULT,
        }
    }

    /// The boss is a bigger target
    pub fn hit_radius(self) -> f32 {
        if self.is_boss() {
            BOSS_HIT_RADIUS
        } else {
            HIT_RADIUS
        }
    }
}

/// An entity walking toward the wall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attacker {
    pub id: EntityId,
    /// Axis position: 100 at the spawn edge, decreasing toward the wall
    pub position: f32,
    /// Always in `1..=max_hp` while the attacker is in the registry
    pub hp: u32,
    pub max_hp: u32,
    /// Axis units per tick
    pub speed: f32,
    pub kind: AttackerKind,
}

impl Attacker {
    pub fn is_boss(&self) -> bool {
        self.kind.is_boss()
    }

    /// Whether an arrow tip at `tip` is inside this attacker's hitbox
    pub fn in_hitbox(&self, tip: f32) -> bool {
        self.position < tip && self.position > tip - self.kind.hit_radius()
    }

    /// Apply one arrow. Survivors other than the boss get knocked back.
    pub fn take_hit(&mut self, damage: u32) {
        self.hp = self.hp.saturating_sub(damage);
        if self.hp > 0 && !self.is_boss() {
            self.position = (self.position + KNOCKBACK).min(SPAWN_EDGE);
        }
    }
}

/// An arrow flying from the archers toward the spawn edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    /// `x` is the battle axis, `y` is a cosmetic lane height
    pub pos: Vec2,
}

/// Live attackers and projectiles of one battle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRegistry {
    pub(crate) attackers: Vec<Attacker>,
    pub(crate) projectiles: Vec<Projectile>,
    next_id: EntityId,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            attackers: Vec::new(),
            projectiles: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an attacker at the spawn edge with full health
    pub fn spawn_attacker(&mut self, kind: AttackerKind, max_hp: u32, speed: f32) -> EntityId {
        self.place_attacker(kind, max_hp, speed, SPAWN_EDGE)
    }

    /// Add an attacker at an arbitrary position with full health
    pub fn place_attacker(&mut self, kind: AttackerKind, max_hp: u32, speed: f32, position: f32) -> EntityId {
        debug_assert!(
            !(kind.is_boss() && self.boss().is_some()),
            "only one boss may be on the field"
        );
        let id = self.next_entity_id();
        let max_hp = max_hp.max(1);
        self.attackers.push(Attacker {
            id,
            position,
            hp: max_hp,
            max_hp,
            speed,
            kind,
        });
        id
    }

    /// Add an arrow at the archers' position
    pub fn spawn_projectile(&mut self, lane: f32) -> EntityId {
        self.place_projectile(ARCHER_MUZZLE, lane)
    }

    pub fn place_projectile(&mut self, x: f32, lane: f32) -> EntityId {
        let id = self.next_entity_id();
        self.projectiles.push(Projectile {
            id,
            pos: Vec2::new(x, lane),
        });
        id
    }

    pub fn attackers(&self) -> &[Attacker] {
        &self.attackers
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn attacker(&self, id: EntityId) -> Option<&Attacker> {
        self.attackers.iter().find(|a| a.id == id)
    }

    pub fn remove_attacker(&mut self, id: EntityId) -> Option<Attacker> {
        let idx = self.attackers.iter().position(|a| a.id == id)?;
        Some(self.attackers.remove(idx))
    }

    pub fn remove_projectile(&mut self, id: EntityId) -> Option<Projectile> {
        let idx = self.projectiles.iter().position(|p| p.id == id)?;
        Some(self.projectiles.remove(idx))
    }

    pub fn boss(&self) -> Option<&Attacker> {
        self.attackers.iter().find(|a| a.is_boss())
    }

    pub fn is_empty(&self) -> bool {
        self.attackers.is_empty() && self.projectiles.is_empty()
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.attackers.sort_by_key(|a| a.id);
        self.projectiles.sort_by_key(|p| p.id);
    }
}

/// How a night ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleOutcome {
    Won,
    Lost,
}

impl BattleOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            BattleOutcome::Won => "won",
            BattleOutcome::Lost => "lost",
        }
    }
}

/// Terminal payload, created once and never changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleResult {
    pub outcome: BattleOutcome,
    pub remaining_wall_health: u32,
}

/// Battle state machine: `Playing -> Won | Lost`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    Playing,
    Won,
    Lost,
}

impl BattlePhase {
    pub fn is_terminal(self) -> bool {
        self != BattlePhase::Playing
    }

    /// Terminal check run at the start of every tick. A dead wall loses
    /// even if the clock ran out on the same tick.
    pub fn evaluate(wall_health: u32, remaining_ticks: u32) -> Option<BattleResult> {
        if wall_health == 0 {
            Some(BattleResult {
                outcome: BattleOutcome::Lost,
                remaining_wall_health: 0,
            })
        } else if remaining_ticks == 0 {
            Some(BattleResult {
                outcome: BattleOutcome::Won,
                remaining_wall_health: wall_health,
            })
        } else {
            None
        }
    }
}

impl From<BattleOutcome> for BattlePhase {
    fn from(outcome: BattleOutcome) -> Self {
        match outcome {
            BattleOutcome::Won => BattlePhase::Won,
            BattleOutcome::Lost => BattlePhase::Lost,
        }
    }
}

/// Things that happened during a tick, for sounds and effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BattleEvent {
    BossIncoming { attacker_id: EntityId, max_hp: u32 },
    WallBreached { attacker_id: EntityId, kind: AttackerKind, damage: u32, wall_health: u32 },
    AttackerHit { attacker_id: EntityId, hp: u32 },
    AttackerSlain { attacker_id: EntityId, kind: AttackerKind },
    Ended(BattleResult),
}

/// Battle timing in whole ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleTiming {
    pub tick_ms: u32,
    /// Ticks in a full night
    pub total_ticks: u32,
    /// The boss spawns once fewer ticks than this remain
    pub boss_trigger_ticks: u32,
    pub boss_warning_ticks: u32,
    pub impact_flash_ticks: u32,
}

impl Default for BattleTiming {
    fn default() -> Self {
        Self::from_millis(
            TICK_MS,
            BATTLE_DURATION_MS,
            BOSS_TRIGGER_MS,
            BOSS_WARNING_MS,
            IMPACT_FLASH_MS,
        )
    }
}

impl BattleTiming {
    /// Convert millisecond durations into tick counts. `tick_ms` is
    /// clamped to at least 1 and display timers last at least one tick.
    pub fn from_millis(
        tick_ms: u32,
        duration_ms: u32,
        boss_trigger_ms: u32,
        boss_warning_ms: u32,
        impact_flash_ms: u32,
    ) -> Self {
        let tick_ms = tick_ms.max(1);
        Self {
            tick_ms,
            total_ticks: duration_ms / tick_ms,
            boss_trigger_ticks: boss_trigger_ms / tick_ms,
            boss_warning_ticks: (boss_warning_ms / tick_ms).max(1),
            impact_flash_ticks: (impact_flash_ms / tick_ms).max(1),
        }
    }

    pub fn ticks_to_secs(&self, ticks: u32) -> f32 {
        (ticks as u64 * self.tick_ms as u64) as f32 / 1000.0
    }
}

/// One night of combat
#[derive(Debug, Clone)]
pub struct Battle<D = Pcg32> {
    pub(crate) seed: Option<u64>,
    pub(crate) defense: DefenseSnapshot,
    pub(crate) difficulty: Difficulty,
    pub(crate) timing: BattleTiming,
    pub(crate) phase: BattlePhase,
    pub(crate) result: Option<BattleResult>,
    /// Owned exclusively by the battle until it ends
    pub(crate) wall_health: u32,
    pub(crate) remaining_ticks: u32,
    pub(crate) elapsed_ticks: u64,
    pub(crate) registry: EntityRegistry,
    pub(crate) spawner: Spawner,
    /// Display countdowns, zero when inactive
    pub(crate) boss_warning_ticks: u32,
    pub(crate) impact_ticks: u32,
    pub(crate) events: Vec<BattleEvent>,
    pub(crate) dice: D,
}

impl Battle<Pcg32> {
    /// Create a seeded battle
    pub fn new(defense: DefenseSnapshot, streak: u32, timing: BattleTiming, seed: u64) -> Self {
        let mut battle = Self::with_dice(defense, streak, timing, rng::seeded(seed));
        battle.seed = Some(seed);
        battle
    }
}

impl<D: Dice> Battle<D> {
    /// Create a battle drawing from a custom random source
    pub fn with_dice(defense: DefenseSnapshot, streak: u32, timing: BattleTiming, dice: D) -> Self {
        let difficulty = Difficulty::new(defense.tower_level(), streak);
        log::info!(
            "Night begins: tower level {}, {} archers, wall {}, streak {}{}",
            defense.tower_level(),
            defense.archers(),
            defense.wall_health(),
            streak,
            if difficulty.boss_eligible { " (boss night)" } else { "" }
        );

        Self {
            seed: None,
            defense,
            difficulty,
            timing,
            phase: BattlePhase::Playing,
            result: None,
            wall_health: defense.wall_health(),
            remaining_ticks: timing.total_ticks,
            elapsed_ticks: 0,
            registry: EntityRegistry::new(),
            spawner: Spawner::new(difficulty, defense.archers(), timing.boss_trigger_ticks),
            boss_warning_ticks: 0,
            impact_ticks: 0,
            events: Vec::new(),
            dice,
        }
    }

    /// Advance one fixed tick. Returns the result once the battle is over.
    pub fn tick(&mut self) -> Option<BattleResult> {
        super::tick::tick(self)
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn defense(&self) -> &DefenseSnapshot {
        &self.defense
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    pub fn timing(&self) -> &BattleTiming {
        &self.timing
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn result(&self) -> Option<BattleResult> {
        self.result
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn wall_health(&self) -> u32 {
        self.wall_health
    }

    pub fn remaining_ticks(&self) -> u32 {
        self.remaining_ticks
    }

    pub fn remaining_secs(&self) -> f32 {
        self.timing.ticks_to_secs(self.remaining_ticks)
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn boss_spawned(&self) -> bool {
        self.spawner.boss_spawned()
    }

    pub fn boss_warning_active(&self) -> bool {
        self.boss_warning_ticks > 0
    }

    pub fn wall_impact_active(&self) -> bool {
        self.impact_ticks > 0
    }
}
