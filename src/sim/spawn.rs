//! Spawning of attackers, the boss, and arrows
//!
//! Runs once per tick, always in the same order: boss, then a regular or
//! reinforced attacker, then an arrow. The order of dice draws is part of
//! the determinism contract, so don't reorder the rolls.

use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::rng::Dice;
use super::state::{AttackerKind, EntityId, EntityRegistry};
use crate::consts::*;

/// What the spawner added this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpawnReport {
    /// Boss id, on the one tick the boss arrives
    pub boss: Option<EntityId>,
    pub attacker: Option<(EntityId, AttackerKind)>,
    pub projectile: Option<EntityId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    difficulty: Difficulty,
    archers: u32,
    boss_trigger_ticks: u32,
    boss_spawned: bool,
}

impl Spawner {
    pub fn new(difficulty: Difficulty, archers: u32, boss_trigger_ticks: u32) -> Self {
        Self {
            difficulty,
            archers,
            boss_trigger_ticks,
            boss_spawned: false,
        }
    }

    /// Whether the boss has arrived this battle (it never comes twice)
    pub fn boss_spawned(&self) -> bool {
        self.boss_spawned
    }

    pub fn spawn(
        &mut self,
        registry: &mut EntityRegistry,
        dice: &mut impl Dice,
        remaining_ticks: u32,
    ) -> SpawnReport {
        SpawnReport {
            boss: self.spawn_boss(registry, remaining_ticks),
            attacker: self.spawn_attacker(registry, dice),
            projectile: self.spawn_projectile(registry, dice),
        }
    }

    fn spawn_boss(&mut self, registry: &mut EntityRegistry, remaining_ticks: u32) -> Option<EntityId> {
        if !self.difficulty.boss_eligible
            || self.boss_spawned
            || remaining_ticks >= self.boss_trigger_ticks
        {
            return None;
        }
        self.boss_spawned = true;

        let kind = AttackerKind::Boss;
        Some(registry.spawn_attacker(
            kind,
            kind.max_hp(self.difficulty.attacker_hp),
            kind.speed(self.difficulty.attacker_speed),
        ))
    }

    fn spawn_attacker(
        &mut self,
        registry: &mut EntityRegistry,
        dice: &mut impl Dice,
    ) -> Option<(EntityId, AttackerKind)> {
        if dice.roll() >= self.difficulty.spawn_rate {
            return None;
        }
        let kind = if dice.roll() < REINFORCED_CHANCE {
            AttackerKind::Reinforced
        } else {
            AttackerKind::Regular
        };
        let id = registry.spawn_attacker(
            kind,
            kind.max_hp(self.difficulty.attacker_hp),
            kind.speed(self.difficulty.attacker_speed),
        );
        Some((id, kind))
    }

    fn spawn_projectile(&mut self, registry: &mut EntityRegistry, dice: &mut impl Dice) -> Option<EntityId> {
        if self.archers == 0 {
            return None;
        }
        if dice.roll() >= ARCHER_FIRE_CHANCE * self.archers as f32 {
            return None;
        }
        let lane = LANE_MIN + dice.roll() * LANE_SPAN;
        Some(registry.spawn_projectile(lane))
    }
}
