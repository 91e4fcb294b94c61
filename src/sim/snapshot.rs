//! Read-only battle snapshots for presenters
//!
//! Copied out after a tick completes, so a renderer never sees a
//! half-finished tick and can't mutate the battle.

use serde::{Deserialize, Serialize};

use super::rng::Dice;
use super::state::{AttackerKind, Battle, BattlePhase, BattleResult, EntityId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackerView {
    pub id: EntityId,
    pub position: f32,
    pub hp: u32,
    pub max_hp: u32,
    pub kind: AttackerKind,
    pub is_boss: bool,
}

impl AttackerView {
    /// Health bars are only drawn for attackers that can take more than one arrow
    pub fn shows_health_bar(&self) -> bool {
        self.max_hp > 1
    }

    pub fn health_fraction(&self) -> f32 {
        self.hp as f32 / self.max_hp.max(1) as f32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: EntityId,
    pub x: f32,
    /// Cosmetic lane height
    pub lane: f32,
}

/// Wall sprite state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallCondition {
    Intact,
    /// Below 30 health
    Crumbling,
    Burning,
}

/// Wall health bar color band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthBand {
    /// Above 60%
    Healthy,
    /// Above 30%
    Wounded,
    Critical,
}

/// Everything a presenter needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub phase: BattlePhase,
    pub wall_health: u32,
    /// Wall health at the start of the night
    pub starting_wall_health: u32,
    pub remaining_secs: f32,
    pub elapsed_ticks: u64,
    pub boss_night: bool,
    /// "Boss incoming" banner visible
    pub boss_warning: bool,
    /// Screen shake / red flash visible
    pub wall_impact: bool,
    pub archers: u32,
    pub attackers: Vec<AttackerView>,
    pub projectiles: Vec<ProjectileView>,
    pub result: Option<BattleResult>,
}

impl BattleSnapshot {
    pub fn wall_condition(&self) -> WallCondition {
        if self.wall_health == 0 {
            WallCondition::Burning
        } else if self.wall_health < 30 {
            WallCondition::Crumbling
        } else {
            WallCondition::Intact
        }
    }

    /// Wall health relative to the start of the night, in percent
    pub fn health_percent(&self) -> f32 {
        self.wall_health as f32 / self.starting_wall_health.max(1) as f32 * 100.0
    }

    pub fn health_band(&self) -> HealthBand {
        let percent = self.health_percent();
        if percent > 60.0 {
            HealthBand::Healthy
        } else if percent > 30.0 {
            HealthBand::Wounded
        } else {
            HealthBand::Critical
        }
    }

    /// Whole seconds shown on the countdown
    pub fn countdown(&self) -> u32 {
        self.remaining_secs.ceil() as u32
    }
}

impl<D: Dice> Battle<D> {
    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            phase: self.phase,
            wall_health: self.wall_health,
            starting_wall_health: self.defense.wall_health(),
            remaining_secs: self.remaining_secs(),
            elapsed_ticks: self.elapsed_ticks,
            boss_night: self.difficulty.boss_eligible,
            boss_warning: self.boss_warning_active(),
            wall_impact: self.wall_impact_active(),
            archers: self.defense.archers(),
            attackers: self
                .registry
                .attackers()
                .iter()
                .map(|a| AttackerView {
                    id: a.id,
                    position: a.position,
                    hp: a.hp,
                    max_hp: a.max_hp,
                    kind: a.kind,
                    is_boss: a.is_boss(),
                })
                .collect(),
            projectiles: self
                .registry
                .projectiles()
                .iter()
                .map(|p| ProjectileView {
                    id: p.id,
                    x: p.pos.x,
                    lane: p.pos.y,
                })
                .collect(),
            result: self.result,
        }
    }
}
