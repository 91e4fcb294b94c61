//! Difficulty scaling
//!
//! Pure functions of tower level and survival streak. A stronger tower
//! earns a harder night: more attackers, tougher and faster.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Per-battle difficulty, fixed when the battle is built
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Tower level the numbers were derived from (>= 1)
    pub level: u32,
    /// Chance per tick that a regular or reinforced attacker spawns
    pub spawn_rate: f32,
    /// HP of a regular attacker
    pub attacker_hp: u32,
    /// Speed of a regular attacker (axis units per tick)
    pub attacker_speed: f32,
    /// Whether the boss comes tonight
    pub boss_eligible: bool,
}

impl Difficulty {
    pub fn new(level: u32, streak: u32) -> Self {
        let level = level.max(1);
        Self {
            level,
            spawn_rate: spawn_rate(level),
            attacker_hp: base_attacker_hp(level),
            attacker_speed: base_attacker_speed(level),
            boss_eligible: boss_eligible(streak),
        }
    }

    /// Damage dealt to the wall by an attacker that reaches it.
    /// The boss hits for a flat amount; everyone else scales with level.
    pub fn wall_damage(&self, is_boss: bool) -> u32 {
        if is_boss {
            BOSS_WALL_DAMAGE
        } else {
            WALL_DAMAGE_PER_LEVEL.saturating_mul(self.level)
        }
    }
}

pub fn spawn_rate(level: u32) -> f32 {
    0.04 + level as f32 * 0.01
}

/// `ceil(level ^ 1.3)`
pub fn base_attacker_hp(level: u32) -> u32 {
    (level.max(1) as f64).powf(1.3).ceil() as u32
}

pub fn base_attacker_speed(level: u32) -> f32 {
    0.7 + level as f32 * 0.1
}

pub fn boss_eligible(streak: u32) -> bool {
    streak >= BOSS_STREAK
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_attacker_hp_curve() {
        assert_eq!(base_attacker_hp(1), 1);
        assert_eq!(base_attacker_hp(2), 3);
        assert_eq!(base_attacker_hp(5), 9);
        assert_eq!(base_attacker_hp(10), 20);
    }

    #[test]
    fn test_level_clamped_to_one() {
        let d = Difficulty::new(0, 0);
        assert_eq!(d.level, 1);
        assert_eq!(d.attacker_hp, 1);
        assert!((d.spawn_rate - 0.05).abs() < 1e-6);
        assert!((d.attacker_speed - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_boss_needs_three_nights() {
        assert!(!Difficulty::new(5, 2).boss_eligible);
        assert!(Difficulty::new(5, 3).boss_eligible);
        assert!(Difficulty::new(1, 10).boss_eligible);
    }

    #[test]
    fn test_wall_damage() {
        let d = Difficulty::new(10, 0);
        assert_eq!(d.wall_damage(false), 100);
        assert_eq!(d.wall_damage(true), BOSS_WALL_DAMAGE);
        assert_eq!(Difficulty::new(1, 0).wall_damage(false), 10);
    }

    proptest! {
        #[test]
        fn prop_hp_is_ceiling_of_power(level in 1u32..500) {
            // hp is the smallest integer at or above level^1.3
            let hp = base_attacker_hp(level) as f64;
            let power = (level as f64).powf(1.3);
            prop_assert!(hp >= 1.0);
            prop_assert!(hp - 1.0 < power && power <= hp);
        }

        #[test]
        fn prop_harder_with_level(level in 1u32..200) {
            let lo = Difficulty::new(level, 0);
            let hi = Difficulty::new(level + 1, 0);
            prop_assert!(hi.spawn_rate > lo.spawn_rate);
            prop_assert!(hi.attacker_speed > lo.attacker_speed);
            prop_assert!(hi.attacker_hp >= lo.attacker_hp);
        }
    }
}
