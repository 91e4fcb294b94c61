//! Wall breaches
//!
//! The only code that lowers wall health during a battle.

use super::difficulty::Difficulty;
use super::state::{AttackerKind, EntityId, EntityRegistry};
use crate::consts::WALL_LINE;

/// An attacker that reached the wall this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breach {
    pub attacker_id: EntityId,
    pub kind: AttackerKind,
    pub damage: u32,
    /// Wall health right after this breach
    pub wall_health: u32,
}

/// Remove attackers at or past the wall line and apply their damage.
/// Wall health saturates at zero.
pub fn resolve_breaches(
    registry: &mut EntityRegistry,
    difficulty: &Difficulty,
    wall_health: &mut u32,
) -> Vec<Breach> {
    let mut breaches = Vec::new();
    registry.attackers.retain(|attacker| {
        if attacker.position > WALL_LINE {
            return true;
        }
        let damage = difficulty.wall_damage(attacker.is_boss());
        *wall_health = wall_health.saturating_sub(damage);
        breaches.push(Breach {
            attacker_id: attacker.id,
            kind: attacker.kind,
            damage,
            wall_health: *wall_health,
        });
        false
    });
    breaches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breach_scales_with_level() {
        let difficulty = Difficulty::new(3, 0);
        let mut registry = EntityRegistry::new();
        let inside = registry.place_attacker(AttackerKind::Regular, 5, 1.0, 8.0);
        let outside = registry.place_attacker(AttackerKind::Regular, 5, 1.0, 8.5);
        let mut wall = 100;

        let breaches = resolve_breaches(&mut registry, &difficulty, &mut wall);

        assert_eq!(breaches.len(), 1);
        assert_eq!(breaches[0].attacker_id, inside);
        assert_eq!(breaches[0].damage, 30);
        assert_eq!(wall, 70);
        assert!(registry.attacker(inside).is_none());
        assert!(registry.attacker(outside).is_some());
    }

    #[test]
    fn test_boss_breach_is_flat() {
        let difficulty = Difficulty::new(1, 3);
        let mut registry = EntityRegistry::new();
        registry.place_attacker(AttackerKind::Boss, 20, 0.3, 2.0);
        let mut wall = 250;

        let breaches = resolve_breaches(&mut registry, &difficulty, &mut wall);

        assert_eq!(breaches[0].damage, 100);
        assert_eq!(wall, 150);
    }

    #[test]
    fn test_wall_never_negative() {
        let difficulty = Difficulty::new(10, 0);
        let mut registry = EntityRegistry::new();
        registry.place_attacker(AttackerKind::Regular, 5, 1.0, 4.0);
        registry.place_attacker(AttackerKind::Regular, 5, 1.0, 6.0);
        let mut wall = 150;

        let breaches = resolve_breaches(&mut registry, &difficulty, &mut wall);

        assert_eq!(breaches.len(), 2);
        assert_eq!(breaches[0].wall_health, 50);
        assert_eq!(breaches[1].wall_health, 0);
        assert_eq!(wall, 0);
    }
}
