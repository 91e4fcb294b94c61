//! Arrow vs attacker collision
//!
//! Each arrow strikes at most one attacker per tick. When several hitboxes
//! contain the arrow tip, the attacker closest to the wall (smallest
//! position, then lowest id) takes it, so the outcome never depends on
//! insertion order. Arrows are resolved in id order and later arrows see
//! the damage and knockback dealt by earlier ones.

use super::state::{AttackerKind, EntityId, EntityRegistry};
use crate::consts::{SHOT_DAMAGE, SPAWN_EDGE};

/// Result of one arrow striking an attacker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub projectile_id: EntityId,
    pub attacker_id: EntityId,
    pub kind: AttackerKind,
    /// HP left after the hit; zero means the attacker was removed
    pub hp_left: u32,
}

impl Hit {
    pub fn slain(&self) -> bool {
        self.hp_left == 0
    }
}

/// Resolve all arrows against all attackers.
///
/// Arrows that hit are consumed whether or not the target survives. Arrows
/// that reach the spawn edge without hitting leave the field.
pub fn resolve_collisions(registry: &mut EntityRegistry) -> Vec<Hit> {
    let EntityRegistry {
        attackers,
        projectiles,
        ..
    } = registry;

    let mut hits = Vec::new();
    projectiles.retain(|projectile| {
        let tip = projectile.pos.x;
        let target = attackers
            .iter_mut()
            .filter(|a| a.in_hitbox(tip))
            .min_by(|a, b| a.position.total_cmp(&b.position).then(a.id.cmp(&b.id)));

        let Some(attacker) = target else {
            return tip < SPAWN_EDGE;
        };

        attacker.take_hit(SHOT_DAMAGE);
        let hit = Hit {
            projectile_id: projectile.id,
            attacker_id: attacker.id,
            kind: attacker.kind,
            hp_left: attacker.hp,
        };
        if hit.slain() {
            attackers.retain(|a| a.id != hit.attacker_id);
        }
        hits.push(hit);
        false
    });
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_one_hit_kills_level_one_attacker() {
        let mut registry = EntityRegistry::new();
        let zombie = registry.place_attacker(AttackerKind::Regular, 1, 0.8, 40.0);
        registry.place_projectile(43.0, 30.0);

        let hits = resolve_collisions(&mut registry);

        assert_eq!(hits.len(), 1);
        assert!(hits[0].slain());
        assert_eq!(hits[0].attacker_id, zombie);
        assert!(registry.attackers().is_empty());
        assert!(registry.projectiles().is_empty());
    }

    #[test]
    fn test_survivor_knocked_back_and_arrow_consumed() {
        let mut registry = EntityRegistry::new();
        let tank = registry.place_attacker(AttackerKind::Reinforced, 3, 0.4, 40.0);
        registry.place_projectile(42.0, 30.0);

        let hits = resolve_collisions(&mut registry);

        assert_eq!(hits[0].hp_left, 2);
        let tank = registry.attacker(tank).unwrap();
        assert_eq!(tank.hp, 2);
        assert_eq!(tank.position, 42.0);
        assert!(registry.projectiles().is_empty());
    }

    #[test]
    fn test_boss_holds_position() {
        let mut registry = EntityRegistry::new();
        let boss = registry.place_attacker(AttackerKind::Boss, 20, 0.3, 50.0);
        // Outside a regular hitbox, inside the boss's
        registry.place_projectile(62.0, 30.0);

        let hits = resolve_collisions(&mut registry);

        assert_eq!(hits.len(), 1);
        let boss = registry.attacker(boss).unwrap();
        assert_eq!(boss.hp, 19);
        assert_eq!(boss.position, 50.0);
    }

    #[test]
    fn test_closest_to_wall_takes_the_arrow() {
        let mut registry = EntityRegistry::new();
        // Inserted far-first so insertion order would pick the wrong one
        let far = registry.place_attacker(AttackerKind::Regular, 5, 1.0, 44.0);
        let near = registry.place_attacker(AttackerKind::Regular, 5, 1.0, 41.0);
        registry.place_projectile(45.0, 30.0);

        let hits = resolve_collisions(&mut registry);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].attacker_id, near);
        assert_eq!(registry.attacker(far).unwrap().hp, 5);
        assert_eq!(registry.attacker(near).unwrap().hp, 4);
    }

    #[test]
    fn test_equal_positions_break_by_id() {
        let mut registry = EntityRegistry::new();
        let first = registry.place_attacker(AttackerKind::Regular, 5, 1.0, 41.0);
        let second = registry.place_attacker(AttackerKind::Regular, 5, 1.0, 41.0);
        registry.place_projectile(45.0, 30.0);

        let hits = resolve_collisions(&mut registry);

        assert_eq!(hits[0].attacker_id, first);
        assert_eq!(registry.attacker(second).unwrap().hp, 5);
    }

    #[test]
    fn test_later_arrows_see_earlier_kills() {
        let mut registry = EntityRegistry::new();
        let zombie = registry.place_attacker(AttackerKind::Regular, 1, 1.0, 41.0);
        registry.place_projectile(45.0, 30.0);
        registry.place_projectile(44.0, 35.0);

        let hits = resolve_collisions(&mut registry);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].attacker_id, zombie);
        // The second arrow found nothing and keeps flying
        assert_eq!(registry.projectiles().len(), 1);
        assert_eq!(registry.projectiles()[0].pos.x, 44.0);
    }

    #[test]
    fn test_arrow_leaves_field() {
        let mut registry = EntityRegistry::new();
        registry.place_projectile(SPAWN_EDGE, 30.0);
        registry.place_projectile(SPAWN_EDGE - PROJECTILE_SPEED, 30.0);

        let hits = resolve_collisions(&mut registry);

        assert!(hits.is_empty());
        assert_eq!(registry.projectiles().len(), 1);
    }
}
