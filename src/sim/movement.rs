//! One-dimensional movement
//!
//! Attackers walk from the spawn edge toward the wall at their own speed;
//! arrows fly the other way at a fixed speed. No acceleration.

use super::state::EntityRegistry;
use crate::consts::PROJECTILE_SPEED;

/// Move everything one tick
pub fn advance(registry: &mut EntityRegistry) {
    advance_attackers(registry);
    advance_projectiles(registry);
}

pub fn advance_attackers(registry: &mut EntityRegistry) {
    for attacker in &mut registry.attackers {
        attacker.position -= attacker.speed;
    }
}

pub fn advance_projectiles(registry: &mut EntityRegistry) {
    for projectile in &mut registry.projectiles {
        projectile.pos.x += PROJECTILE_SPEED;
    }
}
