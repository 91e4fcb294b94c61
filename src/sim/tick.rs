//! Fixed timestep simulation tick
//!
//! Core battle loop that advances a night deterministically:
//! evaluate -> spawn -> move -> wall breaches -> collisions.

use super::collision::resolve_collisions;
use super::movement;
use super::rng::Dice;
use super::state::{Battle, BattleEvent, BattlePhase, BattleResult};
use super::wall::resolve_breaches;

/// Advance the battle by one fixed timestep.
///
/// Terminal conditions are checked first, against the state left by the
/// previous tick. Once a result exists every further call returns it
/// without touching the battle.
pub fn tick<D: Dice>(battle: &mut Battle<D>) -> Option<BattleResult> {
    if let Some(result) = battle.result {
        return Some(result);
    }

    if let Some(result) = BattlePhase::evaluate(battle.wall_health, battle.remaining_ticks) {
        conclude(battle, result);
        return Some(result);
    }

    battle.remaining_ticks -= 1;
    battle.elapsed_ticks += 1;

    // Display timers count down before this tick can re-arm them
    battle.boss_warning_ticks = battle.boss_warning_ticks.saturating_sub(1);
    battle.impact_ticks = battle.impact_ticks.saturating_sub(1);

    let Battle {
        spawner,
        registry,
        dice,
        remaining_ticks,
        ..
    } = &mut *battle;
    let spawned = spawner.spawn(registry, dice, *remaining_ticks);

    if let Some(boss_id) = spawned.boss {
        let max_hp = battle.registry.attacker(boss_id).map_or(0, |b| b.max_hp);
        log::info!(
            "Boss incoming! {} HP with {:.1}s left",
            max_hp,
            battle.remaining_secs()
        );
        battle.boss_warning_ticks = battle.timing.boss_warning_ticks;
        battle.events.push(BattleEvent::BossIncoming {
            attacker_id: boss_id,
            max_hp,
        });
    }

    movement::advance(&mut battle.registry);

    let breaches = resolve_breaches(
        &mut battle.registry,
        &battle.difficulty,
        &mut battle.wall_health,
    );
    if !breaches.is_empty() {
        // One shake per tick no matter how many got through
        battle.impact_ticks = battle.timing.impact_flash_ticks;
    }
    for breach in breaches {
        log::debug!(
            "{:?} attacker {} hit the wall for {} ({} left)",
            breach.kind,
            breach.attacker_id,
            breach.damage,
            breach.wall_health
        );
        battle.events.push(BattleEvent::WallBreached {
            attacker_id: breach.attacker_id,
            kind: breach.kind,
            damage: breach.damage,
            wall_health: breach.wall_health,
        });
    }

    for hit in resolve_collisions(&mut battle.registry) {
        if hit.slain() {
            log::debug!("{:?} attacker {} slain", hit.kind, hit.attacker_id);
            battle.events.push(BattleEvent::AttackerSlain {
                attacker_id: hit.attacker_id,
                kind: hit.kind,
            });
        } else {
            battle.events.push(BattleEvent::AttackerHit {
                attacker_id: hit.attacker_id,
                hp: hit.hp_left,
            });
        }
    }

    // Ensure deterministic ordering
    battle.registry.normalize_order();
    None
}

fn conclude<D: Dice>(battle: &mut Battle<D>, result: BattleResult) {
    battle.phase = result.outcome.into();
    battle.result = Some(result);
    battle.boss_warning_ticks = 0;
    battle.impact_ticks = 0;
    battle.events.push(BattleEvent::Ended(result));
    log::info!(
        "Night over after {} ticks: {:?}, wall at {}",
        battle.elapsed_ticks,
        result.outcome,
        result.remaining_wall_health
    );
}
