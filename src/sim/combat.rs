//! Cross-entity damage resolution
//!
//! Chasers are always scanned before patrollers, each kind in index order.
//! The first match wins: one enemy contact per tick, one kill per bullet.

use super::geometry::boxes_overlap;
use super::state::{BulletPool, Enemy, EnemyBehavior, GameEvent, Shooter};
use crate::settings::Settings;

/// Enemy kinds in collision scan order
const SCAN_ORDER: [fn(&Enemy) -> bool; 2] = [Enemy::is_chaser, Enemy::is_patroller];

/// Score for destroying an enemy of this kind
pub fn kill_score(behavior: EnemyBehavior, settings: &Settings) -> u32 {
    match behavior {
        EnemyBehavior::Chaser => settings.chaser_kill_score,
        EnemyBehavior::Patroller { .. } => settings.patroller_kill_score,
    }
}

/// Outcome of touching an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    None,
    /// Lost a point of health and was sent back to the start
    Respawned,
    /// Lost the last point of health
    Died,
}

/// Damage the shooter on enemy contact
///
/// A surviving shooter respawns at the world origin with the camera reset;
/// a killed one is left where it died.
///
/// At most one enemy touches the shooter per tick, across both kinds. Chasers
/// and patrollers are not resolved as separate passes, so a shooter respawned
/// by a chaser is not also hit by a patroller waiting at the origin on the
/// same tick; it is safe until the next tick.
pub fn handle_enemy_collisions(
    player: usize,
    shooter: &mut Shooter,
    enemies: &[Enemy],
    camera_x: &mut f32,
    settings: &Settings,
    events: &mut Vec<GameEvent>,
) -> Contact {
    let bounds = shooter.bounds();
    let hit = SCAN_ORDER.iter().find_map(|in_pass| {
        enemies
            .iter()
            .position(|e| in_pass(e) && e.active && boxes_overlap(&bounds, &e.bounds()))
    });
    let Some(index) = hit else {
        return Contact::None;
    };

    shooter.health = (shooter.health - 1).max(0);
    log::debug!(
        "Player {} touched enemy {} ({} health left)",
        player + 1,
        index,
        shooter.health
    );
    events.push(GameEvent::ShooterHit {
        player,
        health: shooter.health,
    });

    if shooter.health <= 0 {
        shooter.dead = true;
        log::info!("Player {} died", player + 1);
        events.push(GameEvent::ShooterDied { player });
        return Contact::Died;
    }

    shooter.respawn(settings.ground_level);
    *camera_x = 0.0;
    Contact::Respawned
}

/// Destroy enemies hit by live bullets and award score
///
/// Returns the number of enemies destroyed.
pub fn handle_bullet_enemy_collisions(
    shooter: &mut Shooter,
    bullets: &mut BulletPool,
    bound: usize,
    enemies: &mut [Enemy],
    settings: &Settings,
    events: &mut Vec<GameEvent>,
) -> usize {
    let mut destroyed = 0;
    for bullet in bullets.slots_mut().iter_mut().take(bound) {
        for in_pass in SCAN_ORDER {
            if !bullet.active {
                break;
            }
            let bounds = bullet.bounds(settings.bullet_size);
            let hit = enemies
                .iter()
                .position(|e| in_pass(e) && e.active && boxes_overlap(&bounds, &e.bounds()));
            if let Some(index) = hit {
                let enemy = &mut enemies[index];
                enemy.active = false;
                bullet.active = false;

                let score = kill_score(enemy.behavior, settings);
                shooter.score += score;
                destroyed += 1;
                log::debug!("Enemy {} destroyed (+{})", index, score);
                events.push(GameEvent::EnemyDestroyed { index, score });
            }
        }
    }
    destroyed
}
