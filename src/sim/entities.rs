//! Per-entity update logic
//!
//! Each updater borrows only the pieces of the session it touches so the
//! turn controller can split borrows across the active shooter and the
//! entity arrays.

use glam::Vec2;

use super::geometry::{
    boxes_overlap, entered_from_above, entered_from_below, entered_from_left, entered_from_right,
};
use super::state::{
    Bullet, BulletPool, Collectible, Enemy, EnemyBehavior, GameEvent, PickupKind, Platform,
    Shooter, Viewport,
};
use crate::settings::Settings;

/// Movement keys held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Walk, jump, fall, and resolve against platforms and the ground
///
/// X is moved and corrected first, then Y.
pub fn update_shooter_position(
    shooter: &mut Shooter,
    input: &MoveInput,
    platforms: &[Platform],
    settings: &Settings,
    dt: f32,
) {
    let prev = shooter.pos;
    let size = shooter.size;

    // --- Horizontal ---
    let mut x = shooter.pos.x;
    if input.left {
        x -= settings.shooter_speed * dt;
    }
    if input.right {
        x += settings.shooter_speed * dt;
    }
    shooter.pos.x = x.max(settings.left_boundary);

    for platform in platforms {
        let bounds = platform.bounds();
        if !shooter.bounds().overlaps_y(&bounds) {
            continue;
        }
        if entered_from_left(prev.x, &bounds, shooter.pos.x, size.x) {
            shooter.pos.x = bounds.left() - size.x;
        } else if entered_from_right(prev.x, &bounds, shooter.pos.x, size.x) {
            shooter.pos.x = bounds.right();
        }
    }

    // --- Vertical ---
    if input.jump && shooter.on_ground {
        shooter.velocity_y = -settings.jump_speed;
        shooter.on_ground = false;
    }
    shooter.velocity_y += settings.gravity * dt;
    shooter.pos.y += shooter.velocity_y * dt;

    let mut collided = false;
    let mut landed = false;
    for platform in platforms {
        let bounds = platform.bounds();
        if !shooter.bounds().overlaps_x(&bounds) {
            continue;
        }
        if shooter.velocity_y > 0.0 && entered_from_above(prev.y, &bounds, shooter.pos.y, size.y) {
            shooter.pos.y = bounds.top() - size.y;
            shooter.velocity_y = 0.0;
            collided = true;
            landed = true;
        } else if shooter.velocity_y < 0.0
            && entered_from_below(prev.y, &bounds, shooter.pos.y, size.y)
        {
            shooter.pos.y = bounds.bottom();
            shooter.velocity_y = 0.0;
            collided = true;
        }
    }

    if collided {
        shooter.on_ground = landed;
    } else if shooter.pos.y >= settings.ground_level {
        shooter.pos.y = settings.ground_level;
        shooter.velocity_y = 0.0;
        shooter.on_ground = true;
    } else {
        shooter.on_ground = false;
    }

    // Snapping against a platform's left face can push past the boundary
    shooter.pos.x = shooter.pos.x.max(settings.left_boundary);
}

/// Collect every uncollected pickup the shooter touches
///
/// Returns how many were collected this call.
pub fn collect_pickups(
    shooter: &mut Shooter,
    pickups: &mut [Collectible],
    kind: PickupKind,
    settings: &Settings,
    events: &mut Vec<GameEvent>,
) -> usize {
    let bounds = shooter.bounds();
    let mut collected = 0;
    for (index, pickup) in pickups.iter_mut().enumerate() {
        if pickup.collected || !boxes_overlap(&bounds, &pickup.bounds()) {
            continue;
        }
        pickup.collected = true;
        match kind {
            PickupKind::Score => shooter.score += settings.score_pickup_bonus,
            PickupKind::Ammo => shooter.ammo += settings.ammo_pickup_bonus,
        }
        log::trace!("Collected {:?} pickup {}", kind, index);
        events.push(GameEvent::PickupCollected { kind, index });
        collected += 1;
    }
    collected
}

/// Score pickups
pub fn update_collectibles(
    shooter: &mut Shooter,
    collectibles: &mut [Collectible],
    settings: &Settings,
    events: &mut Vec<GameEvent>,
) -> usize {
    collect_pickups(shooter, collectibles, PickupKind::Score, settings, events)
}

/// Ammo pickups
pub fn update_ammos(
    shooter: &mut Shooter,
    ammos: &mut [Collectible],
    settings: &Settings,
    events: &mut Vec<GameEvent>,
) -> usize {
    collect_pickups(shooter, ammos, PickupKind::Ammo, settings, events)
}

/// Pin every patroller to its platform (top edge, X inside the span)
pub fn attach_patrollers(platforms: &[Platform], enemies: &mut [Enemy]) {
    for enemy in enemies.iter_mut() {
        if let EnemyBehavior::Patroller { platform } = enemy.behavior {
            if let Some(p) = platforms.get(platform) {
                enemy.pos.y = p.pos.y - enemy.size.y;
                enemy.pos.x = clamp_to_span(enemy.pos.x, p, enemy.size.x);
            }
        }
    }
}

#[inline]
fn clamp_to_span(x: f32, platform: &Platform, width: f32) -> f32 {
    let min = platform.pos.x;
    let max = platform.pos.x + platform.size.x - width;
    x.min(max).max(min)
}

/// Move on-screen enemies toward the shooter and tick their animations
///
/// Enemies outside the viewport keep their position until scrolled into view.
pub fn update_enemies(
    shooter: &Shooter,
    enemies: &mut [Enemy],
    platforms: &[Platform],
    view: &Viewport,
    dt: f32,
) {
    for enemy in enemies.iter_mut() {
        if !enemy.active {
            continue;
        }
        enemy.animation.advance(dt);

        if !view.contains_x(enemy.pos.x) {
            continue;
        }

        let step = enemy.speed * dt;
        match enemy.behavior {
            EnemyBehavior::Chaser => {
                let delta = shooter.pos - enemy.pos;
                let distance = delta.length();
                if distance > 0.0 {
                    enemy.pos += delta / distance * step;
                }
            }
            EnemyBehavior::Patroller { platform } => {
                let Some(p) = platforms.get(platform) else {
                    continue;
                };
                enemy.pos.y = p.pos.y - enemy.size.y;
                let dx = shooter.pos.x - enemy.pos.x;
                enemy.pos.x += dx.max(-step).min(step);
                enemy.pos.x = clamp_to_span(enemy.pos.x, p, enemy.size.x);
            }
        }
    }
}

/// Fire from the shooter's center toward a screen-space target
///
/// Returns the pool slot used, or None when out of ammo or no slot was free.
pub fn shoot_bullet(
    shooter: &mut Shooter,
    target: Vec2,
    camera_x: f32,
    bullets: &mut BulletPool,
    settings: &Settings,
    events: &mut Vec<GameEvent>,
) -> Option<usize> {
    if shooter.ammo == 0 {
        return None;
    }

    let target = Vec2::new(target.x + camera_x, target.y);
    let origin = shooter.center();
    let delta = target - origin;
    let length = delta.length();
    let dir = if length != 0.0 { delta / length } else { Vec2::X };

    // First fit among the first `ammo` slots
    let slot = bullets.first_free(shooter.ammo as usize)?;
    bullets.slots_mut()[slot] = Bullet {
        pos: origin,
        dir,
        speed: settings.bullet_speed,
        lifespan: settings.bullet_lifespan,
        active: true,
    };
    shooter.ammo -= 1;

    log::debug!("Bullet fired from slot {} ({} ammo left)", slot, shooter.ammo);
    events.push(GameEvent::BulletFired { slot });
    Some(slot)
}

/// How many pool slots are scanned for live bullets
///
/// The most ammo a shooter can ever hold on this level: its starting ammo
/// plus what every ammo pickup is worth. Fixed for the whole level, so a
/// slot filled by an earlier shot stays inside the scan after ammo drops.
pub fn live_bullet_bound(
    start_ammo: u32,
    ammo_pickups: usize,
    pool: &BulletPool,
    settings: &Settings,
) -> usize {
    if settings.full_pool_scan {
        return pool.capacity();
    }
    let bound = start_ammo as usize + ammo_pickups * settings.ammo_pickup_bonus as usize;
    bound.min(pool.capacity())
}

/// Move live bullets and retire expired, off-screen, or platform-blocked ones
pub fn update_bullets(
    bullets: &mut BulletPool,
    bound: usize,
    platforms: &[Platform],
    view: &Viewport,
    settings: &Settings,
    dt: f32,
) {
    for bullet in bullets.slots_mut().iter_mut().take(bound) {
        if !bullet.active {
            continue;
        }

        bullet.pos += bullet.dir * bullet.speed * dt;
        bullet.lifespan -= dt;

        let screen_x = bullet.pos.x - view.camera_x;
        let expired = bullet.lifespan <= 0.0
            || screen_x > view.width
            || screen_x < 0.0
            || bullet.pos.y > view.height
            || bullet.pos.y < 0.0;
        if expired {
            bullet.active = false;
            continue;
        }

        let bounds = bullet.bounds(settings.bullet_size);
        if platforms
            .iter()
            .any(|p| boxes_overlap(&bounds, &p.bounds()))
        {
            bullet.active = false;
        }
    }
}

/// Scroll the camera so the shooter stays at mid-screen once past it
pub fn follow_camera(camera_x: &mut f32, shooter: &Shooter, screen_width: f32) {
    let half = screen_width / 2.0;
    if shooter.pos.x >= half {
        *camera_x = shooter.pos.x - half;
    }
}
