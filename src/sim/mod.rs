//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Stable iteration order (by entity index, chasers before patrollers)
//! - No rendering or platform dependencies

pub mod combat;
pub mod entities;
pub mod geometry;
pub mod state;
pub mod tick;

pub use combat::{Contact, handle_bullet_enemy_collisions, handle_enemy_collisions, kill_score};
pub use entities::{
    MoveInput, attach_patrollers, follow_camera, live_bullet_bound, shoot_bullet, update_ammos,
    update_bullets, update_collectibles, update_enemies, update_shooter_position,
};
pub use geometry::{
    Aabb, boxes_overlap, entered_from_above, entered_from_below, entered_from_left,
    entered_from_right,
};
pub use state::{
    Animation, Bullet, BulletPool, Collectible, Enemy, EnemyBehavior, GameEvent, GamePhase,
    GameState, PickupKind, Platform, PlayerStats, Shooter, TurnEnd, Viewport,
};
pub use tick::{
    Dismissal, TickInput, advance_to_next_level, check_finish, dismiss_summary, start_level, tick,
};
