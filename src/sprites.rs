//! Renderer-side sprite lookup
//!
//! The simulation never holds texture handles. A renderer registers whatever
//! handle type its graphics API uses against an `EntityKey` and asks
//! `drawables` for the boxes to draw this frame.

use std::collections::HashMap;

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::geometry::Aabb;
use crate::sim::state::{GamePhase, GameState};

/// Identity of a drawable entity (index into its collection)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Shooter(usize),
    Enemy(usize),
    Bullet(usize),
    Collectible(usize),
    AmmoPickup(usize),
    Platform(usize),
}

/// Per-entity sprite handles with an optional fallback per kind
#[derive(Debug, Clone)]
pub struct SpriteTable<H> {
    entries: HashMap<EntityKey, H>,
}

impl<H> Default for SpriteTable<H> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<H> SpriteTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a handle, returning the one it replaced
    pub fn insert(&mut self, key: EntityKey, handle: H) -> Option<H> {
        self.entries.insert(key, handle)
    }

    pub fn get(&self, key: EntityKey) -> Option<&H> {
        self.entries.get(&key)
    }

    pub fn remove(&mut self, key: EntityKey) -> Option<H> {
        self.entries.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every handle (e.g. when a different level is loaded)
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// World-space boxes of everything visible this frame, back to front
///
/// Inactive enemies, collected pickups, and dead bullet slots are skipped.
/// During a turn only the active shooter is drawn; between turns both are.
pub fn drawables(state: &GameState, settings: &Settings) -> Vec<(EntityKey, Aabb)> {
    let mut out = Vec::new();

    for (i, p) in state.platforms.iter().enumerate() {
        out.push((EntityKey::Platform(i), p.bounds()));
    }
    for (i, c) in state.collectibles.iter().enumerate() {
        if !c.collected {
            out.push((EntityKey::Collectible(i), c.bounds()));
        }
    }
    for (i, a) in state.ammo_pickups.iter().enumerate() {
        if !a.collected {
            out.push((EntityKey::AmmoPickup(i), a.bounds()));
        }
    }
    for (i, e) in state.enemies.iter().enumerate() {
        if e.active {
            out.push((EntityKey::Enemy(i), e.bounds()));
        }
    }
    for (i, b) in state.bullets.slots().iter().enumerate() {
        if b.active {
            out.push((EntityKey::Bullet(i), b.bounds(settings.bullet_size)));
        }
    }

    match state.phase {
        GamePhase::Player1Turn | GamePhase::Player2Turn => {
            if let Some(i) = state.active_index() {
                out.push((EntityKey::Shooter(i), state.shooters[i].bounds()));
            }
        }
        GamePhase::LevelTransition | GamePhase::RoundSummary => {
            for (i, s) in state.shooters.iter().enumerate() {
                out.push((EntityKey::Shooter(i), s.bounds()));
            }
        }
    }
    out
}

/// Convert a world-space box to screen space for the current camera
pub fn to_screen(bounds: &Aabb, camera_x: f32) -> Aabb {
    Aabb::new(bounds.pos - Vec2::new(camera_x, 0.0), bounds.size)
}
