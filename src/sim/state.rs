//! Game state and core simulation types
//!
//! All state that must be persisted for save/restore lives here. Entity
//! collections are fixed once a level is loaded: entities are flagged
//! inactive/collected instead of removed, so indices stay stable and scan
//! order (which decides first-hit-wins ties) never changes mid-level.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::attach_patrollers;
use super::geometry::Aabb;
use crate::consts::PLAYER_COUNT;
use crate::level::{LevelDataError, LevelDefinition, validate_enemies};
use crate::settings::Settings;

/// Turn state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Player 1 is playing the level
    Player1Turn,
    /// Player 2 is playing the (reloaded) level
    Player2Turn,
    /// Player 1 is done, level reloaded, waiting for the UI to start player 2
    LevelTransition,
    /// Both turns done, waiting for the summary to be dismissed
    RoundSummary,
}

impl GamePhase {
    /// Index of the shooter simulated in this phase
    pub fn active_player(&self) -> Option<usize> {
        match self {
            GamePhase::Player1Turn => Some(0),
            GamePhase::Player2Turn => Some(1),
            GamePhase::LevelTransition | GamePhase::RoundSummary => None,
        }
    }
}

/// Sprite-sheet animation cursor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Animation {
    pub current_frame: u32,
    pub timer: f32,
    /// Seconds per frame
    pub frame_delay: f32,
    pub total_frames: u32,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            current_frame: 0,
            timer: 0.0,
            frame_delay: 0.1,
            total_frames: 1,
            frame_width: 0,
            frame_height: 0,
        }
    }
}

impl Animation {
    /// Advance the frame timer, wrapping the frame index
    pub fn advance(&mut self, dt: f32) {
        self.timer += dt;
        if self.timer >= self.frame_delay {
            self.current_frame = if self.total_frames > 0 {
                (self.current_frame + 1) % self.total_frames
            } else {
                0
            };
            self.timer = 0.0;
        }
    }
}

/// A player-controlled character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shooter {
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity_y: f32,
    pub on_ground: bool,
    pub health: i32,
    pub ammo: u32,
    pub score: u32,
    /// Seconds spent in this player's turn
    pub time: f64,
    pub animation: Animation,
    pub dead: bool,
}

impl Shooter {
    /// A fresh shooter standing on the ground at the world origin
    pub fn spawn(size: Vec2, health: i32, ammo: u32, ground_level: f32) -> Self {
        Self {
            pos: Vec2::new(0.0, ground_level),
            size,
            velocity_y: 0.0,
            on_ground: true,
            health,
            ammo,
            score: 0,
            time: 0.0,
            animation: Animation::default(),
            dead: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Put the shooter back at the world origin (enemy-contact penalty)
    pub fn respawn(&mut self, ground_level: f32) {
        self.pos = Vec2::new(0.0, ground_level);
        self.velocity_y = 0.0;
        self.on_ground = true;
    }

    pub fn stats(&self) -> PlayerStats {
        PlayerStats {
            score: self.score,
            health: self.health,
            time: self.time,
        }
    }

    /// Overwrite score/health/time with carried stats
    pub fn restore_stats(&mut self, stats: &PlayerStats) {
        self.score = stats.score;
        self.health = stats.health;
        self.time = stats.time;
    }
}

/// The numbers compared at the end of a round
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    pub score: u32,
    pub health: i32,
    pub time: f64,
}

/// A static platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// How an enemy moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnemyBehavior {
    /// Flies straight at the shooter
    Chaser,
    /// Walks along one platform toward the shooter's X
    Patroller { platform: usize },
}

fn default_true() -> bool {
    true
}

/// An enemy entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    #[serde(default = "default_true")]
    pub active: bool,
    /// Units per second
    pub speed: f32,
    pub behavior: EnemyBehavior,
    #[serde(default)]
    pub animation: Animation,
}

impl Enemy {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn is_chaser(&self) -> bool {
        self.behavior == EnemyBehavior::Chaser
    }

    pub fn is_patroller(&self) -> bool {
        matches!(self.behavior, EnemyBehavior::Patroller { .. })
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Score,
    Ammo,
}

/// A score or ammo pickup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub pos: Vec2,
    pub size: Vec2,
    #[serde(default)]
    pub collected: bool,
}

impl Collectible {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
            collected: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// One projectile slot
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    /// Unit direction
    pub dir: Vec2,
    pub speed: f32,
    /// Seconds left before expiry
    pub lifespan: f32,
    pub active: bool,
}

impl Bullet {
    pub fn bounds(&self, size: f32) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(size))
    }
}

/// Fixed-size bullet pool; slots are reused via their active flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletPool {
    slots: Vec<Bullet>,
}

impl BulletPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Bullet::default(); capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Bullet] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [Bullet] {
        &mut self.slots
    }

    pub fn get(&self, slot: usize) -> Option<&Bullet> {
        self.slots.get(slot)
    }

    /// First inactive slot among the first `limit` slots
    pub fn first_free(&self, limit: usize) -> Option<usize> {
        let limit = limit.min(self.slots.len());
        self.slots[..limit].iter().position(|b| !b.active)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|b| b.active).count()
    }
}

/// Visible window onto the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub camera_x: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Whether a world X lies inside the visible span
    #[inline]
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.camera_x && x <= self.camera_x + self.width
    }
}

/// Why a turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEnd {
    Finished,
    Died,
}

/// Things that happened during a tick (for the renderer/UI, not persisted)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PickupCollected { kind: PickupKind, index: usize },
    BulletFired { slot: usize },
    EnemyDestroyed { index: usize, score: u32 },
    ShooterHit { player: usize, health: i32 },
    ShooterDied { player: usize },
    TurnEnded { player: usize, reason: TurnEnd },
    MatchEnded,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Index of the level in the catalog
    pub level_index: usize,
    /// Definition the dynamic entities are (re)built from
    pub level: LevelDefinition,
    pub phase: GamePhase,
    /// When set the caller skips `tick` entirely
    pub paused: bool,
    pub shooters: [Shooter; PLAYER_COUNT],
    pub platforms: Vec<Platform>,
    /// Chasers and patrollers; each kind is scanned in its own index order
    pub enemies: Vec<Enemy>,
    pub collectibles: Vec<Collectible>,
    pub ammo_pickups: Vec<Collectible>,
    pub bullets: BulletPool,
    /// Derived from the active shooter each tick
    pub camera_x: f32,
    /// Player 1's stats as of their last simulated tick
    pub player1_carry: PlayerStats,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Start a match on the given level (player 1 to play)
    pub fn new(
        level_index: usize,
        level: LevelDefinition,
        settings: &Settings,
    ) -> Result<Self, LevelDataError> {
        level.validate()?;
        log::info!("Loading level {} ({})", level_index, level.name);

        let shooter = level.spawn_shooter(settings);
        let mut state = Self {
            level_index,
            level,
            phase: GamePhase::Player1Turn,
            paused: false,
            shooters: [shooter.clone(), shooter],
            platforms: Vec::new(),
            enemies: Vec::new(),
            collectibles: Vec::new(),
            ammo_pickups: Vec::new(),
            bullets: BulletPool::new(settings.bullet_pool_size),
            camera_x: 0.0,
            player1_carry: PlayerStats::default(),
            time_ticks: 0,
            events: Vec::new(),
        };
        state.reload_level(settings);
        Ok(state)
    }

    /// Throw away all dynamic state and rebuild it from the level definition
    pub fn reload_level(&mut self, settings: &Settings) {
        let shooter = self.level.spawn_shooter(settings);
        self.shooters = [shooter.clone(), shooter];
        self.platforms = self.level.platforms.clone();
        self.enemies = self.level.enemies.clone();
        self.collectibles = self.level.collectibles.clone();
        self.ammo_pickups = self.level.ammo_pickups.clone();
        self.bullets = BulletPool::new(settings.bullet_pool_size);
        self.camera_x = 0.0;
        attach_patrollers(&self.platforms, &mut self.enemies);
        log::debug!(
            "Level {} rebuilt: {} platforms, {} enemies, {} pickups, {} ammo",
            self.level_index,
            self.platforms.len(),
            self.enemies.len(),
            self.collectibles.len(),
            self.ammo_pickups.len()
        );
    }

    /// Index of the shooter being simulated, if a turn is running
    pub fn active_index(&self) -> Option<usize> {
        self.phase.active_player()
    }

    pub fn active_shooter(&self) -> Option<&Shooter> {
        self.active_index().map(|i| &self.shooters[i])
    }

    /// HUD turn indicator (player 2 once player 1 is done)
    pub fn is_player1_turn(&self) -> bool {
        self.phase == GamePhase::Player1Turn
    }

    pub fn viewport(&self, settings: &Settings) -> Viewport {
        Viewport {
            camera_x: self.camera_x,
            width: settings.screen_width,
            height: settings.screen_height,
        }
    }

    /// Acknowledge a pause (menu or between-turn screen)
    pub fn resume(&mut self) {
        match self.phase {
            GamePhase::LevelTransition => {
                log::info!("Player 2's turn");
                self.phase = GamePhase::Player2Turn;
                self.paused = false;
            }
            GamePhase::Player1Turn | GamePhase::Player2Turn => self.paused = false,
            // Only dismissing the summary leaves this phase
            GamePhase::RoundSummary => {}
        }
    }

    /// Check references between entities (used after restoring a snapshot)
    pub fn validate(&self) -> Result<(), LevelDataError> {
        self.level.validate()?;
        validate_enemies(&self.platforms, &self.enemies)
    }
}
