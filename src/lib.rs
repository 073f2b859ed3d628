//! Platform Duel - a two-player turn-based side-scrolling platformer/shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity updates, collisions, turn state machine)
//! - `terrain`: Sine-based hill noise for background parallax bands
//! - `level`: Level definitions, load-time validation, level enumeration
//! - `summary`: End-of-round comparison of both players
//! - `persistence`: Versioned snapshot save/restore
//! - `settings`: Data-driven rules and tunables
//! - `sprites`: Rendering-only side table keyed by entity identity

pub mod level;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod sprites;
pub mod summary;
pub mod terrain;

pub use level::{LevelCatalog, LevelDataError, LevelDefinition, LevelSource};
pub use persistence::{SnapshotError, restore_snapshot, save_snapshot};
pub use settings::{RulesPreset, Settings};
pub use summary::{MatchOutcome, RoundSummary};
pub use terrain::HillNoise;

/// Game configuration constants
pub mod consts {
    /// Number of players in a match
    pub const PLAYER_COUNT: usize = 2;

    /// Fixed timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Default shooter box (width, height)
    pub const SHOOTER_SIZE: f32 = 100.0;
    /// Health every shooter starts a level with
    pub const START_HEALTH: i32 = 3;
    /// Ammo every shooter starts a level with
    pub const START_AMMO: u32 = 3;

    /// Screen dimensions assumed by the default settings
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    /// Finish flag sits at the right edge of the world
    pub const WORLD_WIDTH: f32 = 3000.0;
    /// Y of a grounded shooter's top edge
    pub const GROUND_LEVEL: f32 = SCREEN_HEIGHT - 50.0;
    pub const LEFT_BOUNDARY: f32 = 0.0;

    /// Shooter physics (units/s, units/s²)
    pub const SHOOTER_SPEED: f32 = 200.0;
    pub const JUMP_SPEED: f32 = 400.0;
    pub const GRAVITY: f32 = 580.0;

    /// Bullets
    pub const BULLET_SPEED: f32 = 500.0;
    pub const BULLET_SIZE: f32 = 10.0;
    pub const BULLET_POOL_SIZE: usize = 10;

    /// Pickup and kill rewards
    pub const AMMO_PICKUP_BONUS: u32 = 3;
    pub const CHASER_KILL_SCORE: u32 = 15;
    pub const PATROLLER_KILL_SCORE: u32 = 10;
}
