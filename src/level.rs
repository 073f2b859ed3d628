//! Level definitions and the level catalog
//!
//! A level is plain data: platforms, enemies, pickups, and how the shooters
//! start. Everything is validated once when a level is loaded so the
//! simulation never has to bounds-check a patroller's platform.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{SHOOTER_SIZE, START_AMMO, START_HEALTH};
use crate::settings::Settings;
use crate::sim::state::{Animation, Collectible, Enemy, EnemyBehavior, Platform, Shooter};

/// Level data that cannot be simulated
#[derive(Debug, Error)]
pub enum LevelDataError {
    #[error("malformed level data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{what} {index} has a non-finite position or size")]
    NonFinite { what: &'static str, index: usize },
    #[error("{what} {index} has a non-positive size")]
    InvalidSize { what: &'static str, index: usize },
    #[error("enemy {enemy} patrols platform {platform} but the level has {count} platforms")]
    PlatformOutOfRange {
        enemy: usize,
        platform: usize,
        count: usize,
    },
    #[error("enemy {enemy} is wider than platform {platform}")]
    PatrollerTooWide { enemy: usize, platform: usize },
    #[error("enemy {index} has a negative or non-finite speed")]
    InvalidSpeed { index: usize },
    #[error("start health must be positive, got {0}")]
    InvalidStartHealth(i32),
    #[error("level catalog is empty")]
    EmptyCatalog,
    #[error("level index {index} out of range ({count} levels)")]
    UnknownLevel { index: usize, count: usize },
}

fn default_shooter_size() -> Vec2 {
    Vec2::splat(SHOOTER_SIZE)
}

fn default_start_health() -> i32 {
    START_HEALTH
}

fn default_start_ammo() -> u32 {
    START_AMMO
}

/// Static description of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub name: String,
    #[serde(default = "default_shooter_size")]
    pub shooter_size: Vec2,
    #[serde(default = "default_start_health")]
    pub start_health: i32,
    #[serde(default = "default_start_ammo")]
    pub start_ammo: u32,
    #[serde(default)]
    pub shooter_animation: Animation,
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub enemies: Vec<Enemy>,
    #[serde(default)]
    pub collectibles: Vec<Collectible>,
    #[serde(default)]
    pub ammo_pickups: Vec<Collectible>,
}

impl LevelDefinition {
    /// Parse and validate a level from JSON
    pub fn from_json(json: &str) -> Result<Self, LevelDataError> {
        let level: LevelDefinition = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn to_json(&self) -> Result<String, LevelDataError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject anything the simulation would index out of range or divide by
    pub fn validate(&self) -> Result<(), LevelDataError> {
        if self.start_health <= 0 {
            return Err(LevelDataError::InvalidStartHealth(self.start_health));
        }
        check_box("shooter", 0, Vec2::ZERO, self.shooter_size)?;

        for (i, p) in self.platforms.iter().enumerate() {
            check_box("platform", i, p.pos, p.size)?;
        }
        for (i, c) in self.collectibles.iter().enumerate() {
            check_box("collectible", i, c.pos, c.size)?;
        }
        for (i, a) in self.ammo_pickups.iter().enumerate() {
            check_box("ammo pickup", i, a.pos, a.size)?;
        }
        validate_enemies(&self.platforms, &self.enemies)
    }

    /// Shooter in its starting state for this level
    pub fn spawn_shooter(&self, settings: &Settings) -> Shooter {
        let mut shooter = Shooter::spawn(
            self.shooter_size,
            self.start_health.min(settings.max_health),
            self.start_ammo,
            settings.ground_level,
        );
        shooter.animation = self.shooter_animation;
        shooter
    }

    /// The default three-platform course
    pub fn builtin_course() -> Self {
        let chaser = |x: f32, y: f32| Enemy {
            pos: Vec2::new(x, y),
            size: Vec2::splat(30.0),
            active: true,
            speed: 100.0,
            behavior: EnemyBehavior::Chaser,
            animation: sheet(30, 30, 4),
        };
        let patroller = |x: f32, y: f32, platform: usize| Enemy {
            pos: Vec2::new(x, y),
            size: Vec2::splat(30.0),
            active: true,
            speed: 100.0,
            behavior: EnemyBehavior::Patroller { platform },
            animation: sheet(40, 30, 4),
        };

        Self {
            name: "Meadow".to_string(),
            shooter_size: default_shooter_size(),
            start_health: START_HEALTH,
            start_ammo: START_AMMO,
            shooter_animation: sheet(100, 100, 6),
            platforms: vec![
                Platform::new(100.0, 500.0, 600.0, 30.0),
                Platform::new(800.0, 400.0, 600.0, 30.0),
                Platform::new(1500.0, 300.0, 600.0, 30.0),
            ],
            enemies: vec![
                chaser(500.0, 400.0),
                chaser(1200.0, 300.0),
                chaser(1900.0, 200.0),
                patroller(250.0, 470.0, 0),
                patroller(1200.0, 370.0, 1),
                patroller(1900.0, 270.0, 2),
            ],
            collectibles: vec![
                Collectible::new(200.0, 400.0, 20.0, 20.0),
                Collectible::new(900.0, 350.0, 20.0, 20.0),
                Collectible::new(1700.0, 250.0, 20.0, 20.0),
            ],
            ammo_pickups: vec![
                Collectible::new(200.0, 400.0, 20.0, 20.0),
                Collectible::new(900.0, 350.0, 20.0, 20.0),
                Collectible::new(1700.0, 250.0, 20.0, 20.0),
            ],
        }
    }

    /// A longer course with faster enemies
    pub fn builtin_gauntlet() -> Self {
        let mut level = Self::builtin_course();
        level.name = "Gauntlet".to_string();
        level.platforms.push(Platform::new(2200.0, 450.0, 500.0, 30.0));
        for enemy in &mut level.enemies {
            enemy.speed = 140.0;
        }
        level.enemies.push(Enemy {
            pos: Vec2::new(2400.0, 420.0),
            size: Vec2::splat(30.0),
            active: true,
            speed: 140.0,
            behavior: EnemyBehavior::Patroller { platform: 3 },
            animation: sheet(40, 30, 4),
        });
        level
            .collectibles
            .push(Collectible::new(2500.0, 380.0, 20.0, 20.0));
        level
    }
}

fn sheet(frame_width: u32, frame_height: u32, total_frames: u32) -> Animation {
    Animation {
        frame_width,
        frame_height,
        total_frames,
        ..Default::default()
    }
}

fn check_box(
    what: &'static str,
    index: usize,
    pos: Vec2,
    size: Vec2,
) -> Result<(), LevelDataError> {
    if !pos.is_finite() || !size.is_finite() {
        return Err(LevelDataError::NonFinite { what, index });
    }
    if size.x <= 0.0 || size.y <= 0.0 {
        return Err(LevelDataError::InvalidSize { what, index });
    }
    Ok(())
}

/// Every patroller must reference a platform it fits on
pub fn validate_enemies(platforms: &[Platform], enemies: &[Enemy]) -> Result<(), LevelDataError> {
    for (i, enemy) in enemies.iter().enumerate() {
        check_box("enemy", i, enemy.pos, enemy.size)?;
        if !enemy.speed.is_finite() || enemy.speed < 0.0 {
            return Err(LevelDataError::InvalidSpeed { index: i });
        }
        if let EnemyBehavior::Patroller { platform } = enemy.behavior {
            let Some(p) = platforms.get(platform) else {
                return Err(LevelDataError::PlatformOutOfRange {
                    enemy: i,
                    platform,
                    count: platforms.len(),
                });
            };
            if enemy.size.x > p.size.x {
                return Err(LevelDataError::PatrollerTooWide { enemy: i, platform });
            }
        }
    }
    Ok(())
}

/// Where levels come from (directory scanning etc. lives behind this)
pub trait LevelSource {
    /// Ordered level identifiers
    fn level_ids(&self) -> Vec<String>;

    /// Load the level at `index` in `level_ids` order
    fn load(&self, index: usize) -> Result<LevelDefinition, LevelDataError>;

    fn level_count(&self) -> usize {
        self.level_ids().len()
    }
}

/// In-memory ordered list of levels
#[derive(Debug, Clone, Default)]
pub struct LevelCatalog {
    levels: Vec<LevelDefinition>,
}

impl LevelCatalog {
    pub fn new(levels: Vec<LevelDefinition>) -> Result<Self, LevelDataError> {
        if levels.is_empty() {
            return Err(LevelDataError::EmptyCatalog);
        }
        for level in &levels {
            level.validate()?;
        }
        Ok(Self { levels })
    }

    /// Parse one JSON document per level
    pub fn from_json_documents<'a>(
        docs: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, LevelDataError> {
        let levels = docs
            .into_iter()
            .map(LevelDefinition::from_json)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(levels)
    }

    /// The levels that ship with the game
    pub fn builtin() -> Self {
        Self {
            levels: vec![
                LevelDefinition::builtin_course(),
                LevelDefinition::builtin_gauntlet(),
            ],
        }
    }
}

impl LevelSource for LevelCatalog {
    fn level_ids(&self) -> Vec<String> {
        self.levels.iter().map(|l| l.name.clone()).collect()
    }

    fn load(&self, index: usize) -> Result<LevelDefinition, LevelDataError> {
        self.levels
            .get(index)
            .cloned()
            .ok_or(LevelDataError::UnknownLevel {
                index,
                count: self.levels.len(),
            })
    }

    fn level_count(&self) -> usize {
        self.levels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_levels_validate() {
        LevelDefinition::builtin_course().validate().unwrap();
        LevelDefinition::builtin_gauntlet().validate().unwrap();
        assert_eq!(LevelCatalog::builtin().level_count(), 2);
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{
            "name": "tiny",
            "platforms": [ { "pos": [0.0, 500.0], "size": [200.0, 30.0] } ],
            "enemies": [
                { "pos": [10.0, 470.0], "size": [30.0, 30.0], "speed": 50.0,
                  "behavior": { "kind": "patroller", "platform": 0 } },
                { "pos": [300.0, 100.0], "size": [30.0, 30.0], "speed": 80.0,
                  "behavior": { "kind": "chaser" } }
            ]
        }"#;
        let level = LevelDefinition::from_json(json).unwrap();
        assert_eq!(level.start_health, START_HEALTH);
        assert_eq!(level.start_ammo, START_AMMO);
        assert_eq!(level.shooter_size, Vec2::splat(SHOOTER_SIZE));
        assert!(level.enemies.iter().all(|e| e.active));
        assert_eq!(
            level.enemies[0].behavior,
            EnemyBehavior::Patroller { platform: 0 }
        );
        assert!(level.collectibles.is_empty());
    }

    #[test]
    fn test_platform_index_out_of_range() {
        let mut level = LevelDefinition::builtin_course();
        level.enemies[3].behavior = EnemyBehavior::Patroller { platform: 7 };
        let err = level.validate().unwrap_err();
        assert!(matches!(
            err,
            LevelDataError::PlatformOutOfRange {
                enemy: 3,
                platform: 7,
                count: 3
            }
        ));
    }

    #[test]
    fn test_patroller_wider_than_platform() {
        let mut level = LevelDefinition::builtin_course();
        level.enemies[3].size.x = 1000.0;
        assert!(matches!(
            level.validate(),
            Err(LevelDataError::PatrollerTooWide { enemy: 3, platform: 0 })
        ));
    }

    #[test]
    fn test_rejects_bad_sizes() {
        let mut level = LevelDefinition::builtin_course();
        level.platforms[1].size.y = 0.0;
        assert!(matches!(
            level.validate(),
            Err(LevelDataError::InvalidSize { what: "platform", index: 1 })
        ));

        let mut level = LevelDefinition::builtin_course();
        level.collectibles[0].pos.x = f32::NAN;
        assert!(matches!(
            level.validate(),
            Err(LevelDataError::NonFinite { what: "collectible", index: 0 })
        ));

        let mut level = LevelDefinition::builtin_course();
        level.start_health = 0;
        assert!(matches!(
            level.validate(),
            Err(LevelDataError::InvalidStartHealth(0))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            LevelDefinition::from_json("{ \"name\": 3 }"),
            Err(LevelDataError::Json(_))
        ));
    }

    #[test]
    fn test_catalog_load() {
        let catalog = LevelCatalog::builtin();
        assert_eq!(catalog.level_ids(), vec!["Meadow", "Gauntlet"]);
        assert_eq!(catalog.load(1).unwrap().name, "Gauntlet");
        assert!(matches!(
            catalog.load(2),
            Err(LevelDataError::UnknownLevel { index: 2, count: 2 })
        ));
        assert!(matches!(
            LevelCatalog::new(Vec::new()),
            Err(LevelDataError::EmptyCatalog)
        ));
    }

    #[test]
    fn test_catalog_from_json_roundtrip() {
        let json = LevelDefinition::builtin_course().to_json().unwrap();
        let catalog = LevelCatalog::from_json_documents([json.as_str()]).unwrap();
        assert_eq!(catalog.load(0).unwrap(), LevelDefinition::builtin_course());
    }

    #[test]
    fn test_spawn_shooter_caps_health() {
        let mut level = LevelDefinition::builtin_course();
        level.start_health = 10;
        let settings = Settings::default();
        let shooter = level.spawn_shooter(&settings);
        assert_eq!(shooter.health, settings.max_health);
        assert!(shooter.on_ground);
    }
}
