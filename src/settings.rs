//! Game rules and tunables
//!
//! Loaded from a JSON file next to the binary; anything missing falls back to
//! the defaults in `crate::consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rule presets (the two constant sets the game has shipped with)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RulesPreset {
    /// Score pickups worth 5, bullets live until they leave the screen
    #[default]
    Standard,
    /// Score pickups worth 10, bullets expire after 2 seconds
    Arcade,
}

impl RulesPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            RulesPreset::Standard => "Standard",
            RulesPreset::Arcade => "Arcade",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "standard" | "std" => Some(RulesPreset::Standard),
            "arcade" => Some(RulesPreset::Arcade),
            _ => None,
        }
    }

    /// Score awarded per collected score pickup
    pub fn score_pickup_bonus(&self) -> u32 {
        match self {
            RulesPreset::Standard => 5,
            RulesPreset::Arcade => 10,
        }
    }

    /// Seconds a bullet stays alive
    pub fn bullet_lifespan(&self) -> f32 {
        match self {
            RulesPreset::Standard => 1000.0,
            RulesPreset::Arcade => 2.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Active rule preset
    pub preset: RulesPreset,

    // === Viewport / world ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Reaching `world_width` with the shooter's right edge finishes the level
    pub world_width: f32,
    pub ground_level: f32,
    pub left_boundary: f32,

    // === Shooter physics ===
    pub shooter_speed: f32,
    pub jump_speed: f32,
    pub gravity: f32,
    pub max_health: i32,

    // === Bullets ===
    pub bullet_speed: f32,
    pub bullet_size: f32,
    pub bullet_lifespan: f32,
    pub bullet_pool_size: usize,
    /// Scan every pool slot instead of the ammo-derived bound
    pub full_pool_scan: bool,

    // === Rewards ===
    pub score_pickup_bonus: u32,
    pub ammo_pickup_bonus: u32,
    pub chaser_kill_score: u32,
    pub patroller_kill_score: u32,

    /// Upper bound applied to each tick's dt (None = feed dt through as-is)
    pub max_dt: Option<f32>,
}

impl Default for Settings {
    fn default() -> Self {
        let preset = RulesPreset::default();
        Self {
            preset,

            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            world_width: WORLD_WIDTH,
            ground_level: GROUND_LEVEL,
            left_boundary: LEFT_BOUNDARY,

            shooter_speed: SHOOTER_SPEED,
            jump_speed: JUMP_SPEED,
            gravity: GRAVITY,
            max_health: START_HEALTH,

            bullet_speed: BULLET_SPEED,
            bullet_size: BULLET_SIZE,
            bullet_lifespan: preset.bullet_lifespan(),
            bullet_pool_size: BULLET_POOL_SIZE,
            full_pool_scan: false,

            score_pickup_bonus: preset.score_pickup_bonus(),
            ammo_pickup_bonus: AMMO_PICKUP_BONUS,
            chaser_kill_score: CHASER_KILL_SCORE,
            patroller_kill_score: PATROLLER_KILL_SCORE,

            max_dt: None,
        }
    }
}

impl Settings {
    /// Create settings from a rules preset (applies preset defaults)
    pub fn from_preset(preset: RulesPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a rules preset (updates preset-dependent values)
    pub fn apply_preset(&mut self, preset: RulesPreset) {
        self.preset = preset;
        self.score_pickup_bonus = preset.score_pickup_bonus();
        self.bullet_lifespan = preset.bullet_lifespan();
    }

    /// dt after the optional clamp
    pub fn effective_dt(&self, dt: f32) -> f32 {
        match self.max_dt {
            Some(max) => dt.min(max),
            None => dt,
        }
    }

    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from a JSON file
    pub fn read(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults if the file is missing or bad
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::read(path) {
            Ok(settings) => {
                log::info!(
                    "Loaded settings from {} (preset {})",
                    path.display(),
                    settings.preset.as_str()
                );
                settings
            }
            Err(e) => {
                log::warn!("{}: {}, using default settings", path.display(), e);
                Self::default()
            }
        }
    }

    /// Serialize settings for writing back to disk
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
