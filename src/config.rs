//! Runtime player configuration loaded from `assets/player.toml`.
//!
//! [`PlayerConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`] and additionally carries the evolution roster and the
//! audio clip pools.  At startup, [`load_player_config`] reads
//! `assets/player.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about.
//!
//! ## Tuning workflow
//!
//! 1. Edit `assets/player.toml`.
//! 2. Restart the game; no recompilation required.
//!
//! An override that fails validation (empty roster, zero threshold, negative
//! drag, …) is rejected as a whole and the defaults stay in place.

use crate::constants::*;
use crate::error::{ControllerError, ControllerResult};
use crate::player::{EvolutionStage, StageRoster, Tuning};
use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;

/// Asset paths for the three cue pools.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SfxConfig {
    pub strain: Vec<String>,
    pub pop: Vec<String>,
    pub spit: Vec<String>,
}

impl Default for SfxConfig {
    fn default() -> Self {
        let pool = |stem: &str, n: usize| -> Vec<String> {
            (0..n).map(|i| format!("sfx/{stem}_{i}.ogg")).collect()
        };
        Self {
            strain: pool("strain", 2),
            pop: pool("pop", 3),
            spit: pool("spit", 3),
        }
    }
}

/// Runtime-tunable player configuration.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    // ── Locomotion ───────────────────────────────────────────────────────────
    pub drag_x: f32,
    pub drag_z: f32,
    pub gravity: f32,

    // ── Input dead-zones ─────────────────────────────────────────────────────
    pub dead_zone_left_x: f32,
    pub dead_zone_left_y: f32,
    pub dead_zone_right: f32,
    pub dead_zone_fire: f32,

    // ── Actions ──────────────────────────────────────────────────────────────
    pub fire_time: f32,
    pub start_time: f32,

    // ── Audio ────────────────────────────────────────────────────────────────
    /// Seed for clip selection; fixed so sessions are reproducible.
    pub cue_seed: u64,
    pub sfx: SfxConfig,

    // ── Evolution ────────────────────────────────────────────────────────────
    pub stages: Vec<EvolutionStage>,
    /// sRGB tint of the blob for each stage `avatar` key.
    pub avatars: HashMap<String, [f32; 3]>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            drag_x: DRAG_X,
            drag_z: DRAG_Z,
            gravity: GRAVITY,
            dead_zone_left_x: DEAD_ZONE_LEFT_X,
            dead_zone_left_y: DEAD_ZONE_LEFT_Y,
            dead_zone_right: DEAD_ZONE_RIGHT,
            dead_zone_fire: DEAD_ZONE_FIRE,
            fire_time: FIRE_TIME,
            start_time: START_TIME,
            cue_seed: DEFAULT_CUE_SEED,
            sfx: SfxConfig::default(),
            stages: default_stages(),
            avatars: default_avatars(),
        }
    }
}

/// Four-stage roster used when no override is present.
pub fn default_stages() -> Vec<EvolutionStage> {
    let stage = |name: &str, damage: u32, threshold: u32, min: f32, max: f32, speed: f32| EvolutionStage {
        name: name.to_string(),
        attack_damage: damage,
        energy_until_next: threshold,
        scale_min: min,
        scale_max: max,
        move_speed_scale: speed,
        avatar: name.to_lowercase(),
    };
    vec![
        stage("Droplet", 1, 10, 0.6, 1.0, 1.0),
        stage("Blob", 2, 25, 1.0, 1.6, 0.9),
        stage("Oozer", 4, 50, 1.6, 2.4, 0.8),
        stage("Colossus", 8, 100, 2.4, 3.5, 0.7),
    ]
}

/// Tints for the default roster's avatar keys.
pub fn default_avatars() -> HashMap<String, [f32; 3]> {
    [
        ("droplet", [0.55, 0.85, 1.0]),
        ("blob", [0.35, 0.9, 0.45]),
        ("oozer", [0.75, 0.85, 0.2]),
        ("colossus", [0.6, 0.3, 0.85]),
    ]
    .into_iter()
    .map(|(key, tint)| (key.to_string(), tint))
    .collect()
}

impl PlayerConfig {
    pub fn tuning(&self) -> Tuning {
        Tuning {
            drag: Vec2::new(self.drag_x, self.drag_z),
            dead_zone_left: Vec2::new(self.dead_zone_left_x, self.dead_zone_left_y),
            dead_zone_right: self.dead_zone_right,
            dead_zone_fire: self.dead_zone_fire,
            gravity: self.gravity,
            fire_time: self.fire_time,
            start_time: self.start_time,
        }
    }

    pub fn roster(&self) -> ControllerResult<StageRoster> {
        StageRoster::new(self.stages.clone())
    }

    /// Check tuning and roster together.
    pub fn validate(&self) -> ControllerResult<()> {
        self.tuning().validate()?;
        self.roster()?;
        Ok(())
    }

    /// Parse and validate a TOML override.  `path` is only used in errors.
    pub fn from_toml_str(contents: &str, path: &str) -> ControllerResult<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| ControllerError::ConfigParse {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Startup system: attempt to load `assets/player.toml` and overwrite the
/// `PlayerConfig` resource with it.
///
/// A missing file is not an error.  A file that fails to parse or validate is
/// logged and ignored.
pub fn load_player_config(mut config: ResMut<PlayerConfig>) {
    let path = PLAYER_CONFIG_PATH;
    match std::fs::read_to_string(path) {
        Ok(contents) => match PlayerConfig::from_toml_str(&contents, path) {
            Ok(loaded) => {
                *config = loaded;
                info!("Loaded player config from {path}");
            }
            Err(e) => {
                warn!("{e}; using defaults");
            }
        },
        Err(_) => {
            info!("No {path} found; using compiled defaults");
        }
    }
}
