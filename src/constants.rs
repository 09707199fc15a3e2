//! Centralised tuning constants for the player controller.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place.  [`crate::config::PlayerConfig::default`] mirrors
//! every value below; `assets/player.toml` may override any subset at startup.
//!
//! ## Tuning guidance
//!
//! Movement is frame-accumulated: stick input is added to velocity every tick
//! and bled off by drag, so terminal speed is roughly
//! `stick * move_speed_scale / (drag * dt)`.  Raising drag tightens control,
//! lowering it makes the blob slide.

use bevy::math::Vec3;

// ── Locomotion ────────────────────────────────────────────────────────────────

/// Drag coefficient on world X.
///
/// Applied as `v /= 1 + k * dt`, so velocity decays toward zero without ever
/// reversing sign.  Tested range: 5.0–20.0.
pub const DRAG_X: f32 = 10.0;

/// Drag coefficient on world Z (depth axis, driven by left stick Y).
pub const DRAG_Z: f32 = 10.0;

/// Downward acceleration (u/s²) integrated into vertical velocity every tick.
///
/// The physics engine does not apply gravity to kinematic bodies, so the
/// controller integrates it itself.
pub const GRAVITY: f32 = 9.8;

// ── Input dead-zones ──────────────────────────────────────────────────────────

/// Per-axis dead-zone on the left stick X component.
///
/// Each axis is filtered independently (square dead-zone, not circular).
pub const DEAD_ZONE_LEFT_X: f32 = 0.4;

/// Per-axis dead-zone on the left stick Y component.
pub const DEAD_ZONE_LEFT_Y: f32 = 0.4;

/// Threshold on the right stick's **squared** magnitude below which facing is held.
pub const DEAD_ZONE_RIGHT: f32 = 0.1;

/// Trigger threshold shared by the fire and suck triggers.
pub const DEAD_ZONE_FIRE: f32 = 0.1;

// ── Actions ───────────────────────────────────────────────────────────────────

/// Seconds between consecutive spitballs.
pub const FIRE_TIME: f32 = 0.5;

/// Seconds the blob strains, invisible and inert, before popping into view.
pub const START_TIME: f32 = 2.0;

// ── Config / audio ────────────────────────────────────────────────────────────

/// Path of the optional TOML override file, relative to the working directory.
pub const PLAYER_CONFIG_PATH: &str = "assets/player.toml";

/// Directory the asset server reads from; audio clips are checked against it.
pub const ASSET_ROOT: &str = "assets";

/// Seed for the cue picker when no explicit seed is configured.
pub const DEFAULT_CUE_SEED: u64 = 0x60_0D_B10B;

// ── Physics body ──────────────────────────────────────────────────────────────

/// Radius of the player's ball collider at scale 1.0.
pub const PLAYER_COLLIDER_RADIUS: f32 = 0.5;

/// Height above the ground plane at which the player spawns.
pub const PLAYER_SPAWN_HEIGHT: f32 = 1.0;

/// Radius of a spitball's visual sphere.
pub const SPITBALL_RADIUS: f32 = 0.15;

// ── Demo scene ────────────────────────────────────────────────────────────────

/// Eye position of the demo camera, which looks at the origin.
///
/// Screen-up is world -Z from here; the input samplers rely on it.
pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 30.0, 18.0);
