//! Player-side ECS components, resources, and messages.
//!
//! The controller's own state lives in [`super::PlayerController`]; the items
//! here are the ECS-facing data that its Bevy adapters read and write, plus
//! the components other systems (goo AI, spawner, renderer) share with it.

use crate::config::SfxConfig;
use bevy::prelude::*;
use std::collections::HashMap;
use std::path::Path;

// ── Components ─────────────────────────────────────────────────────────────────

/// Marker component for the player blob entity.
#[derive(Component)]
pub struct Player;

/// Lifecycle of a goo enemy as seen by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GooState {
    /// Still an enemy; touching it hurts.
    #[default]
    Hostile,
    /// Converted to goo; touching it feeds the player.
    Ready,
}

/// An enemy that can eventually be eaten for energy.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Goo {
    pub state: GooState,
    pub energy: u32,
}

/// A fired spitball.  Flight is handled elsewhere.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Spitball {
    pub damage: u32,
}

/// Whether the suck effect is engaged this frame.
///
/// Written every active tick.  This is the seam for an external suck effect
/// (pull radius, particles); nothing in this crate consumes it.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sucking(pub bool);

/// The avatar currently shown for the player's stage.
#[derive(Component, Debug, Clone, Default)]
pub struct Avatar {
    /// Stage avatar key, as configured.
    pub key: String,
    /// Material applied to the blob mesh; default when the key has no tint.
    pub material: Handle<StandardMaterial>,
}

/// Marker for the entity currently playing the player's voice.
///
/// At most one exists; it despawns itself when its clip finishes.
#[derive(Component)]
pub struct PlayerVoice;

// ── Resources ──────────────────────────────────────────────────────────────────

/// Loaded clip handles for each cue pool.
#[derive(Resource, Debug, Clone, Default)]
pub struct SfxPools {
    pub strain: Vec<Handle<AudioSource>>,
    pub pop: Vec<Handle<AudioSource>>,
    pub spit: Vec<Handle<AudioSource>>,
}

impl SfxPools {
    /// Load every configured clip found under `root` through the asset server.
    ///
    /// A clip missing on disk is left out of its pool with a warning; a voice
    /// started from a handle that never loads would never finish.
    pub fn load(config: &SfxConfig, assets: &AssetServer, root: &Path) -> Self {
        let load = |paths: &[String]| -> Vec<Handle<AudioSource>> {
            clips_on_disk(paths, root)
                .into_iter()
                .map(|p| assets.load(p))
                .collect()
        };
        Self {
            strain: load(&config.strain),
            pop: load(&config.pop),
            spit: load(&config.spit),
        }
    }
}

/// The subset of `paths` that exist under `root`, in order.
pub fn clips_on_disk(paths: &[String], root: &Path) -> Vec<String> {
    paths
        .iter()
        .filter(|p| {
            let found = root.join(p).is_file();
            if !found {
                warn!("[audio] clip {p} not found under {}; skipped", root.display());
            }
            found
        })
        .cloned()
        .collect()
}

/// Blob material for each avatar key, built once from [`crate::config::PlayerConfig::avatars`].
#[derive(Resource, Debug, Clone, Default)]
pub struct AvatarMaterials(pub HashMap<String, Handle<StandardMaterial>>);

// ── Messages ───────────────────────────────────────────────────────────────────

/// Written on every evolution stage change so spawners can scale with the player.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvolutionStageChanged {
    pub stage: usize,
}

/// Written when the player touches goo that is still hostile.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerHarmed {
    pub source: Entity,
}
