//! Player module: the blob's controller core, its capability seams, and the
//! Bevy plumbing that drives it.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`input`] | `ControllerInput` resource, per-axis dead-zone, keyboard / gamepad sampling |
//! | [`locomotion`] | Velocity integration, proportional drag, ground resolution |
//! | [`orientation`] | Right-stick facing with squared-magnitude dead-zone |
//! | [`evolution`] | Stage roster, energy accumulation, growth scale, promotion |
//! | [`actions`] | Startup gate, fire cooldown, trigger checks |
//! | [`capabilities`] | Traits the controller drives (`Mover`, `Spawner`, `CueSink`, …) |
//! | [`controller`] | `PlayerController`: `init`, `tick`, `on_resource_collision` |
//! | [`state`] | ECS components, resources, and messages shared with other systems |
//! | [`rig`] | Bevy adapters implementing the capabilities, and the driving systems |
//! | [`rendering`] | Blob and spitball meshes, per-stage avatar materials |
//!
//! All public items are re-exported at this level so that the rest of the crate
//! can use flat `crate::player::*` imports without knowing the sub-module layout.

pub mod actions;
pub mod capabilities;
pub mod controller;
pub mod evolution;
pub mod input;
pub mod locomotion;
pub mod orientation;
pub mod rendering;
pub mod rig;
pub mod state;

// ── Flat re-exports ───────────────────────────────────────────────────────────

pub use actions::{FireCooldown, Phase, StartupGate};
pub use capabilities::{
    Consumable, Cue, CuePicker, CueSink, MoveReport, Mover, Presentation, ProjectileFactory,
    ProjectileHandle, Rig, Spawner, Sucker,
};
pub use controller::{Contact, PlayerController, PlayerHost, Tuning};
pub use evolution::{Evolution, EvolutionStage, Growth, StageRoster};
pub use input::{ControllerInput, PreferredGamepad};
pub use rig::{
    contact_partners, goo_consumption_system, player_init_system, player_tick_system, BevyRig,
    GooContact, Voice,
};
pub use state::{
    Avatar, AvatarMaterials, EvolutionStageChanged, Goo, GooState, Player, PlayerHarmed,
    PlayerVoice, SfxPools, Spitball, Sucking,
};

// ── Plugin ────────────────────────────────────────────────────────────────────

use crate::config::{load_player_config, PlayerConfig};
use crate::constants::{ASSET_ROOT, PLAYER_COLLIDER_RADIUS, PLAYER_SPAWN_HEIGHT};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::sync::Arc;

/// Registers the player's resources, messages, and systems.
///
/// Expects a Rapier physics plugin to be added separately; it provides the
/// `CollisionEvent` messages and resolves the character controller.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<EvolutionStageChanged>()
            .add_message::<PlayerHarmed>()
            .init_resource::<PlayerConfig>()
            .init_resource::<ControllerInput>()
            .init_resource::<PreferredGamepad>()
            .init_resource::<SfxPools>()
            .init_resource::<AvatarMaterials>()
            .add_systems(
                Startup,
                (
                    // Load config first so the pools and the spawn see the final values.
                    load_player_config,
                    load_sfx_pools.after(load_player_config),
                    rendering::build_avatar_materials.after(load_player_config),
                    spawn_player.after(load_player_config),
                ),
            )
            .add_systems(
                Update,
                (
                    input::gamepad_connection_system,
                    input::input_clear_system,
                    input::keyboard_input_system,
                    input::gamepad_input_system,
                    rendering::attach_blob_mesh_system,
                    player_init_system,
                    player_tick_system,
                    rendering::attach_spitball_mesh_system,
                )
                    .chain(),
            )
            // Collision events and the character controller output are both
            // written during Rapier's writeback.
            .add_systems(
                PostUpdate,
                goo_consumption_system.after(PhysicsSet::Writeback),
            );
    }
}

/// Startup system: load every configured clip into [`SfxPools`].
///
/// Without an asset server (headless runs) the pools stay empty and every cue
/// is silently skipped.  Clips missing from disk are skipped the same way.
pub fn load_sfx_pools(
    mut pools: ResMut<SfxPools>,
    config: Res<PlayerConfig>,
    assets: Option<Res<AssetServer>>,
) {
    if let Some(assets) = assets {
        *pools = SfxPools::load(&config.sfx, &assets, Path::new(ASSET_ROOT));
    }
}

/// Build a controller from `config`, or explain why it cannot be built.
pub fn build_controller(config: &PlayerConfig) -> crate::error::ControllerResult<PlayerController> {
    let roster = Arc::new(config.roster()?);
    PlayerController::new(roster, config.tuning(), StdRng::seed_from_u64(config.cue_seed))
}

/// Spawn the player blob above the origin, hidden until its start timer runs out.
///
/// The blob is a kinematic ball moved by Rapier's character controller; it
/// reports collision events so goo contacts reach [`goo_consumption_system`].
pub fn spawn_player(mut commands: Commands, config: Res<PlayerConfig>) {
    let controller = match build_controller(&config) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Player not spawned: {e}");
            return;
        }
    };

    commands.spawn((
        Player,
        controller,
        Sucking::default(),
        Avatar::default(),
        // Physics
        RigidBody::KinematicPositionBased,
        Collider::ball(PLAYER_COLLIDER_RADIUS),
        KinematicCharacterController::default(),
        ActiveEvents::COLLISION_EVENTS,
        // Transform / visibility
        Transform::from_xyz(0.0, PLAYER_SPAWN_HEIGHT, 0.0),
        Visibility::Hidden,
    ));

    info!("Player spawned at origin");
}
