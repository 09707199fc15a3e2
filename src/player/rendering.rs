//! Blob and spitball visuals.
//!
//! | Layer          | Technology                     | Driven by                          |
//! |----------------|--------------------------------|------------------------------------|
//! | Blob body      | `Mesh3d` sphere                | `Transform::scale` (growth)        |
//! | Blob tint      | `MeshMaterial3d` per avatar key| `Presentation::set_avatar` (stage) |
//! | Blob visibility| `Visibility`                   | `Presentation::set_visible`        |
//! | Spitball       | `Mesh3d` small sphere          | spawned with every `Spitball`      |
//!
//! Every system here tolerates a headless app: without mesh or material
//! asset stores nothing is attached and the controller runs unchanged.

use super::state::{AvatarMaterials, Player, Spitball};
use crate::config::PlayerConfig;
use crate::constants::{PLAYER_COLLIDER_RADIUS, SPITBALL_RADIUS};
use bevy::prelude::*;

/// Startup system: one material per configured avatar key.
pub fn build_avatar_materials(
    config: Res<PlayerConfig>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
    mut avatars: ResMut<AvatarMaterials>,
) {
    let Some(mut materials) = materials else {
        return;
    };
    for (key, [r, g, b]) in &config.avatars {
        let handle = materials.add(StandardMaterial {
            base_color: Color::srgb(*r, *g, *b),
            perceptual_roughness: 0.35,
            ..default()
        });
        avatars.0.insert(key.clone(), handle);
    }
    info!("Built {} avatar materials", avatars.0.len());
}

/// Attach the sphere mesh to the player blob on spawn.
///
/// The material is swapped in by the controller's first `set_avatar`; the
/// sphere matches the collider at scale 1.0 so growth scales both together.
pub fn attach_blob_mesh_system(
    mut commands: Commands,
    query: Query<Entity, Added<Player>>,
    meshes: Option<ResMut<Assets<Mesh>>>,
) {
    let Some(mut meshes) = meshes else {
        return;
    };
    for entity in query.iter() {
        let mesh = meshes.add(Sphere::new(PLAYER_COLLIDER_RADIUS));
        commands.entity(entity).insert(Mesh3d(mesh));
    }
}

/// Attach a small sphere to every newly spat spitball.
pub fn attach_spitball_mesh_system(
    mut commands: Commands,
    query: Query<Entity, Added<Spitball>>,
    meshes: Option<ResMut<Assets<Mesh>>>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let (Some(mut meshes), Some(mut materials)) = (meshes, materials) else {
        return;
    };
    if query.is_empty() {
        return;
    }
    let mesh = meshes.add(Sphere::new(SPITBALL_RADIUS));
    let material = materials.add(Color::srgb(0.7, 0.95, 0.6));
    for entity in query.iter() {
        commands
            .entity(entity)
            .insert((Mesh3d(mesh.clone()), MeshMaterial3d(material.clone())));
    }
}
