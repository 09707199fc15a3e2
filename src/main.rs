use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier3d::prelude::*;
use goo_evolution::constants::CAMERA_EYE;
use goo_evolution::player::{EvolutionStageChanged, Goo, GooState, PlayerHarmed, PlayerPlugin};
use rand::Rng;

/// Number of goo blobs scattered at startup.
const INITIAL_GOO: usize = 40;

/// Half-extent of the square arena floor.
const ARENA_HALF: f32 = 25.0;

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(CAMERA_EYE).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(8.0, 20.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Arena floor: the character controller rests on this.
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(ARENA_HALF * 2.0, 0.2, ARENA_HALF * 2.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.15, 0.18, 0.16))),
        Collider::cuboid(ARENA_HALF, 0.1, ARENA_HALF),
        Transform::from_xyz(0.0, -0.1, 0.0),
    ));
}

/// Scatter goo across the arena; roughly a third start hostile.
fn spawn_initial_goo(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut rng = rand::thread_rng();
    let mesh = meshes.add(Sphere::new(0.35));
    let ready_mat = materials.add(Color::srgb(0.35, 0.9, 0.35));
    let hostile_mat = materials.add(Color::srgb(0.9, 0.3, 0.3));

    for _ in 0..INITIAL_GOO {
        let x = rng.gen_range(-ARENA_HALF + 2.0..ARENA_HALF - 2.0);
        let z = rng.gen_range(-ARENA_HALF + 2.0..ARENA_HALF - 2.0);
        let (state, material) = if rng.gen_bool(0.33) {
            (GooState::Hostile, hostile_mat.clone())
        } else {
            (GooState::Ready, ready_mat.clone())
        };
        commands.spawn((
            Goo {
                state,
                energy: rng.gen_range(1..=5),
            },
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material),
            RigidBody::Dynamic,
            Collider::ball(0.35),
            ActiveEvents::COLLISION_EVENTS,
            Transform::from_xyz(x, 0.5, z),
        ));
    }

    println!("✓ Spawned {INITIAL_GOO} goo blobs");
}

/// Stand-in for the enemy spawner: report stage changes and harm.
fn log_player_events(
    mut stage_changes: MessageReader<EvolutionStageChanged>,
    mut harmed: MessageReader<PlayerHarmed>,
) {
    for change in stage_changes.read() {
        info!("[spawner] player reached stage {}", change.stage);
    }
    for hit in harmed.read() {
        info!("[combat] player touched hostile goo {:?}", hit.source);
    }
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Goo Evolution".into(),
                resolution: WindowResolution::new(1200, 680),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .add_plugins(PlayerPlugin)
        .add_systems(Startup, (setup_scene, spawn_initial_goo))
        .add_systems(Update, log_player_events)
        .run();
}
