//! Bevy adapters: ECS data presented to the controller as a [`Rig`], and the
//! systems that drive [`PlayerController`] from the app schedule.
//!
//! ## Systems
//!
//! | System                       | Schedule     | Entry point                     |
//! |------------------------------|--------------|---------------------------------|
//! | [`player_init_system`]       | `Update`     | `init` on newly spawned players |
//! | [`player_tick_system`]       | `Update`     | `tick` once per frame           |
//! | [`goo_consumption_system`]   | `PostUpdate` | `on_resource_collision`         |
//!
//! The Rapier character controller resolves motion during the physics step,
//! so the grounded flag reported by [`BevyRig::move_by`] is the one computed
//! for the previous frame's translation.
//!
//! The character controller keeps a small skin gap around the blob, so it
//! rarely produces a contact with the goo it walks into.  Goo it bumps is
//! read from [`KinematicCharacterControllerOutput::collisions`] instead, and
//! merged with ordinary `CollisionEvent::Started` contacts.

use super::capabilities::{
    Consumable, Cue, CueSink, MoveReport, Mover, Presentation, ProjectileFactory, ProjectileHandle,
    Spawner, Sucker,
};
use super::controller::{Contact, PlayerController};
use super::input::ControllerInput;
use super::state::{
    Avatar, AvatarMaterials, EvolutionStageChanged, Goo, GooState, Player, PlayerHarmed,
    PlayerVoice, SfxPools, Spitball, Sucking,
};
use bevy::audio::AudioSinkPlayback;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

// ── Rig ───────────────────────────────────────────────────────────────────────

/// The player's voice entity and whether its clip is still audible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voice {
    pub entity: Entity,
    pub playing: bool,
}

impl Voice {
    /// A voice is playing once its sink exists and still has sound queued.
    pub fn from_sink(entity: Entity, sink: Option<&AudioSink>) -> Self {
        Self {
            entity,
            playing: sink.is_some_and(|s| !s.empty() && !s.is_paused()),
        }
    }
}

type VoiceQuery<'w, 's> = Query<'w, 's, (Entity, Option<&'static AudioSink>), With<PlayerVoice>>;

fn current_voice(q_voice: &VoiceQuery) -> Option<Voice> {
    q_voice
        .iter()
        .next()
        .map(|(entity, sink)| Voice::from_sink(entity, sink))
}

/// One frame's view of the player entity and the world around it.
pub struct BevyRig<'a, 'w, 's> {
    player: Entity,
    commands: &'a mut Commands<'w, 's>,
    transform: &'a mut Transform,
    body: &'a mut KinematicCharacterController,
    body_output: Option<&'a KinematicCharacterControllerOutput>,
    visibility: &'a mut Visibility,
    sucking: &'a mut Sucking,
    sfx: &'a SfxPools,
    voice: Option<Voice>,
    avatars: &'a AvatarMaterials,
    stage_changes: Vec<usize>,
}

impl<'a, 'w, 's> BevyRig<'a, 'w, 's> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        player: Entity,
        commands: &'a mut Commands<'w, 's>,
        transform: &'a mut Transform,
        body: &'a mut KinematicCharacterController,
        body_output: Option<&'a KinematicCharacterControllerOutput>,
        visibility: &'a mut Visibility,
        sucking: &'a mut Sucking,
        sfx: &'a SfxPools,
        voice: Option<Voice>,
        avatars: &'a AvatarMaterials,
    ) -> Self {
        Self {
            player,
            commands,
            transform,
            body,
            body_output,
            visibility,
            sucking,
            sfx,
            voice,
            avatars,
            stage_changes: Vec::new(),
        }
    }

    /// Release the borrows and hand back the stage indices entered this frame.
    pub fn into_stage_changes(self) -> Vec<usize> {
        self.stage_changes
    }

    fn pool(&self, cue: Cue) -> &[Handle<AudioSource>] {
        match cue {
            Cue::Strain => &self.sfx.strain,
            Cue::Pop => &self.sfx.pop,
            Cue::Spit => &self.sfx.spit,
        }
    }
}

impl Mover for BevyRig<'_, '_, '_> {
    fn move_by(&mut self, delta: Vec3) -> MoveReport {
        self.body.translation = Some(delta);
        MoveReport {
            grounded: self.body_output.is_some_and(|out| out.grounded),
        }
    }

    fn face(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
    }

    fn position(&self) -> Vec3 {
        self.transform.translation
    }
}

impl Spawner for BevyRig<'_, '_, '_> {
    fn set_evolution_stage(&mut self, index: usize) {
        self.stage_changes.push(index);
    }
}

struct SpitballCommands<'a>(EntityCommands<'a>);

impl ProjectileHandle for SpitballCommands<'_> {
    fn set_damage(&mut self, amount: u32) {
        self.0.insert(Spitball { damage: amount });
    }
}

impl ProjectileFactory for BevyRig<'_, '_, '_> {
    fn spawn_projectile(&mut self, position: Vec3, rotation: Quat) -> Box<dyn ProjectileHandle + '_> {
        let entity = self.commands.spawn((
            Spitball::default(),
            Transform::from_translation(position).with_rotation(rotation),
            Visibility::default(),
        ));
        Box::new(SpitballCommands(entity))
    }
}

impl CueSink for BevyRig<'_, '_, '_> {
    fn clip_count(&self, cue: Cue) -> usize {
        self.pool(cue).len()
    }

    fn is_playing(&self) -> bool {
        self.voice.is_some_and(|v| v.playing)
    }

    fn play(&mut self, cue: Cue, clip: usize) {
        let Some(handle) = self.pool(cue).get(clip).cloned() else {
            return;
        };
        if let Some(previous) = self.voice.take() {
            self.commands.entity(previous.entity).despawn();
        }
        let entity = self
            .commands
            .spawn((PlayerVoice, AudioPlayer::new(handle), PlaybackSettings::DESPAWN))
            .id();
        self.voice = Some(Voice {
            entity,
            playing: true,
        });
    }
}

impl Sucker for BevyRig<'_, '_, '_> {
    fn start_suck(&mut self) {
        self.sucking.0 = true;
    }

    fn end_suck(&mut self) {
        self.sucking.0 = false;
    }
}

impl Presentation for BevyRig<'_, '_, '_> {
    fn set_visible(&mut self, visible: bool) {
        *self.visibility = if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }

    fn set_avatar(&mut self, avatar: &str) {
        let material = self.avatars.0.get(avatar).cloned();
        let mut player = self.commands.entity(self.player);
        player.insert(Avatar {
            key: avatar.to_string(),
            material: material.clone().unwrap_or_default(),
        });
        match material {
            Some(material) => {
                player.insert(MeshMaterial3d(material));
            }
            None => debug!("[avatar] no material for '{avatar}'"),
        }
    }

    fn set_scale(&mut self, scale: f32) {
        self.transform.scale = Vec3::splat(scale);
    }
}

// ── Consumable goo ────────────────────────────────────────────────────────────

/// A goo entity touched by the player this frame.
///
/// Destroying it queues the entity in `eaten`; the system despawns the queue
/// once the controller is done with the frame's contacts.
pub struct GooContact<'a> {
    pub entity: Entity,
    pub goo: Goo,
    eaten: &'a mut Vec<Entity>,
}

impl Consumable for GooContact<'_> {
    fn is_ready(&self) -> bool {
        self.goo.state == GooState::Ready
    }

    fn energy(&self) -> u32 {
        self.goo.energy
    }

    fn destroy(self) {
        self.eaten.push(self.entity);
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

type PlayerBody = (
    Entity,
    &'static mut PlayerController,
    &'static mut Transform,
    &'static mut KinematicCharacterController,
    Option<Ref<'static, KinematicCharacterControllerOutput>>,
    &'static mut Visibility,
    &'static mut Sucking,
);

/// Run `init` on every player whose controller was just added.
#[allow(clippy::too_many_arguments)]
pub fn player_init_system(
    mut commands: Commands,
    mut q_player: Query<PlayerBody, (With<Player>, Added<PlayerController>)>,
    q_voice: VoiceQuery,
    sfx: Res<SfxPools>,
    avatars: Res<AvatarMaterials>,
    mut stage_changes: MessageWriter<EvolutionStageChanged>,
) {
    for (entity, mut controller, mut transform, mut body, output, mut visibility, mut sucking) in
        q_player.iter_mut()
    {
        let mut rig = BevyRig::new(
            entity,
            &mut commands,
            &mut transform,
            &mut body,
            output.as_deref(),
            &mut visibility,
            &mut sucking,
            &sfx,
            current_voice(&q_voice),
            &avatars,
        );
        controller.init(&mut rig);
        for stage in rig.into_stage_changes() {
            stage_changes.write(EvolutionStageChanged { stage });
        }
    }
}

/// Advance every player controller by one frame.
#[allow(clippy::too_many_arguments)]
pub fn player_tick_system(
    mut commands: Commands,
    mut q_player: Query<PlayerBody, With<Player>>,
    q_voice: VoiceQuery,
    input: Res<ControllerInput>,
    time: Res<Time>,
    sfx: Res<SfxPools>,
    avatars: Res<AvatarMaterials>,
    mut stage_changes: MessageWriter<EvolutionStageChanged>,
) {
    let dt = time.delta_secs();
    for (entity, mut controller, mut transform, mut body, output, mut visibility, mut sucking) in
        q_player.iter_mut()
    {
        let mut rig = BevyRig::new(
            entity,
            &mut commands,
            &mut transform,
            &mut body,
            output.as_deref(),
            &mut visibility,
            &mut sucking,
            &sfx,
            current_voice(&q_voice),
            &avatars,
        );
        controller.tick(dt, &input, &mut rig);
        for stage in rig.into_stage_changes() {
            stage_changes.write(EvolutionStageChanged { stage });
        }
    }
}

/// Everything `player` started touching this frame, each entity once.
///
/// `events` are Rapier contact events; `bumped` are the entities the
/// character controller was blocked by during its last move.
pub fn contact_partners<'e>(
    player: Entity,
    events: impl IntoIterator<Item = &'e CollisionEvent>,
    bumped: impl IntoIterator<Item = Entity>,
) -> Vec<Entity> {
    let started = events.into_iter().filter_map(|event| match event {
        CollisionEvent::Started(e1, e2, _) if *e1 == player => Some(*e2),
        CollisionEvent::Started(e1, e2, _) if *e2 == player => Some(*e1),
        _ => None,
    });

    let mut partners: Vec<Entity> = Vec::new();
    for other in started.chain(bumped) {
        if other != player && !partners.contains(&other) {
            partners.push(other);
        }
    }
    partners
}

/// Route player ↔ goo contacts to the controller.
///
/// Ready goo is eaten and despawned; hostile goo writes [`PlayerHarmed`].
/// A goo entity reported more than once in the same frame is only eaten once,
/// and goo the character controller keeps pushing against only counts on the
/// first frame of contact.
#[allow(clippy::too_many_arguments)]
pub fn goo_consumption_system(
    mut commands: Commands,
    mut collision_events: MessageReader<CollisionEvent>,
    mut bumping: Local<Vec<Entity>>,
    q_goo: Query<&Goo>,
    mut q_player: Query<PlayerBody, With<Player>>,
    q_voice: VoiceQuery,
    sfx: Res<SfxPools>,
    avatars: Res<AvatarMaterials>,
    mut stage_changes: MessageWriter<EvolutionStageChanged>,
    mut harmed: MessageWriter<PlayerHarmed>,
) {
    let Ok((player, mut controller, mut transform, mut body, output, mut visibility, mut sucking)) =
        q_player.single_mut()
    else {
        return;
    };

    // Only a fresh controller output describes this frame's move.
    let mut newly_bumped: Vec<Entity> = Vec::new();
    if let Some(out) = output.as_ref().filter(|out| out.is_changed()) {
        let hits: Vec<Entity> = out.collisions.iter().map(|hit| hit.entity).collect();
        newly_bumped = hits.iter().copied().filter(|e| !bumping.contains(e)).collect();
        *bumping = hits;
    }
    let partners = contact_partners(player, collision_events.read(), newly_bumped);

    let mut eaten: Vec<Entity> = Vec::new();
    let mut rig = BevyRig::new(
        player,
        &mut commands,
        &mut transform,
        &mut body,
        output.as_deref(),
        &mut visibility,
        &mut sucking,
        &sfx,
        current_voice(&q_voice),
        &avatars,
    );

    for other in partners {
        let Ok(goo) = q_goo.get(other) else {
            continue;
        };

        let contact = GooContact {
            entity: other,
            goo: *goo,
            eaten: &mut eaten,
        };
        match controller.on_resource_collision(contact, &mut rig) {
            Contact::Consumed {
                energy,
                promoted_to,
            } => {
                debug!(
                    "[goo] ate {:?} for {} energy (promoted: {:?})",
                    other, energy, promoted_to
                );
            }
            Contact::Harmful(contact) => {
                harmed.write(PlayerHarmed {
                    source: contact.entity,
                });
            }
        }
    }

    for stage in rig.into_stage_changes() {
        stage_changes.write(EvolutionStageChanged { stage });
    }
    for entity in eaten {
        commands.entity(entity).despawn();
    }
}
