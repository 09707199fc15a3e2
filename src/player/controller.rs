//! The per-frame player controller.
//!
//! [`PlayerController`] owns the character's mutable state and runs the four
//! responsibilities in dependency order each tick:
//!
//! 1. input normalisation ([`super::input::dead_zone_axes`])
//! 2. locomotion ([`super::locomotion`]) through the [`Mover`]
//! 3. facing ([`super::orientation`])
//! 4. actions: spit on cooldown, level-triggered suck ([`super::actions`])
//!
//! Evolution ([`super::evolution`]) is driven separately by
//! [`PlayerController::on_resource_collision`], which the host calls between
//! ticks on the same thread.
//!
//! The controller holds no collaborators: each entry point takes a `&mut impl
//! Rig`.  Hosts that can keep their collaborators alive across frames should
//! use [`PlayerHost`], which owns its rig from construction.

use super::actions::{trigger_held, FireCooldown, Phase, StartupGate};
use super::capabilities::{Consumable, Cue, CuePicker, Rig};
use super::evolution::{Evolution, EvolutionStage, StageRoster};
use super::input::{dead_zone_axes, ControllerInput};
use super::locomotion::{integrate_velocity, resolve_ground};
use super::orientation::facing_from_stick;
use crate::constants::*;
use crate::error::{validate_non_negative, validate_positive, ControllerResult};
use bevy::prelude::*;
use std::sync::Arc;

// ── Tuning ────────────────────────────────────────────────────────────────────

/// Fixed per-character tuning, validated at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Drag coefficients: `x` on world X, `y` on world Z.
    pub drag: Vec2,
    /// Per-axis left-stick dead-zone.
    pub dead_zone_left: Vec2,
    /// Squared-magnitude right-stick dead-zone.
    pub dead_zone_right: f32,
    /// Trigger threshold for both fire and suck.
    pub dead_zone_fire: f32,
    pub gravity: f32,
    pub fire_time: f32,
    pub start_time: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            drag: Vec2::new(DRAG_X, DRAG_Z),
            dead_zone_left: Vec2::new(DEAD_ZONE_LEFT_X, DEAD_ZONE_LEFT_Y),
            dead_zone_right: DEAD_ZONE_RIGHT,
            dead_zone_fire: DEAD_ZONE_FIRE,
            gravity: GRAVITY,
            fire_time: FIRE_TIME,
            start_time: START_TIME,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> ControllerResult<()> {
        validate_non_negative("drag_x", self.drag.x)?;
        validate_non_negative("drag_z", self.drag.y)?;
        validate_non_negative("dead_zone_left_x", self.dead_zone_left.x)?;
        validate_non_negative("dead_zone_left_y", self.dead_zone_left.y)?;
        validate_non_negative("dead_zone_right", self.dead_zone_right)?;
        validate_non_negative("dead_zone_fire", self.dead_zone_fire)?;
        validate_non_negative("gravity", self.gravity)?;
        validate_positive("fire_time", self.fire_time)?;
        validate_non_negative("start_time", self.start_time)?;
        Ok(())
    }
}

// ── Collision outcome ─────────────────────────────────────────────────────────

/// What happened when the player touched a [`Consumable`].
#[derive(Debug)]
pub enum Contact<C> {
    /// The object was ready: its energy was credited and it was destroyed.
    Consumed {
        energy: u32,
        promoted_to: Option<usize>,
    },
    /// The object was not ready.  It is returned untouched; harm is the
    /// host's business.
    Harmful(C),
}

// ── Controller ────────────────────────────────────────────────────────────────

/// Runtime state and behaviour of the player character.
#[derive(Component)]
pub struct PlayerController {
    tuning: Tuning,
    evolution: Evolution,
    velocity: Vec3,
    facing: Quat,
    fire: FireCooldown,
    gate: StartupGate,
    left_stick: Vec2,
    right_stick: Vec2,
    visible: bool,
    picker: Box<dyn CuePicker + Send + Sync>,
}

impl PlayerController {
    /// Build a controller at stage 0 with zero energy and a full start timer.
    ///
    /// Fails if `tuning` holds an unsafe constant.  The roster was validated
    /// when it was built.
    pub fn new(
        roster: Arc<StageRoster>,
        tuning: Tuning,
        picker: impl CuePicker + Send + Sync + 'static,
    ) -> ControllerResult<Self> {
        tuning.validate()?;
        Ok(Self {
            tuning,
            evolution: Evolution::new(roster),
            velocity: Vec3::ZERO,
            facing: Quat::IDENTITY,
            fire: FireCooldown::new(tuning.fire_time),
            gate: StartupGate::new(tuning.start_time),
            left_stick: Vec2::ZERO,
            right_stick: Vec2::ZERO,
            visible: false,
            picker: Box::new(picker),
        })
    }

    // ── Observers ─────────────────────────────────────────────────────────────

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn facing(&self) -> Quat {
        self.facing
    }

    pub fn stage_index(&self) -> usize {
        self.evolution.stage_index()
    }

    pub fn stage_energy(&self) -> u32 {
        self.evolution.stage_energy()
    }

    pub fn current_stage(&self) -> &EvolutionStage {
        self.evolution.current()
    }

    pub fn scale(&self) -> f32 {
        self.evolution.scale()
    }

    pub fn fire_timer(&self) -> f32 {
        self.fire.timer()
    }

    pub fn start_timer(&self) -> f32 {
        self.gate.remaining()
    }

    pub fn is_active(&self) -> bool {
        self.gate.is_open()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Dead-zone filtered left stick from the last active tick.
    pub fn left_stick(&self) -> Vec2 {
        self.left_stick
    }

    /// Raw right stick from the last active tick.
    pub fn right_stick(&self) -> Vec2 {
        self.right_stick
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Spawn-time setup: apply stage 0, hide, arm the start timer, strain.
    ///
    /// With a zero start time the character is revealed immediately.
    pub fn init(&mut self, rig: &mut impl Rig) {
        self.announce_stage(rig);

        self.visible = false;
        rig.set_visible(false);
        self.gate = StartupGate::new(self.tuning.start_time);
        self.play_cue(Cue::Strain, rig);

        if self.gate.is_open() {
            self.reveal(rig);
        }
    }

    /// Advance one simulation frame.
    ///
    /// While the start timer runs nothing else happens: no input is read, no
    /// velocity changes, nothing fires or sucks.
    pub fn tick(&mut self, dt: f32, input: &ControllerInput, rig: &mut impl Rig) -> Phase {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        match self.gate.advance(dt) {
            Phase::Dormant => return Phase::Dormant,
            Phase::Revealed => {
                self.reveal(rig);
                return Phase::Revealed;
            }
            Phase::Active => {}
        }

        let tuning = self.tuning;

        self.left_stick = dead_zone_axes(input.left_stick, tuning.dead_zone_left);
        self.right_stick = input.right_stick;

        let speed_scale = self.evolution.current().move_speed_scale;
        self.velocity = integrate_velocity(
            self.velocity,
            self.left_stick,
            speed_scale,
            tuning.gravity,
            tuning.drag,
            dt,
        );
        let report = rig.move_by(self.velocity * dt);
        self.velocity = resolve_ground(self.velocity, report.grounded);

        if let Some(facing) = facing_from_stick(self.right_stick, tuning.dead_zone_right) {
            self.facing = facing;
            rig.face(facing);
        }

        self.fire.tick(dt);
        if self.fire.try_fire(input.fire, tuning.dead_zone_fire) {
            self.spit(rig);
        }

        if trigger_held(input.suck, tuning.dead_zone_fire) {
            rig.start_suck();
        } else {
            rig.end_suck();
        }

        Phase::Active
    }

    /// Handle contact with a consumable object.
    ///
    /// A ready object is destroyed and its energy credited in the same call;
    /// anything else is handed back as [`Contact::Harmful`].
    pub fn on_resource_collision<C: Consumable>(
        &mut self,
        resource: C,
        rig: &mut impl Rig,
    ) -> Contact<C> {
        if !resource.is_ready() {
            return Contact::Harmful(resource);
        }
        let energy = resource.energy();
        resource.destroy();
        let promoted_to = self.consume(energy, rig);
        Contact::Consumed {
            energy,
            promoted_to,
        }
    }

    /// Credit `energy`, rescale, and promote once if the threshold is reached.
    pub fn consume(&mut self, energy: u32, rig: &mut impl Rig) -> Option<usize> {
        let growth = self.evolution.consume(energy);
        rig.set_scale(growth.scale);
        if growth.promoted_to.is_some() {
            self.announce_stage(rig);
        }
        growth.promoted_to
    }

    /// Jump forward to stage `index`, resetting energy.
    pub fn transition_to(&mut self, index: usize, rig: &mut impl Rig) -> ControllerResult<()> {
        self.evolution.transition_to(index)?;
        self.announce_stage(rig);
        Ok(())
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn announce_stage(&self, rig: &mut impl Rig) {
        let index = self.evolution.stage_index();
        let stage = self.evolution.current();
        rig.set_avatar(&stage.avatar);
        rig.set_scale(stage.scale_min);
        rig.set_evolution_stage(index);
        info!("[evolution] entered stage {} '{}'", index, stage.name);
    }

    fn reveal(&mut self, rig: &mut impl Rig) {
        self.play_cue(Cue::Pop, rig);
        self.visible = true;
        rig.set_visible(true);
        info!("[player] revealed");
    }

    fn spit(&mut self, rig: &mut impl Rig) {
        let damage = self.evolution.current().attack_damage;
        let position = rig.position();
        rig.spawn_projectile(position, self.facing).set_damage(damage);

        if !rig.is_playing() {
            self.play_cue(Cue::Spit, rig);
        }
    }

    fn play_cue(&mut self, cue: Cue, rig: &mut impl Rig) {
        match self.picker.pick(rig.clip_count(cue)) {
            Some(clip) => rig.play(cue, clip),
            None => debug!("[audio] no clips for {:?}", cue),
        }
    }
}

// ── Owned-rig host ────────────────────────────────────────────────────────────

/// A controller bundled with the collaborators injected at construction.
pub struct PlayerHost<R: Rig> {
    controller: PlayerController,
    rig: R,
}

impl<R: Rig> PlayerHost<R> {
    pub fn new(controller: PlayerController, rig: R) -> Self {
        Self { controller, rig }
    }

    pub fn controller(&self) -> &PlayerController {
        &self.controller
    }

    pub fn rig(&self) -> &R {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut R {
        &mut self.rig
    }

    pub fn init(&mut self) {
        self.controller.init(&mut self.rig);
    }

    pub fn tick(&mut self, dt: f32, input: &ControllerInput) -> Phase {
        self.controller.tick(dt, input, &mut self.rig)
    }

    pub fn on_resource_collision<C: Consumable>(&mut self, resource: C) -> Contact<C> {
        self.controller.on_resource_collision(resource, &mut self.rig)
    }

    pub fn into_parts(self) -> (PlayerController, R) {
        (self.controller, self.rig)
    }
}
