//! Capability traits the controller drives.
//!
//! The controller never looks anything up; every collaborator is handed to it
//! as one of these traits.  A host implements all of them on a single type
//! (see [`Rig`]) so one `&mut` borrow covers the whole tick.
//!
//! | Trait                 | Collaborator                                     |
//! |-----------------------|--------------------------------------------------|
//! | [`Mover`]             | collision-aware character body                   |
//! | [`Spawner`]           | enemy / goo spawner that scales with progression |
//! | [`ProjectileFactory`] | spitball spawning                                |
//! | [`CueSink`]           | one audio voice plus three clip pools            |
//! | [`Sucker`]            | continuous suck effect                           |
//! | [`Presentation`]      | visibility, avatar, and visual scale             |
//! | [`Consumable`]        | world object that can be eaten                   |
//! | [`CuePicker`]         | uniform random clip choice                       |

use bevy::math::{Quat, Vec3};

/// Outcome of a [`Mover::move_by`] request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveReport {
    /// Downward motion was blocked by a surface.
    pub grounded: bool,
}

pub trait Mover {
    /// Displace by `delta`, resolving collisions.
    fn move_by(&mut self, delta: Vec3) -> MoveReport;
    /// Set the body's facing.
    fn face(&mut self, rotation: Quat);
    /// Current world position.
    fn position(&self) -> Vec3;
}

pub trait Spawner {
    /// Called on every stage transition, including the initial stage 0.
    fn set_evolution_stage(&mut self, index: usize);
}

pub trait ProjectileHandle {
    fn set_damage(&mut self, amount: u32);
}

pub trait ProjectileFactory {
    fn spawn_projectile(&mut self, position: Vec3, rotation: Quat) -> Box<dyn ProjectileHandle + '_>;
}

/// The three independent clip pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Played while the blob strains before appearing.
    Strain,
    /// Played when the blob pops into view.
    Pop,
    /// Played on a spitball, unless something is already playing.
    Spit,
}

pub trait CueSink {
    /// Number of clips in `cue`'s pool.  Zero disables the cue.
    fn clip_count(&self, cue: Cue) -> usize;
    fn is_playing(&self) -> bool;
    /// Replace whatever is playing with clip `clip` of `cue`'s pool.
    fn play(&mut self, cue: Cue, clip: usize);
}

pub trait Sucker {
    fn start_suck(&mut self);
    fn end_suck(&mut self);
}

pub trait Presentation {
    fn set_visible(&mut self, visible: bool);
    fn set_avatar(&mut self, avatar: &str);
    fn set_scale(&mut self, scale: f32);
}

/// Everything a controller needs for one tick.
pub trait Rig: Mover + Spawner + ProjectileFactory + CueSink + Sucker + Presentation {}

impl<T> Rig for T where T: Mover + Spawner + ProjectileFactory + CueSink + Sucker + Presentation {}

/// A world object the player can eat.
pub trait Consumable {
    /// Converted into edible goo; otherwise touching it harms the player.
    fn is_ready(&self) -> bool;
    fn energy(&self) -> u32;
    /// Remove the object from the world.  Takes `self` so it cannot be eaten twice.
    fn destroy(self);
}

/// Uniform choice of an index in `0..len`.
pub trait CuePicker {
    /// `None` when `len` is zero.
    fn pick(&mut self, len: usize) -> Option<usize>;
}

impl<R: rand::RngCore> CuePicker for R {
    fn pick(&mut self, len: usize) -> Option<usize> {
        use rand::Rng;
        (len > 0).then(|| self.gen_range(0..len))
    }
}
