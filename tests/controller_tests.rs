//! Controller behaviour driven through [`PlayerHost`] with a recording rig.
//!
//! No Bevy app is built here: the rig records every capability call so each
//! test can assert exactly what the controller asked its collaborators to do.
//!
//! Covered scenarios:
//! 1. Startup gating: nothing moves, fires, or sucks until the reveal.
//! 2. Reveal happens exactly once, with a pop cue.
//! 3. Growth scale and single-step promotion on consumption.
//! 4. Ready resources are destroyed with their credit; hostile ones come back.
//! 5. Fire cooldown, damage stamping, and spit cue de-duplication.
//! 6. Level-triggered suck, held facing, grounded vertical reset.

use bevy::prelude::*;
use goo_evolution::player::{
    Consumable, Contact, ControllerInput, Cue, CueSink, EvolutionStage, MoveReport, Mover, Phase,
    PlayerController, PlayerHost, Presentation, ProjectileFactory, ProjectileHandle, Spawner,
    StageRoster, Sucker, Tuning,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

// ── Recording rig ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Move(Vec3),
    Face(Quat),
    Stage(usize),
    Projectile { position: Vec3, damage: Option<u32> },
    Play(Cue, usize),
    StartSuck,
    EndSuck,
    Visible(bool),
    Avatar(String),
    Scale(f32),
}

#[derive(Default)]
struct RecordingRig {
    calls: Vec<Call>,
    position: Vec3,
    grounded: bool,
    playing: bool,
    clips: usize,
}

impl RecordingRig {
    fn with_clips(clips: usize) -> Self {
        Self {
            clips,
            ..Default::default()
        }
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    fn last_scale(&self) -> Option<f32> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::Scale(s) => Some(*s),
            _ => None,
        })
    }
}

impl Mover for RecordingRig {
    fn move_by(&mut self, delta: Vec3) -> MoveReport {
        self.calls.push(Call::Move(delta));
        self.position += delta;
        MoveReport {
            grounded: self.grounded,
        }
    }

    fn face(&mut self, rotation: Quat) {
        self.calls.push(Call::Face(rotation));
    }

    fn position(&self) -> Vec3 {
        self.position
    }
}

impl Spawner for RecordingRig {
    fn set_evolution_stage(&mut self, index: usize) {
        self.calls.push(Call::Stage(index));
    }
}

struct RecordedProjectile<'a>(&'a mut Call);

impl ProjectileHandle for RecordedProjectile<'_> {
    fn set_damage(&mut self, amount: u32) {
        if let Call::Projectile { damage, .. } = self.0 {
            *damage = Some(amount);
        }
    }
}

impl ProjectileFactory for RecordingRig {
    fn spawn_projectile(&mut self, position: Vec3, _rotation: Quat) -> Box<dyn ProjectileHandle + '_> {
        self.calls.push(Call::Projectile {
            position,
            damage: None,
        });
        let last = self.calls.last_mut().unwrap();
        Box::new(RecordedProjectile(last))
    }
}

impl CueSink for RecordingRig {
    fn clip_count(&self, _cue: Cue) -> usize {
        self.clips
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play(&mut self, cue: Cue, clip: usize) {
        self.calls.push(Call::Play(cue, clip));
    }
}

impl Sucker for RecordingRig {
    fn start_suck(&mut self) {
        self.calls.push(Call::StartSuck);
    }

    fn end_suck(&mut self) {
        self.calls.push(Call::EndSuck);
    }
}

impl Presentation for RecordingRig {
    fn set_visible(&mut self, visible: bool) {
        self.calls.push(Call::Visible(visible));
    }

    fn set_avatar(&mut self, avatar: &str) {
        self.calls.push(Call::Avatar(avatar.to_string()));
    }

    fn set_scale(&mut self, scale: f32) {
        self.calls.push(Call::Scale(scale));
    }
}

// ── Test resource ─────────────────────────────────────────────────────────────

/// A consumable whose destruction is observable after it has been moved.
struct TestGoo {
    ready: bool,
    energy: u32,
    destroyed: Rc<RefCell<u32>>,
}

impl Consumable for TestGoo {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn energy(&self) -> u32 {
        self.energy
    }

    fn destroy(self) {
        *self.destroyed.borrow_mut() += 1;
    }
}

fn goo(ready: bool, energy: u32) -> (TestGoo, Rc<RefCell<u32>>) {
    let destroyed = Rc::new(RefCell::new(0));
    (
        TestGoo {
            ready,
            energy,
            destroyed: destroyed.clone(),
        },
        destroyed,
    )
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn stage(name: &str, damage: u32, threshold: u32, min: f32, max: f32) -> EvolutionStage {
    EvolutionStage {
        name: name.into(),
        attack_damage: damage,
        energy_until_next: threshold,
        scale_min: min,
        scale_max: max,
        move_speed_scale: 1.0,
        avatar: format!("avatars/{}.png", name.to_lowercase()),
    }
}

fn roster() -> Arc<StageRoster> {
    Arc::new(
        StageRoster::new(vec![
            stage("Droplet", 1, 10, 1.0, 2.0),
            stage("Blob", 3, 20, 2.0, 3.0),
            stage("Colossus", 7, 40, 3.0, 4.0),
        ])
        .unwrap(),
    )
}

fn tuning() -> Tuning {
    Tuning {
        start_time: 0.5,
        fire_time: 0.5,
        ..Default::default()
    }
}

fn host_with(tuning: Tuning) -> PlayerHost<RecordingRig> {
    let controller = PlayerController::new(roster(), tuning, StdRng::seed_from_u64(9)).unwrap();
    let mut host = PlayerHost::new(controller, RecordingRig::with_clips(3));
    host.init();
    host
}

/// Host that has already passed its startup delay, with the call log cleared.
fn active_host() -> PlayerHost<RecordingRig> {
    let mut host = host_with(tuning());
    assert_eq!(host.tick(0.5, &ControllerInput::default()), Phase::Revealed);
    host.rig_mut().calls.clear();
    host
}

fn busy_input() -> ControllerInput {
    ControllerInput {
        left_stick: Vec2::new(1.0, 1.0),
        right_stick: Vec2::new(1.0, 0.0),
        fire: 1.0,
        suck: 1.0,
    }
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn unsafe_tuning_rejects_construction() {
    let bad = Tuning {
        drag: Vec2::new(-1.0, 10.0),
        ..Default::default()
    };
    assert!(PlayerController::new(roster(), bad, StdRng::seed_from_u64(0)).is_err());
}

#[test]
fn init_applies_stage_zero_hidden_and_strains() {
    let host = host_with(tuning());
    let rig = host.rig();

    assert!(rig.calls.contains(&Call::Stage(0)));
    assert!(rig.calls.contains(&Call::Avatar("avatars/droplet.png".into())));
    assert_eq!(rig.last_scale(), Some(1.0));
    assert!(rig.calls.contains(&Call::Visible(false)));
    assert_eq!(rig.count(|c| matches!(c, Call::Play(Cue::Strain, _))), 1);

    let controller = host.controller();
    assert_eq!(controller.stage_index(), 0);
    assert_eq!(controller.stage_energy(), 0);
    assert_eq!(controller.start_timer(), 0.5);
    assert!(!controller.is_visible());
}

#[test]
fn zero_start_time_reveals_during_init() {
    let host = host_with(Tuning {
        start_time: 0.0,
        ..tuning()
    });
    assert!(host.controller().is_visible());
    assert_eq!(host.rig().count(|c| matches!(c, Call::Play(Cue::Pop, _))), 1);
}

// ── Startup gating ────────────────────────────────────────────────────────────

#[test]
fn dormant_ticks_ignore_all_input() {
    let mut host = host_with(tuning());
    host.rig_mut().calls.clear();

    for _ in 0..4 {
        assert_eq!(host.tick(0.1, &busy_input()), Phase::Dormant);
    }

    let rig = host.rig();
    assert!(rig.calls.is_empty(), "unexpected calls: {:?}", rig.calls);
    assert_eq!(host.controller().velocity(), Vec3::ZERO);
    assert_eq!(host.controller().left_stick(), Vec2::ZERO);
}

#[test]
fn reveal_fires_once_and_is_itself_inert() {
    let mut host = host_with(tuning());
    host.rig_mut().calls.clear();

    let mut reveals = 0;
    for _ in 0..20 {
        if host.tick(0.1, &busy_input()) == Phase::Revealed {
            reveals += 1;
            // The reveal tick plays pop and shows the blob, nothing else.
            let rig = host.rig();
            assert_eq!(rig.count(|c| matches!(c, Call::Play(Cue::Pop, _))), 1);
            assert!(rig.calls.contains(&Call::Visible(true)));
            assert_eq!(rig.count(|c| matches!(c, Call::Move(_))), 0);
        }
    }

    assert_eq!(reveals, 1);
    assert!(host.controller().is_visible());
    assert_eq!(host.rig().count(|c| *c == Call::Visible(true)), 1);
}

// ── Locomotion / orientation ──────────────────────────────────────────────────

#[test]
fn stick_below_dead_zone_does_not_accelerate() {
    let mut host = active_host();
    let input = ControllerInput {
        left_stick: Vec2::new(0.3, -0.2),
        ..Default::default()
    };
    host.tick(0.1, &input);
    let v = host.controller().velocity();
    assert_eq!(v.x, 0.0);
    assert_eq!(v.z, 0.0);
    assert_eq!(host.controller().left_stick(), Vec2::ZERO);
}

#[test]
fn movement_is_submitted_as_velocity_times_dt() {
    let mut host = active_host();
    let input = ControllerInput {
        left_stick: Vec2::new(1.0, 0.0),
        ..Default::default()
    };
    host.tick(0.1, &input);

    let v = host.controller().velocity();
    // (0 + 1) / (1 + 10 * 0.1)
    assert!((v.x - 0.5).abs() < 1e-6);
    let delta = host
        .rig()
        .calls
        .iter()
        .find_map(|c| match c {
            Call::Move(d) => Some(*d),
            _ => None,
        })
        .unwrap();
    assert!(delta.abs_diff_eq(v * 0.1, 1e-6));
}

#[test]
fn grounded_report_zeroes_vertical_velocity() {
    let mut host = active_host();
    host.tick(0.1, &ControllerInput::default());
    assert!(host.controller().velocity().y < 0.0);

    host.rig_mut().grounded = true;
    host.tick(0.1, &ControllerInput::default());
    assert_eq!(host.controller().velocity().y, 0.0);
}

#[test]
fn velocity_decays_without_input() {
    let mut host = active_host();
    host.tick(
        0.05,
        &ControllerInput {
            left_stick: Vec2::new(-1.0, 0.0),
            ..Default::default()
        },
    );
    let mut last = host.controller().velocity().x;
    assert!(last < 0.0);
    for _ in 0..30 {
        host.tick(0.05, &ControllerInput::default());
        let vx = host.controller().velocity().x;
        assert!(vx < 0.0 && vx.abs() < last.abs());
        last = vx;
    }
}

#[test]
fn facing_is_held_when_right_stick_released() {
    let mut host = active_host();
    host.tick(
        0.1,
        &ControllerInput {
            right_stick: Vec2::new(0.0, 1.0),
            ..Default::default()
        },
    );
    let facing = host.controller().facing();
    assert!((facing * Vec3::NEG_Z).abs_diff_eq(Vec3::Z, 1e-5));

    host.rig_mut().calls.clear();
    host.tick(0.1, &ControllerInput::default());
    assert_eq!(host.controller().facing(), facing);
    assert_eq!(host.rig().count(|c| matches!(c, Call::Face(_))), 0);
}

// ── Actions ───────────────────────────────────────────────────────────────────

#[test]
fn fire_stamps_stage_damage_and_respects_cooldown() {
    let mut host = active_host();
    host.rig_mut().position = Vec3::new(2.0, 0.0, -1.0);
    let input = ControllerInput {
        fire: 0.5,
        ..Default::default()
    };

    host.tick(0.016, &input);
    assert_eq!(host.controller().fire_timer(), 0.5);
    let shots: Vec<_> = host
        .rig()
        .calls
        .iter()
        .filter(|c| matches!(c, Call::Projectile { .. }))
        .cloned()
        .collect();
    assert_eq!(shots.len(), 1);
    match &shots[0] {
        Call::Projectile { position, damage } => {
            assert_eq!(*damage, Some(1));
            // Position is sampled after this tick's move.
            assert!(position.abs_diff_eq(host.rig().position, 1e-6));
        }
        _ => unreachable!(),
    }

    // 31 more frames leave 0.004 s on the timer; the 32nd fires again.
    for _ in 0..31 {
        host.tick(0.016, &input);
    }
    assert_eq!(
        host.rig().count(|c| matches!(c, Call::Projectile { .. })),
        1
    );
    host.tick(0.016, &input);
    assert_eq!(
        host.rig().count(|c| matches!(c, Call::Projectile { .. })),
        2
    );
}

#[test]
fn trigger_at_dead_zone_does_not_fire() {
    let mut host = active_host();
    host.tick(
        0.1,
        &ControllerInput {
            fire: 0.1,
            ..Default::default()
        },
    );
    assert_eq!(host.rig().count(|c| matches!(c, Call::Projectile { .. })), 0);
}

#[test]
fn spit_cue_is_skipped_while_audio_is_playing() {
    let mut host = active_host();
    host.rig_mut().playing = true;
    host.tick(
        0.1,
        &ControllerInput {
            fire: 1.0,
            ..Default::default()
        },
    );
    let rig = host.rig();
    assert_eq!(rig.count(|c| matches!(c, Call::Projectile { .. })), 1);
    assert_eq!(rig.count(|c| matches!(c, Call::Play(Cue::Spit, _))), 0);
}

#[test]
fn spit_cue_plays_when_voice_is_idle() {
    let mut host = active_host();
    host.tick(
        0.1,
        &ControllerInput {
            fire: 1.0,
            ..Default::default()
        },
    );
    let played = host.rig().calls.iter().find_map(|c| match c {
        Call::Play(Cue::Spit, clip) => Some(*clip),
        _ => None,
    });
    assert!(matches!(played, Some(clip) if clip < 3));
}

#[test]
fn empty_pools_skip_cues_without_failing() {
    let controller = PlayerController::new(roster(), tuning(), StdRng::seed_from_u64(1)).unwrap();
    let mut host = PlayerHost::new(controller, RecordingRig::with_clips(0));
    host.init();
    host.tick(0.5, &ControllerInput::default());
    host.tick(0.1, &busy_input());
    assert_eq!(host.rig().count(|c| matches!(c, Call::Play(..))), 0);
    assert!(host.controller().is_visible());
}

#[test]
fn suck_is_level_triggered_every_tick() {
    let mut host = active_host();
    let held = ControllerInput {
        suck: 0.8,
        ..Default::default()
    };
    for _ in 0..3 {
        host.tick(0.1, &held);
    }
    for _ in 0..2 {
        host.tick(0.1, &ControllerInput::default());
    }
    let rig = host.rig();
    assert_eq!(rig.count(|c| *c == Call::StartSuck), 3);
    assert_eq!(rig.count(|c| *c == Call::EndSuck), 2);
}

// ── Evolution via collisions ──────────────────────────────────────────────────

#[test]
fn consuming_grows_then_promotes() {
    let mut host = active_host();

    let (first, destroyed_first) = goo(true, 5);
    match host.on_resource_collision(first) {
        Contact::Consumed {
            energy,
            promoted_to,
        } => {
            assert_eq!(energy, 5);
            assert_eq!(promoted_to, None);
        }
        Contact::Harmful(_) => panic!("ready goo must be consumed"),
    }
    assert_eq!(*destroyed_first.borrow(), 1);
    assert_eq!(host.controller().stage_energy(), 5);
    assert!((host.rig().last_scale().unwrap() - 1.5).abs() < 1e-6);

    host.rig_mut().calls.clear();
    let (second, _) = goo(true, 5);
    let contact = host.on_resource_collision(second);
    assert!(matches!(
        contact,
        Contact::Consumed {
            promoted_to: Some(1),
            ..
        }
    ));

    let rig = host.rig();
    // Full-grown scale first, then the new stage's minimum.
    let scales: Vec<f32> = rig
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::Scale(s) => Some(*s),
            _ => None,
        })
        .collect();
    assert_eq!(scales, vec![2.0, 2.0]);
    assert!(rig.calls.contains(&Call::Stage(1)));
    assert!(rig.calls.contains(&Call::Avatar("avatars/blob.png".into())));
    assert_eq!(host.controller().stage_index(), 1);
    assert_eq!(host.controller().stage_energy(), 0);
}

#[test]
fn overshoot_promotes_once_and_is_discarded() {
    let mut host = active_host();
    let (feast, _) = goo(true, 1_000);
    host.on_resource_collision(feast);
    assert_eq!(host.controller().stage_index(), 1);
    assert_eq!(host.controller().stage_energy(), 0);
    assert_eq!(host.rig().count(|c| matches!(c, Call::Stage(_))), 1);
}

#[test]
fn final_stage_never_promotes_further() {
    let mut host = active_host();
    for _ in 0..10 {
        let (feast, _) = goo(true, 1_000);
        host.on_resource_collision(feast);
    }
    assert_eq!(host.controller().stage_index(), 2);
    assert!((host.rig().last_scale().unwrap() - 4.0).abs() < 1e-6);
}

#[test]
fn hostile_resource_is_returned_untouched() {
    let mut host = active_host();
    let (hostile, destroyed) = goo(false, 5);
    match host.on_resource_collision(hostile) {
        Contact::Harmful(back) => assert_eq!(back.energy, 5),
        Contact::Consumed { .. } => panic!("hostile goo must not be consumed"),
    }
    assert_eq!(*destroyed.borrow(), 0);
    assert_eq!(host.controller().stage_energy(), 0);
    assert!(host.rig().calls.is_empty());
}

#[test]
fn promotion_raises_spit_damage() {
    let mut host = active_host();
    let (feast, _) = goo(true, 10);
    host.on_resource_collision(feast);
    host.tick(
        0.1,
        &ControllerInput {
            fire: 1.0,
            ..Default::default()
        },
    );
    let damage = host.rig().calls.iter().find_map(|c| match c {
        Call::Projectile { damage, .. } => *damage,
        _ => None,
    });
    assert_eq!(damage, Some(3));
}

#[test]
fn collisions_are_processed_before_the_start_delay_ends() {
    let mut host = host_with(tuning());
    let (snack, destroyed) = goo(true, 4);
    host.on_resource_collision(snack);
    assert_eq!(host.controller().stage_energy(), 4);
    assert_eq!(*destroyed.borrow(), 1);
}

// ── Degenerate timesteps ──────────────────────────────────────────────────────

#[test]
fn bad_dt_is_treated_as_zero() {
    let mut host = host_with(tuning());
    for dt in [f32::NAN, -0.1, f32::INFINITY] {
        host.tick(dt, &busy_input());
    }
    assert_eq!(host.controller().start_timer(), 0.5);

    let mut host = active_host();
    host.tick(0.1, &busy_input());
    let velocity = host.controller().velocity();
    let fire_timer = host.controller().fire_timer();
    host.rig_mut().calls.clear();

    for dt in [f32::NAN, -0.1] {
        host.tick(dt, &ControllerInput::default());
        let c = host.controller();
        assert!(c.velocity().is_finite());
        assert_eq!(c.velocity(), velocity);
        assert_eq!(c.fire_timer(), fire_timer);
        assert_eq!(c.start_timer(), 0.0);
    }
    // The mover is still asked for ground contact, with a zero delta.
    assert!(host
        .rig()
        .calls
        .iter()
        .all(|c| !matches!(c, Call::Move(d) if *d != Vec3::ZERO)));
}

// ── Host plumbing ─────────────────────────────────────────────────────────────

#[test]
fn raw_right_stick_is_kept_even_inside_dead_zone() {
    let mut host = active_host();
    host.tick(
        0.1,
        &ControllerInput {
            right_stick: Vec2::new(0.05, -0.05),
            ..Default::default()
        },
    );
    assert_eq!(host.controller().right_stick(), Vec2::new(0.05, -0.05));
    assert_eq!(host.controller().facing(), Quat::IDENTITY);
}

#[test]
fn host_can_be_split_back_into_controller_and_rig() {
    let mut host = active_host();
    let (feast, _) = goo(true, 10);
    host.on_resource_collision(feast);

    let (controller, rig) = host.into_parts();
    assert_eq!(controller.stage_index(), 1);
    assert!(rig.calls.contains(&Call::Stage(1)));

    // The controller keeps its state when driven by a fresh rig.
    let mut host = PlayerHost::new(controller, RecordingRig::with_clips(1));
    host.tick(
        0.1,
        &ControllerInput {
            fire: 1.0,
            ..Default::default()
        },
    );
    let damage = host.rig().calls.iter().find_map(|c| match c {
        Call::Projectile { damage, .. } => *damage,
        _ => None,
    });
    assert_eq!(damage, Some(3));
}
