//! Input normalisation and the device → [`ControllerInput`] systems.
//!
//! ## Pipeline (runs in order every `Update` frame)
//!
//! 1. [`gamepad_connection_system`]: tracks which gamepad is preferred.
//! 2. [`input_clear_system`]: resets [`ControllerInput`] to neutral.
//! 3. [`keyboard_input_system`]: WASD / arrows / Space / E.
//! 4. [`gamepad_input_system`]: sticks and triggers of the preferred gamepad.
//!
//! Device conventions are resolved here.  Devices report "up" as +Y; the
//! samplers flip it so that pushing up drives world -Z, away from the camera
//! and up the screen.  The right stick's X is flipped as well, matching the
//! `(-x, 0, y)` facing map.  Dead-zone filtering is *not* done here; see
//! [`dead_zone_axes`] and [`super::orientation`].

use bevy::input::gamepad::{GamepadAxis, GamepadButton, GamepadConnection, GamepadConnectionEvent};
use bevy::prelude::*;

// ── Raw input ─────────────────────────────────────────────────────────────────

/// One tick's worth of raw analog input: two sticks and two triggers.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ControllerInput {
    /// Movement stick, approximately `[-1, 1]` per axis.
    pub left_stick: Vec2,
    /// Facing stick, approximately `[-1, 1]` per axis.
    pub right_stick: Vec2,
    /// Spit trigger, `[0, 1]`.
    pub fire: f32,
    /// Suck trigger, `[0, 1]`.
    pub suck: f32,
}

/// Zero each component of `raw` whose magnitude is below its own dead-zone.
///
/// Square dead-zone: X and Y are filtered independently, so a diagonal push
/// that clears only one threshold keeps only that axis.  A component exactly at
/// its threshold passes through.
pub fn dead_zone_axes(raw: Vec2, dead_zone: Vec2) -> Vec2 {
    Vec2::new(
        if raw.x.abs() < dead_zone.x { 0.0 } else { raw.x },
        if raw.y.abs() < dead_zone.y { 0.0 } else { raw.y },
    )
}

// ── Gamepad selection ─────────────────────────────────────────────────────────

/// The most recently connected gamepad, if any.
#[derive(Resource, Default)]
pub struct PreferredGamepad(pub Option<Entity>);

/// Track gamepad connect / disconnect events and update [`PreferredGamepad`].
///
/// The most-recently-connected gamepad is always preferred.
pub fn gamepad_connection_system(
    mut events: MessageReader<GamepadConnectionEvent>,
    mut preferred: ResMut<PreferredGamepad>,
) {
    for event in events.read() {
        match &event.connection {
            GamepadConnection::Connected { .. } => {
                preferred.0 = Some(event.gamepad);
                info!(
                    "[gamepad] Gamepad {:?} connected (now preferred)",
                    event.gamepad
                );
            }
            GamepadConnection::Disconnected => {
                info!("[gamepad] Gamepad {:?} disconnected", event.gamepad);
                if preferred.0 == Some(event.gamepad) {
                    preferred.0 = None;
                }
            }
        }
    }
}

// ── Sampling ──────────────────────────────────────────────────────────────────

/// Reset [`ControllerInput`] so that released devices read as neutral.
pub fn input_clear_system(mut input: ResMut<ControllerInput>) {
    *input = ControllerInput::default();
}

/// Keyboard fallback: digital keys mapped onto the analog input.
///
/// - **WASD** → left stick
/// - **Arrows** → right stick
/// - **Space** → fire trigger
/// - **E** → suck trigger
pub fn keyboard_input_system(keys: Res<ButtonInput<KeyCode>>, mut input: ResMut<ControllerInput>) {
    let axis = |neg: KeyCode, pos: KeyCode| {
        keys.pressed(pos) as i8 as f32 - keys.pressed(neg) as i8 as f32
    };

    let left = Vec2::new(axis(KeyCode::KeyA, KeyCode::KeyD), axis(KeyCode::KeyW, KeyCode::KeyS));
    if left != Vec2::ZERO {
        input.left_stick = left;
    }
    let right = Vec2::new(
        axis(KeyCode::ArrowRight, KeyCode::ArrowLeft),
        axis(KeyCode::ArrowUp, KeyCode::ArrowDown),
    );
    if right != Vec2::ZERO {
        input.right_stick = right;
    }
    if keys.pressed(KeyCode::Space) {
        input.fire = 1.0;
    }
    if keys.pressed(KeyCode::KeyE) {
        input.suck = 1.0;
    }
}

/// Sample the preferred gamepad's sticks and analog triggers.
///
/// - Left stick → movement (Y negated so pushing up moves toward world -Z)
/// - Right stick → facing (both axes negated: right faces world +X, up faces -Z)
/// - Right trigger → fire, left trigger → suck
///
/// Does nothing when no gamepad is connected.  Overrides keyboard values only
/// where the gamepad reads non-neutral.
pub fn gamepad_input_system(
    preferred: Res<PreferredGamepad>,
    gamepads: Query<&Gamepad>,
    mut input: ResMut<ControllerInput>,
) {
    let Some(gamepad_entity) = preferred.0 else {
        return;
    };
    let Ok(gamepad) = gamepads.get(gamepad_entity) else {
        return;
    };

    let left = Vec2::new(
        gamepad.get(GamepadAxis::LeftStickX).unwrap_or(0.0),
        -gamepad.get(GamepadAxis::LeftStickY).unwrap_or(0.0),
    );
    if left != Vec2::ZERO {
        input.left_stick = left;
    }
    let right = Vec2::new(
        -gamepad.get(GamepadAxis::RightStickX).unwrap_or(0.0),
        -gamepad.get(GamepadAxis::RightStickY).unwrap_or(0.0),
    );
    if right != Vec2::ZERO {
        input.right_stick = right;
    }

    let fire = gamepad.get(GamepadButton::RightTrigger2).unwrap_or(0.0);
    let suck = gamepad.get(GamepadButton::LeftTrigger2).unwrap_or(0.0);
    input.fire = input.fire.max(fire);
    input.suck = input.suck.max(suck);
}
