//! Velocity integration: stick acceleration, gravity, and proportional drag.
//!
//! Per tick, in order:
//!
//! 1. `v.x += stick.x * speed_scale`, `v.z += stick.y * speed_scale`, `v.y -= g * dt`
//! 2. `v.x /= 1 + drag.x * dt`, `v.z /= 1 + drag.y * dt`
//! 3. the mover is asked to displace by `v * dt`
//! 4. `v.y = 0` if the mover reports ground contact
//!
//! Step 2 is velocity-proportional, so it decays toward zero without ever
//! overshooting past it, even at very low frame rates.  Vertical velocity is
//! never dragged.

use bevy::prelude::*;

/// Scalar drag law: `v / (1 + k * dt)`.
#[inline]
pub fn apply_drag(v: f32, k: f32, dt: f32) -> f32 {
    v / (1.0 + k * dt)
}

/// Steps 1 and 2: accumulate input and gravity, then apply horizontal drag.
///
/// `stick` must already be dead-zone filtered.  `drag.x` applies to world X,
/// `drag.y` to world Z.
pub fn integrate_velocity(
    velocity: Vec3,
    stick: Vec2,
    speed_scale: f32,
    gravity: f32,
    drag: Vec2,
    dt: f32,
) -> Vec3 {
    let mut v = velocity
        + Vec3::new(
            stick.x * speed_scale,
            -gravity * dt,
            stick.y * speed_scale,
        );
    v.x = apply_drag(v.x, drag.x, dt);
    v.z = apply_drag(v.z, drag.y, dt);
    v
}

/// Step 4: zero vertical velocity while resting on a surface.
#[inline]
pub fn resolve_ground(velocity: Vec3, grounded: bool) -> Vec3 {
    if grounded {
        Vec3::new(velocity.x, 0.0, velocity.z)
    } else {
        velocity
    }
}
