//! Right-stick facing.
//!
//! The stick is mapped onto the ground plane as `(-x, 0, y)` and the facing
//! is the shortest rotation carrying the reference forward (`-Z`) onto that
//! direction.  Below the dead-zone the previous facing is held.

use bevy::prelude::*;

/// Forward axis of an unrotated character.
pub const REFERENCE_FORWARD: Vec3 = Vec3::NEG_Z;

/// Facing for `stick`, or `None` when the stick is inside the dead-zone.
///
/// The dead-zone is compared against the **squared** magnitude.
pub fn facing_from_stick(stick: Vec2, dead_zone_sq: f32) -> Option<Quat> {
    if stick.length_squared() <= dead_zone_sq {
        return None;
    }
    let dir = stick.normalize_or_zero();
    if dir == Vec2::ZERO {
        return None;
    }
    let target = Vec3::new(-dir.x, 0.0, dir.y);
    Some(Quat::from_rotation_arc(REFERENCE_FORWARD, target))
}
