//! Ground classification
//!
//! The downward ray contacts are the only ground candidates. The one whose
//! normal points most upward wins, provided it clears the slope tolerance.

use ski_engine::physics::CollisionRecord;
use ski_engine::foundation::math::Vec3;

/// Pick the ground contact for this tick.
///
/// While rising (`vertical_velocity > 0`) contacts below the feet are
/// ignored so a launch is not snapped straight back onto the surface.
pub fn classify_ground(
    ground_collisions: &[CollisionRecord],
    position: Vec3,
    vertical_velocity: f32,
    slope_tolerance: f32,
) -> Option<CollisionRecord> {
    ground_collisions
        .iter()
        .filter(|c| c.collision && c.up_dot() > slope_tolerance)
        .filter(|c| vertical_velocity <= 0.0 || c.point.y >= position.y)
        .max_by(|a, b| a.up_dot().total_cmp(&b.up_dot()))
        .copied()
}
