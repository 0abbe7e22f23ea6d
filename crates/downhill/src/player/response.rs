//! Wall and object collision response
//!
//! Non-ground contacts with a shallow up-dot slide the player along them;
//! steep ones are true walls and bounce the player back out. A hit counter
//! catches players that keep bouncing inside geometry.

use ski_engine::foundation::math::{project_on_plane, reflect, Vec3};
use ski_engine::physics::CollisionRecord;

use crate::config::PhysicsConfig;

/// How a non-ground contact is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactClass {
    /// Walkable, handled by ground classification
    Ground,
    /// Steep but not vertical: slide along it
    Slide,
    /// True wall: bounce
    Wall,
}

/// Classify a contact by the up-dot of its normal
pub fn classify_contact(contact: &CollisionRecord, config: &PhysicsConfig) -> ContactClass {
    let up_dot = contact.up_dot();
    if up_dot >= config.wall_threshold {
        ContactClass::Ground
    } else if up_dot >= config.true_wall_threshold {
        ContactClass::Slide
    } else {
        ContactClass::Wall
    }
}

/// Nearest true-wall contact that is allowed to bounce the player
pub fn find_bounce_wall<'a>(
    collisions: &'a [CollisionRecord],
    config: &PhysicsConfig,
) -> Option<&'a CollisionRecord> {
    collisions
        .iter()
        .filter(|c| c.collision && c.surface.bounces())
        .filter(|c| classify_contact(c, config) == ContactClass::Wall)
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Remove the part of `velocity` that drives into any sliding contact
pub fn slide_velocity(velocity: Vec3, collisions: &[CollisionRecord], config: &PhysicsConfig) -> Vec3 {
    collisions
        .iter()
        .filter(|c| c.collision && classify_contact(c, config) == ContactClass::Slide)
        .fold(velocity, |v, c| {
            if v.dot(&c.normal) < 0.0 {
                project_on_plane(v, c.normal)
            } else {
                v
            }
        })
}

/// Velocity after bouncing off a wall with unit normal `normal`.
///
/// Movement into the wall is mirrored; the result always leaves the wall and
/// is at least `min_speed` fast.
pub fn bounce_velocity(velocity: Vec3, normal: Vec3, min_speed: f32) -> Vec3 {
    let mut bounced = if velocity.dot(&normal) < 0.0 {
        reflect(velocity, normal)
    } else {
        velocity
    };

    if bounced.dot(&normal) <= 0.0 {
        bounced += normal * min_speed;
    }

    let speed = bounced.norm();
    if speed < min_speed {
        bounced = if speed > 0.0 {
            bounced * (min_speed / speed)
        } else {
            normal * min_speed
        };
    }
    bounced
}

/// Feet position after a bounce: the contact point pushed out along the
/// normal horizontally, the height nudged by the normal's vertical part
pub fn bounce_position(position: Vec3, contact: &CollisionRecord, offset: f32) -> Vec3 {
    Vec3::new(
        contact.point.x + contact.normal.x * offset,
        position.y + contact.normal.y * offset,
        contact.point.z + contact.normal.z * offset,
    )
}

/// Counts wall hits to detect a player stuck bouncing in place
#[derive(Debug, Clone, Default)]
pub struct RecoveryTracker {
    count: u32,
    window_start: f32,
    last_hit: Option<f32>,
}

impl RecoveryTracker {
    /// No hits recorded
    pub fn new() -> Self {
        Self::default()
    }

    /// Hits in the current streak
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Record a hit at simulation time `now`. Returns true when the player
    /// should be teleported to safety; the counter is reset in that case.
    pub fn record_hit(&mut self, now: f32, config: &PhysicsConfig) -> bool {
        let stale = self
            .last_hit
            .map_or(true, |last| now - last > config.recovery_reset_gap);
        if stale || now - self.window_start > config.recovery_window {
            self.count = 0;
            self.window_start = now;
        }

        self.count += 1;
        self.last_hit = Some(now);

        if self.count >= config.recovery_threshold {
            self.reset();
            return true;
        }
        false
    }

    /// Forget the streak
    pub fn reset(&mut self) {
        self.count = 0;
        self.last_hit = None;
    }
}
