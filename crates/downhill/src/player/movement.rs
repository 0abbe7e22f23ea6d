//! Slope-relative movement
//!
//! Grounded: speed is a scalar along the heading projected onto the slope
//! plane, pushed by the along-slope part of gravity and worn down by
//! friction. Airborne: gravity integrates the vertical velocity and the
//! horizontal momentum carries over.

use ski_engine::foundation::math::{project_on_plane, safe_normalize, utils, world_up, Vec3};

use super::state::MotionState;
use crate::config::PhysicsConfig;
use crate::input::PlayerInput;

/// `sin` of the angle between the ground normal and world up
pub fn slope_factor(normal: Vec3) -> f32 {
    let cos = normal.dot(&world_up()).clamp(-1.0, 1.0);
    (1.0 - cos * cos).max(0.0).sqrt()
}

/// Unit direction of travel on the slope for a heading
pub fn slope_direction(heading: Vec3, normal: Vec3) -> Vec3 {
    safe_normalize(project_on_plane(heading, normal), heading)
}

/// Along-slope component of gravity
pub fn downhill_gravity(normal: Vec3, gravity: f32) -> Vec3 {
    let g = Vec3::new(0.0, -gravity, 0.0);
    g - normal * g.dot(&normal)
}

/// One grounded tick. `speed_cap` is the top speed allowed this tick.
pub fn grounded_step(
    motion: &mut MotionState,
    input: &PlayerInput,
    heading: Vec3,
    config: &PhysicsConfig,
    speed_cap: f32,
    dt: f32,
) {
    let normal = motion.ground_normal;
    let direction = slope_direction(heading, normal);
    let factor = slope_factor(normal);
    let downhill = safe_normalize(downhill_gravity(normal, config.gravity), Vec3::zeros());
    let alignment = direction.dot(&downhill);
    let on_slope = factor > config.flat_slope_factor;

    let mut speed = motion.current_speed;
    if input.forward {
        speed = utils::approach(speed, speed_cap, config.acceleration * dt);
    }
    if on_slope && alignment > 0.0 {
        speed += config.gravity * config.downhill_factor * factor * alignment * dt;
    } else if !input.forward {
        let uphill = if on_slope { config.gravity * factor * -alignment } else { 0.0 };
        speed -= (config.flat_deceleration + uphill) * dt;
    }
    if input.brake {
        speed -= config.brake_deceleration * dt;
    }

    let friction_scale = if on_slope && alignment > 0.0 {
        config.friction_downhill_scale
    } else if on_slope && alignment < 0.0 {
        config.friction_uphill_scale
    } else {
        1.0
    };
    speed *= 1.0 - (config.friction * friction_scale * dt).min(1.0);

    motion.current_speed = speed.clamp(0.0, speed_cap);
    motion.velocity = direction * motion.current_speed + project_on_plane(motion.knockback, normal);
}

/// One airborne tick
pub fn airborne_step(motion: &mut MotionState, heading: Vec3, config: &PhysicsConfig, speed_cap: f32, dt: f32) {
    motion.vertical_velocity = (motion.vertical_velocity - config.gravity * dt).max(config.terminal_velocity);

    let pull = -motion.ground_normal * config.air_slope_pull * dt;
    let push = heading * motion.current_speed * config.air_forward_push * dt;
    let mut horizontal = Vec3::new(motion.velocity.x, 0.0, motion.velocity.z) + Vec3::new(pull.x, 0.0, pull.z) + push;

    let horizontal_speed = horizontal.norm();
    if horizontal_speed > speed_cap && horizontal_speed > 0.0 {
        horizontal *= speed_cap / horizontal_speed;
    }

    motion.velocity = Vec3::new(horizontal.x, motion.vertical_velocity, horizontal.z);
}
