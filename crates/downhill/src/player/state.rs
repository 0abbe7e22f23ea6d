//! Physics state of one player

use bitflags::bitflags;
use ski_engine::foundation::math::{world_up, Vec3};

/// Kinematic state integrated every tick
#[derive(Debug, Clone, PartialEq)]
pub struct MotionState {
    /// Feet position
    pub position: Vec3,
    /// Full velocity; while airborne its Y is the vertical velocity
    pub velocity: Vec3,
    /// Speed along the movement direction, decoupled from `velocity`
    pub current_speed: f32,
    /// Vertical velocity, zero while grounded except on a landing bounce
    pub vertical_velocity: f32,
    /// Standing on ground this tick
    pub grounded: bool,
    /// Normal of the last ground contact
    pub ground_normal: Vec3,
    /// Seconds since leaving the ground
    pub air_time: f32,
    /// Bounce velocity that decays on top of the slope movement
    pub knockback: Vec3,
}

impl MotionState {
    /// At rest at `position`
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::zeros(),
            current_speed: 0.0,
            vertical_velocity: 0.0,
            grounded: false,
            ground_normal: world_up(),
            air_time: 0.0,
            knockback: Vec3::zeros(),
        }
    }

    /// Drop all motion
    pub fn stop(&mut self) {
        self.velocity = Vec3::zeros();
        self.current_speed = 0.0;
        self.vertical_velocity = 0.0;
        self.knockback = Vec3::zeros();
    }
}

bitflags! {
    /// Things that happened to a player during one tick
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PlayerEvents: u32 {
        /// Touched down after being airborne
        const LANDED = 1 << 0;
        /// Bounced off a wall
        const BOUNCED = 1 << 1;
        /// Teleported to the recovery position
        const RECOVERED = 1 << 2;
        /// Picked up a boost
        const BOOSTED = 1 << 3;
        /// Launched by a jump pad
        const LAUNCHED = 1 << 4;
        /// Crossed the finish line
        const FINISHED = 1 << 5;
        /// Stored a new recovery position
        const CHECKPOINT = 1 << 6;
    }
}
