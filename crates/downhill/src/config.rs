//! Game configuration
//!
//! Every tuning constant of the slope physics lives here. All structs use
//! `#[serde(default)]`, so a config file only needs the values it changes.

use serde::{Deserialize, Serialize};
use ski_engine::config::Config;
use ski_engine::physics::ProbeSettings;

use crate::input::ControlsConfig;

/// Slope physics tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity magnitude (m/s^2)
    pub gravity: f32,
    /// Minimum up-dot for a ground contact
    pub slope_tolerance: f32,
    /// Contacts with an up-dot below this are not ground
    pub wall_threshold: f32,
    /// Contacts with an up-dot below this are true walls
    pub true_wall_threshold: f32,
    /// Top forward speed
    pub max_speed: f32,
    /// Forward acceleration while the forward key is held
    pub acceleration: f32,
    /// Scales the gravity-driven downhill acceleration
    pub downhill_factor: f32,
    /// Speed lost per second on flat ground without input
    pub flat_deceleration: f32,
    /// Speed lost per second while braking
    pub brake_deceleration: f32,
    /// Fraction of speed lost per second to friction
    pub friction: f32,
    /// Friction multiplier when heading downhill
    pub friction_downhill_scale: f32,
    /// Friction multiplier when heading uphill
    pub friction_uphill_scale: f32,
    /// Below this slope factor the ground counts as flat
    pub flat_slope_factor: f32,
    /// Heading change in radians per second while steering
    pub turn_speed: f32,
    /// Acceleration pulling an airborne player back toward the slope
    pub air_slope_pull: f32,
    /// Forward push in the air, as a fraction of current speed per second
    pub air_forward_push: f32,
    /// Lowest vertical velocity reached while falling (negative)
    pub terminal_velocity: f32,
    /// Landing impacts faster than this bounce once
    pub landing_bounce_speed: f32,
    /// Fraction of the landing impact returned as the bounce
    pub landing_bounce_damping: f32,
    /// Minimum speed after a wall bounce
    pub min_impact_speed: f32,
    /// Decay rate of the bounce velocity per second
    pub knockback_damping: f32,
    /// Random outward offset after a bounce, added to the ankle radius
    pub bounce_jitter_min: f32,
    /// Upper bound of the outward offset
    pub bounce_jitter_max: f32,
    /// Wall hits within the window that trigger a recovery teleport
    pub recovery_threshold: u32,
    /// Window the hits must fall into (seconds)
    pub recovery_window: f32,
    /// A pause longer than this resets the hit counter (seconds)
    pub recovery_reset_gap: f32,
    /// Speed added by a boost pad
    pub boost_impulse: f32,
    /// How long a boost lasts (seconds)
    pub boost_duration: f32,
    /// Upward speed given by a jump pad
    pub jump_impulse: f32,
    /// Air time before the jump / fall animation takes over (seconds)
    pub air_grace: f32,
    /// Speed above which the player counts as moving
    pub move_threshold: f32,
    /// How long the collision animation holds (seconds)
    pub collision_time: f32,
    /// Seed for the bounce jitter
    pub seed: u64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            slope_tolerance: 0.3,
            wall_threshold: 0.6,
            true_wall_threshold: 0.3,
            max_speed: 30.0,
            acceleration: 12.0,
            downhill_factor: 1.0,
            flat_deceleration: 2.0,
            brake_deceleration: 20.0,
            friction: 0.1,
            friction_downhill_scale: 0.5,
            friction_uphill_scale: 2.0,
            flat_slope_factor: 0.05,
            turn_speed: 2.0,
            air_slope_pull: 4.0,
            air_forward_push: 0.3,
            terminal_velocity: -50.0,
            landing_bounce_speed: 6.0,
            landing_bounce_damping: 0.15,
            min_impact_speed: 5.0,
            knockback_damping: 3.0,
            bounce_jitter_min: 0.05,
            bounce_jitter_max: 0.25,
            recovery_threshold: 6,
            recovery_window: 1.5,
            recovery_reset_gap: 2.0,
            boost_impulse: 10.0,
            boost_duration: 0.6,
            jump_impulse: 8.0,
            air_grace: 0.35,
            move_threshold: 0.5,
            collision_time: 0.4,
            seed: 0x5EED,
        }
    }
}

/// Third-person camera placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance behind the player
    pub orbit_distance: f32,
    /// Eye height above the feet
    pub eye_height: f32,
    /// Look-at height above the feet
    pub look_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            orbit_distance: 6.0,
            eye_height: 1.5,
            look_height: 0.8,
        }
    }
}

/// Race and loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Simulation tick length (seconds)
    pub timestep: f32,
    /// Catch-up ticks allowed per frame
    pub max_steps_per_frame: u32,
    /// Spawn used when the scene has none
    pub spawn: [f32; 3],
    /// Sideways distance between the two players at the start
    pub player_spacing: f32,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            max_steps_per_frame: 5,
            spawn: [0.0, 2.0, 0.0],
            player_spacing: 3.0,
        }
    }
}

/// Top-level game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Slope physics
    pub physics: PhysicsConfig,
    /// Collision probe geometry
    pub probes: ProbeSettings,
    /// Controls, one entry per local player
    pub players: Vec<ControlsConfig>,
    /// Race settings
    pub race: RaceConfig,
    /// Camera placement
    pub camera: CameraConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            probes: ProbeSettings::default(),
            players: vec![ControlsConfig::player_one(), ControlsConfig::player_two()],
            race: RaceConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl Config for GameConfig {}
