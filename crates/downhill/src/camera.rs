//! Camera rig state written by the player
//!
//! Smoothing, projection and split-screen viewports belong to the renderer;
//! this only carries the targets.

use ski_engine::foundation::math::{world_up, Vec3};

use crate::config::CameraConfig;

/// Per-player third-person camera targets
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    /// Eye position
    pub eye: Vec3,
    /// Look-at point
    pub center: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Pitch the camera should lean to (radians, negative looks down the slope)
    pub pitch_target: f32,
    /// Roll the camera should lean to (radians)
    pub roll_target: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 1.5, -6.0),
            center: Vec3::new(0.0, 0.8, 0.0),
            up: world_up(),
            pitch_target: 0.0,
            roll_target: 0.0,
        }
    }
}

impl CameraRig {
    /// Place the rig behind a player at `position` facing `front`, leaning
    /// with the slope axes `slope_front` / `slope_right`
    pub fn follow(&mut self, config: &CameraConfig, position: Vec3, front: Vec3, slope_front: Vec3, slope_right: Vec3) {
        let up = world_up();
        let flat_front = Vec3::new(front.x, 0.0, front.z);

        self.eye = position - flat_front * config.orbit_distance + up * config.eye_height;
        self.center = position + up * config.look_height;
        self.up = up;
        self.pitch_target = slope_front.y.clamp(-1.0, 1.0).asin();
        self.roll_target = slope_right.y.clamp(-1.0, 1.0).asin();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_follow_on_downhill_slope() {
        let mut rig = CameraRig::default();
        let angle = 0.3f32;
        let slope_front = Vec3::new(0.0, -angle.sin(), angle.cos());

        rig.follow(
            &CameraConfig::default(),
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::z(),
            slope_front,
            Vec3::x(),
        );

        assert_relative_eq!(rig.eye, Vec3::new(0.0, 11.5, -6.0), epsilon = 1e-5);
        assert_relative_eq!(rig.center, Vec3::new(0.0, 10.8, 0.0), epsilon = 1e-5);
        assert_relative_eq!(rig.pitch_target, -angle, epsilon = 1e-5);
        assert_relative_eq!(rig.roll_target, 0.0, epsilon = 1e-5);
    }
}
