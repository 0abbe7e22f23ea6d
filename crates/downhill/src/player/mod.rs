//! Player physics and animation state machine
//!
//! One [`Player::update`] call is one simulation tick:
//!
//! 1. steer the heading and scan the scene around the feet
//! 2. classify the ground and snap onto it, or go airborne
//! 3. apply surface effects (boost, jump, goal, checkpoint)
//! 4. integrate slope or air movement
//! 5. slide along steep contacts, bounce off true walls
//! 6. move, align the model with the slope, update camera and animation

pub mod ground;
pub mod movement;
pub mod response;
pub mod state;

pub use state::{MotionState, PlayerEvents};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ski_engine::foundation::math::{heading_front, orthonormal_basis, world_up, Mat4, Mat4Ext, Vec3};
use ski_engine::physics::{CollisionFilter, CollisionRecord, ContactSet, SurfaceTags};
use ski_engine::World;

use crate::animation::{select_state, AnimationController, AnimationInputs, AnimationState, Animator};
use crate::camera::CameraRig;
use crate::config::{CameraConfig, PhysicsConfig};
use crate::input::PlayerInput;
use response::RecoveryTracker;

/// A simulated skier
#[derive(Debug)]
pub struct Player {
    name: String,
    motion: MotionState,
    yaw: f32,
    model: Mat4,
    recovery_position: Vec3,
    recovery: RecoveryTracker,
    animation: AnimationController,
    clock: f32,
    boost_timer: f32,
    launch_timer: f32,
    collision_timer: f32,
    finished: bool,
    rng: StdRng,
    physics: PhysicsConfig,
    camera: CameraConfig,
}

impl Player {
    /// Player standing at `spawn`, facing +Z. `spawn` is also the first
    /// recovery position.
    pub fn new(name: impl Into<String>, spawn: Vec3, physics: PhysicsConfig, camera: CameraConfig) -> Self {
        let rng = StdRng::seed_from_u64(physics.seed);
        let mut player = Self {
            name: name.into(),
            motion: MotionState::at(spawn),
            yaw: 0.0,
            model: Mat4::identity(),
            recovery_position: spawn,
            recovery: RecoveryTracker::new(),
            animation: AnimationController::new(),
            clock: 0.0,
            boost_timer: 0.0,
            launch_timer: 0.0,
            collision_timer: 0.0,
            finished: false,
            rng,
            physics,
            camera,
        };
        player.refresh_model();
        player
    }

    /// Reseed the bounce jitter
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Face `yaw` radians (0 faces +Z)
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self.refresh_model();
        self
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kinematic state
    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    /// Mutable kinematic state, for spawning and scripted setups
    pub fn motion_mut(&mut self) -> &mut MotionState {
        &mut self.motion
    }

    /// Feet position
    pub fn position(&self) -> Vec3 {
        self.motion.position
    }

    /// World transform, aligned with the slope while grounded
    pub fn model(&self) -> &Mat4 {
        &self.model
    }

    /// Heading yaw
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Heading on the ground plane
    pub fn heading(&self) -> Vec3 {
        heading_front(self.yaw)
    }

    /// Where a stuck player is sent
    pub fn recovery_position(&self) -> Vec3 {
        self.recovery_position
    }

    /// Override the recovery position
    pub fn set_recovery_position(&mut self, position: Vec3) {
        self.recovery_position = position;
    }

    /// Current animation state
    pub fn animation_state(&self) -> Option<AnimationState> {
        self.animation.state()
    }

    /// Crossed the finish line
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Simulation time accumulated by this player
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Physics tuning
    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    /// Advance one tick
    pub fn update(
        &mut self,
        world: &World,
        input: &PlayerInput,
        dt: f32,
        camera: &mut CameraRig,
        animator: &mut dyn Animator,
    ) -> PlayerEvents {
        let mut events = PlayerEvents::empty();
        self.clock += dt;
        self.tick_timers(dt);

        let input = if self.finished {
            PlayerInput {
                brake: true,
                ..PlayerInput::default()
            }
        } else {
            *input
        };
        self.yaw += input.steer() * self.physics.turn_speed * dt;

        let contacts = world.test_scene_collisions(self.motion.position, CollisionFilter::ALL);
        self.classify_ground(&contacts, dt, &mut events);
        self.apply_surfaces(&contacts, &mut events);

        let heading = self.heading();
        let speed_cap = self.speed_cap();
        if self.motion.grounded {
            movement::grounded_step(&mut self.motion, &input, heading, &self.physics, speed_cap, dt);
        } else {
            movement::airborne_step(&mut self.motion, heading, &self.physics, speed_cap, dt);
        }
        self.decay_knockback(dt);

        self.motion.velocity = response::slide_velocity(self.motion.velocity, &contacts.collisions, &self.physics);

        let wall = response::find_bounce_wall(&contacts.collisions, &self.physics).copied();
        if let Some(wall) = wall {
            self.bounce(&wall, world, &mut events);
        } else {
            self.motion.position += self.motion.velocity * dt;
            if self.motion.grounded {
                self.motion.position.y += self.motion.vertical_velocity * dt;
            }
        }

        self.refresh_model();
        self.update_camera(camera);
        self.update_animation(&input, animator);

        log::trace!(
            "{}: pos {:?} speed {:.2} grounded {}",
            self.name,
            self.motion.position,
            self.motion.current_speed,
            self.motion.grounded
        );
        events
    }

    fn tick_timers(&mut self, dt: f32) {
        self.boost_timer = (self.boost_timer - dt).max(0.0);
        self.launch_timer = (self.launch_timer - dt).max(0.0);
        self.collision_timer = (self.collision_timer - dt).max(0.0);
    }

    fn speed_cap(&self) -> f32 {
        if self.boost_timer > 0.0 {
            self.physics.max_speed + self.physics.boost_impulse
        } else {
            self.physics.max_speed
        }
    }

    fn classify_ground(&mut self, contacts: &ContactSet, dt: f32, events: &mut PlayerEvents) {
        let was_grounded = self.motion.grounded;
        let ground = ground::classify_ground(
            &contacts.ground_collisions,
            self.motion.position,
            self.motion.vertical_velocity,
            self.physics.slope_tolerance,
        );

        let Some(ground) = ground else {
            self.motion.grounded = false;
            self.motion.air_time += dt;
            return;
        };

        self.motion.grounded = true;
        self.motion.ground_normal = ground.normal;
        self.motion.air_time = 0.0;
        self.motion.position.y = ground.point.y;

        if was_grounded {
            self.motion.vertical_velocity = 0.0;
            return;
        }

        events.insert(PlayerEvents::LANDED);
        let impact = -self.motion.vertical_velocity;
        self.motion.vertical_velocity = if impact > self.physics.landing_bounce_speed {
            impact * self.physics.landing_bounce_damping
        } else {
            0.0
        };
        let horizontal = Vec3::new(self.motion.velocity.x, 0.0, self.motion.velocity.z);
        self.motion.current_speed = self.motion.current_speed.max(horizontal.dot(&self.heading()).max(0.0));
    }

    fn apply_surfaces(&mut self, contacts: &ContactSet, events: &mut PlayerEvents) {
        let surface = contacts
            .collisions
            .iter()
            .chain(&contacts.ground_collisions)
            .fold(SurfaceTags::empty(), |tags, c| tags | c.surface);

        if surface.contains(SurfaceTags::BOOST) && self.boost_timer <= 0.0 {
            self.motion.current_speed += self.physics.boost_impulse;
            self.boost_timer = self.physics.boost_duration;
            events.insert(PlayerEvents::BOOSTED);
        }

        if surface.contains(SurfaceTags::JUMP) && self.motion.grounded {
            self.motion.vertical_velocity = self.physics.jump_impulse;
            self.motion.grounded = false;
            self.launch_timer = self.physics.air_grace;
            events.insert(PlayerEvents::LAUNCHED);
        }

        if surface.contains(SurfaceTags::GOAL) && !self.finished {
            self.finished = true;
            log::info!("{} crossed the finish line at {:.2}s", self.name, self.clock);
            events.insert(PlayerEvents::FINISHED);
        }

        if surface.contains(SurfaceTags::CHECKPOINT) && self.motion.grounded {
            let moved = (self.recovery_position - self.motion.position).norm_squared() > 1.0;
            if moved {
                self.recovery_position = self.motion.position;
                log::debug!("{} checkpoint at {:?}", self.name, self.recovery_position);
                events.insert(PlayerEvents::CHECKPOINT);
            }
        }
    }

    fn decay_knockback(&mut self, dt: f32) {
        let keep = (1.0 - self.physics.knockback_damping * dt).max(0.0);
        self.motion.knockback *= keep;
        if self.motion.knockback.norm_squared() < 1.0e-4 {
            self.motion.knockback = Vec3::zeros();
        }
    }

    /// Wall response. The teleport replaces this tick's integration.
    fn bounce(&mut self, wall: &CollisionRecord, world: &World, events: &mut PlayerEvents) {
        let normal = wall.normal;
        let velocity = response::bounce_velocity(self.motion.velocity, normal, self.physics.min_impact_speed);

        let ankle = world.probes().ankle_radius;
        let jitter = ankle
            + self
                .rng
                .gen_range(self.physics.bounce_jitter_min..=self.physics.bounce_jitter_max.max(self.physics.bounce_jitter_min));

        self.motion.position = response::bounce_position(self.motion.position, wall, jitter);
        self.motion.velocity = velocity;
        self.motion.knockback = Vec3::new(velocity.x, 0.0, velocity.z);
        self.motion.current_speed = 0.0;
        self.motion.vertical_velocity = 0.0;
        self.collision_timer = self.physics.collision_time;
        events.insert(PlayerEvents::BOUNCED);

        if self.recovery.record_hit(self.clock, &self.physics) {
            self.recover();
            events.insert(PlayerEvents::RECOVERED);
        }
    }

    /// Teleport to the recovery position and stop
    pub fn recover(&mut self) {
        log::warn!(
            "{} stuck against geometry, recovering to {:?}",
            self.name,
            self.recovery_position
        );
        self.motion.position = self.recovery_position;
        self.motion.stop();
        self.recovery.reset();
        self.refresh_model();
    }

    fn refresh_model(&mut self) {
        let up = if self.motion.grounded {
            self.motion.ground_normal
        } else {
            world_up()
        };
        let (right, up, front) = orthonormal_basis(up, self.heading());
        self.model = Mat4::from_basis(right, up, front, self.motion.position);
    }

    fn update_camera(&self, camera: &mut CameraRig) {
        camera.follow(
            &self.camera,
            self.motion.position,
            self.heading(),
            self.model.front_vector(),
            self.model.right_vector(),
        );
    }

    fn update_animation(&mut self, input: &PlayerInput, animator: &mut dyn Animator) {
        let inputs = AnimationInputs {
            grounded: self.motion.grounded,
            air_time: self.motion.air_time,
            vertical_velocity: self.motion.vertical_velocity,
            speed: self.motion.velocity.norm(),
            forward: input.forward,
            brake: input.brake,
            celebrate: self.finished || input.celebrate,
            colliding: self.collision_timer > 0.0,
            boosting: self.boost_timer > 0.0,
            launched: self.launch_timer > 0.0,
        };
        let next = select_state(&inputs, self.physics.air_grace, self.physics.move_threshold);
        self.animation.apply(next, animator);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationLog;
    use approx::assert_relative_eq;
    use ski_engine::physics::{CollisionMesh, ProbeSettings};

    const DT: f32 = 1.0 / 60.0;

    fn flat_world() -> World {
        let mut world = World::new(ProbeSettings::default());
        let plane = world.meshes_mut().insert("floor", CollisionMesh::plane(100.0, 4));
        world.add_collider(
            "floor",
            plane,
            vec![Mat4::identity()],
            CollisionFilter::SCENARIO,
            SurfaceTags::empty(),
        );
        world
    }

    #[test]
    fn test_recover_resets_motion() {
        let mut player = Player::new("p1", Vec3::new(1.0, 2.0, 3.0), PhysicsConfig::default(), CameraConfig::default());
        player.motion_mut().position = Vec3::new(40.0, -3.0, 7.0);
        player.motion_mut().velocity = Vec3::new(3.0, 1.0, -9.0);
        player.motion_mut().current_speed = 12.0;
        player.motion_mut().vertical_velocity = -4.0;

        player.recover();

        assert_relative_eq!(player.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(player.motion().velocity, Vec3::zeros());
        assert_eq!(player.motion().current_speed, 0.0);
        assert_eq!(player.motion().vertical_velocity, 0.0);
        assert_relative_eq!(player.model().translation(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_steering_turns_heading() {
        let world = flat_world();
        let mut player = Player::new("p1", Vec3::new(0.5, 0.0, 0.7), PhysicsConfig::default(), CameraConfig::default());
        let mut camera = CameraRig::default();
        let mut log = AnimationLog::new();
        let right = PlayerInput {
            right: true,
            ..PlayerInput::default()
        };

        player.update(&world, &right, DT, &mut camera, &mut log);
        assert!(player.yaw() > 0.0);
        assert!(player.heading().x > 0.0);
    }

    #[test]
    fn test_model_aligned_with_ground() {
        let world = flat_world();
        let mut player = Player::new("p1", Vec3::new(0.5, 0.0, 0.7), PhysicsConfig::default(), CameraConfig::default());
        let mut camera = CameraRig::default();
        let mut log = AnimationLog::new();

        player.update(&world, &PlayerInput::default(), DT, &mut camera, &mut log);

        assert!(player.motion().grounded);
        assert_relative_eq!(player.model().up_vector(), world_up(), epsilon = 1e-5);
        assert_relative_eq!(player.model().front_vector(), Vec3::z(), epsilon = 1e-5);
        assert_eq!(log.current(), Some("idle"));
    }
}
