//! End-to-end scenarios across the player, world and stages

mod scenarios;

use ski_engine::foundation::math::{Mat4, Mat4Ext, Vec3};
use ski_engine::physics::{CollisionFilter, CollisionMesh, ProbeSettings, SurfaceTags};
use ski_engine::World;

use crate::animation::AnimationLog;
use crate::camera::CameraRig;
use crate::config::{CameraConfig, PhysicsConfig};
use crate::input::PlayerInput;
use crate::player::{Player, PlayerEvents};

pub const DT: f32 = 1.0 / 60.0;

/// Floor at y = 0, shifted so the origin is off every triangle edge
pub fn floor_world() -> World {
    let mut world = World::new(ProbeSettings::default());
    let floor = world.meshes_mut().insert("floor", CollisionMesh::plane(100.0, 4));
    world.add_collider(
        "floor",
        floor,
        vec![Mat4::new_translation(&Vec3::new(0.3, 0.0, -0.2))],
        CollisionFilter::SCENARIO,
        SurfaceTags::empty(),
    );
    world
}

/// Thin pad with `tags` lying on the floor around `center`
pub fn add_pad(world: &mut World, name: &str, center: Vec3, tags: SurfaceTags) {
    let pad = world.meshes_mut().insert(name, CollisionMesh::plane(2.0, 1));
    world.add_collider(
        name,
        pad,
        vec![Mat4::new_translation(&(center + Vec3::new(0.0, 0.01, 0.0)))],
        CollisionFilter::SCENARIO,
        tags,
    );
}

/// Wall through the origin in the YZ plane, normal +X
pub fn add_wall_at_origin(world: &mut World) {
    let wall = world.meshes_mut().insert("wall", CollisionMesh::wall(5.0, 3.0));
    world.add_collider(
        "wall",
        wall,
        vec![Mat4::rotation_y(std::f32::consts::FRAC_PI_2)],
        CollisionFilter::WALL,
        SurfaceTags::empty(),
    );
}

pub fn player_at(position: Vec3) -> Player {
    Player::new("tester", position, PhysicsConfig::default(), CameraConfig::default())
}

/// Player plus the collaborators it writes to
pub struct Rig {
    pub player: Player,
    pub camera: CameraRig,
    pub animator: AnimationLog,
}

impl Rig {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            camera: CameraRig::default(),
            animator: AnimationLog::new(),
        }
    }

    pub fn tick(&mut self, world: &World, input: &PlayerInput) -> PlayerEvents {
        self.player
            .update(world, input, DT, &mut self.camera, &mut self.animator)
    }

    /// Run `ticks` idle ticks and return every event seen
    pub fn run(&mut self, world: &World, ticks: u32) -> PlayerEvents {
        (0..ticks).fold(PlayerEvents::empty(), |events, _| {
            events | self.tick(world, &PlayerInput::default())
        })
    }
}
