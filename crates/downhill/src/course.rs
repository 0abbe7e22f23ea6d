//! Procedural demo course
//!
//! A flat start area, one long slope descending along +Z with pads on it, side
//! walls and a wide finish area. Used by the executable when no scene file is
//! given and by the scenario tests.

use ski_engine::foundation::math::{Mat4, Mat4Ext, Vec3};
use ski_engine::physics::{CollisionFilter, CollisionMesh, ProbeSettings, SurfaceTags};
use ski_engine::scene::{NodeKind, SceneNode};
use ski_engine::World;

/// Course dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourseLayout {
    /// Half width of the start area
    pub start_half_extent: f32,
    /// Half width of the slope; the side walls stand at this distance
    pub half_width: f32,
    /// Slope length along the surface
    pub length: f32,
    /// Slope incline (radians)
    pub angle: f32,
    /// Boost pad distance along the slope
    pub boost_at: f32,
    /// Rock obstacle distance
    pub rock_at: f32,
    /// Checkpoint distance
    pub checkpoint_at: f32,
    /// Jump pad distance
    pub jump_at: f32,
    /// Half length of the finish area
    pub finish_half_extent: f32,
}

impl Default for CourseLayout {
    fn default() -> Self {
        Self {
            start_half_extent: 6.0,
            half_width: 8.0,
            length: 80.0,
            angle: 0.25,
            boost_at: 15.0,
            rock_at: 30.0,
            checkpoint_at: 45.0,
            jump_at: 65.0,
            finish_half_extent: 40.0,
        }
    }
}

impl CourseLayout {
    /// Point on the slope centre line `distance` metres from its top
    pub fn slope_point(&self, distance: f32) -> Vec3 {
        Vec3::new(
            0.0,
            -distance * self.angle.sin(),
            self.start_half_extent + distance * self.angle.cos(),
        )
    }

    /// Bottom of the slope
    pub fn slope_end(&self) -> Vec3 {
        self.slope_point(self.length)
    }

    /// Transform laying a flat mesh onto the slope at `distance`, raised by
    /// `lift` along the slope normal
    pub fn on_slope(&self, distance: f32, x: f32, lift: f32) -> Mat4 {
        let tilt = Mat4::from_axis_angle(&Vec3::x_axis(), self.angle);
        let normal = Vec3::new(0.0, self.angle.cos(), self.angle.sin());
        let position = self.slope_point(distance) + Vec3::new(x, 0.0, 0.0) + normal * lift;
        Mat4::new_translation(&position) * tilt
    }
}

/// Build the course into a fresh world
pub fn build_course(probes: ProbeSettings, layout: &CourseLayout) -> World {
    let mut world = World::new(probes);
    let end = layout.slope_end();

    let start = world
        .meshes_mut()
        .insert("start", CollisionMesh::plane(layout.start_half_extent, 2));
    world.add_collider("start", start, vec![Mat4::identity()], CollisionFilter::SCENARIO, SurfaceTags::empty());

    let slope = world
        .meshes_mut()
        .insert("slope", CollisionMesh::slope(layout.half_width, layout.length, layout.angle));
    world.add_collider(
        "slope",
        slope,
        vec![Mat4::new_translation(&Vec3::new(0.0, 0.0, layout.start_half_extent))],
        CollisionFilter::SCENARIO,
        SurfaceTags::empty(),
    );

    let pad = world.meshes_mut().insert("pad", CollisionMesh::plane(1.5, 1));
    world.add_collider(
        "dashboard",
        pad,
        vec![layout.on_slope(layout.boost_at, 0.0, 0.02)],
        CollisionFilter::SCENARIO,
        SurfaceTags::BOOST,
    );
    world.add_collider(
        "checkpoint",
        pad,
        vec![layout.on_slope(layout.checkpoint_at, 0.0, 0.02)],
        CollisionFilter::SCENARIO,
        SurfaceTags::CHECKPOINT,
    );
    world.add_collider(
        "jump",
        pad,
        vec![layout.on_slope(layout.jump_at, 0.0, 0.02)],
        CollisionFilter::SCENARIO,
        SurfaceTags::JUMP,
    );

    let rock = world
        .meshes_mut()
        .insert("rock", CollisionMesh::cuboid(Vec3::new(1.0, 1.5, 1.0)));
    world.add_collider(
        "rock",
        rock,
        vec![
            layout.on_slope(layout.rock_at, 4.0, 0.5),
            layout.on_slope(layout.rock_at + 12.0, -4.5, 0.5),
        ],
        CollisionFilter::SCENARIO,
        SurfaceTags::empty(),
    );

    let finish = world
        .meshes_mut()
        .insert("finish", CollisionMesh::plane(layout.finish_half_extent, 4));
    world.add_collider(
        "finish",
        finish,
        vec![Mat4::new_translation(&Vec3::new(0.0, end.y, end.z + layout.finish_half_extent))],
        CollisionFilter::SCENARIO,
        SurfaceTags::GOAL,
    );

    // Side walls run along +Z from the start area to the end of the finish
    let first_z = -layout.start_half_extent;
    let last_z = end.z + 2.0 * layout.finish_half_extent;
    let wall_half_length = 0.5 * (last_z - first_z);
    let wall_height = -end.y + 8.0;
    let side = world
        .meshes_mut()
        .insert("side_wall", CollisionMesh::wall(wall_half_length, wall_height));
    let base_y = end.y - 2.0;
    let mid_z = 0.5 * (first_z + last_z);
    let side_models = [-layout.half_width, layout.half_width]
        .into_iter()
        .map(|x| {
            Mat4::new_translation(&Vec3::new(x, base_y, mid_z))
                * Mat4::rotation_y(std::f32::consts::FRAC_PI_2)
        })
        .collect();
    world.add_collider("side_wall", side, side_models, CollisionFilter::WALL, SurfaceTags::empty());

    let back = world
        .meshes_mut()
        .insert("back_wall", CollisionMesh::wall(layout.half_width, 6.0));
    world.add_collider(
        "back_wall",
        back,
        vec![Mat4::new_translation(&Vec3::new(0.0, -1.0, first_z))],
        CollisionFilter::WALL,
        SurfaceTags::empty(),
    );

    // Render-only geometry, never probed
    let sky = world
        .meshes_mut()
        .insert("skybox", CollisionMesh::cuboid(Vec3::new(200.0, 200.0, 200.0)));
    world.add_entity(SceneNode::new("skybox", NodeKind::Mesh { mesh: sky }));

    world.set_spawn_point(Vec3::new(0.4, 0.5, 0.5));
    log::info!(
        "Course built: {} scene nodes, {} meshes",
        world.graph().len(),
        world.meshes().len()
    );
    world
}
