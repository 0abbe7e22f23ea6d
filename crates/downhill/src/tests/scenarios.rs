use approx::assert_relative_eq;
use ski_engine::foundation::math::world_up;

use super::*;
use crate::animation::AnimationState;
use crate::config::GameConfig;
use crate::course::{build_course, CourseLayout};
use crate::game::Game;
use crate::input::{ControlsConfig, InputState, Key};
use crate::stage::{MenuStage, PlayStage, Stage, StageId};

fn into_wall(player: &mut Player, speed: f32) {
    let motion = player.motion_mut();
    motion.position = Vec3::new(0.2, 0.0, 0.0);
    motion.velocity = Vec3::new(-speed, 0.0, 0.0);
    motion.current_speed = speed;
}

#[test]
fn test_player_falls_and_settles_on_flat_ground() {
    let world = floor_world();
    let mut rig = Rig::new(player_at(Vec3::new(0.0, 10.0, 0.0)));

    let events = rig.run(&world, 600);

    let motion = rig.player.motion();
    assert!(events.contains(PlayerEvents::LANDED));
    assert!(motion.grounded);
    assert_relative_eq!(motion.position.y, 0.0, epsilon = 1e-3);
    assert_relative_eq!(motion.vertical_velocity, 0.0);
    assert_relative_eq!(motion.ground_normal, world_up(), epsilon = 1e-5);
}

#[test]
fn test_hard_landing_bounces_once() {
    let world = floor_world();
    let mut rig = Rig::new(player_at(Vec3::new(0.0, 10.0, 0.0)));

    let mut landed_at = None;
    for tick in 0..200 {
        if rig.tick(&world, &PlayerInput::default()).contains(PlayerEvents::LANDED) {
            landed_at = Some(tick);
            break;
        }
    }

    assert!(landed_at.is_some());
    // Impact of ~14 m/s comes back as a small hop
    assert!(rig.player.motion().vertical_velocity > 0.0);
    assert!(rig.player.motion().vertical_velocity < 3.0);
}

#[test]
fn test_wall_hit_reflects_velocity_and_resets_speed() {
    let mut world = World::new(ProbeSettings::default());
    add_wall_at_origin(&mut world);
    let mut player = player_at(Vec3::new(0.2, 0.0, 0.0)).with_yaw(-std::f32::consts::FRAC_PI_2);
    into_wall(&mut player, 20.0);
    let mut rig = Rig::new(player);

    let events = rig.tick(&world, &PlayerInput::default());

    let motion = rig.player.motion();
    assert!(events.contains(PlayerEvents::BOUNCED));
    assert!(motion.velocity.x > 0.0);
    assert!(motion.velocity.norm() >= rig.player.physics().min_impact_speed);
    assert_eq!(motion.current_speed, 0.0);
    assert_eq!(motion.vertical_velocity, 0.0);
    // Pushed out past the ankle probe
    assert!(motion.position.x >= ProbeSettings::default().ankle_radius);
    assert_eq!(rig.player.animation_state(), Some(AnimationState::Collision));
}

#[test]
fn test_slow_wall_hit_still_leaves_at_minimum_speed() {
    let mut world = World::new(ProbeSettings::default());
    add_wall_at_origin(&mut world);
    let mut player = player_at(Vec3::new(0.2, 0.0, 0.0));
    into_wall(&mut player, 0.5);
    let mut rig = Rig::new(player);

    rig.tick(&world, &PlayerInput::default());

    let velocity = rig.player.motion().velocity;
    assert!(velocity.x > 0.0);
    assert!(velocity.norm() >= rig.player.physics().min_impact_speed - 1e-4);
}

#[test]
fn test_repeated_wall_hits_trigger_recovery() {
    let mut world = World::new(ProbeSettings::default());
    add_wall_at_origin(&mut world);
    let physics = PhysicsConfig {
        recovery_threshold: 3,
        ..PhysicsConfig::default()
    };
    let player = Player::new("stuck", Vec3::new(5.0, 0.0, 2.0), physics, CameraConfig::default());
    let mut rig = Rig::new(player);

    for _ in 0..2 {
        into_wall(&mut rig.player, 20.0);
        let events = rig.tick(&world, &PlayerInput::default());
        assert!(events.contains(PlayerEvents::BOUNCED));
        assert!(!events.contains(PlayerEvents::RECOVERED));
    }

    into_wall(&mut rig.player, 20.0);
    let events = rig.tick(&world, &PlayerInput::default());

    assert!(events.contains(PlayerEvents::RECOVERED));
    let motion = rig.player.motion();
    assert_relative_eq!(motion.position, Vec3::new(5.0, 0.0, 2.0));
    assert_relative_eq!(motion.velocity, Vec3::zeros());
    assert_eq!(motion.current_speed, 0.0);
}

#[test]
fn test_wall_on_other_layer_is_invisible_to_player_filter() {
    let mut world = World::new(ProbeSettings::default());
    add_wall_at_origin(&mut world);

    let contacts = world.test_scene_collisions(Vec3::new(0.2, 0.0, 0.0), CollisionFilter::PLAYER);
    assert!(contacts.is_empty());

    let contacts = world.test_scene_collisions(Vec3::new(0.2, 0.0, 0.0), CollisionFilter::WALL);
    assert!(!contacts.collisions.is_empty());
}

#[test]
fn test_animation_is_not_restarted_for_unchanged_state() {
    let world = floor_world();
    let mut rig = Rig::new(player_at(Vec3::zeros()));

    rig.tick(&world, &PlayerInput::default());
    rig.tick(&world, &PlayerInput::default());

    assert_eq!(rig.animator.requests().len(), 1);
    assert_eq!(rig.animator.current(), Some("idle"));
}

#[test]
fn test_forward_input_accelerates_and_switches_to_move() {
    let world = floor_world();
    let mut rig = Rig::new(player_at(Vec3::zeros()));
    let forward = PlayerInput {
        forward: true,
        ..PlayerInput::default()
    };

    for _ in 0..60 {
        rig.tick(&world, &forward);
    }

    let motion = rig.player.motion();
    assert!(motion.current_speed > 5.0);
    assert!(motion.position.z > 2.0);
    assert_relative_eq!(motion.position.y, 0.0, epsilon = 1e-3);
    assert_eq!(rig.animator.current(), Some("move"));
}

#[test]
fn test_ground_normal_follows_slope() {
    let angle = 0.3f32;
    let mut world = World::new(ProbeSettings::default());
    let slope = world.meshes_mut().insert("slope", CollisionMesh::slope(10.0, 40.0, angle));
    world.add_collider("slope", slope, vec![Mat4::identity()], CollisionFilter::SCENARIO, SurfaceTags::empty());
    let start = Vec3::new(0.4, -10.0 * angle.sin(), 10.0 * angle.cos());
    let mut rig = Rig::new(player_at(start));

    rig.tick(&world, &PlayerInput::default());

    let motion = rig.player.motion();
    assert!(motion.grounded);
    assert_relative_eq!(motion.ground_normal, Vec3::new(0.0, angle.cos(), angle.sin()), epsilon = 1e-4);
    // Gravity alone starts the slide downhill
    assert!(motion.current_speed > 0.0);
    assert!(rig.player.model().up_vector().z > 0.0);
    assert!(rig.camera.pitch_target < 0.0);
}

#[test]
fn test_boost_pad_adds_speed_once() {
    let mut world = floor_world();
    add_pad(&mut world, "dashboard", Vec3::zeros(), SurfaceTags::BOOST);
    let mut rig = Rig::new(player_at(Vec3::new(0.3, 0.0, 0.8)));

    let events = rig.tick(&world, &PlayerInput::default());
    assert!(events.contains(PlayerEvents::BOOSTED));
    assert!(rig.player.motion().current_speed > 9.0);
    assert_eq!(rig.player.animation_state(), Some(AnimationState::Impulse));

    let events = rig.tick(&world, &PlayerInput::default());
    assert!(!events.contains(PlayerEvents::BOOSTED));
}

#[test]
fn test_jump_pad_launches_player() {
    let mut world = floor_world();
    add_pad(&mut world, "jump", Vec3::zeros(), SurfaceTags::JUMP);
    let mut rig = Rig::new(player_at(Vec3::new(0.3, 0.0, 0.8)));

    let events = rig.tick(&world, &PlayerInput::default());
    assert!(events.contains(PlayerEvents::LAUNCHED));
    assert!(!rig.player.motion().grounded);
    assert!(rig.player.motion().vertical_velocity > 7.0);
    assert_eq!(rig.player.animation_state(), Some(AnimationState::Jump));

    rig.tick(&world, &PlayerInput::default());
    assert!(!rig.player.motion().grounded);
    assert!(rig.player.position().y > 0.1);
}

#[test]
fn test_goal_finishes_once_and_celebrates() {
    let mut world = floor_world();
    add_pad(&mut world, "finish", Vec3::zeros(), SurfaceTags::GOAL);
    let mut rig = Rig::new(player_at(Vec3::new(0.3, 0.0, 0.8)));

    let events = rig.tick(&world, &PlayerInput::default());
    assert!(events.contains(PlayerEvents::FINISHED));
    assert!(rig.player.is_finished());
    assert_eq!(rig.animator.current(), Some("celebrate"));

    let events = rig.tick(&world, &PlayerInput::default());
    assert!(!events.contains(PlayerEvents::FINISHED));
}

#[test]
fn test_checkpoint_moves_recovery_position() {
    let mut world = floor_world();
    add_pad(&mut world, "checkpoint", Vec3::new(10.0, 0.0, 10.0), SurfaceTags::CHECKPOINT);
    let mut rig = Rig::new(player_at(Vec3::new(10.3, 0.0, 10.8)));
    rig.player.set_recovery_position(Vec3::zeros());

    let events = rig.tick(&world, &PlayerInput::default());

    assert!(events.contains(PlayerEvents::CHECKPOINT));
    assert_relative_eq!(rig.player.recovery_position().x, 10.3, epsilon = 1e-3);
    assert_relative_eq!(rig.player.recovery_position().z, 10.8, epsilon = 1e-3);
}

#[test]
fn test_play_stage_runs_player_down_the_course() {
    let world = build_course(ProbeSettings::default(), &CourseLayout::default());
    let config = GameConfig {
        players: vec![ControlsConfig::player_one()],
        ..GameConfig::default()
    };
    let mut stage = PlayStage::new(world, config);
    stage.on_enter(Some(StageId::Menu));

    let mut input = InputState::new();
    input.press(Key::W);
    for _ in 0..180 {
        assert_eq!(stage.update(DT, &input), None);
        input.end_frame();
    }

    let slot = &stage.slots()[0];
    assert!(slot.player.position().z > 10.0);
    let node = stage.world().graph().get(slot.node).unwrap();
    assert_relative_eq!(node.model.translation(), slot.player.position());
    assert!(stage.race().clock() > 2.9);

    input.press(Key::Escape);
    assert_eq!(stage.update(DT, &input), Some(StageId::Menu));
}

#[test]
fn test_game_switches_between_menu_and_race() {
    let config = GameConfig::default();
    let world = build_course(config.probes, &CourseLayout::default());
    let mut game = Game::new(&config.race);
    game.add_stage(Box::new(MenuStage::new()));
    game.add_stage(Box::new(PlayStage::new(world, config)));
    game.switch_to(StageId::Menu).unwrap();

    let step = game.step();
    let mut input = InputState::new();
    input.press(Key::Enter);
    game.tick(step, &mut input).unwrap();
    assert_eq!(game.current(), Some(StageId::Play));

    input.release(Key::Enter);
    input.press(Key::Escape);
    game.tick(step, &mut input).unwrap();
    assert_eq!(game.current(), Some(StageId::Menu));
}
