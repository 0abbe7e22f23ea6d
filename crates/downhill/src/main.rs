//! Headless downhill race
//!
//! Usage: `downhill [config.ron|config.toml] [scene file]`
//!
//! Without a scene file the procedural course is raced. Both players hold
//! forward and player two steers a little now and then; the outcome is logged.

use std::path::Path;

use downhill::config::GameConfig;
use downhill::course::{build_course, CourseLayout};
use downhill::input::{InputState, Key};
use downhill::stage::{MenuStage, PlayStage, StageId};
use downhill::{Game, GameError};
use ski_engine::assets::ObjMeshSource;
use ski_engine::config::Config;
use ski_engine::foundation::logging;
use ski_engine::scene::load_scene_file;
use ski_engine::World;

const FRAME_TIME: f32 = 1.0 / 60.0;
const RACE_FRAMES: u32 = 60 * 40;

fn load_world(config: &GameConfig, scene: Option<&str>) -> Result<World, GameError> {
    let Some(scene) = scene else {
        return Ok(build_course(config.probes, &CourseLayout::default()));
    };

    let description = load_scene_file(scene)?;
    let root = Path::new(scene).parent().unwrap_or_else(|| Path::new("."));
    let mut world = World::new(config.probes);
    let report = world.load_scene(&description, &ObjMeshSource::new(root));
    if !report.skipped.is_empty() {
        log::warn!("{} meshes could not be loaded", report.skipped.len());
    }
    Ok(world)
}

fn scripted_input(input: &mut InputState, frame: u32) {
    input.press(Key::W);
    input.press(Key::Up);

    // Player two weaves a little
    match (frame / 90) % 4 {
        1 => input.press(Key::Left),
        3 => input.press(Key::Right),
        _ => {
            input.release(Key::Left);
            input.release(Key::Right);
        }
    }
}

fn run() -> Result<(), GameError> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => GameConfig::load_from_file(&path)?,
        None => GameConfig::default(),
    };
    let scene = args.next();

    let world = load_world(&config, scene.as_deref())?;
    let mut game = Game::new(&config.race);
    game.add_stage(Box::new(MenuStage::new()));
    game.add_stage(Box::new(PlayStage::new(world, config)));
    game.switch_to(StageId::Menu)?;

    let mut input = InputState::new();
    input.press(Key::Enter);
    game.tick(FRAME_TIME, &mut input)?;
    input.clear();

    for frame in 0..RACE_FRAMES {
        scripted_input(&mut input, frame);
        game.tick(FRAME_TIME, &mut input)?;
    }

    log::info!("Simulated {} ticks", game.ticks());
    Ok(())
}

fn main() {
    logging::init();
    log::info!("Starting downhill");

    if let Err(e) = run() {
        log::error!("Race aborted: {}", e);
        std::process::exit(1);
    }
}
