//! Stages driven by the game loop
//!
//! A stage receives one fixed tick at a time and may ask for a switch by
//! returning the id of the next stage.

use ski_engine::foundation::math::{heading_front, world_up, Vec3};
use ski_engine::scene::{NodeId, SceneNode};
use ski_engine::World;

use crate::animation::{AnimationLog, Animator};
use crate::camera::CameraRig;
use crate::config::GameConfig;
use crate::input::{ControlsConfig, InputState, Key};
use crate::player::{Player, PlayerEvents};

/// Registered stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Title menu
    Menu,
    /// Race in progress
    Play,
}

/// A mode of the game
pub trait Stage {
    /// Which stage this is
    fn id(&self) -> StageId;

    /// Called when the stage becomes current
    fn on_enter(&mut self, _previous: Option<StageId>) {}

    /// Called before another stage becomes current
    fn on_leave(&mut self, _next: StageId) {}

    /// Advance one tick; `Some(id)` requests a switch
    fn update(&mut self, dt: f32, input: &InputState) -> Option<StageId>;
}

/// Waits for the start key
#[derive(Debug, Default)]
pub struct MenuStage;

impl MenuStage {
    /// Create the menu
    pub fn new() -> Self {
        Self
    }
}

impl Stage for MenuStage {
    fn id(&self) -> StageId {
        StageId::Menu
    }

    fn update(&mut self, _dt: f32, input: &InputState) -> Option<StageId> {
        (input.was_pressed(Key::Enter) || input.was_pressed(Key::Space)).then_some(StageId::Play)
    }
}

/// Race clock and finish times
#[derive(Debug, Clone, Default)]
pub struct RaceState {
    clock: f32,
    finish_times: Vec<Option<f32>>,
}

impl RaceState {
    /// Race for `players` racers
    pub fn new(players: usize) -> Self {
        Self {
            clock: 0.0,
            finish_times: vec![None; players],
        }
    }

    /// Elapsed race time
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Finish time of racer `index`
    pub fn finish_time(&self, index: usize) -> Option<f32> {
        self.finish_times.get(index).copied().flatten()
    }

    /// Every racer crossed the line
    pub fn is_over(&self) -> bool {
        !self.finish_times.is_empty() && self.finish_times.iter().all(Option::is_some)
    }

    /// Run the clock until the race is over
    pub fn advance(&mut self, dt: f32) {
        if !self.is_over() {
            self.clock += dt;
        }
    }

    /// Record the first finish of racer `index`
    pub fn record_finish(&mut self, index: usize, name: &str) {
        let Some(slot) = self.finish_times.get_mut(index) else {
            return;
        };
        if slot.is_none() {
            *slot = Some(self.clock);
            log::info!("{} finished in {:.2}s", name, self.clock);
        }
        if self.is_over() {
            log::info!("Race over after {:.2}s", self.clock);
        }
    }
}

/// One local racer with everything bound to it
pub struct PlayerSlot {
    /// Simulated skier
    pub player: Player,
    /// Key bindings
    pub controls: ControlsConfig,
    /// Camera targets written by the player
    pub camera: CameraRig,
    /// Clip playback collaborator
    pub animator: Box<dyn Animator>,
    /// Actor node mirroring the player transform
    pub node: NodeId,
    spawn: Vec3,
}

/// The race itself
pub struct PlayStage {
    world: World,
    slots: Vec<PlayerSlot>,
    race: RaceState,
    config: GameConfig,
}

impl PlayStage {
    /// Race on `world` with one player per entry of `config.players`.
    ///
    /// Players line up side by side around the scene spawn, or the configured
    /// spawn when the scene has none.
    pub fn new(mut world: World, config: GameConfig) -> Self {
        let spawn = world.spawn_point().unwrap_or_else(|| Vec3::from(config.race.spawn));
        let right = world_up().cross(&heading_front(0.0));
        let count = config.players.len();
        let center = (count.saturating_sub(1)) as f32 * 0.5;

        let slots = config
            .players
            .iter()
            .enumerate()
            .map(|(index, controls)| {
                let name = format!("player{}", index + 1);
                let offset = (index as f32 - center) * config.race.player_spacing;
                let position = spawn + right * offset;
                let player = Player::new(name.clone(), position, config.physics.clone(), config.camera.clone())
                    .with_seed(config.physics.seed.wrapping_add(index as u64));
                let node = world.add_entity(SceneNode::actor(name, *player.model()));
                PlayerSlot {
                    player,
                    controls: controls.clone(),
                    camera: CameraRig::default(),
                    animator: Box::new(AnimationLog::new()),
                    node,
                    spawn: position,
                }
            })
            .collect();

        Self {
            world,
            slots,
            race: RaceState::new(count),
            config,
        }
    }

    /// Collision world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Racers in update order
    pub fn slots(&self) -> &[PlayerSlot] {
        &self.slots
    }

    /// Race clock and results
    pub fn race(&self) -> &RaceState {
        &self.race
    }

    /// Put every racer back on the start line
    pub fn restart(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            slot.player = Player::new(
                slot.player.name().to_string(),
                slot.spawn,
                self.config.physics.clone(),
                self.config.camera.clone(),
            )
            .with_seed(self.config.physics.seed.wrapping_add(index as u64));
            self.world.set_model(slot.node, *slot.player.model());
        }
        self.race = RaceState::new(self.slots.len());
    }
}

impl Stage for PlayStage {
    fn id(&self) -> StageId {
        StageId::Play
    }

    fn on_enter(&mut self, previous: Option<StageId>) {
        if previous == Some(StageId::Menu) {
            self.restart();
        }
        log::info!("Race started with {} players", self.slots.len());
    }

    fn on_leave(&mut self, _next: StageId) {
        log::info!("Leaving race at {:.2}s", self.race.clock());
    }

    fn update(&mut self, dt: f32, input: &InputState) -> Option<StageId> {
        if input.was_pressed(Key::Escape) {
            return Some(StageId::Menu);
        }

        // Sequential: player 2 sees the world after player 1 moved
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let intent = slot.controls.sample(input);
            let events = slot
                .player
                .update(&self.world, &intent, dt, &mut slot.camera, slot.animator.as_mut());
            self.world.set_model(slot.node, *slot.player.model());

            if events.contains(PlayerEvents::FINISHED) {
                self.race.record_finish(index, slot.player.name());
            }
        }

        self.race.advance(dt);
        self.world.flush_destroyed();
        None
    }
}
