//! Fixed-step game driver
//!
//! Owns the registered stages and feeds the current one fixed ticks from the
//! frame time. Input edges are consumed by the first frame that runs a tick.

use std::collections::HashMap;

use ski_engine::foundation::time::FixedTimestep;

use crate::config::RaceConfig;
use crate::error::GameError;
use crate::input::InputState;
use crate::stage::{Stage, StageId};

/// Stage registry plus the tick accumulator
pub struct Game {
    stages: HashMap<StageId, Box<dyn Stage>>,
    current: Option<StageId>,
    timestep: FixedTimestep,
    ticks: u64,
}

impl Game {
    /// Game ticking at `config.timestep`
    pub fn new(config: &RaceConfig) -> Self {
        Self {
            stages: HashMap::new(),
            current: None,
            timestep: FixedTimestep::new(config.timestep, config.max_steps_per_frame),
            ticks: 0,
        }
    }

    /// Register a stage, replacing any stage with the same id
    pub fn add_stage(&mut self, stage: Box<dyn Stage>) {
        self.stages.insert(stage.id(), stage);
    }

    /// Stage currently ticking
    pub fn current(&self) -> Option<StageId> {
        self.current
    }

    /// Registered stage by id
    pub fn stage(&self, id: StageId) -> Option<&dyn Stage> {
        self.stages.get(&id).map(|stage| &**stage)
    }

    /// Ticks simulated so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Tick length in seconds
    pub fn step(&self) -> f32 {
        self.timestep.step()
    }

    /// Make `id` the current stage
    pub fn switch_to(&mut self, id: StageId) -> Result<(), GameError> {
        if !self.stages.contains_key(&id) {
            return Err(GameError::StageNotFound(id));
        }

        let previous = self.current;
        if let Some(stage) = previous.and_then(|prev| self.stages.get_mut(&prev)) {
            stage.on_leave(id);
        }
        if let Some(stage) = self.stages.get_mut(&id) {
            stage.on_enter(previous);
        }

        log::info!("Stage {:?} -> {:?}", previous, id);
        self.current = Some(id);
        Ok(())
    }

    /// Run the ticks owed for one frame of `frame_time` seconds. Returns how
    /// many ticks ran.
    pub fn tick(&mut self, frame_time: f32, input: &mut InputState) -> Result<u32, GameError> {
        let steps = self.timestep.advance(frame_time);
        let dt = self.timestep.step();

        for _ in 0..steps {
            let Some(id) = self.current else {
                break;
            };
            let next = match self.stages.get_mut(&id) {
                Some(stage) => stage.update(dt, input),
                None => return Err(GameError::StageNotFound(id)),
            };
            self.ticks += 1;

            if let Some(next) = next {
                self.switch_to(next)?;
            }
        }

        // Edges stay pending until a tick has seen them
        if steps > 0 {
            input.end_frame();
        }
        Ok(steps)
    }
}
