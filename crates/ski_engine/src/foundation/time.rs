//! Simulation clock

/// Fixed-step accumulator for the simulation loop.
///
/// Frame time is clamped before accumulation and at most `max_steps` ticks are
/// produced per frame; any backlog beyond one step is dropped so a slow frame
/// cannot trigger a spiral of catch-up ticks.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_frame_time: f32,
    max_steps: u32,
    accumulator: f32,
}

impl FixedTimestep {
    /// Create an accumulator producing ticks of `step` seconds
    pub fn new(step: f32, max_steps: u32) -> Self {
        Self {
            step: step.max(1.0e-4),
            max_frame_time: 0.25,
            max_steps: max_steps.max(1),
            accumulator: 0.0,
        }
    }

    /// Length of one simulation tick in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add a frame's elapsed time and return how many ticks to simulate
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        self.accumulator += frame_time.clamp(0.0, self.max_frame_time);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }

        if self.accumulator > self.step {
            self.accumulator = self.step;
        }
        steps
    }

    /// Fraction of a step left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }
}
