//! Discrete animation states and the animator contract
//!
//! The player picks a state every tick; the animator is only asked to play a
//! clip when that state changes.

/// Animation state of a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationState {
    /// Standing still
    Idle,
    /// Skiing
    Move,
    /// Braking
    Brake,
    /// Riding a boost
    Impulse,
    /// Rising through the air
    Jump,
    /// Falling
    Fall,
    /// Just bounced off a wall
    Collision,
    /// Finished or celebrating
    Celebrate,
}

impl AnimationState {
    /// Clip name
    pub fn clip(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Move => "move",
            Self::Brake => "brake",
            Self::Impulse => "impulse",
            Self::Jump => "jump",
            Self::Fall => "fall",
            Self::Collision => "collision",
            Self::Celebrate => "celebrate",
        }
    }

    /// Whether the clip loops
    pub fn looped(self) -> bool {
        !matches!(self, Self::Jump | Self::Collision)
    }
}

/// Plays named clips; implemented by the skinning / render side
pub trait Animator {
    /// Start `clip`, looping if `looped`
    fn play(&mut self, clip: &str, looped: bool);
}

/// Animator that remembers every request
#[derive(Debug, Clone, Default)]
pub struct AnimationLog {
    requests: Vec<(String, bool)>,
}

impl AnimationLog {
    /// Empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests in order
    pub fn requests(&self) -> &[(String, bool)] {
        &self.requests
    }

    /// Most recent clip
    pub fn current(&self) -> Option<&str> {
        self.requests.last().map(|(clip, _)| clip.as_str())
    }
}

impl Animator for AnimationLog {
    fn play(&mut self, clip: &str, looped: bool) {
        log::debug!("Animation -> {} (looped: {})", clip, looped);
        self.requests.push((clip.to_string(), looped));
    }
}

/// Everything the state choice depends on
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationInputs {
    /// Standing on ground
    pub grounded: bool,
    /// Seconds since leaving the ground
    pub air_time: f32,
    /// Vertical velocity
    pub vertical_velocity: f32,
    /// Velocity magnitude
    pub speed: f32,
    /// Forward held
    pub forward: bool,
    /// Brake held
    pub brake: bool,
    /// Celebrate held or race finished
    pub celebrate: bool,
    /// A wall hit is still being played out
    pub colliding: bool,
    /// A boost is active
    pub boosting: bool,
    /// A jump pad launch is in progress
    pub launched: bool,
}

/// Pick the state for this tick
pub fn select_state(inputs: &AnimationInputs, air_grace: f32, move_threshold: f32) -> AnimationState {
    let airborne = !inputs.grounded && inputs.air_time > air_grace;

    if inputs.celebrate {
        AnimationState::Celebrate
    } else if inputs.colliding {
        AnimationState::Collision
    } else if airborne || inputs.launched {
        if inputs.vertical_velocity > 0.0 {
            AnimationState::Jump
        } else {
            AnimationState::Fall
        }
    } else if inputs.boosting {
        AnimationState::Impulse
    } else if inputs.brake && inputs.speed > move_threshold {
        AnimationState::Brake
    } else if inputs.forward || inputs.speed > move_threshold {
        AnimationState::Move
    } else {
        AnimationState::Idle
    }
}

/// Tracks the playing state and suppresses repeated requests
#[derive(Debug, Clone, Default)]
pub struct AnimationController {
    state: Option<AnimationState>,
}

impl AnimationController {
    /// Nothing played yet
    pub fn new() -> Self {
        Self::default()
    }

    /// State currently playing
    pub fn state(&self) -> Option<AnimationState> {
        self.state
    }

    /// Switch to `next`; returns true if a clip was requested
    pub fn apply(&mut self, next: AnimationState, animator: &mut dyn Animator) -> bool {
        if self.state == Some(next) {
            return false;
        }
        animator.play(next.clip(), next.looped());
        self.state = Some(next);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded() -> AnimationInputs {
        AnimationInputs {
            grounded: true,
            ..AnimationInputs::default()
        }
    }

    #[test]
    fn test_priority_order() {
        let mut inputs = grounded();
        assert_eq!(select_state(&inputs, 0.35, 0.5), AnimationState::Idle);

        inputs.speed = 10.0;
        assert_eq!(select_state(&inputs, 0.35, 0.5), AnimationState::Move);

        inputs.brake = true;
        assert_eq!(select_state(&inputs, 0.35, 0.5), AnimationState::Brake);

        inputs.boosting = true;
        assert_eq!(select_state(&inputs, 0.35, 0.5), AnimationState::Impulse);

        inputs.colliding = true;
        assert_eq!(select_state(&inputs, 0.35, 0.5), AnimationState::Collision);

        inputs.celebrate = true;
        assert_eq!(select_state(&inputs, 0.35, 0.5), AnimationState::Celebrate);
    }

    #[test]
    fn test_short_air_time_keeps_ground_state() {
        let inputs = AnimationInputs {
            grounded: false,
            air_time: 0.1,
            speed: 12.0,
            vertical_velocity: -1.0,
            ..AnimationInputs::default()
        };
        assert_eq!(select_state(&inputs, 0.35, 0.5), AnimationState::Move);

        let long = AnimationInputs { air_time: 0.5, ..inputs };
        assert_eq!(select_state(&long, 0.35, 0.5), AnimationState::Fall);

        let rising = AnimationInputs {
            vertical_velocity: 3.0,
            ..long
        };
        assert_eq!(select_state(&rising, 0.35, 0.5), AnimationState::Jump);
    }

    #[test]
    fn test_controller_suppresses_repeats() {
        let mut controller = AnimationController::new();
        let mut log = AnimationLog::new();

        assert!(controller.apply(AnimationState::Move, &mut log));
        assert!(!controller.apply(AnimationState::Move, &mut log));
        assert!(controller.apply(AnimationState::Jump, &mut log));

        assert_eq!(
            log.requests(),
            &[("move".to_string(), true), ("jump".to_string(), false)]
        );
        assert_eq!(log.current(), Some("jump"));
    }
}
