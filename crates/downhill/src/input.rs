//! Keyboard snapshot and per-player controls
//!
//! The window layer feeds key presses into an [`InputState`]; each local
//! player reads it through its own [`ControlsConfig`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// W
    W,
    /// A
    A,
    /// S
    S,
    /// D
    D,
    /// E
    E,
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Arrow left
    Left,
    /// Arrow right
    Right,
    /// Right shift
    RShift,
    /// Space bar
    Space,
    /// Enter / return
    Enter,
    /// Escape
    Escape,
}

/// Keys held this frame and last frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: HashSet<Key>,
    previous: HashSet<Key>,
}

impl InputState {
    /// Nothing pressed
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a key as held
    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    /// Mark a key as released
    pub fn release(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    /// Release everything
    pub fn clear(&mut self) {
        self.pressed.clear();
    }

    /// Key is held
    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Key went down since the previous frame
    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key) && !self.previous.contains(&key)
    }

    /// Roll the current keys into the previous-frame set
    pub fn end_frame(&mut self) {
        self.previous.clone_from(&self.pressed);
    }
}

/// Key bindings of one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlsConfig {
    /// Push forward
    pub forward: Key,
    /// Brake
    pub brake: Key,
    /// Steer left
    pub left: Key,
    /// Steer right
    pub right: Key,
    /// Celebrate
    pub celebrate: Key,
}

impl ControlsConfig {
    /// Left side of the keyboard
    pub fn player_one() -> Self {
        Self {
            forward: Key::W,
            brake: Key::S,
            left: Key::A,
            right: Key::D,
            celebrate: Key::E,
        }
    }

    /// Arrow keys
    pub fn player_two() -> Self {
        Self {
            forward: Key::Up,
            brake: Key::Down,
            left: Key::Left,
            right: Key::Right,
            celebrate: Key::RShift,
        }
    }

    /// Read this player's intent from the keyboard snapshot
    pub fn sample(&self, input: &InputState) -> PlayerInput {
        PlayerInput {
            forward: input.is_pressed(self.forward),
            brake: input.is_pressed(self.brake),
            left: input.is_pressed(self.left),
            right: input.is_pressed(self.right),
            celebrate: input.is_pressed(self.celebrate),
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self::player_one()
    }
}

/// One player's intent for a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    /// Forward held
    pub forward: bool,
    /// Brake held
    pub brake: bool,
    /// Steering left
    pub left: bool,
    /// Steering right
    pub right: bool,
    /// Celebrate held
    pub celebrate: bool,
}

impl PlayerInput {
    /// -1 steering left, 1 steering right, 0 for neither or both
    pub fn steer(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}
