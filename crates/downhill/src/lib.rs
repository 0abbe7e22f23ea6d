//! # Downhill
//!
//! Split-screen downhill ski racing on top of `ski_engine`.
//!
//! ## Features
//!
//! - **Slope physics**: ground classification, slope-relative movement and
//!   air time driven by the engine's collision probes
//! - **Collision response**: sliding along steep faces, bouncing off walls and
//!   recovering players stuck in geometry
//! - **Surfaces**: boost pads, jump pads, checkpoints and the finish line
//! - **Animation**: discrete skier states feeding an external animator
//! - **Stages**: menu and race stages ticked at a fixed rate

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::cast_precision_loss
)]

pub mod animation;
pub mod camera;
pub mod config;
pub mod course;
pub mod error;
pub mod game;
pub mod input;
pub mod player;
pub mod stage;

#[cfg(test)]
mod tests;

pub use error::GameError;
pub use game::Game;
pub use player::Player;
