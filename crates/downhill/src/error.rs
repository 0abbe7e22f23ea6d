//! Game errors

use thiserror::Error;

use ski_engine::config::ConfigError;
use ski_engine::physics::MeshError;
use ski_engine::scene::SceneError;

use crate::stage::StageId;

/// Errors surfaced by the game shell. The simulation itself never fails.
#[derive(Error, Debug)]
pub enum GameError {
    /// Configuration could not be loaded or saved
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene file could not be loaded
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),

    /// Mesh could not be loaded
    #[error("mesh error: {0}")]
    Mesh(#[from] MeshError),

    /// A stage switch named a stage that was never registered
    #[error("stage {0:?} is not registered")]
    StageNotFound(StageId),
}
