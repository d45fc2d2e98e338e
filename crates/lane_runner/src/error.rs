//! Game-level errors

use octree_engine::config::ConfigError;
use octree_engine::spatial::OctreeError;

/// Errors that stop the simulation from starting
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// The config file could not be read or parsed
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The octree parameters are degenerate
    #[error("octree error: {0}")]
    Octree(#[from] OctreeError),

    /// Lane bounds are empty or inverted
    #[error("invalid lane: x_min {x_min} must be below x_max {x_max}")]
    InvalidLane {
        /// Left edge
        x_min: f32,
        /// Right edge
        x_max: f32,
    },
}

/// Result alias for game setup
pub type GameResult<T> = Result<T, GameError>;
