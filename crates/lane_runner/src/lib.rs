//! # Lane Runner
//!
//! Headless lane-runner simulation on top of `octree_engine`: a player
//! dodges a stream of obstacles and collects coins while a configurable
//! collision strategy decides when the run ends.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod autopilot;
pub mod config;
pub mod error;
pub mod game;
pub mod player;

pub use config::GameConfig;
pub use error::{GameError, GameResult};
pub use game::{GameState, LaneRunner, RunStats, StepOutcome};
