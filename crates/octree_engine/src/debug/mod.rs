//! Debug module for visualization and debugging tools
//!
//! Everything here is decorative. Collision verdicts never depend on it and
//! every sink may safely discard what it is given.

pub mod draw;

pub use draw::{DebugDrawSystem, DebugShape, DebugSink, NullSink};
