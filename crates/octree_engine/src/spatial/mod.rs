//! Spatial partitioning data structures
//!
//! Provides the octree used to prune pairwise collision checks among
//! moving bounding volumes.

pub mod octree;

pub use octree::{Octant, OctantId, Octree, OctreeConfig, OctreeError};
