//! Math utilities and types
//!
//! Provides the vector types used by bounding volumes and the octree.

pub use nalgebra::{Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (used for RGBA debug colors)
pub type Vec4 = Vector4<f32>;

/// Named RGBA colors for debug drawing
pub mod colors {
    use super::Vec4;

    /// Opaque yellow, used for octant outlines
    pub fn yellow() -> Vec4 {
        Vec4::new(1.0, 1.0, 0.0, 1.0)
    }

    /// Opaque red, used for entities in contact
    pub fn red() -> Vec4 {
        Vec4::new(1.0, 0.0, 0.0, 1.0)
    }
}

/// Component-wise absolute difference `|a - b|`
pub fn abs_diff(a: &Vec3, b: &Vec3) -> Vec3 {
    (a - b).abs()
}

/// Returns true when every component of `v` is finite
pub fn is_finite(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}
