//! Bounding volumes and narrow-phase overlap tests
//!
//! Every tracked object carries a [`CollisionShape`]. The octree only ever
//! looks at a shape's center and its axis-aligned bounds; the collision
//! strategies call [`CollisionShape::intersects`] for the exact answer.

use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding volume described by a center and half-extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingVolume {
    /// World-space center
    pub center: Vec3,
    /// Half size along each axis (all components non-negative)
    pub half_extents: Vec3,
}

impl BoundingVolume {
    /// Create a volume from a center and per-axis half-extents
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    /// Create a cube with the same half-extent on every axis
    pub fn cube(center: Vec3, half_extent: f32) -> Self {
        Self::new(center, Vec3::repeat(half_extent))
    }

    /// Create a volume from its min and max corners
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self::new((min + max) * 0.5, (max - min) * 0.5)
    }

    /// Minimum corner
    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    /// Maximum corner
    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Check if this volume contains a point (boundary inclusive)
    pub fn contains_point(&self, point: &Vec3) -> bool {
        (point - self.center)
            .abs()
            .iter()
            .zip(self.half_extents.iter())
            .all(|(d, h)| d <= h)
    }

    /// Check if this volume overlaps another (touching faces count)
    pub fn overlaps(&self, other: &BoundingVolume) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        (0..3).all(|axis| a_min[axis] <= b_max[axis] && a_max[axis] >= b_min[axis])
    }

    /// Grow the volume by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Self {
        Self::new(self.center, self.half_extents.add_scalar(margin))
    }

    /// Point inside the volume closest to `point`
    pub fn closest_point(&self, point: &Vec3) -> Vec3 {
        let (min, max) = (self.min(), self.max());
        Vec3::new(
            point.x.clamp(min.x, max.x),
            point.y.clamp(min.y, max.y),
            point.z.clamp(min.z, max.z),
        )
    }
}

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }

    /// Check if this sphere intersects with another
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }

    /// Check if this sphere intersects an axis-aligned volume
    pub fn intersects_volume(&self, volume: &BoundingVolume) -> bool {
        let closest = volume.closest_point(&self.center);
        (closest - self.center).magnitude_squared() <= self.radius * self.radius
    }

    /// Axis-aligned bounds of the sphere
    pub fn bounds(&self) -> BoundingVolume {
        BoundingVolume::cube(self.center, self.radius)
    }
}

/// Collision shape types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionShape {
    /// Axis-aligned box
    Box(BoundingVolume),
    /// Sphere
    Sphere(BoundingSphere),
}

impl CollisionShape {
    /// Creates an axis-aligned box shape
    pub fn aabb(center: Vec3, half_extents: Vec3) -> Self {
        Self::Box(BoundingVolume::new(center, half_extents))
    }

    /// Creates a cube shape with a scalar half-extent
    pub fn cube(center: Vec3, half_extent: f32) -> Self {
        Self::Box(BoundingVolume::cube(center, half_extent))
    }

    /// Creates a spherical collision shape
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::Sphere(BoundingSphere::new(center, radius))
    }

    /// Returns the center position of the collision shape
    pub fn center(&self) -> Vec3 {
        match self {
            Self::Box(volume) => volume.center,
            Self::Sphere(sphere) => sphere.center,
        }
    }

    /// Sets the center position of the collision shape
    pub fn set_center(&mut self, center: Vec3) {
        match self {
            Self::Box(volume) => volume.center = center,
            Self::Sphere(sphere) => sphere.center = center,
        }
    }

    /// Axis-aligned bounds enclosing the shape
    pub fn bounds(&self) -> BoundingVolume {
        match self {
            Self::Box(volume) => *volume,
            Self::Sphere(sphere) => sphere.bounds(),
        }
    }

    /// Largest half-extent of the shape's bounds along any axis
    pub fn max_half_extent(&self) -> f32 {
        self.bounds().half_extents.max()
    }

    /// Test if this shape intersects with another shape
    pub fn intersects(&self, other: &CollisionShape) -> bool {
        match (self, other) {
            (Self::Box(a), Self::Box(b)) => a.overlaps(b),
            (Self::Sphere(a), Self::Sphere(b)) => a.intersects(b),
            (Self::Sphere(sphere), Self::Box(volume)) | (Self::Box(volume), Self::Sphere(sphere)) => {
                sphere.intersects_volume(volume)
            }
        }
    }
}
