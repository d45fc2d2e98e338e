//! Debug drawing primitives and sinks

use crate::foundation::math::{Vec3, Vec4};

/// Receiver for debug draw commands
///
/// The octree emits a wireframe cube per visited octant when its draw flag
/// is set. Implementations may forward to a renderer, record or ignore.
pub trait DebugSink {
    /// Draw a wireframe cube centered at `center` with edge length `size`
    fn draw_wire_cube(&mut self, center: Vec3, size: f32, color: Vec4);

    /// Mark a point, e.g. the center of an entity in contact
    fn draw_point(&mut self, _position: Vec3, _color: Vec4) {}
}

/// Sink that drops every command
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DebugSink for NullSink {
    fn draw_wire_cube(&mut self, _center: Vec3, _size: f32, _color: Vec4) {}
}

/// A recorded draw command
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Octant outline
    WireCube {
        /// Cube center
        center: Vec3,
        /// Edge length
        size: f32,
        /// RGBA color
        color: Vec4,
        /// Seconds left before the shape expires
        duration: f32,
    },

    /// Contact marker
    Point {
        /// Marker position
        position: Vec3,
        /// RGBA color
        color: Vec4,
        /// Seconds left before the shape expires
        duration: f32,
    },
}

impl DebugShape {
    /// Count down by `delta_time`; true once the shape has expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        match self {
            Self::WireCube { duration, .. } | Self::Point { duration, .. } => {
                *duration -= delta_time;
                *duration <= 0.0
            }
        }
    }
}

/// Debug drawing system that records shapes for a renderer to pick up
///
/// Shapes live for `default_duration` seconds of [`DebugDrawSystem::update`]
/// time; a duration of zero means "until the next update".
pub struct DebugDrawSystem {
    shapes: Vec<DebugShape>,

    /// Lifetime given to newly recorded shapes
    pub default_duration: f32,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create a new debug draw system
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            default_duration: 0.0,
            enabled: true,
        }
    }

    /// Update shape lifetimes and remove expired shapes
    pub fn update(&mut self, delta_time: f32) {
        self.shapes.retain_mut(|shape| !shape.tick(delta_time));
    }

    /// Get all recorded shapes
    pub fn shapes(&self) -> &[DebugShape] {
        &self.shapes
    }

    /// Number of recorded wireframe cubes
    pub fn wire_cube_count(&self) -> usize {
        self.shapes
            .iter()
            .filter(|shape| matches!(shape, DebugShape::WireCube { .. }))
            .count()
    }

    /// Get the number of active shapes
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Clear all shapes
    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugSink for DebugDrawSystem {
    fn draw_wire_cube(&mut self, center: Vec3, size: f32, color: Vec4) {
        if !self.enabled {
            return;
        }

        self.shapes.push(DebugShape::WireCube {
            center,
            size,
            color,
            duration: self.default_duration,
        });
    }

    fn draw_point(&mut self, position: Vec3, color: Vec4) {
        if !self.enabled {
            return;
        }

        self.shapes.push(DebugShape::Point {
            position,
            color,
            duration: self.default_duration,
        });
    }
}
