//! Player movement

use crate::config::{LaneConfig, PlayerConfig};
use octree_engine::foundation::math::Vec3;

/// Player kinematic state
///
/// `position` is the point between the player's feet; the collision box
/// sits on top of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Feet position
    pub position: Vec3,

    /// Current velocity
    pub velocity: Vec3,

    /// Steering input in [-1, 1], decays every step
    pub input_direction: f32,

    /// Whether the player stood on the ground after the last step
    pub on_ground: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            velocity: Vec3::zeros(),
            input_direction: 0.0,
            on_ground: true,
        }
    }
}

impl Player {
    /// Set the steering input
    pub fn steer(&mut self, direction: f32) {
        self.input_direction = direction.clamp(-1.0, 1.0);
    }

    /// Jump if standing on the ground; returns whether the jump happened
    pub fn jump(&mut self, tuning: &PlayerConfig) -> bool {
        if !self.on_ground {
            return false;
        }
        self.velocity.y = tuning.jump_velocity;
        self.on_ground = false;
        true
    }

    /// Advance one step
    ///
    /// Velocity is applied before gravity, so a jump gets its full initial
    /// velocity on the first step. Hitting a lane edge cancels the steering
    /// input; otherwise it decays by the dampening factor.
    pub fn integrate(&mut self, dt: f32, tuning: &PlayerConfig, lane: &LaneConfig) {
        self.velocity.x = self.input_direction * tuning.horizontal_speed;
        self.position += self.velocity * dt;

        if self.position.y <= 0.0 {
            self.position.y = 0.0;
            self.velocity.y = self.velocity.y.max(0.0);
        }
        self.on_ground = self.position.y <= 0.0;

        if self.position.x > lane.x_max {
            self.position.x = lane.x_max;
            self.input_direction = 0.0;
        } else if self.position.x < lane.x_min {
            self.position.x = lane.x_min;
            self.input_direction = 0.0;
        } else {
            self.input_direction *= tuning.input_dampening;
        }

        self.velocity += tuning.gravity * dt;
    }

    /// Center of the collision box for the given half-extents
    pub fn box_center(&self, half_extents: &Vec3) -> Vec3 {
        self.position + Vec3::new(0.0, half_extents.y, 0.0)
    }
}
