//! Random input source standing in for a keyboard

use crate::config::PlayerConfig;
use crate::player::Player;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chance per step of picking a new steering direction
const STEER_CHANCE: f64 = 0.05;

/// Chance per step of jumping while on the ground
const JUMP_CHANCE: f64 = 0.02;

/// Seeded random steering and jumping
pub struct Autopilot {
    rng: StdRng,
}

impl Autopilot {
    /// Create an autopilot; the same seed replays the same inputs
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Feed one step of input to the player
    pub fn drive(&mut self, player: &mut Player, tuning: &PlayerConfig) {
        if self.rng.gen_bool(STEER_CHANCE) {
            let direction = match self.rng.gen_range(0..3) {
                0 => -1.0,
                1 => 0.0,
                _ => 1.0,
            };
            player.steer(direction);
        }

        if player.on_ground && self.rng.gen_bool(JUMP_CHANCE) {
            player.jump(tuning);
        }
    }
}
