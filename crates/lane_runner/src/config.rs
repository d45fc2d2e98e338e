//! Game configuration

use octree_engine::config::Config;
use octree_engine::foundation::math::Vec3;
use octree_engine::physics::{BoundingVolume, CollisionConfig};
use octree_engine::spatial::OctreeConfig;
use serde::{Deserialize, Serialize};

/// Lane-runner configuration, loadable from `.toml` or `.ron`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Lane geometry
    pub lane: LaneConfig,

    /// Player tuning
    pub player: PlayerConfig,

    /// Obstacle and coin streams
    pub streams: StreamConfig,

    /// Simulation loop settings
    pub simulation: SimulationConfig,

    /// Octree construction parameters
    pub octree: OctreeConfig,

    /// Replace the octree root center and size with a cube around
    /// [`GameConfig::play_volume`]
    pub fit_octree: bool,

    /// Collision strategy selection
    pub collision: CollisionConfig,
}

/// Lane bounds and recycling planes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneConfig {
    /// Right edge of the lane, for the player and spawned objects
    pub x_max: f32,

    /// Left edge of the lane
    pub x_min: f32,

    /// Z where objects are (re)placed
    pub obstacle_z_start: f32,

    /// Objects past this Z are recycled
    pub obstacle_z_max: f32,
}

/// Player movement tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Gravity acceleration
    pub gravity: Vec3,

    /// Horizontal speed at full input
    pub horizontal_speed: f32,

    /// Per-step input decay; closer to 1 feels slipperier
    pub input_dampening: f32,

    /// Upward velocity applied by a jump
    pub jump_velocity: f32,

    /// Half-extents of the player's box
    pub half_extents: Vec3,
}

/// Obstacle and coin stream layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Number of obstacles
    pub obstacle_count: u32,

    /// Z distance between consecutive obstacles
    pub obstacle_spacing: f32,

    /// Half-extents of an obstacle's box
    pub obstacle_half_extents: Vec3,

    /// Number of coins
    pub coin_count: u32,

    /// Z distance between consecutive coins
    pub coin_spacing: f32,

    /// Coin sphere radius
    pub coin_radius: f32,

    /// Speed objects travel toward the player (+Z), per second
    pub speed: f32,
}

/// Headless loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed step length in seconds
    pub time_step: f32,

    /// Number of steps to run
    pub steps: u32,

    /// Seed for lane positions and the autopilot
    pub seed: u64,

    /// Log collision timing every this many steps
    pub report_interval: u32,
}

impl Config for GameConfig {}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            x_max: 3.5,
            x_min: -3.5,
            obstacle_z_start: -50.0,
            obstacle_z_max: 5.0,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.8, 0.0),
            horizontal_speed: 1.0,
            input_dampening: 0.86,
            jump_velocity: 5.6,
            half_extents: Vec3::new(0.4, 0.5, 0.6),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            obstacle_count: 800,
            obstacle_spacing: 10.0,
            obstacle_half_extents: Vec3::new(0.5, 0.7, 0.9),
            coin_count: 10,
            coin_spacing: 5.0,
            coin_radius: 0.3,
            speed: 10.0,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: 1.0 / 60.0,
            steps: 3600,
            seed: 0x5eed,
            report_interval: 600,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lane: LaneConfig::default(),
            player: PlayerConfig::default(),
            streams: StreamConfig::default(),
            simulation: SimulationConfig::default(),
            octree: OctreeConfig {
                draw_debug: false,
                ..OctreeConfig::default()
            },
            fit_octree: true,
            collision: CollisionConfig::default(),
        }
    }
}

impl GameConfig {
    /// Region the player and every stream object can occupy
    ///
    /// Streams are laid out back from the start plane and recycled to it,
    /// so the far end never moves past the initial layout.
    pub fn play_volume(&self) -> BoundingVolume {
        let streams = &self.streams;
        #[allow(clippy::cast_precision_loss)]
        let far_z = (self.lane.obstacle_z_start
            - streams.obstacle_spacing * streams.obstacle_count.saturating_sub(1) as f32)
            .min(self.lane.obstacle_z_start - streams.coin_spacing * streams.coin_count.saturating_sub(1) as f32)
            .min(self.lane.obstacle_z_start);

        let half = streams
            .obstacle_half_extents
            .sup(&self.player.half_extents)
            .sup(&Vec3::repeat(streams.coin_radius));
        let apex = self.player.jump_velocity.powi(2) / (2.0 * self.player.gravity.y.abs().max(f32::EPSILON));

        BoundingVolume::from_min_max(
            Vec3::new(self.lane.x_min - half.x, 0.0, far_z - half.z),
            Vec3::new(
                self.lane.x_max + half.x,
                apex + 2.0 * half.y,
                self.lane.obstacle_z_max + streams.speed * self.simulation.time_step + half.z,
            ),
        )
    }

    /// Octree parameters the world is built with
    ///
    /// With `fit_octree` set, the root becomes a cube just around the
    /// play volume, and the depth cap is raised until leaves can get down to
    /// about one obstacle spacing.
    pub fn effective_octree(&self) -> OctreeConfig {
        let mut octree = self.octree.clone();
        if !self.fit_octree {
            return octree;
        }

        let volume = self.play_volume();
        let extent = volume.max() - volume.min();
        octree.center = volume.center;
        // Slack so the extreme faces stay inside under rounding
        octree.size = extent.max() * 1.01;

        let leaf_target = self.streams.obstacle_spacing.max(octree.min_size).max(f32::EPSILON);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let depth = (octree.size / leaf_target).log2().ceil().clamp(0.0, 16.0) as u32;
        octree.max_depth = octree.max_depth.max(depth);
        octree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use octree_engine::config::ConfigFormat;
    use octree_engine::physics::CollisionStrategy;

    #[test]
    fn test_defaults_match_lane_constants() {
        let config = GameConfig::default();
        assert_relative_eq!(config.lane.x_max, 3.5);
        assert_relative_eq!(config.lane.x_min, -3.5);
        assert_eq!(config.streams.obstacle_count, 800);
        assert_eq!(config.streams.coin_count, 10);
        assert_eq!(
            config.collision.strategy,
            CollisionStrategy::ForwardCutoff { cutoff: 5.0 }
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
            [streams]
            obstacle_count = 40

            [collision]
            strategy = "Octree"
            rebuild_interval = 2
        "#;
        let config = GameConfig::from_str_with_format(toml, ConfigFormat::Toml).unwrap();
        assert_eq!(config.streams.obstacle_count, 40);
        assert_eq!(config.streams.coin_count, 10);
        assert_eq!(config.collision.strategy, CollisionStrategy::Octree);
        assert_eq!(config.collision.rebuild_interval, 2);
        assert_eq!(config.lane, LaneConfig::default());
    }

    #[test]
    fn test_shipped_config_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../lane_runner.toml");
        let config = GameConfig::load_from_file(path).unwrap();
        assert_eq!(config.collision.strategy, CollisionStrategy::default());
        assert!(config.fit_octree);
        assert_eq!(config.player, PlayerConfig::default());
    }

    #[test]
    fn test_play_volume_spans_the_streams() {
        let config = GameConfig::default();
        let volume = config.play_volume();
        // Last of 800 cows starts at -50 - 799 * 10
        assert_relative_eq!(volume.min().z, -8040.0 - 0.9);
        assert!(volume.max().z > config.lane.obstacle_z_max);
        assert!(volume.min().x < config.lane.x_min);
        assert!(volume.max().x > config.lane.x_max);
        assert!(volume.max().y > config.player.half_extents.y * 2.0);
    }

    #[test]
    fn test_fitted_octree_contains_play_volume() {
        let config = GameConfig::default();
        let octree = config.effective_octree();
        let volume = config.play_volume();
        let root = BoundingVolume::cube(octree.center, octree.size / 2.0);
        assert!(root.contains_point(&volume.min()));
        assert!(root.contains_point(&volume.max()));
        assert!(octree.max_depth > config.octree.max_depth);
        assert_eq!(octree.ideal_entity_count, config.octree.ideal_entity_count);

        let unfitted = GameConfig {
            fit_octree: false,
            ..GameConfig::default()
        };
        assert_eq!(unfitted.effective_octree(), unfitted.octree);
    }

    #[test]
    fn test_ron_round_trip() {
        let mut config = GameConfig::default();
        config.collision.strategy = CollisionStrategy::BruteForce;
        config.simulation.seed = 7;

        let text = config.to_string_with_format(ConfigFormat::Ron).unwrap();
        let parsed = GameConfig::from_str_with_format(&text, ConfigFormat::Ron).unwrap();
        assert_eq!(parsed, config);
    }
}
