//! Lane-runner simulation
//!
//! Obstacles and coins stream toward the player along +Z and are recycled
//! back to the start plane once they pass the player. Every step runs in a
//! fixed order: player physics, stream movement, store sync, collision
//! strategy, then the state transition.

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::player::Player;
use octree_engine::debug::DebugDrawSystem;
use octree_engine::ecs::{Entity, EntityManager, EntityStore};
use octree_engine::foundation::math::Vec3;
use octree_engine::physics::{subject_contacts, CollisionCategory, CollisionDetector, CollisionShape, CollisionStrategy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// Name of the player entity in the store
pub const PLAYER_UID: &str = "Player";

/// Name prefix of obstacle entities
pub const OBSTACLE_UID: &str = "Cow";

/// Name prefix of coin entities
pub const COIN_UID: &str = "Coin";

/// High-level game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Streams moving, collisions checked
    Playing,
    /// The player hit an obstacle; the world is frozen
    GameOver,
}

/// What happened during one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// The strategy reported an obstacle contact
    pub hit_obstacle: bool,

    /// Coins picked up this step
    pub coins_collected: u32,
}

/// Per-run counters
#[derive(Debug, Clone, Copy, Default)]
pub struct RunStats {
    /// Steps simulated while playing
    pub steps: u64,

    /// Transitions into [`GameState::GameOver`]
    pub crashes: u32,

    /// Coins collected over the whole run
    pub coins: u32,

    /// Time spent inside the collision strategy
    pub collision_time: Duration,
}

impl RunStats {
    /// Average collision cost per step
    pub fn average_collision_time(&self) -> Duration {
        u32::try_from(self.steps)
            .ok()
            .filter(|steps| *steps > 0)
            .map_or(Duration::ZERO, |steps| self.collision_time / steps)
    }
}

/// Headless lane-runner world
pub struct LaneRunner {
    config: GameConfig,
    store: EntityManager,
    detector: CollisionDetector,
    debug: DebugDrawSystem,
    rng: StdRng,
    player: Player,
    player_entity: Entity,
    obstacles: Vec<Entity>,
    coins: Vec<Entity>,
    state: GameState,
    score: u32,
    stats: RunStats,
}

impl LaneRunner {
    /// Build the world: player first, then obstacles, then coins
    pub fn new(config: GameConfig) -> GameResult<Self> {
        if config.lane.x_min >= config.lane.x_max {
            return Err(GameError::InvalidLane {
                x_min: config.lane.x_min,
                x_max: config.lane.x_max,
            });
        }

        let octree_config = config.effective_octree();
        log::debug!(
            "Octree root: center {:?}, size {}, max depth {}",
            octree_config.center,
            octree_config.size,
            octree_config.max_depth
        );
        let detector = CollisionDetector::new(config.collision.clone(), octree_config)?;
        let player = Player::default();

        let mut store = EntityManager::new();
        let player_entity = store.add_entity(
            PLAYER_UID,
            CollisionShape::aabb(player.box_center(&config.player.half_extents), config.player.half_extents),
            CollisionCategory::PLAYER,
        );

        let obstacles = (0..config.streams.obstacle_count)
            .map(|i| {
                store.add_entity(
                    format!("{OBSTACLE_UID}{i}"),
                    CollisionShape::aabb(Vec3::zeros(), config.streams.obstacle_half_extents),
                    CollisionCategory::OBSTACLE,
                )
            })
            .collect();

        let coins = (0..config.streams.coin_count)
            .map(|i| {
                store.add_entity(
                    format!("{COIN_UID}{i}"),
                    CollisionShape::sphere(Vec3::zeros(), config.streams.coin_radius),
                    CollisionCategory::COLLECTIBLE,
                )
            })
            .collect();

        let mut runner = Self {
            rng: StdRng::seed_from_u64(config.simulation.seed),
            debug: DebugDrawSystem::new(),
            config,
            store,
            detector,
            player,
            player_entity,
            obstacles,
            coins,
            state: GameState::Playing,
            score: 0,
            stats: RunStats::default(),
        };
        runner.reset_obstacles_and_coins();

        log::info!(
            "Lane runner ready: {} obstacles, {} coins, strategy {}",
            runner.obstacles.len(),
            runner.coins.len(),
            runner.detector.strategy().name()
        );
        Ok(runner)
    }

    /// Current state
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// Coins collected since the last respawn
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Run counters
    pub const fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Player state
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable player state, for input
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Tracked entities
    pub const fn store(&self) -> &EntityManager {
        &self.store
    }

    /// The player's handle in the store
    pub const fn player_entity(&self) -> Entity {
        self.player_entity
    }

    /// Obstacle handles, in stream order
    pub fn obstacles(&self) -> &[Entity] {
        &self.obstacles
    }

    /// Coin handles, in stream order
    pub fn coins(&self) -> &[Entity] {
        &self.coins
    }

    /// Collision detector
    pub const fn detector(&self) -> &CollisionDetector {
        &self.detector
    }

    /// Debug shapes recorded by the last octree pass
    pub const fn debug_draw(&self) -> &DebugDrawSystem {
        &self.debug
    }

    /// Game configuration
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Switch the collision strategy
    pub fn set_strategy(&mut self, strategy: CollisionStrategy) {
        self.detector.set_strategy(strategy);
    }

    /// Toggle octant outlines
    pub fn set_draw_debug(&mut self, draw_debug: bool) {
        self.config.octree.draw_debug = draw_debug;
        self.detector.octree_mut().set_draw_debug(draw_debug);
        if !draw_debug {
            self.debug.clear();
        }
    }

    /// Random X inside the lane
    fn random_lane_x(&mut self) -> f32 {
        self.rng.gen_range(self.config.lane.x_min..=self.config.lane.x_max)
    }

    /// Put the player back at the origin, standing still
    pub fn respawn(&mut self) {
        self.player = Player::default();
        self.score = 0;
        self.sync_player();
        log::info!("Player respawned");
    }

    /// Lay both streams out again from the start plane
    pub fn reset_obstacles_and_coins(&mut self) {
        let z_start = self.config.lane.obstacle_z_start;
        let obstacle_y = self.config.streams.obstacle_half_extents.y;
        let coin_y = self.config.streams.coin_radius;

        for (i, entity) in self.obstacles.clone().into_iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let z = z_start - self.config.streams.obstacle_spacing * i as f32;
            let x = self.random_lane_x();
            self.store.set_position(entity, Vec3::new(x, obstacle_y, z));
        }

        for (i, entity) in self.coins.clone().into_iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let z = z_start - self.config.streams.coin_spacing * i as f32;
            let x = self.random_lane_x();
            self.store.set_position(entity, Vec3::new(x, coin_y, z));
        }

        log::info!("Obstacles and coins reset");
    }

    /// Enter a state and run its entry actions
    ///
    /// Entering [`GameState::Playing`] respawns the player and re-lays the
    /// streams. Entering [`GameState::GameOver`] freezes the world.
    pub fn set_state(&mut self, state: GameState) {
        match state {
            GameState::Playing => {
                self.respawn();
                self.reset_obstacles_and_coins();
            }
            GameState::GameOver => {
                self.stats.crashes += 1;
                log::info!("Game over, score {}", self.score);
            }
        }
        self.state = state;
    }

    /// Advance the world by one fixed step
    ///
    /// Does nothing while the game is over.
    pub fn step(&mut self, dt: f32) -> StepOutcome {
        if self.state == GameState::GameOver {
            return StepOutcome::default();
        }

        self.player.integrate(dt, &self.config.player, &self.config.lane);
        self.sync_player();
        self.advance_streams(dt);

        let started = Instant::now();
        let hit_obstacle = self.detector.step(&self.store, self.player_entity);
        self.stats.collision_time += started.elapsed();
        self.stats.steps += 1;

        self.draw_octree(dt);
        let coins_collected = self.collect_coins();

        if hit_obstacle {
            self.set_state(GameState::GameOver);
        }

        StepOutcome {
            hit_obstacle,
            coins_collected,
        }
    }

    fn sync_player(&mut self) {
        let center = self.player.box_center(&self.config.player.half_extents);
        self.store.set_position(self.player_entity, center);
    }

    fn advance_streams(&mut self, dt: f32) {
        let travel = Vec3::new(0.0, 0.0, self.config.streams.speed * dt);
        let z_max = self.config.lane.obstacle_z_max;
        let z_start = self.config.lane.obstacle_z_start;

        for entity in self.obstacles.clone().into_iter().chain(self.coins.clone()) {
            let mut position = self.store.get(entity).shape.center() + travel;
            if position.z > z_max {
                position.x = self.random_lane_x();
                position.z = z_start;
            }
            self.store.set_position(entity, position);
        }
    }

    /// Score and recycle every coin the player touches
    fn collect_coins(&mut self) -> u32 {
        let touched: Vec<Entity> = subject_contacts(&self.store, self.player_entity)
            .into_iter()
            .filter(|entity| self.store.get(*entity).category.is_collectible())
            .collect();

        for &coin in &touched {
            let x = self.random_lane_x();
            let position = Vec3::new(x, self.config.streams.coin_radius, self.config.lane.obstacle_z_start);
            self.store.set_position(coin, position);
            log::debug!("Collected {}", self.store.get(coin).uid);
        }

        let count = u32::try_from(touched.len()).unwrap_or(u32::MAX);
        self.score += count;
        self.stats.coins += count;
        count
    }

    /// Record octant outlines and leaf contacts when debug drawing is on
    fn draw_octree(&mut self, dt: f32) {
        if !self.config.octree.draw_debug || !self.detector.strategy().uses_octree() {
            return;
        }
        self.debug.update(dt);
        self.store.clear_contacts();
        self.detector.octree().update(&mut self.store, &mut self.debug);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use octree_engine::physics::CollisionConfig;

    const DT: f32 = 1.0 / 60.0;

    fn small_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.streams.obstacle_count = 20;
        config.streams.coin_count = 4;
        config.simulation.seed = 42;
        config
    }

    #[test]
    fn test_world_layout() {
        let runner = LaneRunner::new(small_config()).unwrap();
        assert_eq!(runner.store().count(), 25);
        assert_eq!(runner.player_entity(), Entity::new(0));
        assert_eq!(runner.store().entity_by_uid("Cow0"), Some(Entity::new(1)));
        assert_eq!(runner.store().entity_by_uid("Coin3"), Some(Entity::new(24)));

        let lane = &runner.config().lane;
        for &entity in runner.obstacles().iter().chain(runner.coins()) {
            let center = runner.store().get(entity).shape.center();
            assert!(center.x >= lane.x_min && center.x <= lane.x_max);
            assert!(center.z <= lane.obstacle_z_start);
        }

        let second = runner.store().get(runner.obstacles()[1]).shape.center();
        assert_relative_eq!(second.z, -60.0);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = LaneRunner::new(small_config()).unwrap();
        let b = LaneRunner::new(small_config()).unwrap();
        for (&x, &y) in a.obstacles().iter().zip(b.obstacles()) {
            assert_eq!(a.store().get(x).shape.center(), b.store().get(y).shape.center());
        }
    }

    #[test]
    fn test_inverted_lane_is_rejected() {
        let mut config = small_config();
        config.lane.x_min = 4.0;
        assert!(matches!(LaneRunner::new(config), Err(GameError::InvalidLane { .. })));
    }

    #[test]
    fn test_degenerate_octree_is_rejected() {
        let mut config = small_config();
        config.octree.min_size = -1.0;
        assert!(matches!(LaneRunner::new(config), Err(GameError::Octree(_))));
    }

    #[test]
    fn test_streams_advance_and_recycle() {
        let mut config = small_config();
        config.streams.obstacle_count = 1;
        config.streams.coin_count = 0;
        let mut runner = LaneRunner::new(config).unwrap();
        let cow = runner.obstacles()[0];
        // Move the cow out of the player's lane column
        runner.store.set_position(cow, Vec3::new(3.5, 0.7, 4.95));
        runner.player_mut().position.x = -3.5;

        runner.step(DT);
        let center = runner.store().get(cow).shape.center();
        assert_relative_eq!(center.z, -50.0);
        assert!(center.x >= -3.5 && center.x <= 3.5);
        assert_eq!(runner.state(), GameState::Playing);

        runner.step(DT);
        let center = runner.store().get(cow).shape.center();
        assert_relative_eq!(center.z, -50.0 + 10.0 * DT, epsilon = 1e-4);
    }

    #[test]
    fn test_obstacle_contact_ends_game_and_freezes_world() {
        let mut runner = LaneRunner::new(small_config()).unwrap();
        let cow = runner.obstacles()[0];
        runner.store.set_position(cow, Vec3::new(0.0, 0.7, -1.0));

        let outcome = runner.step(DT);
        assert!(outcome.hit_obstacle);
        assert_eq!(runner.state(), GameState::GameOver);
        assert_eq!(runner.stats().crashes, 1);

        let frozen = runner.store().get(cow).shape.center();
        assert_eq!(runner.step(DT), StepOutcome::default());
        assert_eq!(runner.store().get(cow).shape.center(), frozen);
    }

    #[test]
    fn test_playing_entry_respawns_and_resets() {
        let mut runner = LaneRunner::new(small_config()).unwrap();
        runner.player_mut().position = Vec3::new(2.0, 1.0, 0.0);
        runner.score = 3;
        runner.set_state(GameState::GameOver);

        runner.set_state(GameState::Playing);
        assert_eq!(runner.state(), GameState::Playing);
        assert_eq!(runner.player(), &Player::default());
        assert_eq!(runner.score(), 0);

        let first = runner.store().get(runner.obstacles()[0]).shape.center();
        assert_relative_eq!(first.z, -50.0);
    }

    #[test]
    fn test_coin_pickup_scores_and_recycles() {
        let mut runner = LaneRunner::new(small_config()).unwrap();
        let coin = runner.coins()[0];
        runner.store.set_position(coin, Vec3::new(0.0, 0.5, -0.2));

        let outcome = runner.step(DT);
        assert!(!outcome.hit_obstacle);
        assert_eq!(outcome.coins_collected, 1);
        assert_eq!(runner.score(), 1);
        assert_relative_eq!(runner.store().get(coin).shape.center().z, -50.0);
    }

    #[test]
    fn test_strategies_agree_over_a_run() {
        let strategies = [
            CollisionStrategy::BruteForce,
            CollisionStrategy::default(),
            CollisionStrategy::Octree,
        ];
        let mut runners: Vec<LaneRunner> = strategies
            .iter()
            .map(|&strategy| {
                let mut config = small_config();
                config.collision = CollisionConfig {
                    strategy,
                    rebuild_interval: 1,
                };
                LaneRunner::new(config).unwrap()
            })
            .collect();

        for _ in 0..600 {
            let outcomes: Vec<StepOutcome> = runners.iter_mut().map(|runner| runner.step(DT)).collect();
            assert!(outcomes.iter().all(|outcome| *outcome == outcomes[0]));
            if outcomes[0].hit_obstacle {
                for runner in &mut runners {
                    runner.set_state(GameState::Playing);
                }
            }
        }
    }

    #[test]
    fn test_debug_outlines_only_with_octree_strategy() {
        let mut runner = LaneRunner::new(small_config()).unwrap();
        runner.set_draw_debug(true);
        runner.step(DT);
        assert_eq!(runner.debug_draw().shape_count(), 0);

        runner.set_strategy(CollisionStrategy::Octree);
        runner.step(DT);
        assert!(runner.debug_draw().wire_cube_count() >= 1);

        runner.set_draw_debug(false);
        assert_eq!(runner.debug_draw().shape_count(), 0);
    }

    #[test]
    fn test_fitted_tree_prunes_far_obstacles() {
        let mut config = GameConfig::default();
        config.collision.strategy = CollisionStrategy::Octree;
        let mut runner = LaneRunner::new(config).unwrap();
        runner.step(DT);

        let tree = runner.detector().octree();
        let player_bounds = runner.store().get(runner.player_entity()).shape.bounds();
        let candidates = tree.query_volume(&player_bounds);
        assert!(tree.octant_count() > 9);
        assert!(candidates.len() * 20 < runner.store().count(), "{} candidates", candidates.len());
        assert!(candidates.contains(&runner.player_entity()));
    }

    #[test]
    fn test_unfitted_root_leaves_far_obstacles_as_candidates() {
        let mut config = GameConfig::default();
        config.fit_octree = false;
        config.collision.strategy = CollisionStrategy::Octree;
        let mut runner = LaneRunner::new(config).unwrap();
        runner.step(DT);

        let player_bounds = runner.store().get(runner.player_entity()).shape.bounds();
        let candidates = runner.detector().octree().query_volume(&player_bounds);
        assert!(candidates.len() * 2 > runner.store().count());
    }

    #[test]
    fn test_average_collision_time() {
        let stats = RunStats {
            steps: 4,
            collision_time: Duration::from_millis(8),
            ..RunStats::default()
        };
        assert_eq!(stats.average_collision_time(), Duration::from_millis(2));
        assert_eq!(RunStats::default().average_collision_time(), Duration::ZERO);
    }
}
