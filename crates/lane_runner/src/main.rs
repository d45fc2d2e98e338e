//! Headless lane runner
//!
//! Streams obstacles and coins at an autopiloted player and reports how the
//! configured collision strategy performs.
//!
//! ```text
//! lane_runner [config.toml | config.ron]
//! ```

use lane_runner::autopilot::Autopilot;
use lane_runner::{GameConfig, GameResult, GameState, LaneRunner};
use octree_engine::config::Config;
use octree_engine::foundation::logging;

const DEFAULT_CONFIG_PATH: &str = "lane_runner.toml";

fn main() {
    logging::init();

    if let Err(e) = run() {
        log::error!("Lane runner failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> GameResult<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = GameConfig::load_or_default(&path)?;

    let steps = config.simulation.steps;
    let dt = config.simulation.time_step;
    let report_interval = config.simulation.report_interval.max(1);

    let mut autopilot = Autopilot::new(config.simulation.seed.wrapping_add(1));
    let mut runner = LaneRunner::new(config)?;

    for step in 1..=steps {
        let tuning = runner.config().player.clone();
        autopilot.drive(runner.player_mut(), &tuning);

        let outcome = runner.step(dt);
        if outcome.coins_collected > 0 {
            log::debug!("Step {step}: score {}", runner.score());
        }
        if runner.state() == GameState::GameOver {
            log::info!("Step {step}: crashed");
            runner.set_state(GameState::Playing);
        }

        if step % report_interval == 0 {
            log::debug!(
                "Step {step}: {} avg {:?} per collision check, {} octants",
                runner.detector().strategy().name(),
                runner.stats().average_collision_time(),
                runner.detector().octree().octant_count()
            );
        }
    }

    let stats = runner.stats();
    log::info!(
        "{} steps with {}: {} crashes, {} coins, {:?} avg per collision check",
        stats.steps,
        runner.detector().strategy().name(),
        stats.crashes,
        stats.coins,
        stats.average_collision_time()
    );
    Ok(())
}
