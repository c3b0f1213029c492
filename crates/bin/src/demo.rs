//! Quad-tree demo - random fill, range probes, duplicate stress and rebound.

use demo::{DemoConfig, build_tree, check_ranges, check_rebound, make_rng, stress_duplicates};
use glam::Vec2;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Quad-tree demo v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = DemoConfig::load()?;
    info!("Loaded configuration");
    info!("  Tree: max_values={}, max_depth={}", config.tree.max_values, config.tree.max_depth);
    info!(
        "  World: ({}, {}) {}x{}",
        config.world.x, config.world.y, config.world.width, config.world.height
    );
    info!(
        "  Scenario: {} points, radius {}, {} probes, seed {:?}",
        config.scenario.points, config.scenario.query_radius, config.scenario.probes, config.scenario.seed
    );

    let mut rng = make_rng(config.scenario.seed);
    let (mut tree, points) = build_tree(&config, &mut rng)?;
    info!("Inserted {} points: {:?}", tree.len(), tree.stats());

    let report = check_ranges(&tree, &points, &config, &mut rng)?;
    info!(
        "Range probes passed: {} probes, {} hits total",
        report.probes, report.total_hits
    );

    // Same coordinate over and over: must stop splitting at max depth.
    let center = Vec2::new(
        config.world.x + config.world.width / 2.0,
        config.world.y + config.world.height / 2.0,
    );
    let duplicates = config.tree.max_depth as usize + config.tree.max_values * 4;
    let stats = stress_duplicates(&mut tree, center, duplicates)?;
    info!("Inserted {} duplicates at {}: {:?}", duplicates, center, stats);

    check_rebound(&mut tree, &points, &config)?;

    info!("All checks passed");
    Ok(())
}
