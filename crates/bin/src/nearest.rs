//! Quad-tree nearest - nearest-neighbour probes checked against brute force.

use demo::{DemoConfig, build_tree, check_nearest, make_rng};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Quad-tree nearest v{}", env!("CARGO_PKG_VERSION"));

    let config = DemoConfig::load()?;
    info!("Loaded configuration");
    info!("  Tree: max_values={}, max_depth={}", config.tree.max_values, config.tree.max_depth);
    info!("  Points: {}, probes: {}", config.scenario.points, config.scenario.probes);

    let mut rng = make_rng(config.scenario.seed);
    let (tree, points) = build_tree(&config, &mut rng)?;
    info!("Inserted {} points into {} nodes", tree.len(), tree.stats().nodes);

    let report = check_nearest(&tree, &points, &config, &mut rng)?;
    info!(
        "Nearest probes passed: {} probes, avg {:.1} nodes visited, avg {:.1} of {} points tested",
        report.probes,
        report.average_nodes_visited(),
        report.average_points_tested(),
        points.len()
    );

    Ok(())
}
