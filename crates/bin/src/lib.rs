//! Manual-test harnesses for the quad-tree.
//!
//! Each scenario fills a tree with random points and checks the tree's answers
//! against a brute-force scan of the same points.

pub mod config;

pub use config::DemoConfig;

use glam::Vec2;
use quadtree::{Bounds, Hit, QuadTree, TreeStats};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Build the RNG for a run, seeded when the config asks for it.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// A random point inside `bounds`.
pub fn random_point(rng: &mut impl Rng, bounds: &Bounds) -> Vec2 {
    Vec2::new(
        rng.random_range(bounds.min_x..=bounds.max_x),
        rng.random_range(bounds.min_y..=bounds.max_y),
    )
}

/// Create the tree described by `config` and fill it with random points.
///
/// The payload of each point is its index in the returned vector.
pub fn build_tree(config: &DemoConfig, rng: &mut impl Rng) -> anyhow::Result<(QuadTree<u32>, Vec<Vec2>)> {
    let world = &config.world;
    let mut tree = QuadTree::with_bounds(config.tree, world.x, world.y, world.width, world.height)?;
    let bounds = Bounds::from_xywh(world.x, world.y, world.width, world.height);

    let mut points = Vec::with_capacity(config.scenario.points);
    for i in 0..config.scenario.points {
        let point = random_point(rng, &bounds);
        tree.add_point(u32::try_from(i)?, point)?;
        points.push(point);
    }

    debug!("Filled tree with {} points: {:?}", points.len(), tree.stats());
    Ok((tree, points))
}

/// Indices of every point within `radius` of `center`.
pub fn brute_force_radius(points: &[Vec2], center: Vec2, radius: f32) -> Vec<u32> {
    let radius_sq = radius * radius;
    points
        .iter()
        .zip(0u32..)
        .filter(|(p, _)| p.distance_squared(center) <= radius_sq)
        .map(|(_, i)| i)
        .collect()
}

/// Indices of every point inside `rect`.
pub fn brute_force_rect(points: &[Vec2], rect: &Bounds) -> Vec<u32> {
    points
        .iter()
        .zip(0u32..)
        .filter(|(p, _)| rect.contains(p.x, p.y))
        .map(|(_, i)| i)
        .collect()
}

/// Smallest squared distance from `center` to any point.
pub fn brute_force_nearest(points: &[Vec2], center: Vec2) -> Option<f32> {
    points
        .iter()
        .map(|p| p.distance_squared(center))
        .reduce(f32::min)
}

fn sorted_payloads(hits: &[Hit<u32>]) -> Vec<u32> {
    let mut ids: Vec<u32> = hits.iter().map(|h| h.payload).collect();
    ids.sort_unstable();
    ids
}

/// Outcome of the range probes.
#[derive(Debug, Clone, Default)]
pub struct RangeReport {
    pub probes: usize,
    pub total_hits: usize,
}

/// Radius and rectangle probes at random centres, each compared with brute force.
pub fn check_ranges(
    tree: &QuadTree<u32>,
    points: &[Vec2],
    config: &DemoConfig,
    rng: &mut impl Rng,
) -> anyhow::Result<RangeReport> {
    let bounds = tree
        .bounds()
        .ok_or_else(|| anyhow::anyhow!("tree has no bounds"))?;
    let radius = config.scenario.query_radius;
    let mut report = RangeReport::default();
    let mut results = Vec::new();

    for _ in 0..config.scenario.probes {
        let center = random_point(rng, &bounds);

        results.clear();
        tree.query(center.x, center.y, radius, &mut results);
        let expected = brute_force_radius(points, center, radius);
        anyhow::ensure!(
            sorted_payloads(&results) == expected,
            "radius query at {center} found {} points, brute force found {}",
            results.len(),
            expected.len()
        );
        report.total_hits += results.len();

        let rect = Bounds::from_center(center.x, center.y, radius);
        results.clear();
        tree.query_rect(rect, &mut results);
        let expected = brute_force_rect(points, &rect);
        anyhow::ensure!(
            sorted_payloads(&results) == expected,
            "rect query {:?} found {} points, brute force found {}",
            rect,
            results.len(),
            expected.len()
        );

        report.probes += 1;
    }

    Ok(report)
}

/// Outcome of the nearest-neighbour probes.
#[derive(Debug, Clone, Default)]
pub struct NearestReport {
    pub probes: usize,
    pub nodes_visited: usize,
    pub points_tested: usize,
}

impl NearestReport {
    pub fn average_points_tested(&self) -> f32 {
        if self.probes == 0 {
            0.0
        } else {
            self.points_tested as f32 / self.probes as f32
        }
    }

    pub fn average_nodes_visited(&self) -> f32 {
        if self.probes == 0 {
            0.0
        } else {
            self.nodes_visited as f32 / self.probes as f32
        }
    }
}

/// Nearest-neighbour probes, each compared with the brute-force minimum.
pub fn check_nearest(
    tree: &QuadTree<u32>,
    points: &[Vec2],
    config: &DemoConfig,
    rng: &mut impl Rng,
) -> anyhow::Result<NearestReport> {
    let bounds = tree
        .bounds()
        .ok_or_else(|| anyhow::anyhow!("tree has no bounds"))?;
    let mut report = NearestReport::default();

    for _ in 0..config.scenario.probes {
        let probe = random_point(rng, &bounds);
        let found = tree.nearest(probe.x, probe.y);
        match (found, brute_force_nearest(points, probe)) {
            (None, None) => {}
            (Some(found), Some(best)) => {
                anyhow::ensure!(
                    found.hit.distance_sq == best,
                    "nearest to {probe} is {} at distance² {}, brute force says {}",
                    found.hit.payload,
                    found.hit.distance_sq,
                    best
                );
                report.nodes_visited += found.nodes_visited;
                report.points_tested += found.points_tested;
            }
            (found, best) => anyhow::bail!(
                "nearest to {probe}: tree found {:?}, brute force found {:?}",
                found.map(|n| n.hit.payload),
                best
            ),
        }
        report.probes += 1;
    }

    Ok(report)
}

/// Insert `count` points at one coordinate and make sure they all come back.
pub fn stress_duplicates(tree: &mut QuadTree<u32>, at: Vec2, count: usize) -> anyhow::Result<TreeStats> {
    let before = tree.len();
    let base = u32::try_from(before)?;
    for i in 0..count {
        tree.add_point(base + u32::try_from(i)?, at)?;
    }

    let mut results = Vec::new();
    tree.query(at.x, at.y, 0.0, &mut results);
    let found = results.iter().filter(|h| h.payload >= base).count();
    anyhow::ensure!(
        found == count,
        "inserted {count} duplicates at {at}, radius-0 query found {found}"
    );

    let stats = tree.stats();
    anyhow::ensure!(
        stats.max_depth_reached <= tree.config().max_depth,
        "tree grew to depth {} past the limit {}",
        stats.max_depth_reached,
        tree.config().max_depth
    );
    Ok(stats)
}

/// Re-bound the tree and make sure none of the old points survive.
pub fn check_rebound(tree: &mut QuadTree<u32>, points: &[Vec2], config: &DemoConfig) -> anyhow::Result<()> {
    let world = &config.world;
    tree.set_bounds(world.x, world.y, world.width, world.height)?;

    let mut results = Vec::new();
    for p in points {
        tree.query(p.x, p.y, 0.0, &mut results);
    }
    anyhow::ensure!(
        results.is_empty() && tree.is_empty(),
        "{} points survived set_bounds",
        results.len()
    );
    info!("Rebound check passed");
    Ok(())
}
