//! Harness configuration.

use quadtree::TreeConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DemoConfig {
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub scenario: ScenarioConfig,
}

impl DemoConfig {
    /// Load configuration from `config.toml` or use defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    /// Load configuration from `path`, writing the defaults there if it is missing.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Self::parse(&contents)
        } else {
            info!("No {} found, creating default config", path.display());
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            Ok(default_config)
        }
    }

    /// Parse and validate a TOML document.
    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.tree.validate()?;
        anyhow::ensure!(
            config.world.width > 0.0 && config.world.height > 0.0,
            "world size must be positive, got {}x{}",
            config.world.width,
            config.world.height
        );
        Ok(config)
    }
}

/// World rectangle the tree covers.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorldConfig {
    #[serde(default = "default_world_origin")]
    pub x: f32,
    #[serde(default = "default_world_origin")]
    pub y: f32,
    #[serde(default = "default_world_size")]
    pub width: f32,
    #[serde(default = "default_world_size")]
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            x: default_world_origin(),
            y: default_world_origin(),
            width: default_world_size(),
            height: default_world_size(),
        }
    }
}

fn default_world_origin() -> f32 {
    10.0
}
fn default_world_size() -> f32 {
    400.0
}

/// What the harnesses insert and how they probe.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioConfig {
    /// Random points inserted before probing.
    #[serde(default = "default_points")]
    pub points: usize,
    /// Radius of the range probes.
    #[serde(default = "default_query_radius")]
    pub query_radius: f32,
    /// Number of random probes.
    #[serde(default = "default_probes")]
    pub probes: usize,
    /// Fixed RNG seed (random when unset).
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            points: default_points(),
            query_radius: default_query_radius(),
            probes: default_probes(),
            seed: None,
        }
    }
}

fn default_points() -> usize {
    100
}
fn default_query_radius() -> f32 {
    50.0
}
fn default_probes() -> usize {
    32
}
