//! Quad-tree error types.

use thiserror::Error;

/// Errors that can occur while configuring or filling a [`QuadTree`](crate::QuadTree).
#[derive(Debug, Error)]
pub enum QuadTreeError {
    #[error("Invalid bounds: origin ({x}, {y}), size {width}x{height}")]
    InvalidBounds {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },

    #[error("Tree bounds have not been set")]
    BoundsNotSet,

    #[error("Point ({x}, {y}) lies outside the tree bounds")]
    OutOfBounds { x: f32, y: f32 },

    #[error("Invalid tree configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}
