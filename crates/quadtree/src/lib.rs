//! Point quad-tree spatial index.
//!
//! This crate contains:
//! - Axis-aligned bounds and the quadrant split rule
//! - The tree itself: insertion, radius/rectangle queries, nearest-neighbour search
//! - Tree configuration (node capacity and depth limits) loadable from TOML
//!
//! Points are stored with an opaque payload, usually an index into a
//! collection the caller owns.

mod bounds;
mod config;
mod error;
mod node;
mod tree;

pub use bounds::{Bounds, Quadrant};
pub use config::{TreeConfig, MAX_DEPTH_LIMIT};
pub use error::QuadTreeError;
pub use node::{Entry, QuadNode};
pub use tree::{Hit, Iter, Nearest, NodeInfo, QuadTree, TreeStats};

/// 2D position type used for stored points.
pub type Position = glam::Vec2;
