//! The quad-tree and its query results.

use crate::bounds::Bounds;
use crate::config::TreeConfig;
use crate::error::QuadTreeError;
use crate::node::{Entry, NearestSearch, QuadNode};
use glam::Vec2;
use tracing::{debug, warn};

/// An entry matched by a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<P> {
    pub payload: P,
    pub position: Vec2,
    /// Squared distance to the query point. Always 0 for rectangle queries.
    pub distance_sq: f32,
}

impl<P: Copy> Hit<P> {
    #[inline]
    pub(crate) fn new(entry: &Entry<P>, distance_sq: f32) -> Self {
        Self {
            payload: entry.payload,
            position: entry.position,
            distance_sq,
        }
    }
}

/// Result of a nearest-neighbour search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest<P> {
    pub hit: Hit<P>,
    /// Nodes entered during the search.
    pub nodes_visited: usize,
    /// Entries whose distance was computed.
    pub points_tested: usize,
}

/// Snapshot of one node, for debug drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeInfo {
    pub bounds: Bounds,
    pub depth: u32,
    /// Entries held directly by the node.
    pub len: usize,
    pub is_leaf: bool,
}

/// Shape of the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub nodes: usize,
    pub leaves: usize,
    pub max_depth_reached: u32,
    pub entries: usize,
}

/// Point quad-tree over a bounded 2D domain.
///
/// Each point carries an opaque `Copy` payload, typically an index into a
/// caller-owned collection. The tree must be given bounds (see
/// [`QuadTree::set_bounds`]) before points can be added.
///
/// Not internally synchronized; share it behind a lock if several threads
/// need it.
pub struct QuadTree<P> {
    config: TreeConfig,
    root: Option<QuadNode<P>>,
    len: usize,
}

impl<P: Copy> QuadTree<P> {
    /// Create an empty tree with no bounds.
    pub fn new(config: TreeConfig) -> Result<Self, QuadTreeError> {
        config.validate()?;
        Ok(Self {
            config,
            root: None,
            len: 0,
        })
    }

    /// Create an empty tree covering the given rectangle.
    pub fn with_bounds(
        config: TreeConfig,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<Self, QuadTreeError> {
        let mut tree = Self::new(config)?;
        tree.set_bounds(x, y, width, height)?;
        Ok(tree)
    }

    /// Reset the tree to an empty root covering the given rectangle.
    ///
    /// Every stored point is discarded. On error the tree is left unchanged.
    pub fn set_bounds(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<(), QuadTreeError> {
        let bounds = Bounds::from_xywh(x, y, width, height);
        if !(width > 0.0 && height > 0.0 && bounds.is_valid()) {
            return Err(QuadTreeError::InvalidBounds { x, y, width, height });
        }

        debug!("Quad-tree bounds set to {:?} (dropping {} points)", bounds, self.len);
        self.root = Some(QuadNode::new(bounds, 0));
        self.len = 0;
        Ok(())
    }

    /// Insert a point.
    ///
    /// Points outside the bounds (or with non-finite coordinates) are rejected
    /// and nothing is stored.
    pub fn add(&mut self, payload: P, x: f32, y: f32) -> Result<(), QuadTreeError> {
        let root = self.root.as_mut().ok_or(QuadTreeError::BoundsNotSet)?;
        if !root.bounds().contains(x, y) {
            warn!("Rejected point ({}, {}) outside {:?}", x, y, root.bounds());
            return Err(QuadTreeError::OutOfBounds { x, y });
        }

        root.insert(
            Entry {
                payload,
                position: Vec2::new(x, y),
            },
            &self.config,
        );
        self.len += 1;
        Ok(())
    }

    /// Insert a point given as a vector.
    #[inline]
    pub fn add_point(&mut self, payload: P, position: Vec2) -> Result<(), QuadTreeError> {
        self.add(payload, position.x, position.y)
    }

    /// Append every point within `radius` of `(x, y)` to `results`.
    ///
    /// `results` is not cleared. A negative or NaN radius matches nothing.
    pub fn query(&self, x: f32, y: f32, radius: f32, results: &mut Vec<Hit<P>>) {
        if radius.is_nan() || radius < 0.0 {
            return;
        }
        if let Some(root) = &self.root {
            root.query_radius(Vec2::new(x, y), radius * radius, results);
        }
    }

    /// Append every point inside `rect` (edges inclusive) to `results`.
    pub fn query_rect(&self, rect: Bounds, results: &mut Vec<Hit<P>>) {
        if let Some(root) = &self.root {
            root.query_rect(&rect, results);
        }
    }

    /// Find the point closest to `(x, y)`.
    ///
    /// Among equidistant points the first one met in search order wins, so a
    /// fixed insertion sequence always gives the same answer.
    pub fn nearest(&self, x: f32, y: f32) -> Option<Nearest<P>> {
        self.nearest_within(x, y, f32::INFINITY)
    }

    /// Find the point closest to `(x, y)` that is at most `max_radius` away.
    pub fn nearest_within(&self, x: f32, y: f32, max_radius: f32) -> Option<Nearest<P>> {
        if max_radius.is_nan() || max_radius < 0.0 || !x.is_finite() || !y.is_finite() {
            return None;
        }
        let root = self.root.as_ref()?;

        let mut search = NearestSearch::new(max_radius * max_radius);
        root.nearest(Vec2::new(x, y), &mut search);
        search.best.map(|hit| Nearest {
            hit,
            nodes_visited: search.nodes_visited,
            points_tested: search.points_tested,
        })
    }

    /// Remove every point but keep the bounds.
    pub fn clear(&mut self) {
        if let Some(root) = &mut self.root {
            debug!("Clearing quad-tree ({} points)", self.len);
            *root = QuadNode::new(root.bounds(), 0);
        }
        self.len = 0;
    }

    /// Get the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Root bounds, if set.
    #[inline]
    pub fn bounds(&self) -> Option<Bounds> {
        self.root.as_ref().map(QuadNode::bounds)
    }

    #[inline]
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// The root node, if bounds are set.
    #[inline]
    pub fn root(&self) -> Option<&QuadNode<P>> {
        self.root.as_ref()
    }

    /// Iterate over every stored point, in query traversal order.
    pub fn iter(&self) -> Iter<'_, P> {
        Iter {
            stack: self.root.iter().collect(),
            current: Default::default(),
        }
    }

    /// Every node in pre-order (node, then NW, SW, NE, SE).
    pub fn nodes(&self) -> Vec<NodeInfo> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            root.collect_info(&mut out);
        }
        out
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        if let Some(root) = &self.root {
            root.accumulate_stats(&mut stats);
        }
        stats
    }
}

impl<P> Default for QuadTree<P> {
    fn default() -> Self {
        Self {
            config: TreeConfig::default(),
            root: None,
            len: 0,
        }
    }
}

impl<P> std::fmt::Debug for QuadTree<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuadTree")
            .field("len", &self.len)
            .field("bounds", &self.root.as_ref().map(|r| r.bounds()))
            .field("config", &self.config)
            .finish()
    }
}

/// Iterator over the entries of a [`QuadTree`].
pub struct Iter<'a, P> {
    stack: Vec<&'a QuadNode<P>>,
    current: std::slice::Iter<'a, Entry<P>>,
}

impl<'a, P: Copy> Iterator for Iter<'a, P> {
    type Item = &'a Entry<P>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.next() {
                return Some(entry);
            }
            let node = self.stack.pop()?;
            if let Some(children) = node.children() {
                self.stack.extend(children.iter().rev());
            }
            self.current = node.entries().iter();
        }
    }
}

impl<'a, P: Copy> IntoIterator for &'a QuadTree<P> {
    type Item = &'a Entry<P>;
    type IntoIter = Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
