//! Tree nodes: storage, subdivision and the recursive query walks.

use crate::bounds::{Bounds, Quadrant};
use crate::config::TreeConfig;
use crate::tree::{Hit, NodeInfo, TreeStats};
use glam::Vec2;
use tracing::trace;

/// A stored point and its payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry<P> {
    pub payload: P,
    pub position: Vec2,
}

/// A node of the tree.
///
/// A node is either a leaf holding entries directly, or internal with four
/// children and no entries of its own. Leaves at the configured max depth never
/// split.
#[derive(Debug, Clone)]
pub struct QuadNode<P> {
    bounds: Bounds,
    depth: u32,
    entries: Vec<Entry<P>>,
    /// Children in [`Quadrant`] order.
    children: Option<Box<[QuadNode<P>; 4]>>,
}

impl<P> QuadNode<P> {
    pub(crate) fn new(bounds: Bounds, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            entries: Vec::new(),
            children: None,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Depth from the root (root = 0).
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Entries held directly by this node. Empty for internal nodes.
    #[inline]
    pub fn entries(&self) -> &[Entry<P>] {
        &self.entries
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Get a child by quadrant.
    #[inline]
    pub fn child(&self, quadrant: Quadrant) -> Option<&QuadNode<P>> {
        self.children.as_ref().map(|c| &c[quadrant.index()])
    }

    /// All four children, if split.
    #[inline]
    pub fn children(&self) -> Option<&[QuadNode<P>; 4]> {
        self.children.as_deref()
    }
}

impl<P: Copy> QuadNode<P> {
    /// Insert an entry that is known to lie within this node's bounds.
    pub(crate) fn insert(&mut self, entry: Entry<P>, config: &TreeConfig) {
        if let Some(children) = self.children.as_mut() {
            let q = self.bounds.quadrant(entry.position.x, entry.position.y);
            children[q.index()].insert(entry, config);
            return;
        }

        self.entries.push(entry);
        if self.entries.len() > config.max_values && self.depth < config.max_depth {
            self.split(config);
        }
    }

    /// Turn this leaf into an internal node and move every entry down.
    fn split(&mut self, config: &TreeConfig) {
        let bounds = self.bounds;
        let depth = self.depth + 1;
        let mut children = Box::new(Quadrant::ALL.map(|q| QuadNode::new(bounds.quadrant_bounds(q), depth)));

        let entries = std::mem::take(&mut self.entries);
        trace!(
            "Splitting node at depth {} ({} entries, {:?})",
            self.depth,
            entries.len(),
            bounds
        );
        for entry in entries {
            let q = bounds.quadrant(entry.position.x, entry.position.y);
            children[q.index()].insert(entry, config);
        }

        self.children = Some(children);
    }

    /// Append every entry within `sqrt(radius_sq)` of `center`.
    pub(crate) fn query_radius(&self, center: Vec2, radius_sq: f32, results: &mut Vec<Hit<P>>) {
        if !self.bounds.intersects_circle(center, radius_sq) {
            return;
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query_radius(center, radius_sq, results);
            }
        }

        for entry in &self.entries {
            let distance_sq = entry.position.distance_squared(center);
            if distance_sq <= radius_sq {
                results.push(Hit::new(entry, distance_sq));
            }
        }
    }

    /// Append every entry inside `rect`.
    pub(crate) fn query_rect(&self, rect: &Bounds, results: &mut Vec<Hit<P>>) {
        if !self.bounds.overlaps(rect) {
            return;
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query_rect(rect, results);
            }
        }

        for entry in &self.entries {
            if rect.contains(entry.position.x, entry.position.y) {
                results.push(Hit::new(entry, 0.0));
            }
        }
    }

    /// Branch-and-bound nearest search.
    ///
    /// Children are visited closest-first; a child whose bounds are no closer
    /// than the current best is skipped, along with everything after it.
    pub(crate) fn nearest(&self, center: Vec2, search: &mut NearestSearch<P>) {
        search.nodes_visited += 1;

        for entry in &self.entries {
            search.points_tested += 1;
            let distance_sq = entry.position.distance_squared(center);
            if search.accepts(distance_sq) {
                search.best = Some(Hit::new(entry, distance_sq));
            }
        }

        let Some(children) = &self.children else {
            return;
        };

        let mut order = [0usize, 1, 2, 3].map(|i| (children[i].bounds.distance_sq(center), i));
        // Stable, so equal distances keep quadrant order.
        order.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (distance_sq, i) in order {
            if search.prunes(distance_sq) {
                break;
            }
            children[i].nearest(center, search);
        }
    }

    pub(crate) fn collect_info(&self, out: &mut Vec<NodeInfo>) {
        out.push(NodeInfo {
            bounds: self.bounds,
            depth: self.depth,
            len: self.entries.len(),
            is_leaf: self.is_leaf(),
        });
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.collect_info(out);
            }
        }
    }

    pub(crate) fn accumulate_stats(&self, stats: &mut TreeStats) {
        stats.nodes += 1;
        stats.entries += self.entries.len();
        stats.max_depth_reached = stats.max_depth_reached.max(self.depth);
        match &self.children {
            Some(children) => {
                for child in children.iter() {
                    child.accumulate_stats(stats);
                }
            }
            None => stats.leaves += 1,
        }
    }
}

/// Running state of a nearest-neighbour search.
#[derive(Debug)]
pub(crate) struct NearestSearch<P> {
    /// Inclusive distance bound used until a first candidate is found.
    limit_sq: f32,
    pub(crate) best: Option<Hit<P>>,
    pub(crate) nodes_visited: usize,
    pub(crate) points_tested: usize,
}

impl<P: Copy> NearestSearch<P> {
    pub(crate) fn new(limit_sq: f32) -> Self {
        Self {
            limit_sq,
            best: None,
            nodes_visited: 0,
            points_tested: 0,
        }
    }

    /// Strictly closer than the best so far; the first hit at a distance wins.
    #[inline]
    fn accepts(&self, distance_sq: f32) -> bool {
        match &self.best {
            Some(best) => distance_sq < best.distance_sq,
            None => distance_sq <= self.limit_sq,
        }
    }

    #[inline]
    fn prunes(&self, distance_sq: f32) -> bool {
        match &self.best {
            Some(best) => distance_sq >= best.distance_sq,
            None => distance_sq > self.limit_sq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(payload: u32, x: f32, y: f32) -> Entry<u32> {
        Entry {
            payload,
            position: Vec2::new(x, y),
        }
    }

    #[test]
    fn test_leaf_splits_on_overflow() {
        let config = TreeConfig::new(2, 4);
        let mut node = QuadNode::new(Bounds::new(0.0, 0.0, 100.0, 100.0), 0);

        node.insert(entry(1, 10.0, 10.0), &config);
        node.insert(entry(2, 90.0, 90.0), &config);
        assert!(node.is_leaf());
        assert_eq!(node.entries().len(), 2);

        node.insert(entry(3, 10.0, 90.0), &config);
        assert!(!node.is_leaf());
        assert!(node.entries().is_empty());

        let sw = node.child(Quadrant::SouthWest).unwrap();
        let ne = node.child(Quadrant::NorthEast).unwrap();
        let nw = node.child(Quadrant::NorthWest).unwrap();
        assert_eq!(sw.entries()[0].payload, 1);
        assert_eq!(ne.entries()[0].payload, 2);
        assert_eq!(nw.entries()[0].payload, 3);
        assert_eq!(sw.depth(), 1);
    }

    #[test]
    fn test_entries_stay_inside_their_node() {
        fn check(node: &QuadNode<u32>) {
            for e in node.entries() {
                assert!(
                    node.bounds().contains(e.position.x, e.position.y),
                    "{:?} outside {:?}",
                    e.position,
                    node.bounds()
                );
            }
            if let Some(children) = node.children() {
                assert!(node.entries().is_empty(), "internal node holds entries");
                children.iter().for_each(check);
            }
        }

        let config = TreeConfig::new(3, 6);
        let mut node = QuadNode::new(Bounds::new(0.0, 0.0, 64.0, 64.0), 0);
        let mut payload = 0;
        for i in 0..=8 {
            for j in 0..=8 {
                node.insert(entry(payload, i as f32 * 8.0, j as f32 * 8.0), &config);
                payload += 1;
            }
        }
        check(&node);
    }

    #[test]
    fn test_max_depth_leaf_never_splits() {
        let config = TreeConfig::new(1, 0);
        let mut node = QuadNode::new(Bounds::new(0.0, 0.0, 10.0, 10.0), 0);
        for i in 0..50 {
            node.insert(entry(i, 1.0, 1.0), &config);
        }
        assert!(node.is_leaf());
        assert_eq!(node.entries().len(), 50);
    }
}
