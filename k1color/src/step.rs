//! The per-node coloring rule.

use std::collections::HashMap;

use crate::bitset::BitSet;
use crate::forbidden::ForbiddenColorSet;
use crate::graph::{Graph, NodeId};
use crate::storage::{Color, ColorStorage, UsedColors};

/// Colors each active node has lost a conflict with, keyed by node.
pub type RejectedColors = HashMap<NodeId, Vec<Color>>;

/// Assigns colors to the nodes of one worker's batches.
///
/// A node avoids the colors of its settled neighbors, which cannot change
/// during the iteration, and of the active neighbors this step already
/// colored earlier in the same batch. It never looks at a color another
/// worker may be writing. Clashes across batches are left to the conflict
/// scan.
pub struct ColoringStep<'a, G> {
    graph: G,
    colors: &'a ColorStorage,
    active: &'a BitSet,
    rejected: &'a RejectedColors,
    forbidden: ForbiddenColorSet,
    used: UsedColors,
}

impl<'a, G: Graph> ColoringStep<'a, G> {
    /// `graph` should be this worker's own cursor.
    pub fn new(
        graph: G,
        colors: &'a ColorStorage,
        active: &'a BitSet,
        rejected: &'a RejectedColors,
    ) -> Self {
        Self {
            graph,
            colors,
            active,
            rejected,
            forbidden: ForbiddenColorSet::new(),
            used: UsedColors::new(),
        }
    }

    /// Colors a batch, a run of the sorted active nodes, in increasing order.
    pub fn color_batch(&mut self, nodes: &[NodeId]) {
        if let Some(&first) = nodes.first() {
            for &node in nodes {
                self.color_node(node, first);
            }
        }
    }

    /// Picks the smallest color not held by a settled neighbor or by an
    /// already colored neighbor in `[batch_first, node)`, and not previously
    /// rejected for `node`, and writes it.
    fn color_node(&mut self, node: NodeId, batch_first: NodeId) -> Color {
        let Self {
            graph,
            colors,
            active,
            rejected,
            forbidden,
            used,
        } = self;

        forbidden.reset(graph.degree(node));
        graph.for_each_relationship(node, |source, target| {
            let visible = !active.get(target) || (batch_first <= target && target < node);
            if source != target && visible {
                forbidden.forbid(colors.get(target));
            }
            true
        });
        if let Some(lost) = rejected.get(&node) {
            lost.iter().for_each(|&c| forbidden.forbid(c));
        }

        let color = forbidden.smallest_allowed();
        colors.set(node, color);
        used.mark_used(color);
        color
    }

    /// Hands back the colors this step assigned, for the driver to merge.
    pub fn into_used_colors(self) -> UsedColors {
        self.used
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CsrGraph, Orientation};

    fn path() -> CsrGraph {
        CsrGraph::from_edges(4, vec![(0, 1), (1, 2), (2, 3)], Orientation::Undirected).unwrap()
    }

    fn all_active(n: u32) -> BitSet {
        let mut active = BitSet::new();
        (0..n).for_each(|v| {
            active.insert(v);
        });
        active
    }

    #[test]
    fn separate_batches_do_not_see_each_other() {
        let graph = path();
        let colors = ColorStorage::new(4).unwrap();
        let active = all_active(4);
        let rejected = RejectedColors::new();
        let mut step = ColoringStep::new(graph, &colors, &active, &rejected);
        (0..4).for_each(|n| step.color_batch(&[n]));
        assert!((0..4).all(|n| colors.get(n) == 0));
        assert_eq!(step.into_used_colors().iter().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn one_batch_colors_greedily() {
        let graph = path();
        let colors = ColorStorage::new(4).unwrap();
        let active = all_active(4);
        let rejected = RejectedColors::new();
        let mut step = ColoringStep::new(graph, &colors, &active, &rejected);
        step.color_batch(&[0, 1, 2, 3]);
        assert_eq!((0..4).map(|n| colors.get(n)).collect::<Vec<_>>(), vec![0, 1, 0, 1]);
    }

    #[test]
    fn avoids_settled_and_rejected() {
        let graph = path();
        let colors = ColorStorage::new(4).unwrap();
        colors.set(0, 0);
        colors.set(2, 1);
        let mut active = BitSet::new();
        active.insert(1);
        active.insert(3);
        let mut rejected = RejectedColors::new();
        rejected.insert(1, vec![2]);
        rejected.insert(3, vec![0]);

        let mut step = ColoringStep::new(graph, &colors, &active, &rejected);
        step.color_batch(&[1, 3]);
        assert_eq!(colors.get(1), 3);
        assert_eq!(colors.get(3), 2);
        let used = step.into_used_colors();
        assert!(used.contains(2) && used.contains(3));
    }
}
