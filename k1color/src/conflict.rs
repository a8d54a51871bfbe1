//! Conflict detection between iterations.

use crate::bitset::BitSet;
use crate::graph::{Graph, NodeId};
use crate::step::RejectedColors;
use crate::storage::{Color, ColorStorage, INITIAL_FORBIDDEN_COLOR};

/// What the scan after one iteration found.
#[derive(Debug)]
pub struct Conflicts {
    /// Relationships whose endpoints share a color.
    pub count: usize,
    /// Nodes that must pick again next iteration, in increasing order.
    pub losers: Vec<NodeId>,
}

pub struct ConflictDetector;

impl ConflictDetector {
    /// Scans every relationship after an iteration in which the nodes of
    /// `active` were tentatively colored.
    ///
    /// Of two clashing endpoints a settled one always keeps its color, and
    /// between two tentative ones the lower id does. The loser records the
    /// color in `rejected` so it is never tried again. Nodes outside
    /// `active` never lose, so the active set can only shrink.
    ///
    /// `losing` is scratch space owned by the caller. It is cleared first and
    /// holds exactly the losers afterwards.
    pub fn scan<G: Graph>(
        graph: &G,
        colors: &ColorStorage,
        active: &BitSet,
        losing: &mut BitSet,
        rejected: &mut RejectedColors,
    ) -> Conflicts {
        let nnodes = colors.len();
        losing.clear();
        let mut count = 0;

        for u in 0..nnodes as NodeId {
            let u_active = active.get(u);
            let u_color = colors.get(u);
            graph.for_each_relationship(u, |_, v| {
                if u == v {
                    return true;
                }
                let v_active = active.get(v);
                if !(u_active || v_active) || colors.get(v) != u_color {
                    return true;
                }
                count += 1;
                let loser = match (u_active, v_active) {
                    (true, false) => u,
                    (false, true) => v,
                    _ => u.max(v),
                };
                if losing.insert(loser) {
                    reject(rejected, loser, u_color);
                }
                true
            });
        }

        Conflicts {
            count,
            losers: losing.iter().collect(),
        }
    }

    /// Counts relationships `(u, v)`, `u != v`, whose endpoints share a
    /// color. Uncolored nodes count as conflicting with each other.
    pub fn count_conflicts<G: Graph>(graph: &G, colors: &[Color]) -> usize {
        let mut count = 0;
        for u in 0..colors.len() as NodeId {
            let u_color = colors[u as usize];
            graph.for_each_relationship(u, |_, v| {
                if u != v && colors[v as usize] == u_color {
                    count += 1;
                }
                true
            });
        }
        count
    }
}

fn reject(rejected: &mut RejectedColors, node: NodeId, color: Color) {
    debug_assert!(color != INITIAL_FORBIDDEN_COLOR);
    let lost = rejected.entry(node).or_insert_with(Vec::new);
    if !lost.contains(&color) {
        lost.push(color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CsrGraph, Orientation};

    fn triangle() -> CsrGraph {
        CsrGraph::from_edges(3, vec![(0, 1), (1, 2), (0, 2)], Orientation::Undirected).unwrap()
    }

    fn storage(colors: &[Color]) -> ColorStorage {
        let storage = ColorStorage::new(colors.len()).unwrap();
        colors
            .iter()
            .enumerate()
            .for_each(|(n, &c)| storage.set(n as NodeId, c));
        storage
    }

    fn all_active(n: u32) -> BitSet {
        let mut active = BitSet::new();
        (0..n).for_each(|v| {
            active.insert(v);
        });
        active
    }

    #[test]
    fn lowest_id_keeps_color() {
        let graph = triangle();
        let colors = storage(&[0, 0, 0]);
        let mut rejected = RejectedColors::new();
        let mut losing = BitSet::with_capacity(3);
        let conflicts =
            ConflictDetector::scan(&graph, &colors, &all_active(3), &mut losing, &mut rejected);
        // each undirected edge is seen from both sides
        assert_eq!(conflicts.count, 6);
        assert_eq!(conflicts.losers, vec![1, 2]);
        assert_eq!(rejected[&1], vec![0]);
        assert_eq!(rejected[&2], vec![0]);
        assert!(!rejected.contains_key(&0));
    }

    #[test]
    fn settled_endpoint_wins() {
        // 2 -> 0 is only visible from 2, and 0 is settled
        let graph = CsrGraph::from_edges(3, vec![(2, 0), (1, 2)], Orientation::Natural).unwrap();
        let colors = storage(&[4, 1, 4]);
        let mut active = BitSet::new();
        active.insert(1);
        active.insert(2);
        let mut rejected = RejectedColors::new();
        let conflicts =
            ConflictDetector::scan(&graph, &colors, &active, &mut BitSet::new(), &mut rejected);
        assert_eq!(conflicts.count, 1);
        assert_eq!(conflicts.losers, vec![2]);
        assert_eq!(rejected[&2], vec![4]);
    }

    #[test]
    fn settled_pairs_are_skipped() {
        let graph = triangle();
        let colors = storage(&[0, 1, 2]);
        let mut rejected = RejectedColors::new();
        let conflicts = ConflictDetector::scan(
            &graph,
            &colors,
            &BitSet::new(),
            &mut BitSet::new(),
            &mut rejected,
        );
        assert_eq!(conflicts.count, 0);
        assert!(conflicts.losers.is_empty());
        assert!(rejected.is_empty());
    }

    #[test]
    fn losing_set_is_reused_across_scans() {
        let graph = triangle();
        let mut rejected = RejectedColors::new();
        let mut losing = BitSet::with_capacity(3);
        losing.insert(0);

        let first = storage(&[0, 0, 0]);
        let conflicts =
            ConflictDetector::scan(&graph, &first, &all_active(3), &mut losing, &mut rejected);
        assert_eq!(conflicts.losers, vec![1, 2]);
        assert_eq!(losing.iter().collect::<Vec<_>>(), vec![1, 2]);

        // node 1 settles on 1, node 2 clashes with it again
        let second = storage(&[0, 1, 1]);
        let mut active = BitSet::new();
        active.insert(1);
        active.insert(2);
        let conflicts = ConflictDetector::scan(&graph, &second, &active, &mut losing, &mut rejected);
        assert_eq!(conflicts.losers, vec![2]);
        assert_eq!(losing.iter().collect::<Vec<_>>(), vec![2]);
        assert_eq!(rejected[&2], vec![0, 1]);
    }

    #[test]
    fn count_ignores_self_loops() {
        let graph = CsrGraph::from_edges(2, vec![(0, 0), (0, 1)], Orientation::Natural).unwrap();
        assert_eq!(ConflictDetector::count_conflicts(&graph, &[0, 1]), 0);
        assert_eq!(ConflictDetector::count_conflicts(&graph, &[1, 1]), 1);
    }
}
