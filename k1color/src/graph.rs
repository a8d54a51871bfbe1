//! Graph capability consumed by the coloring engine, and a compact
//! adjacency-list implementation of it.

use std::convert::TryFrom;
use std::sync::Arc;

use itertools::Itertools;

use crate::error::{Error, Result};

/// Dense node identifier in `[0, node_count)`.
pub type NodeId = u32;

/// The narrow view of a graph the coloring engine depends on.
///
/// Implementations need not be thread safe: every worker obtains its own
/// traversal cursor through [`Graph::concurrent_copy`].
pub trait Graph: Send {
    fn node_count(&self) -> u64;

    fn degree(&self, node: NodeId) -> u32;

    /// Calls `visitor(node, target)` for every relationship leaving `node`
    /// until the visitor returns `false`.
    fn for_each_relationship<F>(&self, node: NodeId, visitor: F)
    where
        F: FnMut(NodeId, NodeId) -> bool;

    /// An independent cursor over the same graph.
    fn concurrent_copy(&self) -> Self
    where
        Self: Sized;
}

/// Which relationships an edge list produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// `(u, v)` is only visible from `u`.
    Natural,
    /// `(u, v)` is visible from both `u` and `v`.
    Undirected,
}

/// A compact adjacency list intended for sparse graphs.
///
/// The space of vertices is a contiguous range of u32 ints
/// from [0, nvertices). Copies share the underlying arrays.
#[derive(Clone)]
pub struct CsrGraph {
    inner: Arc<Csr>,
}

struct Csr {
    offsets: Vec<usize>,
    targets: Vec<NodeId>,
}

impl CsrGraph {
    /// `offsets.len()` should be one greater than the number of vertices
    /// with `targets[offsets[i]..offsets[i+1]]` being the relationships
    /// leaving `i`.
    pub fn new(offsets: Vec<usize>, targets: Vec<NodeId>) -> Result<Self> {
        let nvertices = match offsets.len().checked_sub(1) {
            Some(n) => n,
            None => {
                return Err(Error::InvalidGraph(
                    "offsets must hold at least one entry".to_string(),
                ))
            }
        };
        if u32::try_from(nvertices).is_err() {
            return Err(Error::InvalidGraph(format!(
                "{} vertices exceed the u32 id space",
                nvertices
            )));
        }
        if offsets[0] != 0 || offsets[nvertices] != targets.len() {
            return Err(Error::InvalidGraph(format!(
                "offsets must span [0, {}]",
                targets.len()
            )));
        }
        if !offsets.iter().tuple_windows().all(|(lo, hi)| lo <= hi) {
            return Err(Error::InvalidGraph(
                "offsets must be non-decreasing".to_string(),
            ));
        }
        if let Some(&bad) = targets.iter().find(|&&t| t as usize >= nvertices) {
            return Err(Error::InvalidGraph(format!(
                "target {} out of range for {} vertices",
                bad, nvertices
            )));
        }
        let inner = Arc::new(Csr { offsets, targets });
        Ok(Self { inner })
    }

    /// Builds a graph over `nvertices` from an edge list. Each vertex's
    /// relationships come out sorted with duplicates removed.
    pub fn from_edges<I>(nvertices: usize, edges: I, orientation: Orientation) -> Result<Self>
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut adjacency: Vec<Vec<NodeId>> = vec![Vec::new(); nvertices];
        for (source, target) in edges {
            let (s, t) = (source as usize, target as usize);
            if s >= nvertices || t >= nvertices {
                return Err(Error::InvalidGraph(format!(
                    "edge ({}, {}) out of range for {} vertices",
                    source, target, nvertices
                )));
            }
            adjacency[s].push(target);
            if orientation == Orientation::Undirected && s != t {
                adjacency[t].push(source);
            }
        }

        let mut offsets = Vec::with_capacity(nvertices + 1);
        let mut targets = Vec::new();
        offsets.push(0);
        for list in adjacency {
            targets.extend(list.into_iter().sorted().dedup());
            offsets.push(targets.len());
        }
        Self::new(offsets, targets)
    }

    pub fn neighbors(&self, v: NodeId) -> &[NodeId] {
        let v = v as usize;
        let lo = self.inner.offsets[v];
        let hi = self.inner.offsets[v + 1];
        &self.inner.targets[lo..hi]
    }

    pub fn nvertices(&self) -> usize {
        self.inner.offsets.len() - 1
    }

    /// Number of stored relationships; an undirected edge counts twice.
    pub fn nrelationships(&self) -> usize {
        self.inner.targets.len()
    }

    pub fn max_degree(&self) -> u32 {
        (0..self.nvertices())
            .map(|v| self.degree(v as NodeId))
            .max()
            .unwrap_or(0)
    }
}

impl Graph for CsrGraph {
    fn node_count(&self) -> u64 {
        self.nvertices() as u64
    }

    fn degree(&self, node: NodeId) -> u32 {
        self.neighbors(node).len() as u32
    }

    fn for_each_relationship<F>(&self, node: NodeId, mut visitor: F)
    where
        F: FnMut(NodeId, NodeId) -> bool,
    {
        for &target in self.neighbors(node) {
            if !visitor(node, target) {
                break;
            }
        }
    }

    fn concurrent_copy(&self) -> Self {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_orientation_keeps_direction() {
        let graph = CsrGraph::from_edges(3, vec![(0, 1), (0, 2)], Orientation::Natural).unwrap();
        assert_eq!(graph.neighbors(0), &[1, 2]);
        assert!(graph.neighbors(1).is_empty());
        assert_eq!(graph.nrelationships(), 2);
    }

    #[test]
    fn undirected_orientation_dedups() {
        let edges = vec![(1, 0), (0, 1), (2, 1), (1, 1)];
        let graph = CsrGraph::from_edges(3, edges, Orientation::Undirected).unwrap();
        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(1), &[0, 1, 2]);
        assert_eq!(graph.neighbors(2), &[1]);
        assert_eq!(graph.max_degree(), 3);
    }

    #[test]
    fn visitor_stops_early() {
        let graph = CsrGraph::from_edges(4, vec![(0, 1), (0, 2), (0, 3)], Orientation::Natural).unwrap();
        let mut seen = Vec::new();
        graph.for_each_relationship(0, |_, t| {
            seen.push(t);
            t < 2
        });
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(CsrGraph::new(vec![], vec![]).is_err());
        assert!(CsrGraph::new(vec![0, 2, 1], vec![0, 1]).is_err());
        assert!(CsrGraph::new(vec![0, 1], vec![5]).is_err());
        assert!(CsrGraph::from_edges(2, vec![(0, 2)], Orientation::Natural).is_err());
    }

    #[test]
    fn empty_graph() {
        let graph = CsrGraph::from_edges(0, vec![], Orientation::Undirected).unwrap();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.max_degree(), 0);
    }
}
