//! The bulk-synchronous K1 coloring driver.
//!
//! Each iteration colors every active node in parallel, joins, then scans all
//! relationships on one thread. Nodes that lost a clash stay active for the
//! next round; everyone else is settled for good.

use std::collections::HashMap;
use std::convert::TryFrom;
use std::mem;
use std::time::Instant;

use crate::bitset::BitSet;
use crate::config::K1ColoringConfig;
use crate::conflict::ConflictDetector;
use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use crate::partition::BatchPartitioner;
use crate::pool::WorkerPool;
use crate::progress::{NoProgress, ProgressSink, RunningTrue, TerminationFlag};
use crate::step::{ColoringStep, RejectedColors};
use crate::storage::{Color, ColorStorage, UsedColors};

/// Colors a graph so that no relationship joins two equal colors.
pub struct K1Coloring<G, T = RunningTrue, P = NoProgress> {
    graph: G,
    config: K1ColoringConfig,
    termination: T,
    progress: P,
}

impl<G: Graph> K1Coloring<G> {
    /// Checks `config` and the graph's size before any work is done.
    pub fn new(graph: G, config: K1ColoringConfig) -> Result<Self> {
        config.validate()?;
        let nnodes = graph.node_count();
        if u32::try_from(nnodes).is_err() || usize::try_from(nnodes).is_err() {
            return Err(Error::InvalidGraph(format!(
                "{} nodes exceed the u32 id space",
                nnodes
            )));
        }
        Ok(Self {
            graph,
            config,
            termination: RunningTrue,
            progress: NoProgress,
        })
    }
}

impl<G, T, P> K1Coloring<G, T, P>
where
    G: Graph,
    T: TerminationFlag,
    P: ProgressSink,
{
    pub fn with_termination_flag<T2: TerminationFlag>(self, termination: T2) -> K1Coloring<G, T2, P> {
        K1Coloring {
            graph: self.graph,
            config: self.config,
            termination,
            progress: self.progress,
        }
    }

    pub fn with_progress<P2: ProgressSink>(self, progress: P2) -> K1Coloring<G, T, P2> {
        K1Coloring {
            graph: self.graph,
            config: self.config,
            termination: self.termination,
            progress,
        }
    }

    /// Runs until every node is settled, the iteration budget is spent, or
    /// the termination flag asks to stop. Only allocation and pool startup
    /// can fail.
    pub fn compute(self) -> Result<ColoringResult> {
        let start = Instant::now();
        let nnodes = self.graph.node_count() as usize;
        let colors = ColorStorage::new(nnodes)?;
        let mut active = all_nodes(nnodes)?;
        let mut active_bits = BitSet::try_with_capacity(nnodes).ok_or(Error::ResourceExhausted {
            what: "active set",
            len: nnodes,
        })?;
        active.iter().for_each(|&n| {
            active_bits.insert(n);
        });
        let mut losing = BitSet::try_with_capacity(nnodes).ok_or(Error::ResourceExhausted {
            what: "conflict set",
            len: nnodes,
        })?;

        let pool = WorkerPool::new(self.config.concurrency)?;
        let partitioner = BatchPartitioner::new(self.config.concurrency, self.config.batch_size);
        let mut rejected: RejectedColors = HashMap::new();
        let mut used = UsedColors::new();
        let mut ran_iterations = 0;
        let mut any_rejected = false;

        while !active.is_empty() && ran_iterations < self.config.max_iterations {
            if !self.termination.running() {
                tracing::info!(
                    iteration = ran_iterations,
                    active = active.len(),
                    "k1 coloring terminated early"
                );
                break;
            }
            ran_iterations += 1;

            let tasks: Vec<_> = partitioner
                .partition(&active)
                .into_iter()
                .map(|batches| (self.graph.concurrent_copy(), batches))
                .collect();
            let (colors_ref, active_ref, rejected_ref) = (&colors, &active_bits, &rejected);
            let worker_used = pool.run_with_concurrency(tasks, |(cursor, batches)| {
                let mut step = ColoringStep::new(cursor, colors_ref, active_ref, rejected_ref);
                for batch in batches {
                    step.color_batch(batch.nodes);
                }
                step.into_used_colors()
            });

            let conflicts = ConflictDetector::scan(
                &self.graph,
                &colors,
                &active_bits,
                &mut losing,
                &mut rejected,
            );
            any_rejected |= !conflicts.losers.is_empty();
            worker_used.iter().for_each(|local| used.merge(local));

            rejected.retain(|node, _| is_sorted_member(&conflicts.losers, *node));
            // the losers are exactly next iteration's active set
            mem::swap(&mut active_bits, &mut losing);
            debug_assert!(conflicts.losers.len() <= active.len());
            active = conflicts.losers;

            tracing::debug!(
                iteration = ran_iterations,
                conflicts = conflicts.count,
                active = active.len(),
                used_colors = used.count(),
                "k1 coloring iteration"
            );
            self.progress
                .log_progress((nnodes - active.len()) as f64 / nnodes as f64);
        }

        let did_converge = active.is_empty();
        let colors = colors.into_inner();
        if any_rejected {
            // colors tried and then given up may no longer be held by anyone
            used = UsedColors::from_colors(&colors);
        }

        tracing::info!(
            nodes = nnodes,
            ran_iterations,
            did_converge,
            used_colors = used.count(),
            duration = %format!("{:.0?}", start.elapsed()),
            "k1 coloring finished"
        );

        Ok(ColoringResult {
            colors,
            used_colors: used,
            ran_iterations,
            did_converge,
        })
    }
}

fn all_nodes(nnodes: usize) -> Result<Vec<NodeId>> {
    let mut nodes = Vec::new();
    nodes
        .try_reserve_exact(nnodes)
        .map_err(|_| Error::ResourceExhausted {
            what: "active set",
            len: nnodes,
        })?;
    nodes.extend(0..nnodes as NodeId);
    Ok(nodes)
}

fn is_sorted_member(losers: &[NodeId], node: NodeId) -> bool {
    losers.binary_search(&node).is_ok()
}

/// The outcome of a run. If `did_converge` is set the coloring is proper;
/// otherwise nodes that were still active may clash with a neighbor.
#[derive(Clone, Debug)]
pub struct ColoringResult {
    colors: Vec<Color>,
    used_colors: UsedColors,
    ran_iterations: u32,
    did_converge: bool,
}

impl ColoringResult {
    /// Color per node id.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn color(&self, node: NodeId) -> Color {
        self.colors[node as usize]
    }

    pub fn used_colors(&self) -> &UsedColors {
        &self.used_colors
    }

    pub fn ran_iterations(&self) -> u32 {
        self.ran_iterations
    }

    pub fn did_converge(&self) -> bool {
        self.did_converge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate;
    use crate::graph::{CsrGraph, Orientation};
    use crate::progress::StopFlag;

    fn config(concurrency: usize) -> K1ColoringConfig {
        K1ColoringConfig::default()
            .with_concurrency(concurrency)
            .with_batch_size(2)
            .with_max_iterations(10)
    }

    #[test]
    fn empty_graph_converges_immediately() {
        let graph = CsrGraph::from_edges(0, vec![], Orientation::Undirected).unwrap();
        let result = K1Coloring::new(graph, config(2)).unwrap().compute().unwrap();
        assert_eq!(result.ran_iterations(), 0);
        assert!(result.did_converge());
        assert!(result.used_colors().is_empty());
        assert!(result.colors().is_empty());
    }

    #[test]
    fn star_leaves_share_a_color() {
        let graph = generate::star(2).unwrap();
        let result = K1Coloring::new(graph, config(1)).unwrap().compute().unwrap();
        assert!(result.did_converge());
        assert!(result.ran_iterations() < 3);
        assert_ne!(result.color(0), result.color(1));
        assert_ne!(result.color(0), result.color(2));
        assert_eq!(result.color(1), result.color(2));
        assert_eq!(result.used_colors().count(), 2);
    }

    #[test]
    fn isolated_nodes_share_one_color() {
        let graph = CsrGraph::from_edges(2, vec![], Orientation::Undirected).unwrap();
        let result = K1Coloring::new(graph, config(2)).unwrap().compute().unwrap();
        assert!(result.did_converge());
        assert_eq!(result.ran_iterations(), 1);
        assert_eq!(result.color(0), result.color(1));
        assert_eq!(result.used_colors().count(), 1);
    }

    #[test]
    fn clique_hits_iteration_cap() {
        let edges = (0..6u32).flat_map(|u| (u + 1..6).map(move |v| (u, v)));
        let graph = CsrGraph::from_edges(6, edges, Orientation::Undirected).unwrap();
        // one node per batch: every clash is left to the conflict scan
        let tiny = config(2).with_batch_size(1);
        let capped = tiny.with_max_iterations(3);
        let result = K1Coloring::new(graph.clone(), capped).unwrap().compute().unwrap();
        assert_eq!(result.ran_iterations(), 3);
        assert!(!result.did_converge());

        let result = K1Coloring::new(graph.clone(), tiny).unwrap().compute().unwrap();
        assert_eq!(result.ran_iterations(), 6);
        assert!(result.did_converge());
        assert_eq!(result.used_colors().count(), 6);
        assert_eq!(ConflictDetector::count_conflicts(&graph, result.colors()), 0);
    }

    #[test]
    fn stopped_before_first_iteration() {
        let graph = CsrGraph::from_edges(3, vec![(0, 1)], Orientation::Undirected).unwrap();
        let flag = StopFlag::new();
        flag.stop();
        let result = K1Coloring::new(graph, config(2))
            .unwrap()
            .with_termination_flag(flag)
            .compute()
            .unwrap();
        assert_eq!(result.ran_iterations(), 0);
        assert!(!result.did_converge());
        assert!(result.used_colors().is_empty());
    }

    #[test]
    fn invalid_config_fails_fast() {
        let graph = CsrGraph::from_edges(1, vec![], Orientation::Undirected).unwrap();
        let err = K1Coloring::new(graph, config(0)).err().unwrap();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
