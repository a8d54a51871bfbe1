//! Splits the active nodes of one iteration into disjoint batches.

use crate::graph::NodeId;

/// A contiguous run of active nodes handed to a single worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Batch<'a> {
    /// Position of the batch among all batches of the iteration.
    pub index: usize,
    pub nodes: &'a [NodeId],
}

#[derive(Clone, Copy, Debug)]
pub struct BatchPartitioner {
    concurrency: usize,
    batch_size: usize,
}

impl BatchPartitioner {
    /// Both arguments must be positive; the driver validates them up front.
    pub fn new(concurrency: usize, batch_size: usize) -> Self {
        debug_assert!(concurrency > 0 && batch_size > 0);
        Self {
            concurrency,
            batch_size,
        }
    }

    pub fn batch_count(&self, nactive: usize) -> usize {
        (nactive + self.batch_size - 1) / self.batch_size
    }

    /// Cuts `active` into `ceil(active.len() / batch_size)` batches and deals
    /// them round-robin to `concurrency` workers.
    ///
    /// Each node of `active` lands in exactly one batch. Workers that would
    /// receive nothing are left out, so the result never holds empty lists.
    pub fn partition<'a>(&self, active: &'a [NodeId]) -> Vec<Vec<Batch<'a>>> {
        let nworkers = self.concurrency.min(self.batch_count(active.len()));
        let mut workers: Vec<Vec<Batch<'a>>> = (0..nworkers).map(|_| Vec::new()).collect();
        for (index, nodes) in active.chunks(self.batch_size).enumerate() {
            workers[index % nworkers].push(Batch { index, nodes });
        }
        workers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_robin() {
        let active: Vec<NodeId> = (0..10).collect();
        let workers = BatchPartitioner::new(2, 3).partition(&active);
        assert_eq!(workers.len(), 2);
        let first: Vec<usize> = workers[0].iter().map(|b| b.index).collect();
        let second: Vec<usize> = workers[1].iter().map(|b| b.index).collect();
        assert_eq!(first, vec![0, 2]);
        assert_eq!(second, vec![1, 3]);
        assert_eq!(workers[1][1].nodes, &[9]);
    }

    #[test]
    fn every_node_exactly_once() {
        let active: Vec<NodeId> = vec![2, 3, 5, 7, 11, 13, 17];
        for concurrency in 1..5 {
            for batch_size in 1..9 {
                let partitioner = BatchPartitioner::new(concurrency, batch_size);
                let workers = partitioner.partition(&active);
                let mut seen: Vec<NodeId> = workers
                    .iter()
                    .flatten()
                    .flat_map(|b| b.nodes.iter().copied())
                    .collect();
                seen.sort_unstable();
                assert_eq!(seen, active);
                let nbatches: usize = workers.iter().map(Vec::len).sum();
                assert_eq!(nbatches, partitioner.batch_count(active.len()));
                assert!(workers.len() <= concurrency);
            }
        }
    }

    #[test]
    fn nothing_active() {
        let workers = BatchPartitioner::new(4, 10).partition(&[]);
        assert!(workers.is_empty());
    }
}
