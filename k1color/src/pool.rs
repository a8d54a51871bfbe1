//! Fixed-size worker pool running one bulk-synchronous phase at a time.

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::Result;

pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    pub fn new(concurrency: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(concurrency)
            .thread_name(|i| format!("k1color-worker-{}", i))
            .build()?;
        Ok(Self { pool })
    }

    pub fn concurrency(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs `run` once per task on the pool and returns their results in
    /// task order. Returns only after every task has finished, so writes made
    /// by the tasks are visible to the caller afterwards.
    pub fn run_with_concurrency<T, R, F>(&self, tasks: Vec<T>, run: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        self.pool
            .install(|| tasks.into_par_iter().map(run).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn runs_every_task_before_returning() {
        let pool = WorkerPool::new(3).unwrap();
        assert_eq!(pool.concurrency(), 3);
        let counter = AtomicUsize::new(0);
        let results = pool.run_with_concurrency((0..10).collect(), |i: usize| {
            counter.fetch_add(1, Ordering::Relaxed);
            i * i
        });
        assert_eq!(counter.load(Ordering::Relaxed), 10);
        assert_eq!(results, (0..10).map(|i| i * i).collect::<Vec<_>>());
    }
}
