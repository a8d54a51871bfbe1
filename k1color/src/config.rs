//! Run parameters for [`K1Coloring`](crate::k1coloring::K1Coloring).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct K1ColoringConfig {
    /// Number of worker threads.
    pub concurrency: usize,

    /// Active nodes per batch.
    pub batch_size: usize,

    /// Upper bound on coloring rounds; the run stops unconverged after this.
    pub max_iterations: u32,
}

impl Default for K1ColoringConfig {
    fn default() -> Self {
        Self {
            concurrency: rayon::current_num_threads(),
            batch_size: 10_000,
            max_iterations: 10,
        }
    }
}

impl K1ColoringConfig {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(Error::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig(format!(
                "need to run at least one iteration, but got {}",
                self.max_iterations
            )));
        }
        Ok(())
    }
}
