//! Errors raised before a coloring run starts.
//!
//! Everything that happens once iterations begin is infallible: a node always
//! receives some color, and conflicts or cancellation are reported through
//! [`ColoringResult`](crate::k1coloring::ColoringResult) instead.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value is out of range (zero workers, zero batch size,
    /// zero iterations).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The graph cannot be colored as given, e.g. its node ids do not fit
    /// the `u32` id space or its adjacency arrays are inconsistent.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// A dense array sized to the node count could not be allocated.
    #[error("could not allocate {what} for {len} entries")]
    ResourceExhausted { what: &'static str, len: usize },

    /// The worker pool failed to start.
    #[error("worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
