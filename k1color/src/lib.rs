//! # `k1color` - parallel distance-1 graph coloring
//!
//! Colors every node of a read-only graph so that no relationship joins two
//! nodes of the same color. Workers color disjoint batches of the active
//! nodes against a shared lock-free color array; after each round a conflict
//! scan sends the losers of any clash back for another round, until nothing
//! is left or the iteration budget runs out.
//!
//! ```
//! use k1color::{generate, K1Coloring, K1ColoringConfig};
//!
//! let graph = generate::connected(1_000, 4, 42).unwrap();
//! let config = K1ColoringConfig::default().with_concurrency(2);
//! let result = K1Coloring::new(graph, config).unwrap().compute().unwrap();
//! assert!(result.did_converge());
//! ```

pub mod bitset;
pub mod config;
pub mod conflict;
pub mod error;
pub mod forbidden;
pub mod generate;
pub mod graph;
pub mod k1coloring;
pub mod partition;
pub mod pool;
pub mod progress;
pub mod stats;
pub mod step;
pub mod storage;

pub use config::K1ColoringConfig;
pub use error::{Error, Result};
pub use graph::{CsrGraph, Graph, NodeId, Orientation};
pub use k1coloring::{ColoringResult, K1Coloring};
pub use storage::{Color, UsedColors, INITIAL_FORBIDDEN_COLOR};
