//! Typed errors shared by every container and algorithm in the crate.
//!
//! Containers report failures through [`Error`]; the crate-wide [`Result`]
//! alias is used on every fallible public operation. I/O entry points (see
//! [`graph::io`](crate::graph::io)) use `anyhow` instead, since their
//! failures carry file/line context rather than container semantics.

use thiserror::Error;

/// Failure modes of container and algorithm operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A lookup by key or handle missed.
    #[error("key or handle not found")]
    NotFound,

    /// A strict insertion found an equal key already present.
    #[error("duplicate key")]
    Duplicate,

    /// An index fell outside `[0, len)` (or `[0, len]` for splits).
    #[error("index {index} out of range for length {len}")]
    OutOfRange {
        /// The offending index.
        index: usize,
        /// The container length at the time of the call.
        len: usize,
    },

    /// A precondition of the operation was violated.
    #[error("domain error: {0}")]
    Domain(&'static str),

    /// Bellman-Ford (or Johnson) found a negative cycle reachable from the
    /// source.
    #[error("negative cycle reachable from source")]
    NegativeCycle,

    /// A spanning-tree algorithm ran on a graph that is not connected.
    #[error("graph is not connected")]
    Disconnected,

    /// An open-addressed table is full and cannot grow further.
    #[error("table is full and cannot grow")]
    CapacityExhausted,

    /// The scheduler or worker pool has been shut down.
    #[error("component has been shut down")]
    Closed,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
