//! Graph-subsystem error type.
//!
//! Search outcomes (`NoPathFound`, `Cancelled`) and caller mistakes
//! (`InvalidEndpoints`, `StaleAdjacency`) share the enum with structural
//! errors raised while building or loading a network.  Only the latter mean
//! the data itself is broken.

use thiserror::Error;

use rn_core::{NodeId, RoadId};

/// Errors produced by `rn-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no path from {start} to {goal}")]
    NoPathFound { start: NodeId, goal: NodeId },

    #[error("node {0} not found in network")]
    InvalidEndpoints(NodeId),

    #[error("adjacency resolved for network generation {resolved}, current is {current}")]
    StaleAdjacency { resolved: u64, current: u64 },

    #[error("search cancelled")]
    Cancelled,

    #[error("segment of {road} references missing node {node}")]
    DanglingEndpoint { road: RoadId, node: NodeId },

    #[error("duplicate node {0}")]
    DuplicateNode(NodeId),

    #[error("duplicate road {0}")]
    DuplicateRoad(RoadId),

    #[error("segment references missing road {0}")]
    UnknownRoad(RoadId),

    #[error("{road} has speed-limit code {code}, expected 0..=7")]
    InvalidSpeedCode { road: RoadId, code: u8 },

    #[error("segment of {road} has invalid length {length}")]
    InvalidLength { road: RoadId, length: f64 },

    #[error("too many {0} for 32-bit slots")]
    CapacityExceeded(&'static str),

    #[error("router configuration error: {0}")]
    Config(String),

    #[error("{file}:{line}: {message}")]
    Parse { file: String, line: u64, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
