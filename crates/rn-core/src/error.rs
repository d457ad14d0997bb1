//! Shared error type.
//!
//! Sub-crates define their own error enums; `rn-graph` reports a bad
//! coordinate in a data file as a parse error at that line.

use thiserror::Error;

/// Errors produced by `rn-core` parsing and validation helpers.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown cost mode {0:?}: expected \"distance\" or \"time\"")]
    UnknownCostMode(String),

    #[error("coordinate ({lat}, {lon}) is not a valid latitude/longitude")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

/// Shorthand result type for `rn-core`.
pub type CoreResult<T> = Result<T, CoreError>;
