//! Graph-subsystem error type.
//!
//! Data-integrity failures (`MalformedFile`, `UnknownReference`,
//! `DuplicateNode`) are fatal for the operation that hit them: a load or
//! build never returns a partially usable graph.  Plain I/O failures are
//! kept distinct and propagated verbatim from the storage layer.

use thiserror::Error;

/// Errors produced by `gr-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Truncated header or directory, a tile span past end-of-file, or a
    /// tile block whose content disagrees with its declared length.
    #[error("malformed graph file: {reason}")]
    MalformedFile { reason: String },

    /// An edge references a node id absent from the node table.
    #[error("edge references unknown node id {id}")]
    UnknownReference { id: i64 },

    /// Two nodes in the input (or file) carry the same id.
    #[error("duplicate node id {id}")]
    DuplicateNode { id: i64 },

    /// A node coordinate lies outside the valid WGS-84 range.
    #[error("coordinate out of range: ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GraphError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        GraphError::MalformedFile { reason: reason.into() }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
