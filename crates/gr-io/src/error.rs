//! Error types for gr-io.

use thiserror::Error;

/// Errors that can occur while importing or exporting interchange formats.
#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GPX error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    #[error("graph error: {0}")]
    Graph(#[from] gr_graph::GraphError),

    #[cfg(feature = "osm")]
    #[error("OSM PBF error: {0}")]
    Osm(String),
}

/// Alias for `Result<T, InterchangeError>`.
pub type InterchangeResult<T> = Result<T, InterchangeError>;
