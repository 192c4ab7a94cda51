//! Routing-subsystem error type.
//!
//! Both variants are ordinary result values, not defects: `NodeNotFound` is
//! recoverable (retry with a larger snap radius) and `NoPathFound` is an
//! expected outcome on disconnected graphs or box-restricted searches.

use thiserror::Error;

use gr_core::NodeId;

/// Errors produced by `gr-route`.
#[derive(Debug, Error)]
pub enum RouteError {
    /// No graph node within the snap radius of the given coordinate.
    #[error("no node within {radius_m} m of ({lat}, {lon})")]
    NodeNotFound { lat: f64, lon: f64, radius_m: f64 },

    /// The snapped endpoints are not connected — either genuinely, or
    /// because the search box excluded every connecting path.
    #[error("no path from {from} to {to}")]
    NoPathFound { from: NodeId, to: NodeId },
}

pub type RouteResult<T> = Result<T, RouteError>;
