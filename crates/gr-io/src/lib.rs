//! `gr-io` — interchange formats around the routing engine.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`export`] | GPX 1.1 track export for computed routes                   |
//! | [`osm`]    | OSM PBF ingestion (requires the `osm` feature)             |
//! | [`error`]  | `InterchangeError`, `InterchangeResult<T>`                 |
//!
//! # Feature flags
//!
//! | Flag  | Effect                                                         |
//! |-------|----------------------------------------------------------------|
//! | `osm` | Enables [`osm`] and pulls in the `osmpbf` parser.              |

pub mod error;
pub mod export;
#[cfg(feature = "osm")]
pub mod osm;

#[cfg(test)]
mod tests;

pub use error::{InterchangeError, InterchangeResult};
pub use export::{route_to_gpx, write_gpx};
