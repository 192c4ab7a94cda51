//! `gr-core` — foundational types for the `gridroute` routing engine.
//!
//! This crate is a dependency of every other `gr-*` crate.  It intentionally
//! has no `gr-*` dependencies and no mandatory external ones (only optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module   | Contents                                          |
//! |----------|---------------------------------------------------|
//! | [`ids`]  | `NodeId`                                          |
//! | [`geo`]  | `GeoPoint` (E6 fixed point), `BoundingBox`        |
//! | [`tile`] | `TileKey`, `TILE_SIZE_DEG`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod geo;
pub mod ids;
pub mod tile;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geo::{BoundingBox, GeoPoint, E6};
pub use ids::NodeId;
pub use tile::{TileKey, TILE_SIZE_DEG};
