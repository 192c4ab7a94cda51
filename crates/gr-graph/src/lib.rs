//! `gr-graph` — tiled road-graph store and binary persistence.
//!
//! # Crate layout
//!
//! | Module         | Contents                                               |
//! |----------------|--------------------------------------------------------|
//! | [`store`]      | `GraphStore` (CSR + id table), `NodeRecord`, `EdgeRecord`, `EdgeMeta` |
//! | [`tile_index`] | `TileIndex` grid buckets, bbox and nearest-node queries |
//! | [`codec`]      | `save` / `load` / `load_bbox` binary persistence       |
//! | [`error`]      | `GraphError`, `GraphResult<T>`                         |
//!
//! # Lifecycle
//!
//! A graph is built once — from ingestion records or from a file — and is
//! read-only afterwards.  Build and persistence are synchronous whole-graph
//! operations; once constructed, the store is safe for lock-free concurrent
//! reads.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod codec;
pub mod error;
pub mod store;
pub mod tile_index;


pub use error::{GraphError, GraphResult};
pub use store::{EdgeMeta, EdgeRecord, GraphStore, NodeRecord};
pub use tile_index::TileIndex;
