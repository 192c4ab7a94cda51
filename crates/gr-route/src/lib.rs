//! `gr-route` — routing profiles and shortest-path search.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`profile`] | `RoutingProfile` (shortest/fastest/eco), `EcoTable`       |
//! | [`router`]  | `Router` trait, `DijkstraRouter`, `AStarRouter`, `Path`   |
//! | [`error`]   | `RouteError`, `RouteResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod error;
pub mod profile;
pub mod router;


pub use error::{RouteError, RouteResult};
pub use profile::{EcoTable, RoutingProfile};
pub use router::{AStarRouter, DijkstraRouter, Path, Router, SearchConfig, Waypoint};
