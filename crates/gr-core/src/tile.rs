//! Fixed-grid tile keys.
//!
//! The world is cut into square cells of [`TILE_SIZE_DEG`] degrees.  A node
//! belongs to exactly one tile, determined only by its coordinate, so the key
//! function is pure and deterministic — the same coordinate always maps to
//! the same tile, on every run.  Tile membership drives both the in-memory
//! spatial index and the on-disk tile directory, so this module is the single
//! source of truth for the key and extent formulas.
//!
//! The key is a genuine two-field `(x, y)` pair with full `i32` range for
//! each axis.  Packing both axes into one small integer loses range and
//! silently collides for negative or large coordinates; do not do that.

use crate::geo::{BoundingBox, GeoPoint};

/// Tile edge length in degrees.
///
/// Chosen so that (a) the binary directory's `i16` tile coordinates can
/// represent the full globe (needs ≥ 360/32768 ≈ 0.011°), and (b) one tile
/// (~5.5 km at the equator) is much wider than any reasonable node-snap
/// radius, so the 3×3-ring nearest-node scan cannot miss a closer node in a
/// non-adjacent tile.
pub const TILE_SIZE_DEG: f64 = 0.05;

/// Grid cell identifier.  `x` counts tiles east from lon −180, `y` counts
/// tiles north from lat −90; both are non-negative for valid coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileKey {
    pub x: i32,
    pub y: i32,
}

impl TileKey {
    /// Tile containing the given point.
    #[inline]
    pub fn of(point: GeoPoint) -> Self {
        Self {
            x: ((point.lon() + 180.0) / TILE_SIZE_DEG).floor() as i32,
            y: ((point.lat() + 90.0) / TILE_SIZE_DEG).floor() as i32,
        }
    }

    /// Rectangular extent of this tile in degree space.
    #[inline]
    pub fn extent(self) -> BoundingBox {
        BoundingBox {
            min_lon: TILE_SIZE_DEG * self.x as f64 - 180.0,
            max_lon: TILE_SIZE_DEG * (self.x + 1) as f64 - 180.0,
            min_lat: TILE_SIZE_DEG * self.y as f64 - 90.0,
            max_lat: TILE_SIZE_DEG * (self.y + 1) as f64 - 90.0,
        }
    }

    /// `true` if this tile's extent overlaps `bbox` (inclusive edges).
    #[inline]
    pub fn intersects(self, bbox: &BoundingBox) -> bool {
        let e = self.extent();
        e.min_lat <= bbox.max_lat
            && e.max_lat >= bbox.min_lat
            && e.min_lon <= bbox.max_lon
            && e.max_lon >= bbox.min_lon
    }

    /// The 3×3 ring of tiles centred on `self`, including `self`.
    pub fn ring(self) -> impl Iterator<Item = TileKey> {
        (-1..=1).flat_map(move |dy| {
            (-1..=1).map(move |dx| TileKey {
                x: self.x + dx,
                y: self.y + dy,
            })
        })
    }
}

impl std::fmt::Display for TileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tile({}, {})", self.x, self.y)
    }
}
