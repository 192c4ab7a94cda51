//! Geographic coordinate type in E6 fixed point, plus haversine distance.
//!
//! `GeoPoint` stores latitude/longitude as `i32` microdegrees (degrees scaled
//! by 1e6).  The integer form is canonical: equality and hashing operate on
//! the integers, never on floats, so two points built from the same degree
//! values always compare equal and land in the same tile.  The integer form
//! is also what the binary graph format persists, making coordinates exact
//! across a save/load round trip.

/// Scale factor between degrees and microdegrees.
pub const E6: f64 = 1e6;

/// A WGS-84 coordinate in microdegrees (E6 fixed point).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat_e6: i32,
    pub lon_e6: i32,
}

impl GeoPoint {
    /// Construct from raw microdegree values.
    #[inline]
    pub const fn from_e6(lat_e6: i32, lon_e6: i32) -> Self {
        Self { lat_e6, lon_e6 }
    }

    /// Construct from degrees.  The conversion is deterministic:
    /// `round(deg * 1e6)`, matching the on-disk encoding exactly.
    #[inline]
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self {
            lat_e6: (lat * E6).round() as i32,
            lon_e6: (lon * E6).round() as i32,
        }
    }

    /// Latitude in degrees.
    #[inline]
    pub fn lat(self) -> f64 {
        self.lat_e6 as f64 / E6
    }

    /// Longitude in degrees.
    #[inline]
    pub fn lon(self) -> f64 {
        self.lon_e6 as f64 / E6
    }

    /// Haversine great-circle distance in metres.
    ///
    /// Computed in f64 over the degree view; ~1 µdeg (≈0.1 m) resolution is
    /// set by the fixed-point storage, not by this formula.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat() - self.lat()).to_radians();
        let d_lon = (other.lon() - self.lon()).to_radians();

        let lat1 = self.lat().to_radians();
        let lat2 = other.lat().to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat(), self.lon())
    }
}

// ── BoundingBox ───────────────────────────────────────────────────────────────

/// An axis-aligned rectangle in degree space.
///
/// Construction normalizes the corners, so `min_lat <= max_lat` and
/// `min_lon <= max_lon` always hold.  Dateline-crossing boxes are not
/// supported; a box spanning lon 180 must be split by the caller.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Build from two opposite corners, in any order.
    pub fn new(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> Self {
        Self {
            min_lat: lat_a.min(lat_b),
            min_lon: lon_a.min(lon_b),
            max_lat: lat_a.max(lat_b),
            max_lon: lon_a.max(lon_b),
        }
    }

    /// Smallest box containing both points, grown on every side by
    /// `margin_factor` times the corresponding coordinate span.
    ///
    /// Used by the path finder to restrict the search region around the
    /// snapped endpoints (1.5× by default).  A zero span (both points on the
    /// same meridian/parallel) still gets a small fixed margin so the box
    /// never degenerates to a line.
    pub fn around(a: GeoPoint, b: GeoPoint, margin_factor: f64) -> Self {
        const MIN_MARGIN_DEG: f64 = 0.01;

        let lat_margin = ((a.lat() - b.lat()).abs() * margin_factor).max(MIN_MARGIN_DEG);
        let lon_margin = ((a.lon() - b.lon()).abs() * margin_factor).max(MIN_MARGIN_DEG);

        Self {
            min_lat: a.lat().min(b.lat()) - lat_margin,
            min_lon: a.lon().min(b.lon()) - lon_margin,
            max_lat: a.lat().max(b.lat()) + lat_margin,
            max_lon: a.lon().max(b.lon()) + lon_margin,
        }
    }

    /// `true` if the point lies inside the box (inclusive edges).
    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        let (lat, lon) = (p.lat(), p.lon());
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}
