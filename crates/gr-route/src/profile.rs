//! Routing profiles: pure edge-cost functions.
//!
//! A profile maps quantized edge metadata to a nonnegative `u32` cost.  The
//! unsigned type makes a negative cost unrepresentable, which is what keeps
//! Dijkstra's optimality guarantee intact; profiles additionally never
//! return 0 for the time-based variant (a zero-cost cycle would stall the
//! search).  Profiles hold no hidden state — the same metadata always yields
//! the same cost, so costs are safe as priority-queue keys.
//!
//! The set of profiles is closed: adding one means adding an enum variant,
//! not a subclass.

use gr_graph::EdgeMeta;

/// Per-band fuel-consumption table for the eco profile.
///
/// One percentage per 10 km/h speed band: index 0 covers 1–10 km/h, index 14
/// covers 141–150, index 15 everything above.  Band edges and values are
/// configuration data, not code — swap the table to model a different
/// vehicle.  The default models a combustion car that is most efficient
/// around 60 km/h.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EcoTable {
    percent: [u16; 16],
}

impl EcoTable {
    pub fn new(percent: [u16; 16]) -> Self {
        Self { percent }
    }

    /// Consumption percentage for a speed, per the band table.
    #[inline]
    pub fn percent_for(&self, speed_kmh: u8) -> u32 {
        let band = (speed_kmh.max(1) as usize - 1) / 10;
        self.percent[band.min(15)] as u32
    }

    /// Smallest percentage in the table — the admissible lower bound used
    /// by the A* heuristic.
    pub fn min_percent(&self) -> u32 {
        *self.percent.iter().min().unwrap_or(&0) as u32
    }
}

impl Default for EcoTable {
    fn default() -> Self {
        Self {
            percent: [30, 25, 20, 18, 17, 16, 18, 20, 25, 100, 115, 130, 145, 150, 155, 160],
        }
    }
}

/// The routing objective: what a "best" path means.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoutingProfile {
    /// Minimize physical distance.  Cost = metres.
    Shortest,
    /// Minimize travel time.  Cost = seconds at the edge's speed limit,
    /// clamped to a minimum of 1 to forbid zero-cost edges.
    Fastest,
    /// Minimize fuel consumption.  Cost = metres scaled by the table
    /// percentage for the edge's speed band.
    Eco(EcoTable),
}

impl RoutingProfile {
    /// Cost of traversing one edge.  Pure and stateless.
    #[inline]
    pub fn cost(&self, meta: EdgeMeta) -> u32 {
        match self {
            RoutingProfile::Shortest => meta.distance_m as u32,
            RoutingProfile::Fastest => {
                ((meta.distance_m as f64 / meta.speed_mps()).round() as u32).max(1)
            }
            RoutingProfile::Eco(table) => {
                meta.distance_m as u32 * table.percent_for(meta.max_speed_kmh) / 100
            }
        }
    }

    /// Lower bound on the cost of covering `meters` of geometric distance —
    /// the A* heuristic.  Scales the distance by the profile's minimum
    /// per-metre cost and rounds down, so it never exceeds the true
    /// remaining cost as long as edge distances are at least geometric.
    #[inline]
    pub fn heuristic_cost(&self, meters: f64) -> u32 {
        match self {
            RoutingProfile::Shortest => meters as u32,
            // Fastest: no edge can be traversed faster than the maximum
            // encodable speed (255 km/h).
            RoutingProfile::Fastest => (meters / (255.0 / 3.6)) as u32,
            RoutingProfile::Eco(table) => (meters * table.min_percent() as f64 / 100.0) as u32,
        }
    }
}
