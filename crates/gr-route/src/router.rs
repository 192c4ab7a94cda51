//! Path finding: coordinate snapping, Dijkstra, and A*.
//!
//! # Pluggability
//!
//! Callers route via the [`Router`] trait so alternative engines
//! (contraction hierarchies, bidirectional search) can be swapped in without
//! touching the rest of the stack.  [`DijkstraRouter`] and [`AStarRouter`]
//! share one search core; A* merely adds an admissible heuristic to the
//! queue key.
//!
//! # Search-box policy
//!
//! With [`SearchConfig::bbox_margin`] set (the default), relaxation is
//! restricted to nodes inside a bounding box around the snapped endpoints,
//! grown by the margin factor.  This is a deliberate completeness/speed
//! trade-off: a true shortest path that leaves the box is unreachable and
//! the search reports [`RouteError::NoPathFound`] even though a path exists
//! in the full graph.  The box is never auto-expanded — the failure is the
//! documented policy, not a bug.  Set `bbox_margin: None` for exhaustive
//! search.
//!
//! # Concurrency
//!
//! Every call allocates its own distance/predecessor arrays and queue and
//! shares no mutable state, so any number of queries may run in parallel
//! against one `&GraphStore`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::debug;

use gr_core::{BoundingBox, GeoPoint, NodeId};
use gr_graph::GraphStore;

use crate::error::{RouteError, RouteResult};
use crate::profile::RoutingProfile;

// ── Path ──────────────────────────────────────────────────────────────────────

/// The result of a routing query: the ordered node sequence from the snapped
/// start to the snapped end, and the total cost in the profile's unit.
/// Constructed only by the path finder; never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub nodes: Vec<NodeId>,
    pub total_cost: u32,
}

impl Path {
    /// `true` if start and end snapped to the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// The `(external id, lat, lon)` view consumed by track exporters.
    pub fn waypoints<'a>(&'a self, graph: &'a GraphStore) -> impl Iterator<Item = Waypoint> + 'a {
        self.nodes.iter().map(|&n| {
            let pos = graph.pos(n);
            Waypoint { id: graph.osm_id(n), lat: pos.lat(), lon: pos.lon() }
        })
    }
}

/// One path node in export form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// Tuning knobs shared by both routers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Maximum snap distance from a query coordinate to a graph node.
    pub snap_radius_m: f64,
    /// Search-box margin as a multiple of the start–end coordinate span;
    /// `None` disables the restriction (see module docs).
    pub bbox_margin: Option<f64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { snap_radius_m: 150.0, bbox_margin: Some(1.5) }
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// Implementations must be `Send + Sync` so a single router can serve
/// queries from many threads.
pub trait Router: Send + Sync {
    /// Compute the minimum-cost path between two raw coordinates.
    fn route(
        &self,
        graph: &GraphStore,
        start: GeoPoint,
        end: GeoPoint,
        profile: &RoutingProfile,
    ) -> RouteResult<Path>;
}

/// Classic Dijkstra over the CSR adjacency.
#[derive(Debug, Default, Clone)]
pub struct DijkstraRouter {
    pub config: SearchConfig,
}

impl Router for DijkstraRouter {
    fn route(
        &self,
        graph: &GraphStore,
        start: GeoPoint,
        end: GeoPoint,
        profile: &RoutingProfile,
    ) -> RouteResult<Path> {
        search(graph, start, end, profile, &self.config, false)
    }
}

/// A* with a haversine lower-bound heuristic.
///
/// The heuristic is admissible — and the result cost-optimal — when every
/// edge's raw distance is at least the geometric distance between its
/// endpoints, which holds for real road data.  Quantization rounds stored
/// distances up, so the guarantee survives the metre rounding.  For
/// synthetic graphs with understated edge lengths, prefer
/// [`DijkstraRouter`].
#[derive(Debug, Default, Clone)]
pub struct AStarRouter {
    pub config: SearchConfig,
}

impl Router for AStarRouter {
    fn route(
        &self,
        graph: &GraphStore,
        start: GeoPoint,
        end: GeoPoint,
        profile: &RoutingProfile,
    ) -> RouteResult<Path> {
        search(graph, start, end, profile, &self.config, true)
    }
}

// ── Search core ───────────────────────────────────────────────────────────────

fn search(
    graph: &GraphStore,
    start: GeoPoint,
    end: GeoPoint,
    profile: &RoutingProfile,
    config: &SearchConfig,
    astar: bool,
) -> RouteResult<Path> {
    let snap = |p: GeoPoint| {
        graph
            .nearest_node(p.lat(), p.lon(), config.snap_radius_m)
            .ok_or(RouteError::NodeNotFound {
                lat: p.lat(),
                lon: p.lon(),
                radius_m: config.snap_radius_m,
            })
    };
    let src = snap(start)?;
    let dst = snap(end)?;
    debug!(%src, %dst, "snapped route endpoints");

    if src == dst {
        return Ok(Path { nodes: vec![src], total_cost: 0 });
    }

    let bbox = config
        .bbox_margin
        .map(|m| BoundingBox::around(graph.pos(src), graph.pos(dst), m));
    let goal_pos = graph.pos(dst);
    let h = |n: NodeId| -> u32 {
        if astar {
            profile.heuristic_cost(graph.pos(n).distance_m(goal_pos))
        } else {
            0
        }
    };

    // dist[v] = best known cost to reach v; prev[v] = predecessor on that path.
    let n = graph.node_count();
    let mut dist = vec![u32::MAX; n];
    let mut prev = vec![NodeId::INVALID; n];
    dist[src.index()] = 0;

    // Min-heap keyed by (estimate, insertion sequence): Reverse turns the
    // max-heap around, and the sequence counter makes equal-cost pops follow
    // insertion order — stable within a run.
    let mut heap: BinaryHeap<Reverse<(u32, u64, NodeId, u32)>> = BinaryHeap::new();
    let mut seq: u64 = 0;
    heap.push(Reverse((h(src), seq, src, 0)));

    while let Some(Reverse((_, _, node, cost))) = heap.pop() {
        if node == dst {
            return reconstruct(&prev, src, dst, cost);
        }
        // Stale entry: this node was re-relaxed with a shorter distance
        // after this entry was queued.
        if cost > dist[node.index()] {
            continue;
        }

        for (to, meta) in graph.out_edges(node) {
            if let Some(ref b) = bbox {
                if !b.contains(graph.pos(to)) {
                    continue;
                }
            }
            let new_cost = cost.saturating_add(profile.cost(meta));
            if new_cost < dist[to.index()] {
                dist[to.index()] = new_cost;
                prev[to.index()] = node;
                seq += 1;
                heap.push(Reverse((new_cost.saturating_add(h(to)), seq, to, new_cost)));
            }
        }
    }

    debug!(%src, %dst, "queue exhausted without reaching the goal");
    Err(RouteError::NoPathFound { from: src, to: dst })
}

/// Walk the predecessor chain from goal to start and reverse it.  A chain
/// that does not end at the snapped start means the goal was never reached
/// from it — disconnected component or search-box exclusion, reported
/// uniformly as `NoPathFound`.
fn reconstruct(prev: &[NodeId], src: NodeId, dst: NodeId, total_cost: u32) -> RouteResult<Path> {
    let mut nodes = vec![dst];
    let mut cur = dst;
    while prev[cur.index()] != NodeId::INVALID {
        cur = prev[cur.index()];
        nodes.push(cur);
    }
    nodes.reverse();

    if nodes.first() != Some(&src) {
        return Err(RouteError::NoPathFound { from: src, to: dst });
    }
    Ok(Path { nodes, total_cost })
}
