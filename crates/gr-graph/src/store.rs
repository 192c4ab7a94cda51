//! Graph store: owned node/edge data plus the tile index.
//!
//! # Data layout
//!
//! The store uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! edge_meta[ same range ]
//! ```
//!
//! Nodes are decoded once at build/load time into dense SoA arrays; edge
//! metadata is a small fixed-width struct, never a byte blob re-parsed per
//! access.  After construction the store is immutable — it carries no
//! interior mutability, so `&GraphStore` is freely shareable across threads
//! and arbitrarily many routing queries may run against it in parallel.
//!
//! # Ownership
//!
//! The store exclusively owns all node and edge data.  The [`TileIndex`]
//! holds only `NodeId`s into the store's arrays, never a second copy.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use gr_core::{BoundingBox, GeoPoint, NodeId};

use crate::error::{GraphError, GraphResult};
use crate::tile_index::TileIndex;

// ── Ingestion interface ───────────────────────────────────────────────────────

/// One node as delivered by the ingestion collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeRecord {
    /// External 64-bit id (OSM node id for map data).
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
}

/// One road segment as delivered by the ingestion collaborator, already
/// filtered to routable ways.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeRecord {
    pub from_id: i64,
    pub to_id: i64,
    pub distance_m: f64,
    pub max_speed_kmh: f64,
    /// `true` expands into two directed edges; a bidirectional road is never
    /// stored as a single undirected edge.
    pub bidirectional: bool,
}

// ── EdgeMeta ──────────────────────────────────────────────────────────────────

/// Quantized per-edge metadata: 3 bytes per edge, both in memory and on disk.
///
/// Quantization happens once, at build time, and is lossy: distances round
/// *up* to whole metres and clamp at 65 535 m, speeds clamp to 1..=255 km/h.
/// Rounding up keeps a stored distance at or above the raw input, so a
/// haversine lower bound over raw distances stays a lower bound for the
/// stored values.  Values beyond the representable range are clamped and
/// surfaced as a warning, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeMeta {
    pub distance_m: u16,
    pub max_speed_kmh: u8,
}

impl EdgeMeta {
    /// Quantize raw metadata, clamping out-of-range values.
    pub fn quantize(distance_m: f64, max_speed_kmh: f64) -> Self {
        // Ceiling, not rounding: the stored distance must never fall below
        // the raw (geometric) input.
        let d = distance_m.ceil();
        if d > u16::MAX as f64 {
            warn!(distance_m, "edge distance exceeds encodable range, clamping");
        }
        let s = max_speed_kmh.round();
        if s > u8::MAX as f64 {
            warn!(max_speed_kmh, "edge speed exceeds encodable range, clamping");
        }
        Self {
            distance_m: d.clamp(0.0, u16::MAX as f64) as u16,
            // Speed 0 would make the fastest profile divide by zero.
            max_speed_kmh: s.clamp(1.0, u8::MAX as f64) as u8,
        }
    }

    /// Speed in metres per second.
    #[inline]
    pub fn speed_mps(self) -> f64 {
        self.max_speed_kmh as f64 / 3.6
    }
}

// ── GraphStore ────────────────────────────────────────────────────────────────

/// Immutable road graph: dense node arrays, CSR adjacency, id table, and
/// tile index.  Construct with [`GraphStore::build`] or by loading a file
/// via [`crate::codec`].
#[derive(Debug)]
pub struct GraphStore {
    /// External id of each node.  Indexed by `NodeId`.
    node_osm_id: Vec<i64>,
    /// Position of each node.  Indexed by `NodeId`.
    node_pos: Vec<GeoPoint>,

    /// CSR row pointer.  Outgoing edges of node `n` occupy index range
    /// `node_out_start[n] .. node_out_start[n+1]`.  Length = node count + 1.
    node_out_start: Vec<u32>,
    /// Destination node of each edge, sorted by source node.
    edge_to: Vec<NodeId>,
    /// Quantized metadata of each edge, parallel to `edge_to`.
    edge_meta: Vec<EdgeMeta>,

    /// External id → dense index, built once at construction.
    id_index: FxHashMap<i64, NodeId>,
    /// Tile buckets over `NodeId`s.
    tiles: TileIndex,
}

impl GraphStore {
    /// Build a graph from a node list and an edge list.
    ///
    /// # Errors
    ///
    /// The whole build is aborted (nothing partially usable is returned) on:
    /// - [`GraphError::DuplicateNode`] — two records share an id,
    /// - [`GraphError::InvalidCoordinate`] — latitude/longitude out of range,
    /// - [`GraphError::UnknownReference`] — an edge endpoint id is absent
    ///   from the node set.  A dangling endpoint is a data-integrity error
    ///   in the producer, not a routing miss.
    pub fn build(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> GraphResult<Self> {
        let mut node_osm_id = Vec::with_capacity(nodes.len());
        let mut node_pos = Vec::with_capacity(nodes.len());
        let mut id_index =
            FxHashMap::with_capacity_and_hasher(nodes.len(), Default::default());

        for rec in nodes {
            if !(-90.0..=90.0).contains(&rec.lat) || !(-180.0..=180.0).contains(&rec.lon) {
                return Err(GraphError::InvalidCoordinate { lat: rec.lat, lon: rec.lon });
            }
            let id = NodeId(node_osm_id.len() as u32);
            if id_index.insert(rec.id, id).is_some() {
                return Err(GraphError::DuplicateNode { id: rec.id });
            }
            node_osm_id.push(rec.id);
            node_pos.push(GeoPoint::from_degrees(rec.lat, rec.lon));
        }

        let mut directed: Vec<(NodeId, NodeId, EdgeMeta)> = Vec::with_capacity(edges.len());
        for rec in edges {
            let from = *id_index
                .get(&rec.from_id)
                .ok_or(GraphError::UnknownReference { id: rec.from_id })?;
            let to = *id_index
                .get(&rec.to_id)
                .ok_or(GraphError::UnknownReference { id: rec.to_id })?;
            let meta = EdgeMeta::quantize(rec.distance_m, rec.max_speed_kmh);
            directed.push((from, to, meta));
            if rec.bidirectional {
                directed.push((to, from, meta));
            }
        }

        Ok(Self::assemble(node_osm_id, node_pos, id_index, directed))
    }

    /// Assemble a store from decoded per-node adjacency, as produced by the
    /// binary codec.  With `drop_dangling` set (partial loads), edges whose
    /// target was not decoded are discarded as expected boundary artifacts;
    /// otherwise a missing target is a fatal [`GraphError::UnknownReference`].
    pub(crate) fn from_decoded(
        nodes: Vec<DecodedNode>,
        drop_dangling: bool,
    ) -> GraphResult<Self> {
        let mut node_osm_id = Vec::with_capacity(nodes.len());
        let mut node_pos = Vec::with_capacity(nodes.len());
        let mut id_index =
            FxHashMap::with_capacity_and_hasher(nodes.len(), Default::default());

        for node in &nodes {
            let id = NodeId(node_osm_id.len() as u32);
            if id_index.insert(node.osm_id, id).is_some() {
                return Err(GraphError::DuplicateNode { id: node.osm_id });
            }
            node_osm_id.push(node.osm_id);
            node_pos.push(node.pos);
        }

        let mut directed = Vec::new();
        let mut dropped = 0usize;
        for node in &nodes {
            let from = id_index[&node.osm_id];
            for &(target, meta) in &node.edges {
                match id_index.get(&target) {
                    Some(&to) => directed.push((from, to, meta)),
                    None if drop_dangling => dropped += 1,
                    None => return Err(GraphError::UnknownReference { id: target }),
                }
            }
        }
        if dropped > 0 {
            debug!(dropped, "dropped boundary edges outside the loaded tile set");
        }

        Ok(Self::assemble(node_osm_id, node_pos, id_index, directed))
    }

    /// Sort edges by source and build the CSR arrays and tile index.
    fn assemble(
        node_osm_id: Vec<i64>,
        node_pos: Vec<GeoPoint>,
        id_index: FxHashMap<i64, NodeId>,
        mut directed: Vec<(NodeId, NodeId, EdgeMeta)>,
    ) -> Self {
        let node_count = node_osm_id.len();
        directed.sort_unstable_by_key(|&(from, to, _)| (from, to));

        let edge_to: Vec<NodeId> = directed.iter().map(|&(_, to, _)| to).collect();
        let edge_meta: Vec<EdgeMeta> = directed.iter().map(|&(_, _, m)| m).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for &(from, _, _) in &directed {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_to.len());

        let mut tiles = TileIndex::new();
        for (i, &pos) in node_pos.iter().enumerate() {
            tiles.insert(NodeId(i as u32), pos);
        }

        Self { node_osm_id, node_pos, node_out_start, edge_to, edge_meta, id_index, tiles }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_osm_id.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_osm_id.is_empty()
    }

    // ── Read accessors ────────────────────────────────────────────────────

    /// Position of a node.
    #[inline]
    pub fn pos(&self, node: NodeId) -> GeoPoint {
        self.node_pos[node.index()]
    }

    /// External (OSM) id of a node.
    #[inline]
    pub fn osm_id(&self, node: NodeId) -> i64 {
        self.node_osm_id[node.index()]
    }

    /// Dense index for an external id, O(1) amortized.
    pub fn node_by_osm_id(&self, id: i64) -> Option<NodeId> {
        self.id_index.get(&id).copied()
    }

    /// Iterator over `(destination, metadata)` of all outgoing edges.
    ///
    /// A contiguous CSR range scan — no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = (NodeId, EdgeMeta)> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| (self.edge_to[i], self.edge_meta[i]))
    }

    /// Out-degree of `node`.
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Ids of all nodes in tiles intersecting `bbox`.
    pub fn nodes_in_bbox(&self, bbox: &BoundingBox) -> Vec<NodeId> {
        self.tiles.nodes_in_bbox(bbox)
    }

    /// Nearest node within `max_distance_m` of the coordinate, or `None`.
    ///
    /// Scans the 3×3 tile ring around the query point; see
    /// [`TileIndex::nearest_node`] for the implied limitation.
    pub fn nearest_node(&self, lat: f64, lon: f64, max_distance_m: f64) -> Option<NodeId> {
        self.tiles
            .nearest_node(GeoPoint::from_degrees(lat, lon), max_distance_m, &self.node_pos)
    }

    /// The tile index, for directory construction and tests.
    pub fn tiles(&self) -> &TileIndex {
        &self.tiles
    }
}

/// One node with its adjacency as decoded from a tile block.
pub(crate) struct DecodedNode {
    pub osm_id: i64,
    pub pos: GeoPoint,
    pub edges: Vec<(i64, EdgeMeta)>,
}
