//! Grid-tile spatial index.
//!
//! Buckets node ids by [`TileKey`].  The index owns nothing but ids — node
//! positions live in the graph store's dense arrays and are passed in where
//! a query needs them, so no node data is ever duplicated.
//!
//! # Nearest-node limitation
//!
//! [`TileIndex::nearest_node`] scans only the 3×3 ring of tiles around the
//! query point.  If the tile size were smaller than the search radius, a
//! closer node in a non-adjacent tile could be missed.  The ring is never
//! widened; the result is correct as long as `TILE_SIZE_DEG` (≈5.5 km per
//! tile) exceeds the snap radius, which the default 150 m radius does by two
//! orders of magnitude.

use rustc_hash::FxHashMap;

use gr_core::{BoundingBox, GeoPoint, NodeId, TileKey};

/// Maps each occupied tile to the ids of the nodes inside it.
#[derive(Debug, Default)]
pub struct TileIndex {
    buckets: FxHashMap<TileKey, Vec<NodeId>>,
}

impl TileIndex {
    pub fn new() -> Self {
        Self { buckets: FxHashMap::default() }
    }

    /// Append a node id to the bucket of its tile.  Build-time only; the
    /// index is read-only once the owning store is constructed.
    pub fn insert(&mut self, id: NodeId, pos: GeoPoint) {
        self.buckets.entry(TileKey::of(pos)).or_default().push(id);
    }

    /// Number of occupied tiles.
    pub fn tile_count(&self) -> usize {
        self.buckets.len()
    }

    /// Iterate over `(tile, node ids)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (TileKey, &[NodeId])> {
        self.buckets.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Node ids bucketed in `tile`, or an empty slice.
    pub fn nodes_in_tile(&self, tile: TileKey) -> &[NodeId] {
        self.buckets.get(&tile).map_or(&[], |v| v.as_slice())
    }

    /// Union of all buckets whose tile extent intersects `bbox`.
    ///
    /// Iterates occupied tiles rather than the coordinate range of the box,
    /// so the cost is O(tile count), independent of how large `bbox` is.
    pub fn nodes_in_bbox(&self, bbox: &BoundingBox) -> Vec<NodeId> {
        let mut out = Vec::new();
        for (key, ids) in self.buckets.iter() {
            if key.intersects(bbox) {
                out.extend_from_slice(ids);
            }
        }
        out
    }

    /// Nearest node to `query` within `max_distance_m`, scanning the 3×3
    /// tile ring centred on the query point (see module docs for the
    /// limitation this implies).  `positions` is the owning store's node
    /// position array, indexed by `NodeId`.
    pub fn nearest_node(
        &self,
        query: GeoPoint,
        max_distance_m: f64,
        positions: &[GeoPoint],
    ) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;

        for tile in TileKey::of(query).ring() {
            for &id in self.nodes_in_tile(tile) {
                let d = positions[id.index()].distance_m(query);
                if d <= max_distance_m && best.map_or(true, |(_, bd)| d < bd) {
                    best = Some((id, d));
                }
            }
        }

        best.map(|(id, _)| id)
    }
}
