//! OSM PBF ingestion — enabled with the `osm` Cargo feature.
//!
//! # What is read
//!
//! Only car-drivable `highway=*` ways are kept (see [`is_car_highway`]);
//! footways, buildings, POIs, and relations are ignored.  The speed limit
//! comes from the way's `maxspeed` tag, falling back to 100 km/h when the
//! tag is missing or unparseable.  A `oneway=yes` way or a roundabout
//! produces a directed edge; everything else is bidirectional.
//!
//! # Memory note
//!
//! The reader buffers all OSM node positions in a map for the single
//! sequential pass (ways reference nodes by integer id).  The map is freed
//! once the record lists are assembled.

use std::path::Path;

use osmpbf::{Element, ElementReader};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::info;

use gr_core::GeoPoint;
use gr_graph::{EdgeRecord, GraphStore, NodeRecord};

use crate::error::{InterchangeError, InterchangeResult};

// ── Public entry points ───────────────────────────────────────────────────────

/// Read a PBF extract into ingestion records.
///
/// Node records cover exactly the nodes referenced by at least one kept way;
/// edge records cover consecutive node pairs of each kept way.  Ways
/// referencing nodes absent from the extract are skipped at the pair level,
/// matching clipped-extract boundaries.
pub fn read_pbf(path: &Path) -> InterchangeResult<(Vec<NodeRecord>, Vec<EdgeRecord>)> {
    let reader =
        ElementReader::from_path(path).map_err(|e| InterchangeError::Osm(e.to_string()))?;

    // Single sequential pass: node positions and kept ways.
    let mut positions: FxHashMap<i64, GeoPoint> = FxHashMap::default();
    let mut ways: Vec<RoadWay> = Vec::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                positions.insert(n.id(), GeoPoint::from_degrees(n.lat(), n.lon()));
            }
            Element::DenseNode(n) => {
                positions.insert(n.id(), GeoPoint::from_degrees(n.lat(), n.lon()));
            }
            Element::Way(w) => {
                let tags: Vec<(&str, &str)> = w.tags().collect();
                let highway = tags.iter().find(|(k, _)| *k == "highway").map(|(_, v)| *v);
                if highway.is_some_and(is_car_highway) {
                    ways.push(RoadWay {
                        refs: w.refs().collect(),
                        max_speed_kmh: way_max_speed(&tags),
                        bidirectional: !is_oneway(&tags),
                    });
                }
            }
            _ => {}
        })
        .map_err(|e| InterchangeError::Osm(e.to_string()))?;

    let road_node_ids: FxHashSet<i64> =
        ways.iter().flat_map(|w| w.refs.iter().copied()).collect();

    let mut nodes = Vec::with_capacity(road_node_ids.len());
    for &id in &road_node_ids {
        if let Some(pos) = positions.get(&id) {
            nodes.push(NodeRecord { id, lat: pos.lat(), lon: pos.lon() });
        }
    }
    drop(positions);

    let mut edges = Vec::new();
    let known: FxHashSet<i64> = nodes.iter().map(|n| n.id).collect();
    let node_pos: FxHashMap<i64, GeoPoint> = nodes
        .iter()
        .map(|n| (n.id, GeoPoint::from_degrees(n.lat, n.lon)))
        .collect();
    for way in &ways {
        for pair in way.refs.windows(2) {
            let (from_id, to_id) = (pair[0], pair[1]);
            if known.contains(&from_id) && known.contains(&to_id) {
                let distance_m = node_pos[&from_id].distance_m(node_pos[&to_id]);
                edges.push(EdgeRecord {
                    from_id,
                    to_id,
                    distance_m,
                    max_speed_kmh: way.max_speed_kmh,
                    bidirectional: way.bidirectional,
                });
            }
        }
    }

    info!(
        path = %path.display(),
        nodes = nodes.len(),
        edges = edges.len(),
        "read PBF extract"
    );
    Ok((nodes, edges))
}

/// Read a PBF extract and build the graph in one step.
pub fn build_from_pbf(path: &Path) -> InterchangeResult<GraphStore> {
    let (nodes, edges) = read_pbf(path)?;
    Ok(GraphStore::build(&nodes, &edges)?)
}

// ── Internal types ────────────────────────────────────────────────────────────

struct RoadWay {
    refs: Vec<i64>,
    max_speed_kmh: f64,
    bidirectional: bool,
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

/// `true` for `highway` values drivable by car.
pub(crate) fn is_car_highway(highway: &str) -> bool {
    matches!(
        highway,
        "motorway"
            | "motorway_link"
            | "trunk"
            | "trunk_link"
            | "primary"
            | "primary_link"
            | "secondary"
            | "secondary_link"
            | "tertiary"
            | "tertiary_link"
            | "unclassified"
            | "residential"
            | "living_street"
    )
}

/// Speed limit from the `maxspeed` tag, km/h.  Non-numeric characters are
/// stripped first so `"50 mph"` style values still yield a number; a missing
/// or fully non-numeric tag falls back to 100.
pub(crate) fn way_max_speed(tags: &[(&str, &str)]) -> f64 {
    const DEFAULT_KMH: f64 = 100.0;
    tags.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("maxspeed"))
        .and_then(|(_, v)| {
            let digits: String = v.chars().filter(|c| c.is_ascii_digit()).collect();
            digits.parse::<f64>().ok()
        })
        .unwrap_or(DEFAULT_KMH)
}

/// `true` when the way carries traffic in one direction only.  Roundabouts
/// are one-way by OSM convention even without an explicit `oneway` tag.
pub(crate) fn is_oneway(tags: &[(&str, &str)]) -> bool {
    tags.iter().any(|(k, v)| {
        (k.eq_ignore_ascii_case("oneway") && matches!(*v, "yes" | "1" | "true"))
            || (k.eq_ignore_ascii_case("junction") && *v == "roundabout")
    })
}
