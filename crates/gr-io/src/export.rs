//! GPX 1.1 track export for computed routes.
//!
//! A route becomes a single `<trk>` with one `<trkseg>` holding one `<trkpt>`
//! per path node, in travel order.  Elevation and timestamps are not
//! available in the graph and are left unset.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use geo_types::Point;
use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};
use tracing::info;

use gr_graph::GraphStore;
use gr_route::Path as RoutePath;

use crate::error::InterchangeResult;

/// Build an in-memory GPX document from a computed route.
///
/// `graph` must be the store the route was computed against; node positions
/// are resolved through it.
pub fn route_to_gpx(graph: &GraphStore, route: &RoutePath, name: &str) -> Gpx {
    let mut segment = TrackSegment::default();
    for wp in route.waypoints(graph) {
        // GPX points take (x, y) = (lon, lat).
        segment.points.push(Waypoint::new(Point::new(wp.lon, wp.lat)));
    }

    let mut track = Track::default();
    track.name = Some(name.to_owned());
    track.segments.push(segment);

    Gpx {
        version: GpxVersion::Gpx11,
        creator: Some("gridroute".to_owned()),
        tracks: vec![track],
        ..Gpx::default()
    }
}

/// Write a computed route to `path` as a GPX 1.1 file.
pub fn write_gpx(
    path: &Path,
    graph: &GraphStore,
    route: &RoutePath,
    name: &str,
) -> InterchangeResult<()> {
    let doc = route_to_gpx(graph, route, name);
    let file = File::create(path)?;
    gpx::write(&doc, BufWriter::new(file))?;
    info!(
        path = %path.display(),
        points = route.nodes.len(),
        "wrote GPX track"
    );
    Ok(())
}
