//! Unit tests for gr-io.

#[cfg(test)]
mod export {
    use std::fs::File;
    use std::io::BufReader;

    use gr_core::GeoPoint;
    use gr_graph::{EdgeRecord, GraphStore, NodeRecord};
    use gr_route::{DijkstraRouter, Router, RoutingProfile};

    use crate::{route_to_gpx, write_gpx};

    fn chain_graph() -> GraphStore {
        let nodes = [
            NodeRecord { id: 1, lat: 0.0, lon: 0.0 },
            NodeRecord { id: 2, lat: 0.0, lon: 0.001 },
            NodeRecord { id: 3, lat: 0.0, lon: 0.002 },
        ];
        let edges = [
            EdgeRecord {
                from_id: 1,
                to_id: 2,
                distance_m: 100.0,
                max_speed_kmh: 50.0,
                bidirectional: true,
            },
            EdgeRecord {
                from_id: 2,
                to_id: 3,
                distance_m: 100.0,
                max_speed_kmh: 50.0,
                bidirectional: true,
            },
        ];
        GraphStore::build(&nodes, &edges).unwrap()
    }

    fn chain_route(graph: &GraphStore) -> gr_route::Path {
        DijkstraRouter::default()
            .route(
                graph,
                GeoPoint::from_degrees(0.0, 0.0),
                GeoPoint::from_degrees(0.0, 0.002),
                &RoutingProfile::Shortest,
            )
            .unwrap()
    }

    #[test]
    fn document_structure() {
        let graph = chain_graph();
        let route = chain_route(&graph);
        let doc = route_to_gpx(&graph, &route, "morning commute");

        assert_eq!(doc.version, gpx::GpxVersion::Gpx11);
        assert_eq!(doc.creator.as_deref(), Some("gridroute"));
        assert_eq!(doc.tracks.len(), 1);
        assert_eq!(doc.tracks[0].name.as_deref(), Some("morning commute"));
        assert_eq!(doc.tracks[0].segments.len(), 1);
        assert_eq!(doc.tracks[0].segments[0].points.len(), 3);
    }

    #[test]
    fn trivial_route_is_single_point() {
        let graph = chain_graph();
        let route = gr_route::Path { nodes: vec![graph.node_by_osm_id(2).unwrap()], total_cost: 0 };
        let doc = route_to_gpx(&graph, &route, "here");
        assert_eq!(doc.tracks[0].segments[0].points.len(), 1);
    }

    #[test]
    fn written_file_parses_back() {
        let graph = chain_graph();
        let route = chain_route(&graph);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("route.gpx");
        write_gpx(&path, &graph, &route, "round trip").unwrap();

        let parsed = gpx::read(BufReader::new(File::open(&path).unwrap())).unwrap();
        assert_eq!(parsed.tracks.len(), 1);
        let points = &parsed.tracks[0].segments[0].points;
        assert_eq!(points.len(), 3);

        let first = points.first().unwrap().point();
        let last = points.last().unwrap().point();
        // Point is (x, y) = (lon, lat).
        assert!((first.x() - 0.0).abs() < 1e-6 && (first.y() - 0.0).abs() < 1e-6);
        assert!((last.x() - 0.002).abs() < 1e-6 && (last.y() - 0.0).abs() < 1e-6);
    }
}

#[cfg(all(test, feature = "osm"))]
mod osm_tags {
    use crate::osm::{is_car_highway, is_oneway, way_max_speed};

    #[test]
    fn car_highway_whitelist() {
        for v in ["motorway", "trunk_link", "residential", "living_street"] {
            assert!(is_car_highway(v), "{v}");
        }
        for v in ["footway", "cycleway", "path", "steps", "proposed"] {
            assert!(!is_car_highway(v), "{v}");
        }
    }

    #[test]
    fn maxspeed_parsing() {
        assert_eq!(way_max_speed(&[("maxspeed", "50")]), 50.0);
        assert_eq!(way_max_speed(&[("maxspeed", "30 mph")]), 30.0);
        // Missing or non-numeric values fall back to the default.
        assert_eq!(way_max_speed(&[("highway", "primary")]), 100.0);
        assert_eq!(way_max_speed(&[("maxspeed", "none")]), 100.0);
    }

    #[test]
    fn oneway_detection() {
        assert!(is_oneway(&[("oneway", "yes")]));
        assert!(is_oneway(&[("oneway", "1")]));
        assert!(is_oneway(&[("junction", "roundabout")]));
        assert!(!is_oneway(&[("oneway", "no")]));
        assert!(!is_oneway(&[("highway", "motorway")]));
    }
}
