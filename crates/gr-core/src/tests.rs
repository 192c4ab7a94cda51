//! Unit tests for gr-core primitives.

#[cfg(test)]
mod ids {
    use crate::NodeId;

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(NodeId(0) < NodeId(1));
        assert!(NodeId(100) > NodeId(99));
    }

    #[test]
    fn invalid_sentinel_is_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{BoundingBox, GeoPoint};

    #[test]
    fn degree_conversion_is_rounding() {
        let p = GeoPoint::from_degrees(48.123_456_4, 11.999_999_6);
        assert_eq!(p.lat_e6, 48_123_456);
        assert_eq!(p.lon_e6, 12_000_000);
    }

    #[test]
    fn equality_uses_integer_form() {
        // Two degree values that round to the same microdegree must be equal.
        let a = GeoPoint::from_degrees(10.000_000_04, 20.0);
        let b = GeoPoint::from_degrees(10.000_000_01, 20.0);
        assert_eq!(a, b);
    }

    #[test]
    fn negative_coordinates() {
        let p = GeoPoint::from_degrees(-33.868_8, -151.209_3);
        assert_eq!(p.lat_e6, -33_868_800);
        assert!((p.lat() - -33.868_8).abs() < 1e-9);
    }

    #[test]
    fn zero_distance() {
        let p = GeoPoint::from_degrees(30.694, -88.043);
        assert!(p.distance_m(p) < 0.01);
    }

    #[test]
    fn one_degree_latitude_approx() {
        // ~1 degree of latitude ≈ 111 km
        let a = GeoPoint::from_degrees(30.0, -88.0);
        let b = GeoPoint::from_degrees(31.0, -88.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn bbox_normalizes_corners() {
        let b = BoundingBox::new(2.0, 5.0, 1.0, 4.0);
        assert_eq!(b.min_lat, 1.0);
        assert_eq!(b.max_lat, 2.0);
        assert_eq!(b.min_lon, 4.0);
        assert_eq!(b.max_lon, 5.0);
    }

    #[test]
    fn bbox_contains_inclusive() {
        let b = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert!(b.contains(GeoPoint::from_degrees(0.0, 0.0)));
        assert!(b.contains(GeoPoint::from_degrees(1.0, 1.0)));
        assert!(b.contains(GeoPoint::from_degrees(0.5, 0.5)));
        assert!(!b.contains(GeoPoint::from_degrees(1.1, 0.5)));
    }

    #[test]
    fn bbox_around_has_margin() {
        let a = GeoPoint::from_degrees(0.0, 0.0);
        let b = GeoPoint::from_degrees(1.0, 2.0);
        let bx = BoundingBox::around(a, b, 1.5);
        // Span 1.0 lat / 2.0 lon, margin 1.5× → [-1.5, 2.5] × [-3.0, 5.0].
        assert!((bx.min_lat - -1.5).abs() < 1e-9);
        assert!((bx.max_lat - 2.5).abs() < 1e-9);
        assert!((bx.min_lon - -3.0).abs() < 1e-9);
        assert!((bx.max_lon - 5.0).abs() < 1e-9);
    }

    #[test]
    fn bbox_around_never_degenerates() {
        // Identical points: zero span, but the box must still have area.
        let p = GeoPoint::from_degrees(10.0, 10.0);
        let bx = BoundingBox::around(p, p, 1.5);
        assert!(bx.max_lat > bx.min_lat);
        assert!(bx.max_lon > bx.min_lon);
        assert!(bx.contains(p));
    }
}

#[cfg(test)]
mod tile {
    use crate::{BoundingBox, GeoPoint, TileKey, TILE_SIZE_DEG};

    #[test]
    fn key_is_deterministic() {
        let p = GeoPoint::from_degrees(48.137, 11.575);
        assert_eq!(TileKey::of(p), TileKey::of(p));
        let q = GeoPoint::from_degrees(48.137, 11.575);
        assert_eq!(TileKey::of(p), TileKey::of(q));
    }

    #[test]
    fn key_formula() {
        let p = GeoPoint::from_degrees(0.0, 0.0);
        let k = TileKey::of(p);
        assert_eq!(k.x, (180.0 / TILE_SIZE_DEG) as i32);
        assert_eq!(k.y, (90.0 / TILE_SIZE_DEG) as i32);
    }

    #[test]
    fn globe_fits_i16_directory_fields() {
        // The binary directory stores tile coordinates as i16; the extreme
        // corners of the globe must stay in range at the configured size.
        let k = TileKey::of(GeoPoint::from_degrees(89.999_999, 179.999_999));
        assert!(k.x <= i16::MAX as i32 && k.y <= i16::MAX as i32, "{k}");
        let k = TileKey::of(GeoPoint::from_degrees(-90.0, -180.0));
        assert_eq!((k.x, k.y), (0, 0));
    }

    #[test]
    fn point_is_inside_own_extent() {
        let p = GeoPoint::from_degrees(-12.345, 67.89);
        let e = TileKey::of(p).extent();
        assert!(e.contains(p));
        assert!((e.max_lat - e.min_lat - TILE_SIZE_DEG).abs() < 1e-9);
        assert!((e.max_lon - e.min_lon - TILE_SIZE_DEG).abs() < 1e-9);
    }

    #[test]
    fn intersects_bbox() {
        let k = TileKey::of(GeoPoint::from_degrees(0.01, 0.01));
        assert!(k.intersects(&BoundingBox::new(0.0, 0.0, 1.0, 1.0)));
        assert!(!k.intersects(&BoundingBox::new(10.0, 10.0, 11.0, 11.0)));
        // A bbox that merely touches the tile edge counts as intersecting.
        let e = k.extent();
        assert!(k.intersects(&BoundingBox::new(e.max_lat, e.max_lon, e.max_lat + 1.0, e.max_lon + 1.0)));
    }

    #[test]
    fn ring_is_nine_tiles_centred() {
        let k = TileKey { x: 100, y: 200 };
        let ring: Vec<_> = k.ring().collect();
        assert_eq!(ring.len(), 9);
        assert!(ring.contains(&k));
        assert!(ring.contains(&TileKey { x: 99, y: 199 }));
        assert!(ring.contains(&TileKey { x: 101, y: 201 }));
    }
}
