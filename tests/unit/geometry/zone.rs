use super::*;

fn square_zone() -> ExclusionZone {
    ExclusionZone::Polygon {
        vertices: vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ],
    }
}

#[test]
fn convex_polygon_centroid_is_inside() {
    let z = square_zone();
    assert!(z.contains_point(5.0, 5.0));
    assert!(!z.contains_point(500.0, -300.0));
    assert!(!z.contains_point(-0.5, 5.0));
}

#[test]
fn concave_polygon_notch_is_outside() {
    // U shape opening upwards; the notch spans x in (3, 7), y in [0, 6).
    let z = ExclusionZone::Polygon {
        vertices: vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 6.0),
            Point::new(7.0, 6.0),
            Point::new(7.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ],
    };
    assert!(!z.contains_point(5.0, 3.0));
    assert!(z.contains_point(1.5, 3.0));
    assert!(z.contains_point(8.5, 3.0));
    assert!(z.contains_point(5.0, 8.0));
}

#[test]
fn polygon_with_fewer_than_three_vertices_contains_nothing() {
    let z = ExclusionZone::Polygon {
        vertices: vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)],
    };
    assert!(!z.contains_point(2.5, 2.5));
}

#[test]
fn ellipse_uses_normalized_distance() {
    let z = ExclusionZone::Ellipse {
        center: Point::new(50.0, 20.0),
        rx: 10.0,
        ry: 5.0,
    };
    assert!(z.contains_point(50.0, 20.0));
    assert!(z.contains_point(60.0, 20.0));
    assert!(z.contains_point(50.0, 25.0));
    assert!(!z.contains_point(58.0, 24.0));
    assert!(!z.contains_point(61.0, 20.0));
}

#[test]
fn zero_radius_ellipse_is_empty() {
    let z = ExclusionZone::Ellipse {
        center: Point::new(0.0, 0.0),
        rx: 0.0,
        ry: 3.0,
    };
    assert!(!z.contains_point(0.0, 0.0));
}

#[test]
fn ellipse_in_region_fills_its_box() {
    let z = ExclusionZone::ellipse_in(Rect::new(10.0, 10.0, 30.0, 20.0));
    assert_eq!(
        z,
        ExclusionZone::Ellipse {
            center: Point::new(20.0, 15.0),
            rx: 10.0,
            ry: 5.0
        }
    );
    assert_eq!(z.bounds(), Rect::new(10.0, 10.0, 30.0, 20.0));
}

#[test]
fn rect_zone_is_half_open() {
    let z = ExclusionZone::Rect {
        rect: Rect::new(0.0, 0.0, 4.0, 4.0),
    };
    assert!(z.contains_point(0.0, 0.0));
    assert!(!z.contains_point(4.0, 2.0));
}

#[test]
fn zone_set_checks_all_and_recomputes() {
    let mut set: ZoneSet = [square_zone()].into_iter().collect();
    assert_eq!(set.len(), 1);
    assert!(set.contains_point(5.0, 5.0));
    assert!(set.may_intersect(Rect::new(8.0, 8.0, 12.0, 12.0)));
    assert!(!set.may_intersect(Rect::new(20.0, 20.0, 30.0, 30.0)));

    set.recompute(vec![ExclusionZone::ellipse_in(Rect::new(100.0, 100.0, 120.0, 120.0))]);
    assert!(!set.contains_point(5.0, 5.0));
    assert!(set.contains_point(110.0, 110.0));

    set.recompute(Vec::new());
    assert!(set.is_empty());
}

#[test]
fn zones_deserialize_from_tagged_json() {
    let z: ExclusionZone = serde_json::from_value(serde_json::json!({
        "kind": "ellipse",
        "center": { "x": 1.0, "y": 2.0 },
        "rx": 3.0,
        "ry": 4.0
    }))
    .unwrap();
    assert!(z.contains_point(1.0, 2.0));
}

#[test]
fn union_bounds_covers_every_zone() {
    assert!(ZoneSet::default().union_bounds().is_none());
    let set = ZoneSet::new(vec![
        square_zone(),
        ExclusionZone::Rect {
            rect: Rect::new(30.0, 40.0, 50.0, 60.0),
        },
    ]);
    assert_eq!(set.union_bounds(), Some(Rect::new(0.0, 0.0, 50.0, 60.0)));
}
