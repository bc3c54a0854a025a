use super::*;

fn square() -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(0.0, 10.0),
    ]
}

#[test]
fn degenerate_boundary_is_rejected() {
    let err = BoundaryTrace::new(
        vec![Point::new(3.0, 3.0), Point::new(3.0, 3.0)],
        DEFAULT_TRACE_CYCLE_MS,
        TraceOpts::default(),
        None,
    )
    .unwrap_err();
    assert!(err.is_degenerate_polygon());
    assert!(BoundaryTrace::new(square(), 0.0, TraceOpts::default(), None).is_err());
}

#[test]
fn tick_follows_the_clock() {
    let mut t = BoundaryTrace::new(square(), 4_000.0, TraceOpts::default(), None).unwrap();
    assert!(t.tick(0.0).is_none());
    t.start(500.0);
    let f = t.tick(1_500.0).unwrap();
    assert_eq!(f.progress, 0.25);
    assert_eq!(f.marker, Point::new(10.0, 0.0));
    assert_eq!(f.trail.first().map(|tp| tp.point), Some(f.marker));

    t.stop();
    assert!(!t.is_running());
    assert!(t.tick(2_000.0).is_none());
}

#[test]
fn fixed_length_trail_fades_by_distance() {
    let t = BoundaryTrace::new(square(), 4_000.0, TraceOpts::default(), Some(15.0)).unwrap();
    let f = t.frame_at(1_000.0);
    let pts: Vec<Point> = f.trail.iter().map(|tp| tp.point).collect();
    assert_eq!(
        pts,
        vec![
            Point::new(10.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 5.0)
        ]
    );
    assert_eq!(f.trail[0].alpha, 1.0);
    assert!((f.trail[1].alpha - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(f.trail[2].alpha, 0.0);
}

#[test]
fn svg_path_is_an_open_polyline() {
    let t = BoundaryTrace::new(square(), 4_000.0, TraceOpts::default(), Some(15.0)).unwrap();
    let d = t.frame_at(1_000.0).to_svg_path();
    assert!(d.starts_with("M10"), "{d}");
    assert_eq!(d.matches('L').count(), 2);
    assert!(!d.contains('Z'));
}

#[test]
fn stroke_lights_pixels_along_the_trail_only() {
    let t = BoundaryTrace::new(
        vec![
            Point::new(2.0, 2.0),
            Point::new(18.0, 2.0),
            Point::new(18.0, 18.0),
            Point::new(2.0, 18.0),
        ],
        4_000.0,
        TraceOpts::default(),
        Some(10.0),
    )
    .unwrap();
    let f = t.frame_at(1_000.0);
    assert_eq!(f.marker, Point::new(18.0, 2.0));

    let mut s = Surface::new(20, 20);
    let white = Rgba8Premul::from_straight_rgba(255, 255, 255, 255);
    f.stroke_onto(&mut s, white, 2.0);
    assert_eq!(s.pixel(17, 1), Some([255, 255, 255, 255]));
    assert!(s.pixel(12, 1).unwrap()[0] > 0);
    assert_eq!(s.pixel(10, 10), Some([0, 0, 0, 255]));
    assert_eq!(s.pixel(2, 17), Some([0, 0, 0, 255]));

    let mut untouched = Surface::new(20, 20);
    f.stroke_onto(&mut untouched, white, 0.0);
    assert_eq!(untouched.revealed_fraction(), 0.0);
}
