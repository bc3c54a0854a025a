use super::*;

fn square() -> Polygon {
    Polygon::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]).unwrap()
}

#[test]
fn arc_length_table_for_square() {
    let sq = square();
    assert_eq!(sq.cumulative_lengths(), &[0.0, 10.0, 20.0, 30.0, 40.0]);
    assert_eq!(sq.perimeter(), 40.0);
    assert_eq!(sq.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
}

#[test]
fn progress_zero_is_first_vertex_exactly() {
    assert_eq!(square().point_at_progress(0.0), Point::new(0.0, 0.0));
}

#[test]
fn eighth_lands_mid_first_edge() {
    assert_eq!(square().point_at_progress(0.125), Point::new(5.0, 0.0));
}

#[test]
fn quarter_lands_on_second_vertex() {
    assert_eq!(square().point_at_progress(0.25), Point::new(10.0, 0.0));
    assert_eq!(square().point_at_progress(0.5), Point::new(10.0, 10.0));
    assert_eq!(square().point_at_progress(0.625), Point::new(5.0, 10.0));
}

#[test]
fn progress_is_periodic() {
    let sq = square();
    for p in [0.1, 0.37, 0.8] {
        let a = sq.point_at_progress(p);
        let b = sq.point_at_progress(p + 1.0);
        let c = sq.point_at_progress(p - 3.0);
        assert!(a.distance(b) < 1e-9);
        assert!(a.distance(c) < 1e-9);
    }
}

#[test]
fn closing_edge_approaches_first_vertex() {
    let p = square().point_at_progress(1.0 - 1e-9);
    assert!(p.distance(Point::new(0.0, 0.0)) < 1e-6);
}

#[test]
fn too_few_vertices_is_degenerate() {
    let err = Polygon::new(vec![Point::new(1.0, 1.0)]).unwrap_err();
    assert!(err.is_degenerate_polygon());
    let err = Polygon::new(vec![]).unwrap_err();
    assert!(err.is_degenerate_polygon());
}

#[test]
fn zero_perimeter_is_degenerate() {
    let err = Polygon::from_xy(&[(3.0, 3.0), (3.0, 3.0), (3.0, 3.0)]).unwrap_err();
    assert!(err.is_degenerate_polygon());
}

#[test]
fn non_finite_vertex_is_rejected() {
    let err = Polygon::from_xy(&[(0.0, 0.0), (f64::NAN, 1.0), (1.0, 1.0)]).unwrap_err();
    assert!(matches!(err, RevealError::Validation(_)));
}

#[test]
fn two_vertex_polygon_runs_there_and_back() {
    let line = Polygon::from_xy(&[(0.0, 0.0), (10.0, 0.0)]).unwrap();
    assert_eq!(line.perimeter(), 20.0);
    assert_eq!(line.point_at_progress(0.25), Point::new(5.0, 0.0));
    assert_eq!(line.point_at_progress(0.75), Point::new(5.0, 0.0));
}

#[test]
fn zero_length_edges_are_skipped() {
    let poly = Polygon::from_xy(&[(0.0, 0.0), (0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]).unwrap();
    assert_eq!(poly.point_at_progress(0.0), Point::new(0.0, 0.0));
    let p = poly.point_at_distance(4.0);
    assert_eq!(p, Point::new(4.0, 0.0));
}

#[test]
fn distance_to_boundary_is_zero_on_edges() {
    let sq = square();
    assert!(sq.distance_to_boundary(Point::new(10.0, 3.0)) < 1e-12);
    assert!((sq.distance_to_boundary(Point::new(5.0, 5.0)) - 5.0).abs() < 1e-12);
}

#[test]
fn bez_path_is_closed_svg() {
    let svg = square().to_bez_path().to_svg();
    assert!(svg.starts_with('M'));
    assert!(svg.ends_with('Z'));
}
