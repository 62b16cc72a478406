use super::*;
use crate::geo::boundaries::CountryShape;

#[test]
fn natural_earth_origin_and_symmetry() {
    let o = natural_earth(0.0, 0.0);
    assert_eq!((o.x, o.y), (0.0, 0.0));

    let east = natural_earth(90.0, 30.0);
    let west = natural_earth(-90.0, -30.0);
    assert!((east.x + west.x).abs() < 1e-12);
    assert!((east.y + west.y).abs() < 1e-12);

    let edge = natural_earth(180.0, 0.0);
    assert!((edge.x - 0.8707 * std::f64::consts::PI).abs() < 1e-9);
}

#[test]
fn fit_keeps_globe_inside_rect() {
    let rect = Rect::new(10.0, 20.0, 410.0, 220.0);
    let proj = Projection::fit(rect);
    for (lon, lat) in [(-180.0, 0.0), (180.0, 0.0), (0.0, 90.0), (0.0, -90.0), (-180.0, 85.0)] {
        let p = proj.project(lon, lat);
        assert!(p.x >= rect.x0 - 1e-6 && p.x <= rect.x1 + 1e-6, "{lon},{lat} -> {p:?}");
        assert!(p.y >= rect.y0 - 1e-6 && p.y <= rect.y1 + 1e-6, "{lon},{lat} -> {p:?}");
    }
    let c = proj.project(0.0, 0.0);
    assert!((c.x - rect.center().x).abs() < 1e-9);
    assert!((c.y - rect.center().y).abs() < 1e-9);
    // north is up
    assert!(proj.project(0.0, 45.0).y < c.y);
}

#[test]
fn shape_path_closes_every_ring() {
    let square = vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(0.0, 10.0),
    ];
    let shape = CountryShape {
        id: Some("SQ".into()),
        name: None,
        polygons: vec![vec![square.clone()], vec![square]],
    };
    let path = Projection::fit(Rect::new(0.0, 0.0, 200.0, 100.0)).shape_path(&shape);
    let closes = path
        .elements()
        .iter()
        .filter(|e| matches!(e, kurbo::PathEl::ClosePath))
        .count();
    assert_eq!(closes, 2);
}
