use gapviz::geo::{GeoPoint, ProjectionKind};
use gapviz::models::Size;
use gapviz::scale::{Domain, GeoScale, LinearScale, PlotScales, ScaleModel};

#[test]
fn values_in_domain_map_into_range_monotonically() {
    for (lo, hi, len) in [(2020.0, 2025.0, 600.0), (-50.0, 50.0, 123.0), (0.0, 1e-6, 10.0)] {
        let s = LinearScale::horizontal(Domain::new(lo, hi), len);
        let mut prev = f64::NEG_INFINITY;
        for i in 0..=100 {
            let v = lo + (hi - lo) * i as f64 / 100.0;
            let px = s.map(v);
            assert!((0.0..=len).contains(&px), "{v} -> {px}");
            assert!(px >= prev);
            prev = px;
        }
    }
}

#[test]
fn degenerate_domain_maps_to_range_start() {
    let s = LinearScale::new(Domain::new(7.0, 7.0), (40.0, 400.0));
    for v in [7.0, -1e9, 0.0, 1e9, f64::NAN, f64::INFINITY] {
        assert_eq!(s.map(v), 40.0);
    }
}

#[test]
fn malformed_domain_falls_back_to_unit() {
    assert_eq!(Domain::new(5.0, 1.0), Domain::UNIT);
    assert_eq!(Domain::new(f64::NAN, 1.0), Domain::UNIT);
    let s = LinearScale::horizontal(Domain::new(10.0, 0.0), 100.0);
    assert_eq!(s.map(0.5), 50.0);
}

#[test]
fn vertical_scales_keep_their_orientation_on_resize() {
    let mut s = LinearScale::vertical(Domain::new(0.0, 150.0), 240.0);
    assert_eq!(s.map(0.0), 240.0);
    s.invert_range(120.0);
    assert_eq!(s.map(0.0), 120.0);
    assert_eq!(s.map(150.0), 0.0);
}

#[test]
fn plot_scales_resize_both_axes() {
    let mut p = PlotScales::new(Domain::new(2020.0, 2025.0), Domain::new(0.0, 150.0), Size::new(600.0, 240.0));
    p.invert_range(Size::new(300.0, 120.0));
    assert_eq!(p.x.map(2025.0), 300.0);
    assert_eq!(p.y.map(150.0), 0.0);
    assert_eq!(p.plot_size(), Size::new(300.0, 120.0));
}

#[test]
fn world_projection_fits_the_container() {
    for kind in [ProjectionKind::NaturalEarth, ProjectionKind::EqualEarth] {
        let mut g = GeoScale::world(kind, Size::new(960.0, 500.0));
        for lon in [-180.0, -90.0, 0.0, 90.0, 180.0] {
            for lat in [-90.0, -45.0, 0.0, 45.0, 90.0] {
                let p = g.scale(GeoPoint::new(lon, lat));
                assert!(p.x.is_finite() && p.y.is_finite());
                assert!(p.x >= -1e-6 && p.x <= 960.0 + 1e-6, "{kind:?} x {}", p.x);
                assert!(p.y >= -1e-6 && p.y <= 500.0 + 1e-6, "{kind:?} y {}", p.y);
            }
        }
        let origin = g.scale(GeoPoint::new(0.0, 0.0));
        g.invert_range(Size::new(480.0, 250.0));
        let half = g.scale(GeoPoint::new(0.0, 0.0));
        assert!((half.x - origin.x / 2.0).abs() < 1e-6);
        assert!((half.y - origin.y / 2.0).abs() < 1e-6);
    }
}
