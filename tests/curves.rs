use gapviz::charts::{GrowthChart, GrowthData, Sizing, Surface, Visualization};
use gapviz::color::Color;
use gapviz::config::{Interpolation, Options};
use gapviz::models::{Point, Series, Size};
use gapviz::scale::{Domain, PlotScales, ScaleModel};
use gapviz::viz::curve::{cardinal, linear};
use gapviz::viz::scene::{Element, PathSeg, Scene, Style};
use gapviz::viz::{CurveRenderer, SeriesStyle};

fn series_a() -> Series {
    Series::from_xy(
        "A",
        &[(2020.0, 30.0), (2021.0, 40.0), (2022.0, 55.0), (2023.0, 75.0), (2024.0, 100.0), (2025.0, 130.0)],
    )
}

fn series_b() -> Series {
    Series::from_xy(
        "B",
        &[(2020.0, 25.0), (2021.0, 30.0), (2022.0, 35.0), (2023.0, 40.0), (2024.0, 45.0), (2025.0, 50.0)],
    )
}

fn marker_xs(scene: &Scene, ids: &[gapviz::viz::NodeId]) -> Vec<f64> {
    ids.iter()
        .map(|id| match scene.get(*id).map(|n| &n.element) {
            Some(Element::Circle { center, .. }) => center.x,
            other => panic!("not a circle: {other:?}"),
        })
        .collect()
}

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "{actual:?} != {expected:?}");
    }
}

#[test]
fn reference_scenario_at_600_then_300_px() {
    let mut scene = Scene::new(Size::new(600.0, 240.0));
    let root = scene.root();
    let mut scales = PlotScales::new(
        Domain::new(2020.0, 2025.0),
        Domain::new(0.0, 150.0),
        Size::new(600.0, 240.0),
    );
    assert_eq!(scales.x.map(2020.0), 0.0);
    assert_eq!(scales.x.map(2025.0), 600.0);

    let curves = CurveRenderer::new(root);
    let (a, b) = (series_a(), series_b());
    let mut ha = curves.draw_series(
        &mut scene,
        &a,
        &SeriesStyle::new(Color::BLUE, Interpolation::Smoothed),
        &scales,
    );
    let hb = curves.draw_series(
        &mut scene,
        &b,
        &SeriesStyle::new(Color::GREEN, Interpolation::Linear),
        &scales,
    );
    let gap = curves.draw_gap_area(&mut scene, &a, &b, Style::filled(Color::RED), &scales);
    curves.draw_markers(&mut scene, &mut ha, 5.0, Color::BLUE, &scales);

    let (top, bottom) = gap.pixel_span(2025.0, &scales).unwrap();
    assert_eq!(top, scales.y.map(130.0));
    assert_eq!(bottom, scales.y.map(50.0));
    assert_close(&marker_xs(&scene, ha.markers()), &[0.0, 120.0, 240.0, 360.0, 480.0, 600.0]);

    let nodes = scene.len();
    scales.invert_range(Size::new(300.0, 240.0));
    curves.update_path(&mut scene, &ha, &scales);
    curves.update_path(&mut scene, &hb, &scales);
    curves.update_gap(&mut scene, &gap, &scales);

    assert_eq!(scales.x.map(2025.0), 300.0);
    assert_close(&marker_xs(&scene, ha.markers()), &[0.0, 60.0, 120.0, 180.0, 240.0, 300.0]);
    assert_eq!(scene.len(), nodes);
    let Some(Element::Path(d)) = hb.path().and_then(|p| scene.get(p)).map(|n| &n.element) else {
        panic!("series B has no path");
    };
    assert_eq!(d.segments().last(), Some(&PathSeg::LineTo(Point::new(300.0, scales.y.map(50.0)))));
}

#[test]
fn growth_chart_resize_matches_the_reference_scenario() {
    let mut data = GrowthData::pair(series_a(), series_b());
    data.y_domain = Some([0.0, 150.0]);
    // 600 px plot + 80 px of side margins.
    let surface = Surface::new(Size::new(680.0, 300.0), Sizing::FillWidth { height: 300.0 });
    let mut chart = GrowthChart::new(surface, data, &Options::default());
    assert_eq!(chart.scales().x.map(2025.0), 600.0);
    let nodes = chart.scene().len();

    chart.resize(Size::new(380.0, 1000.0));
    assert_eq!(chart.scales().x.map(2025.0), 300.0);
    assert_eq!(chart.scene().len(), nodes);
    let xs = marker_xs(chart.scene(), chart.primary().markers());
    assert_eq!(xs.last(), Some(&300.0));
    let (top, bottom) = chart.gap().unwrap().pixel_span(2025.0, chart.scales()).unwrap();
    assert_eq!((top, bottom), (chart.scales().y.map(130.0), chart.scales().y.map(50.0)));
}

#[test]
fn gap_direction_follows_the_data() {
    let a = Series::from_xy("a", &[(0.0, 10.0), (1.0, 0.0)]);
    let b = Series::from_xy("b", &[(0.0, 0.0), (1.0, 10.0)]);
    let mut scene = Scene::new(Size::new(100.0, 100.0));
    let scales = PlotScales::new(Domain::new(0.0, 1.0), Domain::new(0.0, 10.0), Size::new(100.0, 100.0));
    let gap = CurveRenderer::new(scene.root()).draw_gap_area(&mut scene, &a, &b, Style::default(), &scales);
    assert_eq!(gap.pixel_span(0.0, &scales), Some((0.0, 100.0)));
    assert_eq!(gap.pixel_span(1.0, &scales), Some((0.0, 100.0)));
}

#[test]
fn short_series_draw_markers_but_no_path() {
    let mut scene = Scene::new(Size::new(100.0, 100.0));
    let scales = PlotScales::new(Domain::new(0.0, 1.0), Domain::new(0.0, 1.0), Size::new(100.0, 100.0));
    let curves = CurveRenderer::new(scene.root());
    let one = Series::from_xy("one", &[(0.5, 0.5)]);
    let mut h = curves.draw_series(&mut scene, &one, &SeriesStyle::new(Color::BLUE, Interpolation::Smoothed), &scales);
    curves.draw_markers(&mut scene, &mut h, 3.0, Color::BLUE, &scales);
    assert!(h.path().is_none());
    assert_eq!(scene.count_class("line"), 0);
    assert_eq!(scene.count_class("marker"), 1);
}

#[test]
fn smoothed_curve_passes_through_points_within_bounds() {
    let pts = [
        Point::new(0.0, 200.0),
        Point::new(100.0, 0.0),
        Point::new(200.0, 200.0),
        Point::new(300.0, 0.0),
    ];
    let d = cardinal(&pts, 0.0, (0.0, 200.0));
    let ends: Vec<Point> = d
        .segments()
        .iter()
        .map(|s| match s {
            PathSeg::MoveTo(p) | PathSeg::LineTo(p) => *p,
            PathSeg::CubicTo(_, _, p) => *p,
            PathSeg::Close => panic!("open path expected"),
        })
        .collect();
    assert_eq!(ends, pts);
    for s in d.segments() {
        if let PathSeg::CubicTo(c1, c2, _) = s {
            assert!((0.0..=200.0).contains(&c1.y) && (0.0..=200.0).contains(&c2.y));
        }
    }
    assert_eq!(linear(&pts).segments().len(), 4);
}
