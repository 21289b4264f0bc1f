use gapviz::charts::{ChartData, ChartKind, Surface};
use gapviz::geo::StaticSource;
use gapviz::models::Size;
use gapviz::viz::{render_svg_string, save};
use gapviz::{Host, Options, datasets};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn mounted(kind: ChartKind) -> (Host, gapviz::MountHandle) {
    let mut host = Host::new(Size::new(680.0, 600.0));
    let data = datasets::sample(kind, Arc::new(StaticSource::default()));
    let handle = host.mount(Surface::for_chart(kind, 680.0), data, &Options::default());
    host.settle(Duration::from_secs(5));
    host.run_until_idle(1000);
    (host, handle)
}

#[test]
fn growth_chart_exports_to_svg() {
    let (host, handle) = mounted(ChartKind::Growth);
    let svg = render_svg_string(host.scene(handle).unwrap()).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("width=\"680\""));
    assert!(svg.contains("AI Advancement"));
    assert!(svg.contains("2025"));
}

#[test]
fn bubbles_export_circles_and_labels() {
    let (host, handle) = mounted(ChartKind::Bubbles);
    let svg = render_svg_string(host.scene(handle).unwrap()).unwrap();
    assert_eq!(svg.matches("<circle").count(), 12);
    assert!(svg.contains("65%"));
}

#[test]
fn save_picks_backend_by_extension() {
    let dir = tempdir().unwrap();
    let (host, handle) = mounted(ChartKind::Growth);
    let scene = host.scene(handle).unwrap();

    let svg = dir.path().join("growth.svg");
    save(scene, &svg).unwrap();
    let text = std::fs::read_to_string(&svg).unwrap();
    assert!(text.contains("<svg"));

    let png = dir.path().join("growth.png");
    save(scene, &png).unwrap();
    let bytes = std::fs::read(&png).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn empty_map_still_exports() {
    let (host, handle) = mounted(ChartKind::WorldMap);
    let scene = host.scene(handle).unwrap();
    assert_eq!(scene.count_class("region"), 0);
    let svg = render_svg_string(scene).unwrap();
    assert!(svg.contains("<svg"));
}
