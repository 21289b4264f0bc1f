use gapviz::choropleth::ChoroplethRenderer;
use gapviz::color::{Color, ColorBuckets};
use gapviz::geo::{GeoPoint, ProjectionKind, Region, parse_regions};
use gapviz::models::{Point, ScoreTable, Size, ViewTransform};
use gapviz::scale::GeoScale;
use gapviz::viz::scene::Scene;

fn square(code: &str, name: &str, lon: f64, lat: f64) -> Region {
    Region {
        code: code.to_string(),
        name: name.to_string(),
        polygons: vec![vec![vec![
            GeoPoint::new(lon, lat),
            GeoPoint::new(lon + 15.0, lat),
            GeoPoint::new(lon + 15.0, lat + 15.0),
            GeoPoint::new(lon, lat + 15.0),
        ]]],
    }
}

fn mounted(scene: &mut Scene, scores: ScoreTable) -> ChoroplethRenderer {
    let root = scene.root();
    let scale = GeoScale::world(ProjectionKind::NaturalEarth, scene.size());
    let mut map = ChoroplethRenderer::new(scene, root, scale, scores, ColorBuckets::default(), [1.0, 8.0]);
    map.set_regions(
        scene,
        vec![
            square("USA", "United States", -100.0, 30.0),
            square("DEU", "Germany", 5.0, 45.0),
            square("ATA", "Antarctica", 0.0, -85.0),
        ],
    );
    map
}

fn scores() -> ScoreTable {
    [("USA", 68.0), ("DEU", 70.0)].into_iter().collect()
}

#[test]
fn fast_hover_leaves_one_tooltip_for_the_last_region() {
    let mut scene = Scene::new(Size::new(960.0, 500.0));
    let mut map = mounted(&mut scene, scores());
    map.pointer_enter(&mut scene, 0);
    map.pointer_enter(&mut scene, 1);
    assert_eq!(scene.count_class("tooltip"), 1);
    let tip = map.tooltip().unwrap();
    assert_eq!(scene.get(tip).unwrap().text_content(), Some("Germany: 70%"));
    assert_eq!(map.hovered().map(|r| r.code.as_str()), Some("DEU"));

    // The late leave for the first region must not touch the current hover.
    map.pointer_leave(&mut scene, 0);
    assert_eq!(scene.count_class("tooltip"), 1);
    map.pointer_leave(&mut scene, 1);
    assert_eq!(scene.count_class("tooltip"), 0);
}

#[test]
fn hover_thickens_and_restores_the_border() {
    let mut scene = Scene::new(Size::new(960.0, 500.0));
    let mut map = mounted(&mut scene, scores());
    let node = map.region_node(0).unwrap();
    map.pointer_enter(&mut scene, 0);
    assert_eq!(scene.get(node).unwrap().style.stroke, Some(Color::BLACK));
    assert_eq!(scene.get(node).unwrap().style.stroke_width, 1.5);
    map.pointer_enter(&mut scene, 1);
    assert_eq!(scene.get(node).unwrap().style.stroke, Some(Color::WHITE));
    assert_eq!(scene.get(node).unwrap().style.stroke_width, 0.5);
}

#[test]
fn unknown_codes_get_the_no_data_colour() {
    let mut scene = Scene::new(Size::new(960.0, 500.0));
    let map = mounted(&mut scene, scores());
    let node = map.region_node(2).unwrap();
    assert_eq!(scene.get(node).unwrap().style.fill, Some(Color::NEUTRAL));
    assert_eq!(map.fill_for("NOPE"), Color::NEUTRAL);
    assert_eq!(map.fill_for("deu"), Color::GREEN);
}

#[test]
fn pan_and_zoom_move_one_group_transform() {
    let mut scene = Scene::new(Size::new(960.0, 500.0));
    let mut map = mounted(&mut scene, scores());
    let before: Vec<_> = (0..3).map(|i| scene.get(map.region_node(i).unwrap()).unwrap().clone()).collect();
    map.zoom_by(&mut scene, 3.0, Point::new(480.0, 250.0));
    map.pan_by(&mut scene, 25.0, -10.0);
    let after: Vec<_> = (0..3).map(|i| scene.get(map.region_node(i).unwrap()).unwrap().clone()).collect();
    assert_eq!(before, after);
    let group = scene.get(map.group()).unwrap().transform;
    assert_eq!(group.scale, 3.0);
    assert_eq!(map.view().scale, 3.0);

    map.set_view(&mut scene, ViewTransform { translate_x: 0.0, translate_y: 0.0, scale: 0.2 });
    assert_eq!(map.view().scale, 1.0);
}

#[test]
fn resize_reprojects_in_place() {
    let mut scene = Scene::new(Size::new(960.0, 500.0));
    let mut map = mounted(&mut scene, scores());
    map.pointer_enter(&mut scene, 0);
    let nodes = scene.len();
    let node = map.region_node(0).unwrap();
    let before = scene.get(node).unwrap().element.clone();
    map.resize(&mut scene, Size::new(480.0, 250.0));
    assert_eq!(scene.len(), nodes);
    assert_ne!(scene.get(node).unwrap().element, before);
    assert_eq!(scene.count_class("tooltip"), 1);
}

#[test]
fn geojson_regions_resolve_codes() {
    let doc = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "id": "276", "properties": { "name": "Germany" },
              "geometry": { "type": "Polygon", "coordinates": [[[5,47],[15,47],[15,55],[5,55],[5,47]]] } },
            { "type": "Feature", "properties": { "name": "Nowhere" },
              "geometry": { "type": "Point", "coordinates": [0, 0] } }
        ]
    }"#;
    let regions = parse_regions(doc.as_bytes()).unwrap();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].code, "DEU");
    assert_eq!(regions[0].name, "Germany");
}

#[test]
fn garbage_geometry_is_an_error_not_a_panic() {
    assert!(parse_regions(b"not json").is_err());
    assert!(parse_regions(br#"{"type":"Sphere"}"#).is_err());
}

#[test]
fn quantized_topology_decodes_shared_arcs() {
    // Two squares sharing the edge x=10; arc 1 is the shared edge.
    let doc = r#"{
        "type": "Topology",
        "transform": { "scale": [1, 1], "translate": [0, 40] },
        "arcs": [
            [[10, 0], [-10, 0], [0, 10], [10, 0]],
            [[10, 10], [0, -10]],
            [[10, 10], [10, 0], [0, -10], [-10, 0]]
        ],
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    { "type": "Polygon", "id": 250, "arcs": [[0, 1]], "properties": { "name": "France" } },
                    { "type": "Polygon", "id": "276", "arcs": [[2, -2]], "properties": { "name": "Germany" } },
                    { "type": null }
                ]
            }
        }
    }"#;
    let regions = parse_regions(doc.as_bytes()).unwrap();
    let codes: Vec<_> = regions.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, ["FRA", "DEU"]);
    let france = &regions[0].polygons[0][0];
    assert_eq!(france[0], GeoPoint::new(10.0, 40.0));
    assert_eq!(france[1], GeoPoint::new(0.0, 40.0));
    assert!(france.contains(&GeoPoint::new(10.0, 50.0)));
    let germany = &regions[1].polygons[0][0];
    assert!(germany.contains(&GeoPoint::new(20.0, 50.0)));
}

#[test]
fn tooltip_shows_the_score_as_given() {
    let mut scene = Scene::new(Size::new(960.0, 500.0));
    let scores: ScoreTable = [("USA", 75.5), ("DEU", 70.0)].into_iter().collect();
    let mut map = mounted(&mut scene, scores);
    map.pointer_enter(&mut scene, 0);
    let tip = map.tooltip().unwrap();
    assert_eq!(scene.get(tip).unwrap().text_content(), Some("United States: 75.5%"));
}
