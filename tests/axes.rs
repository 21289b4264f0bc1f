use gapviz::models::Size;
use gapviz::scale::{Domain, LinearScale, ScaleModel};
use gapviz::viz::scene::{Element, Scene};
use gapviz::viz::{AxisRenderer, AxisSpec, TickFormat};

fn labels(scene: &Scene, axis: &AxisRenderer) -> Vec<String> {
    scene
        .select_class(axis.group(), "tick")
        .into_iter()
        .flat_map(|t| scene.children(t).to_vec())
        .filter_map(|c| scene.get(c).and_then(|n| n.text_content()).map(str::to_string))
        .collect()
}

#[test]
fn redrawing_does_not_duplicate_ticks() {
    let mut scene = Scene::new(Size::new(700.0, 300.0));
    let root = scene.root();
    let axis = AxisRenderer::new(&mut scene, root, AxisSpec::bottom(6, TickFormat::Integer));
    let scale = LinearScale::horizontal(Domain::new(2020.0, 2025.0), 600.0);
    axis.draw(&mut scene, &scale, 240.0);
    let first = axis.tick_count(&scene);
    let nodes = scene.len();
    axis.draw(&mut scene, &scale, 240.0);
    assert_eq!(axis.tick_count(&scene), first);
    assert_eq!(scene.len(), nodes);
    assert_eq!(labels(&scene, &axis), ["2020", "2021", "2022", "2023", "2024", "2025"]);
}

#[test]
fn ticks_follow_a_resized_scale() {
    let mut scene = Scene::new(Size::new(700.0, 300.0));
    let root = scene.root();
    let axis = AxisRenderer::new(&mut scene, root, AxisSpec::bottom(6, TickFormat::Integer));
    let mut scale = LinearScale::horizontal(Domain::new(2020.0, 2025.0), 600.0);
    axis.draw(&mut scene, &scale, 240.0);
    scale.invert_range(300.0);
    axis.draw(&mut scene, &scale, 240.0);
    let last = *scene.select_class(axis.group(), "tick").last().unwrap();
    assert_eq!(scene.get(last).unwrap().transform.translate.x, 300.0);
}

#[test]
fn silent_axis_keeps_tick_lines() {
    let mut scene = Scene::new(Size::new(700.0, 300.0));
    let root = scene.root();
    let axis = AxisRenderer::new(&mut scene, root, AxisSpec::left(5, TickFormat::Silent));
    axis.draw(&mut scene, &LinearScale::vertical(Domain::new(0.0, 150.0), 240.0), 0.0);
    assert!(axis.tick_count(&scene) >= 4);
    assert!(labels(&scene, &axis).iter().all(String::is_empty));
    let lines = scene
        .select_class(axis.group(), "tick")
        .into_iter()
        .flat_map(|t| scene.children(t).to_vec())
        .filter(|c| matches!(scene.get(*c).map(|n| &n.element), Some(Element::Line { .. })))
        .count();
    assert_eq!(lines, axis.tick_count(&scene));
}

#[test]
fn grouped_labels_use_the_locale() {
    let mut scene = Scene::new(Size::new(700.0, 300.0));
    let root = scene.root();
    let axis = AxisRenderer::new(
        &mut scene,
        root,
        AxisSpec::left(5, TickFormat::Grouped).with_locale("de"),
    );
    axis.draw(&mut scene, &LinearScale::vertical(Domain::new(0.0, 50_000.0), 240.0), 0.0);
    assert!(labels(&scene, &axis).contains(&"20.000".to_string()));
}
