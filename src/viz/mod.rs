//! Drawing: the retained scene graph, the renderers that write into it, and
//! export of a scene to **SVG** or **PNG**.
//!
//! - Axes with round-number ticks and locale-aware labels
//! - Series paths (linear or cardinal), gap areas, markers and labels
//! - Inline legend
//! - Export through plotters; backend chosen by file extension

pub mod axis;
pub mod curve;
pub mod legend;
pub mod scene;
pub mod text;
pub mod types;
pub mod util;

pub use axis::{AxisRenderer, AxisSpec};
pub use curve::{CurveRenderer, GapHandle, SeriesHandle, SeriesStyle};
pub use legend::{Legend, LegendEntry};
pub use scene::{Element, Node, NodeId, PathData, Scene, Style, Transform};
pub use types::{AxisOrient, TickFormat};

use crate::error::{Result, VizError};
use crate::models::Point;
use crate::viz_plotters_adapter::{fill_style, line_style, text_style};

use plotters::coord::Shift;
use plotters::prelude::*;

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;
use std::sync::Mutex;

/// Segments used to flatten one cubic curve for export.
const CURVE_STEPS: usize = 16;

static FONT_REGISTERED: Mutex<bool> = Mutex::new(false);

/// Register a TrueType font as "sans-serif" for bitmap text.
///
/// The `ab_glyph` text path does not discover OS fonts, so PNG export drops
/// text until a font is registered. SVG export does not need one. Only the
/// first successful call has an effect; a failed call leaves room for a retry.
pub fn register_font_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let bytes = std::fs::read(path.as_ref())?;
    let mut registered = FONT_REGISTERED
        .lock()
        .map_err(|_| VizError::Export("font registry poisoned".into()))?;
    if *registered {
        return Ok(());
    }
    let data: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font("sans-serif", plotters::style::FontStyle::Normal, data)
        .map_err(|_| VizError::Export("invalid font data".into()))?;
    *registered = true;
    Ok(())
}

fn export_err<E: std::fmt::Display>(e: E) -> VizError {
    VizError::Export(e.to_string())
}

fn pixel_dims(scene: &Scene) -> (u32, u32) {
    let size = scene.size();
    (
        (size.width.round() as u32).max(1),
        (size.height.round() as u32).max(1),
    )
}

/// Render a scene into an SVG document held in memory.
pub fn render_svg_string(scene: &Scene) -> Result<String> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, pixel_dims(scene)).into_drawing_area();
        draw_scene(&root, scene)?;
        root.present().map_err(export_err)?;
    }
    Ok(buf)
}

/// Write a scene to `out_path`: SVG for a `.svg` extension, PNG (bitmap) otherwise.
pub fn save<P: AsRef<Path>>(scene: &Scene, out_path: P) -> Result<()> {
    let out_path = out_path.as_ref();
    let dims = pixel_dims(scene);
    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(out_path, dims).into_drawing_area();
        draw_scene(&root, scene)?;
        root.present().map_err(export_err)?;
    } else {
        let root = BitMapBackend::new(out_path, dims).into_drawing_area();
        draw_scene(&root, scene)?;
        root.present().map_err(export_err)?;
    }
    log::info!("wrote {}", out_path.display());
    Ok(())
}

fn px(p: Point) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

/// Paint every node in draw order onto `root`.
pub fn draw_scene<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, scene: &Scene) -> Result<()> {
    root.fill(&WHITE).map_err(export_err)?;
    for (id, world) in scene.walk() {
        let Some(node) = scene.get(id) else {
            continue;
        };
        let style = &node.style;
        match &node.element {
            Element::Group => {}
            Element::Path(data) => {
                for (points, closed) in data.flatten(CURVE_STEPS) {
                    let mut pts: Vec<(i32, i32)> = points.iter().map(|p| px(world.apply(*p))).collect();
                    if closed {
                        if let Some(fill) = fill_style(style) {
                            root.draw(&Polygon::new(pts.clone(), fill)).map_err(export_err)?;
                        }
                        if let Some(first) = pts.first().copied() {
                            pts.push(first);
                        }
                    }
                    if let Some(stroke) = line_style(style, world.scale) {
                        root.draw(&PathElement::new(pts, stroke)).map_err(export_err)?;
                    }
                }
            }
            Element::Circle { center, radius } => {
                let c = px(world.apply(*center));
                let r = (radius * world.scale).round().max(0.0) as i32;
                if let Some(fill) = fill_style(style) {
                    root.draw(&Circle::new(c, r, fill)).map_err(export_err)?;
                }
                if let Some(stroke) = line_style(style, world.scale) {
                    root.draw(&Circle::new(c, r, stroke)).map_err(export_err)?;
                }
            }
            Element::Line { from, to } => {
                if let Some(stroke) = line_style(style, world.scale) {
                    let pts = vec![px(world.apply(*from)), px(world.apply(*to))];
                    root.draw(&PathElement::new(pts, stroke)).map_err(export_err)?;
                }
            }
            Element::Rect { origin, size } => {
                let a = world.apply(*origin);
                let b = world.apply(Point::new(origin.x + size.width, origin.y + size.height));
                if let Some(fill) = fill_style(style) {
                    root.draw(&Rectangle::new([px(a), px(b)], fill)).map_err(export_err)?;
                }
                if let Some(stroke) = line_style(style, world.scale) {
                    root.draw(&Rectangle::new([px(a), px(b)], stroke)).map_err(export_err)?;
                }
            }
            Element::Text {
                pos,
                content,
                anchor,
                rotate,
            } => {
                if content.is_empty() {
                    continue;
                }
                let ts = text_style(style, *anchor, *rotate, world.scale);
                let text = Text::new(content.clone(), px(world.apply(*pos)), ts);
                // Without a registered font the bitmap backend cannot draw text.
                if let Err(e) = root.draw(&text) {
                    log::debug!("skipping text {content:?}: {e}");
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::models::Size;

    #[test]
    fn svg_contains_drawn_shapes() {
        let mut scene = Scene::new(Size::new(200.0, 100.0));
        let root = scene.root();
        scene.append(
            root,
            Node::circle(Point::new(50.0, 50.0), 10.0).with_style(Style::filled(Color::BLUE)),
        );
        scene.append(
            root,
            Node::text(Point::new(10.0, 10.0), "Hello", scene::Anchor::Start)
                .with_style(Style::text(Color::BLACK, 12.0)),
        );
        let svg = render_svg_string(&scene).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("<circle"));
        assert!(svg.contains("Hello"));
    }

    #[test]
    fn bad_font_does_not_block_later_registration() {
        let dir = tempfile::tempdir().unwrap();
        let junk = dir.path().join("junk.ttf");
        std::fs::write(&junk, b"not a font").unwrap();
        assert!(matches!(register_font_file(&junk), Err(VizError::Export(_))));
        assert!(matches!(register_font_file(&junk), Err(VizError::Export(_))));
        assert!(matches!(
            register_font_file(dir.path().join("missing.ttf")),
            Err(VizError::Io(_))
        ));
    }

    #[test]
    fn empty_text_is_not_emitted() {
        let mut scene = Scene::new(Size::new(50.0, 50.0));
        let root = scene.root();
        scene.append(root, Node::text(Point::new(1.0, 1.0), "", scene::Anchor::Start));
        let svg = render_svg_string(&scene).unwrap();
        assert!(!svg.contains("<text"));
    }
}
