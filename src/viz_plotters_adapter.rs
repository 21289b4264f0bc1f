//! Adapter helpers to turn scene styles into plotters styles.
//!
//! ```ignore
//!     use crate::viz_plotters_adapter::{fill_style, line_style};
//!
//!     if let Some(fill) = fill_style(&node.style) {
//!         root.draw(&Polygon::new(points.clone(), fill))?;
//!     }
//!     if let Some(stroke) = line_style(&node.style, world.scale) {
//!         root.draw(&PathElement::new(points, stroke))?;
//!     }
//! ```

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, FontTransform};

use crate::color::Color;
use crate::viz::scene::{Anchor, Style};

pub fn rgb_color(color: Color) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

/// Stroke style, or `None` when the style has no stroke.
/// Widths are scaled by the node's accumulated zoom and never drop below one pixel.
pub fn line_style(style: &Style, zoom: f64) -> Option<ShapeStyle> {
    let color = style.stroke?;
    let width = (style.stroke_width * zoom).round().max(1.0) as u32;
    Some(ShapeStyle {
        color: rgb_color(color).to_rgba(),
        filled: false,
        stroke_width: width,
    })
}

/// Fill style honouring fill opacity, or `None` when the style has no fill.
pub fn fill_style(style: &Style) -> Option<ShapeStyle> {
    let color = style.fill?;
    Some(ShapeStyle {
        color: rgb_color(color).mix(style.fill_opacity),
        filled: true,
        stroke_width: 0,
    })
}

/// Text style for a label. Text without fill is drawn black.
pub fn text_style(style: &Style, anchor: Anchor, rotate: f64, zoom: f64) -> TextStyle<'static> {
    let mut font = ("sans-serif", style.font_size * zoom).into_font();
    if style.bold {
        font = font.style(FontStyle::Bold);
    }
    // Only quarter turns are expressible; other angles are drawn upright.
    let turn = rotate.rem_euclid(360.0).round() as i64;
    font = match turn {
        90 => font.transform(FontTransform::Rotate90),
        180 => font.transform(FontTransform::Rotate180),
        270 => font.transform(FontTransform::Rotate270),
        _ => font,
    };
    let h = match anchor {
        Anchor::Start => HPos::Left,
        Anchor::Middle => HPos::Center,
        Anchor::End => HPos::Right,
    };
    font.color(&rgb_color(style.fill.unwrap_or(Color::BLACK)))
        .pos(Pos::new(h, VPos::Bottom))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_stroke_no_style() {
        assert!(line_style(&Style::filled(Color::RED), 1.0).is_none());
        assert!(fill_style(&Style::stroked(Color::RED, 1.0)).is_none());
    }

    #[test]
    fn thin_strokes_stay_visible() {
        let s = line_style(&Style::stroked(Color::WHITE, 0.5), 1.0).unwrap();
        assert_eq!(s.stroke_width, 1);
        let zoomed = line_style(&Style::stroked(Color::WHITE, 0.5), 8.0).unwrap();
        assert_eq!(zoomed.stroke_width, 4);
    }

    #[test]
    fn fill_keeps_opacity() {
        let s = fill_style(&Style::filled(Color::RED).with_fill_opacity(0.1)).unwrap();
        assert!((s.color.3 - 0.1).abs() < 1e-9);
    }
}
