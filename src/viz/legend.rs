//! Inline legend: a small block of swatches anchored to the top-right of a plot.

use super::scene::{Anchor, Node, NodeId, Scene, Style, Transform};
use crate::color::Color;
use crate::models::{Point, Size};

const SWATCH_W: f64 = 20.0;
const ROW_H: f64 = 20.0;
const TEXT_GAP: f64 = 5.0;
const FONT_PX: f64 = 10.0;

/// Distance of the legend's left edge from the right edge of the plot.
pub const LEGEND_INSET: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Swatch {
    /// Stroke sample for a series.
    Line { width: f64 },
    /// Translucent block for a filled area.
    Area { opacity: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub swatch: Swatch,
}

impl LegendEntry {
    pub fn line(label: impl Into<String>, color: Color, width: f64) -> Self {
        Self {
            label: label.into(),
            color,
            swatch: Swatch::Line { width },
        }
    }

    pub fn area(label: impl Into<String>, color: Color, opacity: f64) -> Self {
        Self {
            label: label.into(),
            color,
            swatch: Swatch::Area { opacity },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Legend {
    group: NodeId,
}

impl Legend {
    /// Draw `entries` top to bottom into a fresh group under `parent`.
    pub fn draw(scene: &mut Scene, parent: NodeId, entries: &[LegendEntry], plot_width: f64) -> Self {
        let group = scene.append(
            parent,
            Node::group()
                .with_class("legend")
                .with_transform(anchor_at(plot_width)),
        );
        let mut y = 0.0;
        for entry in entries {
            let text_y = match entry.swatch {
                Swatch::Line { width } => {
                    scene.append(
                        group,
                        Node::line(Point::new(0.0, y), Point::new(SWATCH_W, y))
                            .with_style(Style::stroked(entry.color, width)),
                    );
                    y + 4.0
                }
                Swatch::Area { opacity } => {
                    // Blocks sit a little lower than line swatches.
                    let top = y - 5.0;
                    scene.append(
                        group,
                        Node::rect(Point::new(0.0, top), Size::new(SWATCH_W, 10.0))
                            .with_style(Style::filled(entry.color).with_fill_opacity(opacity)),
                    );
                    top + 9.0
                }
            };
            scene.append(
                group,
                Node::text(Point::new(SWATCH_W + TEXT_GAP, text_y), entry.label.clone(), Anchor::Start)
                    .with_style(Style::text(Color::BLACK, FONT_PX)),
            );
            y += ROW_H;
        }
        Self { group }
    }

    pub fn group(&self) -> NodeId {
        self.group
    }

    /// Re-anchor after the plot width changed.
    pub fn place(&self, scene: &mut Scene, plot_width: f64) {
        scene.set_transform(self.group, anchor_at(plot_width));
    }
}

fn anchor_at(plot_width: f64) -> Transform {
    Transform::translate(plot_width - LEGEND_INSET, 10.0)
}
