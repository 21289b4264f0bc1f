//! Packed bubble chart: one circle per item, sized by magnitude, laid out by
//! the force simulation and moved one frame at a time.

use super::{ChartKind, Surface, Visualization};
use crate::color::Color;
use crate::config::Options;
use crate::force::{ForcePackLayout, ForceParams};
use crate::models::{BubbleItem, Point, Size};
use crate::viz::scene::{Anchor, Node, NodeId, Style, Transform};
use crate::viz::text::{fit_font_size, truncate_to_width};

const FILL_OPACITY: f64 = 0.7;
const STROKE_WIDTH: f64 = 2.0;
const NAME_FONT_PX: f64 = 10.0;
const NAME_MIN_FONT_PX: f64 = 6.0;
const NAME_DY: f64 = 4.0;
const VALUE_FONT_PX: f64 = 9.0;
const VALUE_DY: f64 = 18.0;

#[derive(Debug)]
pub struct BubbleChart {
    surface: Surface,
    layout: ForcePackLayout,
    /// Bubble group per body, same order as the layout.
    nodes: Vec<NodeId>,
}

fn center_of(size: Size) -> Point {
    Point::new(size.width / 2.0, size.height / 2.0)
}

impl BubbleChart {
    pub fn new(mut surface: Surface, items: Vec<BubbleItem>, options: &Options) -> Self {
        let params = ForceParams::from(options);
        let layout = ForcePackLayout::new(&items, center_of(surface.size()), params);
        let scene = surface.scene_mut();
        let root = scene.root();
        let container = scene.append(root, Node::group().with_class("bubbles"));

        let mut nodes = Vec::with_capacity(items.len());
        for (item, body) in items.iter().zip(layout.bodies()) {
            let r = body.radius;
            let group = scene.append(
                container,
                Node::group()
                    .with_class("bubble")
                    .with_key(item.id.clone())
                    .with_transform(Transform::translate(body.x, body.y)),
            );
            scene.append(
                group,
                Node::circle(Point::new(0.0, 0.0), r).with_style(
                    Style::filled(item.color)
                        .with_fill_opacity(FILL_OPACITY)
                        .with_stroke(item.color, STROKE_WIDTH),
                ),
            );

            let room = 2.0 * r + params.padding / 2.0;
            let font = fit_font_size(&item.label, NAME_FONT_PX, NAME_MIN_FONT_PX, room);
            let name = truncate_to_width(&item.label, font, room);
            scene.append(
                group,
                Node::text(Point::new(0.0, NAME_DY), name, Anchor::Middle)
                    .with_class("bubble-name")
                    .with_style(Style::text(Color::WHITE, font).bold()),
            );
            scene.append(
                group,
                Node::text(
                    Point::new(0.0, VALUE_DY),
                    format!("{}%", item.magnitude().round()),
                    Anchor::Middle,
                )
                .with_class("bubble-value")
                .with_style(Style::text(Color::WHITE, VALUE_FONT_PX)),
            );
            nodes.push(group);
        }
        log::debug!("bubble chart drew {} bubbles", nodes.len());

        Self {
            surface,
            layout,
            nodes,
        }
    }

    pub fn layout(&self) -> &ForcePackLayout {
        &self.layout
    }

    pub fn bubble(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    /// Copy the simulated positions onto the bubble groups.
    fn sync_positions(&mut self) {
        let scene = self.surface.scene_mut();
        for (node, body) in self.nodes.iter().zip(self.layout.bodies()) {
            scene.set_transform(*node, Transform::translate(body.x, body.y));
        }
    }
}

impl Visualization for BubbleChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Bubbles
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }

    fn resize(&mut self, viewport: Size) {
        let size = self.surface.fit(viewport);
        let center = center_of(size);
        if center != self.layout.center() {
            self.layout.set_center(center);
            log::debug!("bubble centre moved to ({}, {})", center.x, center.y);
        }
    }

    fn wants_frame(&self) -> bool {
        self.layout.is_running()
    }

    fn on_frame(&mut self) -> bool {
        let more = self.layout.tick();
        self.sync_positions();
        more
    }

    fn stop(&mut self) {
        self.layout.stop();
    }
}
