//! Axis drawing.
//!
//! An axis owns one group node. Each [`AxisRenderer::draw`] keys its ticks by
//! value and diffs them against what is already drawn, so redraws move existing
//! tick nodes, add new ones and remove stale ones. Calling `draw` twice with the
//! same scale leaves the scene unchanged.

use super::scene::{Anchor, Element, Node, NodeId, Scene, Style, Transform};
use super::types::{AxisOrient, TICK_FONT_PX, TICK_PADDING, TICK_SIZE, TITLE_FONT_PX, TickFormat};
use super::util::{format_tick, integer_ticks, ticks};
use crate::color::Color;
use crate::models::Point;
use crate::scale::LinearScale;

const AXIS_COLOR: Color = Color::rgb(0x37, 0x41, 0x51);

#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub orient: AxisOrient,
    pub tick_count: usize,
    pub format: TickFormat,
    pub title: Option<String>,
    pub locale: String,
}

impl AxisSpec {
    pub fn bottom(tick_count: usize, format: TickFormat) -> Self {
        Self {
            orient: AxisOrient::Bottom,
            tick_count,
            format,
            title: None,
            locale: "en".to_string(),
        }
    }

    pub fn left(tick_count: usize, format: TickFormat) -> Self {
        Self {
            orient: AxisOrient::Left,
            ..Self::bottom(tick_count, format)
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct AxisRenderer {
    spec: AxisSpec,
    group: NodeId,
}

impl AxisRenderer {
    /// Create the axis group under `parent`. Nothing is drawn until [`draw`](Self::draw).
    pub fn new(scene: &mut Scene, parent: NodeId, spec: AxisSpec) -> Self {
        let class = match spec.orient {
            AxisOrient::Bottom => "axis-x",
            AxisOrient::Left => "axis-y",
        };
        let group = scene.append(parent, Node::group().with_class(class));
        Self { spec, group }
    }

    pub fn group(&self) -> NodeId {
        self.group
    }

    pub fn spec(&self) -> &AxisSpec {
        &self.spec
    }

    /// Draw or redraw against `scale`.
    ///
    /// `offset` places the axis line: the plot height for a bottom axis, 0 for a
    /// left axis.
    pub fn draw(&self, scene: &mut Scene, scale: &LinearScale, offset: f64) {
        let origin = match self.spec.orient {
            AxisOrient::Bottom => Transform::translate(0.0, offset),
            AxisOrient::Left => Transform::translate(offset, 0.0),
        };
        scene.set_transform(self.group, origin);

        self.draw_domain(scene, scale);
        self.draw_ticks(scene, scale);
        self.draw_title(scene, scale);
    }

    /// Number of tick nodes currently drawn.
    pub fn tick_count(&self, scene: &Scene) -> usize {
        scene.select_class(self.group, "tick").len()
    }

    fn along(&self, pos: f64, across: f64) -> Point {
        match self.spec.orient {
            AxisOrient::Bottom => Point::new(pos, across),
            AxisOrient::Left => Point::new(across, pos),
        }
    }

    fn draw_domain(&self, scene: &mut Scene, scale: &LinearScale) {
        let (r0, r1) = scale.range();
        let line = Element::Line {
            from: self.along(r0, 0.0),
            to: self.along(r1, 0.0),
        };
        let join = scene.join(self.group, "domain", &["domain"]);
        if join.enter.is_empty() {
            for (_, id) in join.update {
                scene.set_element(id, line.clone());
            }
        } else {
            scene.append(
                self.group,
                Node::new(line)
                    .with_class("domain")
                    .with_key("domain")
                    .with_style(Style::stroked(AXIS_COLOR, 1.0)),
            );
        }
    }

    fn draw_ticks(&self, scene: &mut Scene, scale: &LinearScale) {
        let (values, step) = match self.spec.format {
            TickFormat::Integer => integer_ticks(scale.domain(), self.spec.tick_count),
            _ => ticks(scale.domain(), self.spec.tick_count),
        };
        let keys: Vec<String> = values.iter().map(|v| format!("{v}")).collect();
        let join = scene.join(self.group, "tick", &keys);

        // Ticks point away from the plot.
        let (mark_to, label_at, anchor) = match self.spec.orient {
            AxisOrient::Bottom => (
                self.along(0.0, TICK_SIZE),
                TICK_SIZE + TICK_PADDING + TICK_FONT_PX,
                Anchor::Middle,
            ),
            AxisOrient::Left => (
                self.along(0.0, -TICK_SIZE),
                -(TICK_SIZE + TICK_PADDING),
                Anchor::End,
            ),
        };

        for (i, id) in join.update {
            scene.set_transform(id, self.tick_transform(scale.map(values[i])));
        }
        for i in join.enter {
            let v = values[i];
            let tick = scene.append(
                self.group,
                Node::group()
                    .with_class("tick")
                    .with_key(keys[i].clone())
                    .with_transform(self.tick_transform(scale.map(v))),
            );
            scene.append(
                tick,
                Node::line(Point::new(0.0, 0.0), mark_to).with_style(Style::stroked(AXIS_COLOR, 1.0)),
            );
            let label = format_tick(v, step, self.spec.format, &self.spec.locale);
            scene.append(
                tick,
                Node::text(self.along(0.0, label_at), label, anchor)
                    .with_style(Style::text(AXIS_COLOR, TICK_FONT_PX)),
            );
        }
    }

    fn tick_transform(&self, pos: f64) -> Transform {
        let p = self.along(pos, 0.0);
        Transform::translate(p.x, p.y)
    }

    fn draw_title(&self, scene: &mut Scene, scale: &LinearScale) {
        let Some(title) = &self.spec.title else {
            return;
        };
        let (r0, r1) = scale.range();
        let mid = (r0 + r1) / 2.0;
        let (pos, rotate) = match self.spec.orient {
            AxisOrient::Bottom => (Point::new(mid, 35.0), 0.0),
            AxisOrient::Left => (Point::new(-35.0, mid), -90.0),
        };
        let element = Element::Text {
            pos,
            content: title.clone(),
            anchor: Anchor::Middle,
            rotate,
        };
        let join = scene.join(self.group, "axis-title", &["title"]);
        for (_, id) in join.update {
            scene.set_element(id, element.clone());
        }
        if !join.enter.is_empty() {
            scene.append(
                self.group,
                Node::new(element)
                    .with_class("axis-title")
                    .with_key("title")
                    .with_style(Style::text(AXIS_COLOR, TITLE_FONT_PX)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Size;
    use crate::scale::Domain;

    #[test]
    fn redraw_moves_ticks_in_place() {
        let mut scene = Scene::new(Size::new(600.0, 300.0));
        let root = scene.root();
        let axis = AxisRenderer::new(&mut scene, root, AxisSpec::bottom(6, TickFormat::Integer));
        let scale = LinearScale::horizontal(Domain::new(2020.0, 2025.0), 600.0);
        axis.draw(&mut scene, &scale, 240.0);
        let first = scene.select_class(axis.group(), "tick");
        assert_eq!(first.len(), 6);

        let narrow = LinearScale::horizontal(Domain::new(2020.0, 2025.0), 300.0);
        axis.draw(&mut scene, &narrow, 240.0);
        let second = scene.select_class(axis.group(), "tick");
        assert_eq!(first, second);
        let last = scene.get(second[5]).unwrap();
        assert_eq!(last.transform.translate, Point::new(300.0, 0.0));
    }

    #[test]
    fn silent_axis_has_empty_labels() {
        let mut scene = Scene::new(Size::new(600.0, 300.0));
        let root = scene.root();
        let axis = AxisRenderer::new(&mut scene, root, AxisSpec::left(5, TickFormat::Silent));
        axis.draw(&mut scene, &LinearScale::vertical(Domain::new(0.0, 150.0), 240.0), 0.0);
        for tick in scene.select_class(axis.group(), "tick") {
            let label = scene.children(tick)[1];
            assert_eq!(scene.get(label).unwrap().text_content(), Some(""));
        }
    }
}
