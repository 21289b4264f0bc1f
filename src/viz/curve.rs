//! Series paths, the gap area between two series, point markers and labels.
//!
//! Every draw call returns a handle that remembers the data (in domain units) and
//! the node ids it created. After a resize the handle recomputes geometry in place
//! through [`CurveRenderer::update_path`] / [`CurveRenderer::update_gap`]; no node
//! is created or removed on that path.

use super::scene::{Anchor, Element, Node, NodeId, PathData, Scene, Style};
use crate::color::Color;
use crate::config::Interpolation;
use crate::models::{GapSpan, Point, Series, gap_band};
use crate::scale::{PlotScales, ScaleModel};

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    pub color: Color,
    pub stroke_width: f64,
    pub interpolation: Interpolation,
    /// Cardinal tension in `[0, 1]`.
    pub tension: f64,
}

impl SeriesStyle {
    pub fn new(color: Color, interpolation: Interpolation) -> Self {
        Self {
            color,
            stroke_width: 3.0,
            interpolation,
            tension: 0.0,
        }
    }

    pub fn with_tension(mut self, tension: f64) -> Self {
        self.tension = tension.clamp(0.0, 1.0);
        self
    }
}

/// Drawn state of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesHandle {
    key: String,
    data: Vec<Point>,
    interpolation: Interpolation,
    tension: f64,
    path: Option<NodeId>,
    markers: Vec<NodeId>,
    labels: Vec<NodeId>,
    label_offset: f64,
}

impl SeriesHandle {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The path node, absent for series shorter than two points.
    pub fn path(&self) -> Option<NodeId> {
        self.path
    }

    pub fn marker(&self, index: usize) -> Option<NodeId> {
        self.markers.get(index).copied()
    }

    pub fn markers(&self) -> &[NodeId] {
        &self.markers
    }

    pub fn label(&self, index: usize) -> Option<NodeId> {
        self.labels.get(index).copied()
    }

    pub fn labels(&self) -> &[NodeId] {
        &self.labels
    }
}

/// Drawn state of a gap area.
#[derive(Debug, Clone, PartialEq)]
pub struct GapHandle {
    path: Option<NodeId>,
    spans: Vec<GapSpan>,
}

impl GapHandle {
    pub fn path(&self) -> Option<NodeId> {
        self.path
    }

    pub fn spans(&self) -> &[GapSpan] {
        &self.spans
    }

    /// Pixel y interval (top, bottom) of the band at domain `x`.
    pub fn pixel_span(&self, x: f64, scales: &PlotScales) -> Option<(f64, f64)> {
        let span = self.spans.iter().find(|s| s.x == x)?;
        let (a, b) = (scales.y.map(span.hi), scales.y.map(span.lo));
        Some((a.min(b), a.max(b)))
    }
}

/// Draws into one plot group.
#[derive(Debug, Clone, Copy)]
pub struct CurveRenderer {
    group: NodeId,
}

impl CurveRenderer {
    pub fn new(group: NodeId) -> Self {
        Self { group }
    }

    pub fn group(&self) -> NodeId {
        self.group
    }

    pub fn draw_series(
        &self,
        scene: &mut Scene,
        series: &Series,
        style: &SeriesStyle,
        scales: &PlotScales,
    ) -> SeriesHandle {
        let data: Vec<Point> = series.points.iter().map(|p| Point::new(p.x, p.y)).collect();
        let mut handle = SeriesHandle {
            key: series.key.clone(),
            data,
            interpolation: style.interpolation,
            tension: style.tension,
            path: None,
            markers: Vec::new(),
            labels: Vec::new(),
            label_offset: 0.0,
        };
        if handle.data.len() < 2 {
            log::debug!("series {} has {} point(s), no path drawn", series.key, handle.data.len());
            return handle;
        }
        let d = series_path(&handle, scales);
        let node = Node::path(d)
            .with_class("line")
            .with_key(series.key.clone())
            .with_style(Style::stroked(style.color, style.stroke_width));
        handle.path = Some(scene.append(self.group, node));
        handle
    }

    /// Fill between two series at every shared x. Top and bottom are taken per x
    /// from the data, so crossing series are handled.
    pub fn draw_gap_area(
        &self,
        scene: &mut Scene,
        a: &Series,
        b: &Series,
        style: Style,
        scales: &PlotScales,
    ) -> GapHandle {
        let spans = gap_band(a, b);
        let mut handle = GapHandle { path: None, spans };
        if handle.spans.len() < 2 {
            return handle;
        }
        let node = Node::path(gap_path(&handle.spans, scales))
            .with_class("gap-area")
            .with_key(format!("{}-{}", a.key, b.key))
            .with_style(style);
        handle.path = Some(scene.append(self.group, node));
        handle
    }

    /// One circle per point, addressable by index through the handle.
    pub fn draw_markers(
        &self,
        scene: &mut Scene,
        handle: &mut SeriesHandle,
        radius: f64,
        color: Color,
        scales: &PlotScales,
    ) {
        for id in handle.markers.drain(..) {
            scene.remove(id);
        }
        for (i, p) in handle.data.iter().enumerate() {
            let node = Node::circle(scales.scale(*p), radius)
                .with_class("marker")
                .with_key(format!("{}-{i}", handle.key))
                .with_style(Style::filled(color));
            handle.markers.push(scene.append(self.group, node));
        }
    }

    /// One text per point, `offset` pixels below the point (negative for above).
    /// Points without a label text show their y value.
    pub fn draw_labels(
        &self,
        scene: &mut Scene,
        handle: &mut SeriesHandle,
        series: &Series,
        offset: f64,
        style: Style,
        scales: &PlotScales,
    ) {
        for id in handle.labels.drain(..) {
            scene.remove(id);
        }
        handle.label_offset = offset;
        for (i, (p, src)) in handle.data.iter().zip(&series.points).enumerate() {
            let text = src.label.clone().unwrap_or_else(|| format!("{}", p.y));
            let node = Node::text(label_pos(*p, offset, scales), text, Anchor::Middle)
                .with_class("point-label")
                .with_key(format!("{}-{i}", handle.key))
                .with_style(style.clone());
            handle.labels.push(scene.append(self.group, node));
        }
    }

    /// Recompute path, marker and label geometry for new scales. Linear in the
    /// number of points of this series.
    pub fn update_path(&self, scene: &mut Scene, handle: &SeriesHandle, scales: &PlotScales) {
        if let Some(path) = handle.path {
            scene.set_element(path, Element::Path(series_path(handle, scales)));
        }
        for (id, p) in handle.markers.iter().zip(&handle.data) {
            if let Some(Element::Circle { center, .. }) =
                scene.get_mut(*id).map(|n| &mut n.element)
            {
                *center = scales.scale(*p);
            }
        }
        for (id, p) in handle.labels.iter().zip(&handle.data) {
            if let Some(Element::Text { pos, .. }) = scene.get_mut(*id).map(|n| &mut n.element) {
                *pos = label_pos(*p, handle.label_offset, scales);
            }
        }
    }

    pub fn update_gap(&self, scene: &mut Scene, handle: &GapHandle, scales: &PlotScales) {
        if let Some(path) = handle.path {
            scene.set_element(path, Element::Path(gap_path(&handle.spans, scales)));
        }
    }
}

fn label_pos(p: Point, offset: f64, scales: &PlotScales) -> Point {
    let at = scales.scale(p);
    Point::new(at.x, at.y + offset)
}

fn series_path(handle: &SeriesHandle, scales: &PlotScales) -> PathData {
    let pixels: Vec<Point> = handle.data.iter().map(|p| scales.scale(*p)).collect();
    match handle.interpolation {
        Interpolation::Linear => linear(&pixels),
        Interpolation::Smoothed => cardinal(&pixels, handle.tension, scales.y_bounds()),
    }
}

/// Polyline through `points`.
pub fn linear(points: &[Point]) -> PathData {
    let mut d = PathData::new();
    d.polyline(points);
    d
}

/// Cardinal spline through every point.
///
/// Endpoints are duplicated so the curve starts and ends on the data. Control
/// point y values are clamped to `y_bounds`, which keeps the curve inside the
/// plot even where the spline would swing past a local extreme.
pub fn cardinal(points: &[Point], tension: f64, y_bounds: (f64, f64)) -> PathData {
    let mut d = PathData::new();
    let Some(first) = points.first() else {
        return d;
    };
    d.move_to(*first);
    if points.len() == 2 {
        d.line_to(points[1]);
        return d;
    }
    let k = (1.0 - tension.clamp(0.0, 1.0)) / 6.0;
    let (lo, hi) = y_bounds;
    let clamp = |p: Point| Point::new(p.x, p.y.clamp(lo, hi));
    let last = points.len() - 1;
    for i in 0..last {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(last)];
        let c1 = Point::new(p1.x + k * (p2.x - p0.x), p1.y + k * (p2.y - p0.y));
        let c2 = Point::new(p2.x - k * (p3.x - p1.x), p2.y - k * (p3.y - p1.y));
        d.cubic_to(clamp(c1), clamp(c2), p2);
    }
    d
}

/// Closed polygon: upper edge left to right, lower edge right to left.
fn gap_path(spans: &[GapSpan], scales: &PlotScales) -> PathData {
    let upper: Vec<Point> = spans
        .iter()
        .map(|s| scales.scale(Point::new(s.x, s.hi)))
        .collect();
    let lower: Vec<Point> = spans
        .iter()
        .rev()
        .map(|s| scales.scale(Point::new(s.x, s.lo)))
        .collect();
    let mut d = PathData::new();
    d.polyline(&upper);
    for p in lower {
        d.line_to(p);
    }
    d.close();
    d
}
