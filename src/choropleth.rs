//! Choropleth world map: projected region paths filled by score bucket, hover
//! highlighting with a single tooltip, and pan/zoom of the whole map group.
//!
//! Hover is a two-state machine per map: idle, or hovering exactly one region.
//! Entering a region while another is hovered first restores the other one, so
//! at most one tooltip node exists at any time whatever order pointer events
//! arrive in.

use crate::color::{Color, ColorBuckets};
use crate::geo::{ProjectedRegion, Region};
use crate::models::{Point, ScoreTable, Size, ViewTransform};
use crate::scale::{GeoScale, ScaleModel};
use crate::viz::scene::{Anchor, Element, Node, NodeId, Scene, Style, Transform};

const BORDER: Color = Color::WHITE;
const BORDER_WIDTH: f64 = 0.5;
const HOVER_BORDER: Color = Color::BLACK;
const HOVER_BORDER_WIDTH: f64 = 1.5;
const TOOLTIP_FONT_PX: f64 = 12.0;

#[derive(Debug, Clone)]
struct DrawnRegion {
    region: Region,
    projected: ProjectedRegion,
    node: NodeId,
}

#[derive(Debug, Clone)]
pub struct ChoroplethRenderer {
    scale: GeoScale,
    scores: ScoreTable,
    buckets: ColorBuckets,
    zoom_extent: (f64, f64),
    view: ViewTransform,
    group: NodeId,
    regions: Vec<DrawnRegion>,
    hovered: Option<usize>,
    tooltip: Option<NodeId>,
}

impl ChoroplethRenderer {
    /// Create the (empty) map group under `parent`.
    pub fn new(
        scene: &mut Scene,
        parent: NodeId,
        scale: GeoScale,
        scores: ScoreTable,
        buckets: ColorBuckets,
        zoom_extent: [f64; 2],
    ) -> Self {
        let group = scene.append(parent, Node::group().with_class("map"));
        let (lo, hi) = (zoom_extent[0], zoom_extent[1]);
        let zoom_extent = if lo.is_finite() && hi.is_finite() && lo > 0.0 && lo <= hi {
            (lo, hi)
        } else {
            (1.0, 8.0)
        };
        Self {
            scale,
            scores,
            buckets,
            zoom_extent,
            view: ViewTransform::IDENTITY,
            group,
            regions: Vec::new(),
            hovered: None,
            tooltip: None,
        }
    }

    pub fn group(&self) -> NodeId {
        self.group
    }

    pub fn scale(&self) -> &GeoScale {
        &self.scale
    }

    pub fn view(&self) -> ViewTransform {
        self.view
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn hovered(&self) -> Option<&Region> {
        self.hovered.map(|i| &self.regions[i].region)
    }

    pub fn tooltip(&self) -> Option<NodeId> {
        self.tooltip
    }

    /// Index of the first region with `code` (case-insensitive).
    pub fn region_index(&self, code: &str) -> Option<usize> {
        self.regions
            .iter()
            .position(|r| r.region.code.eq_ignore_ascii_case(code))
    }

    pub fn region_node(&self, index: usize) -> Option<NodeId> {
        self.regions.get(index).map(|r| r.node)
    }

    /// Fill for a region code; unknown codes get the no-data colour.
    pub fn fill_for(&self, code: &str) -> Color {
        self.buckets.color_for(self.scores.get(code))
    }

    /// Replace all region shapes. Hover state is reset.
    pub fn set_regions(&mut self, scene: &mut Scene, regions: Vec<Region>) {
        self.clear_hover(scene);
        for r in self.regions.drain(..) {
            scene.remove(r.node);
        }
        for region in regions {
            let projected = ProjectedRegion::project(&region, &self.scale);
            let style =
                Style::filled(self.fill_for(&region.code)).with_stroke(BORDER, BORDER_WIDTH);
            let node = scene.append(
                self.group,
                Node::path(projected.to_path())
                    .with_class("region")
                    .with_key(region.code.clone())
                    .with_style(style),
            );
            self.regions.push(DrawnRegion {
                region,
                projected,
                node,
            });
        }
        log::debug!("map drew {} regions", self.regions.len());
    }

    /// Refit the projection to `size` and reproject every path in place.
    pub fn resize(&mut self, scene: &mut Scene, size: Size) {
        self.scale.invert_range(size);
        for r in &mut self.regions {
            r.projected = ProjectedRegion::project(&r.region, &self.scale);
            scene.set_element(r.node, Element::Path(r.projected.to_path()));
        }
        if let (Some(i), Some(tip)) = (self.hovered, self.tooltip) {
            if let Some(c) = self.regions[i].projected.centroid() {
                if let Some(Element::Text { pos, .. }) = scene.get_mut(tip).map(|n| &mut n.element) {
                    *pos = c;
                }
            }
        }
    }

    /// Pointer entered region `index`.
    pub fn pointer_enter(&mut self, scene: &mut Scene, index: usize) {
        if index >= self.regions.len() || self.hovered == Some(index) {
            return;
        }
        self.clear_hover(scene);
        let r = &self.regions[index];
        set_border(scene, r.node, HOVER_BORDER, HOVER_BORDER_WIDTH);
        self.hovered = Some(index);

        let Some(score) = self.scores.get(&r.region.code) else {
            return;
        };
        let Some(at) = r.projected.centroid() else {
            return;
        };
        let text = format!("{}: {score}%", r.region.name);
        let tip = scene.append(
            self.group,
            Node::text(at, text, Anchor::Middle)
                .with_class("tooltip")
                .with_style(Style::text(Color::BLACK, TOOLTIP_FONT_PX).bold()),
        );
        self.tooltip = Some(tip);
    }

    /// Pointer left region `index`. A leave for a region that is not the hovered
    /// one only restores that region's border.
    pub fn pointer_leave(&mut self, scene: &mut Scene, index: usize) {
        if self.hovered == Some(index) {
            self.clear_hover(scene);
        } else if let Some(r) = self.regions.get(index) {
            set_border(scene, r.node, BORDER, BORDER_WIDTH);
        }
    }

    /// Hit-test a surface position and drive enter/leave from it.
    pub fn pointer_move(&mut self, scene: &mut Scene, at: Point) {
        match self.region_at(at) {
            Some(i) => self.pointer_enter(scene, i),
            None => self.clear_hover(scene),
        }
    }

    /// Region under a surface position, honouring the current pan/zoom.
    pub fn region_at(&self, at: Point) -> Option<usize> {
        let p = self.view.invert(at);
        // Later paths are drawn on top, so they win.
        self.regions.iter().rposition(|r| r.projected.contains(p))
    }

    pub fn clear_hover(&mut self, scene: &mut Scene) {
        if let Some(i) = self.hovered.take() {
            if let Some(r) = self.regions.get(i) {
                set_border(scene, r.node, BORDER, BORDER_WIDTH);
            }
        }
        if let Some(tip) = self.tooltip.take() {
            scene.remove(tip);
        }
    }

    /// Multiply the zoom by `factor`, keeping `anchor` fixed on screen.
    pub fn zoom_by(&mut self, scene: &mut Scene, factor: f64, anchor: Point) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let k0 = self.view.scale;
        let k1 = self.clamp_scale(k0 * factor);
        let ratio = k1 / k0;
        let view = ViewTransform {
            translate_x: anchor.x - (anchor.x - self.view.translate_x) * ratio,
            translate_y: anchor.y - (anchor.y - self.view.translate_y) * ratio,
            scale: k1,
        };
        self.apply_view(scene, view);
    }

    pub fn pan_by(&mut self, scene: &mut Scene, dx: f64, dy: f64) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        let mut view = self.view;
        view.translate_x += dx;
        view.translate_y += dy;
        self.apply_view(scene, view);
    }

    /// Set the view directly; the scale is clamped to the zoom extent.
    pub fn set_view(&mut self, scene: &mut Scene, mut view: ViewTransform) {
        view.scale = self.clamp_scale(view.scale);
        self.apply_view(scene, view);
    }

    fn clamp_scale(&self, k: f64) -> f64 {
        if k.is_finite() {
            k.clamp(self.zoom_extent.0, self.zoom_extent.1)
        } else {
            self.view.scale
        }
    }

    fn apply_view(&mut self, scene: &mut Scene, view: ViewTransform) {
        self.view = view;
        scene.set_transform(
            self.group,
            Transform {
                translate: Point::new(view.translate_x, view.translate_y),
                scale: view.scale,
            },
        );
    }
}

fn set_border(scene: &mut Scene, id: NodeId, color: Color, width: f64) {
    if let Some(node) = scene.get_mut(id) {
        node.style.stroke = Some(color);
        node.style.stroke_width = width;
    }
}
