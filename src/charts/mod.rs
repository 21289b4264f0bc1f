//! Mountable charts.
//!
//! A chart owns its [`Surface`] for as long as it is mounted and does its full
//! draw on construction. Afterwards the host only calls the lightweight entry
//! points of [`Visualization`]: resize, frame ticks, pointer events and the
//! one-shot geometry delivery.

pub mod bubbles;
pub mod growth;
pub mod world_map;

pub use bubbles::BubbleChart;
pub use growth::{GrowthChart, GrowthData};
pub use world_map::WorldMapChart;

use crate::config::Options;
use crate::error::Result;
use crate::geo::{GeometrySource, Region};
use crate::models::{BubbleItem, Point, ScoreTable, Size};
use crate::viz::scene::Scene;
use std::sync::Arc;

/// Which chart a data set is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Growth,
    Bubbles,
    WorldMap,
}

impl ChartKind {
    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Growth => "growth",
            ChartKind::Bubbles => "bubbles",
            ChartKind::WorldMap => "map",
        }
    }

    /// Default sizing policy of this chart.
    pub fn default_sizing(self) -> Sizing {
        match self {
            ChartKind::Growth => Sizing::FillWidth { height: 300.0 },
            ChartKind::Bubbles => Sizing::FillWidth { height: 200.0 },
            ChartKind::WorldMap => Sizing::Aspect {
                ratio: 960.0 / 500.0,
            },
        }
    }
}

/// How a surface follows the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sizing {
    /// Full viewport width, fixed height.
    FillWidth { height: f64 },
    /// Full viewport width, height from a width/height ratio.
    Aspect { ratio: f64 },
    /// Ignores the viewport.
    Fixed,
}

impl Sizing {
    pub fn fit(&self, viewport: Size, current: Size) -> Size {
        let viewport = viewport.sanitized();
        match *self {
            Sizing::FillWidth { height } => Size::new(viewport.width, height).sanitized(),
            Sizing::Aspect { ratio } if ratio.is_finite() && ratio > 0.0 => {
                Size::new(viewport.width, viewport.width / ratio)
            }
            Sizing::Aspect { .. } | Sizing::Fixed => current,
        }
    }
}

/// A sized drawing surface. Moved into exactly one mounted chart.
#[derive(Debug)]
pub struct Surface {
    scene: Scene,
    sizing: Sizing,
}

impl Surface {
    pub fn new(size: Size, sizing: Sizing) -> Self {
        Self {
            scene: Scene::new(size),
            sizing,
        }
    }

    /// Surface of `width` px sized the way `kind` is by default.
    pub fn for_chart(kind: ChartKind, width: f64) -> Self {
        let sizing = kind.default_sizing();
        let size = sizing.fit(Size::new(width, 0.0), Size::new(width, 0.0));
        Self::new(size, sizing)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn size(&self) -> Size {
        self.scene.size()
    }

    pub fn sizing(&self) -> Sizing {
        self.sizing
    }

    /// Apply the sizing policy for `viewport`; returns the new size.
    pub fn fit(&mut self, viewport: Size) -> Size {
        let size = self.sizing.fit(viewport, self.scene.size());
        self.scene.set_size(size);
        self.scene.size()
    }
}

/// Data handed to [`crate::host::Host::mount`].
pub enum ChartData {
    Growth(GrowthData),
    Bubbles(Vec<BubbleItem>),
    WorldMap {
        scores: ScoreTable,
        source: Arc<dyn GeometrySource>,
    },
}

impl ChartData {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartData::Growth(_) => ChartKind::Growth,
            ChartData::Bubbles(_) => ChartKind::Bubbles,
            ChartData::WorldMap { .. } => ChartKind::WorldMap,
        }
    }
}

/// Input from the pointer, in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move(Point),
    Leave,
    /// Pointer entered the region with this draw index.
    RegionEnter(usize),
    RegionLeave(usize),
    /// Zoom by `factor` around `anchor`.
    Wheel { factor: f64, anchor: Point },
    Drag { dx: f64, dy: f64 },
}

/// A mounted chart as seen by the host.
pub trait Visualization {
    fn kind(&self) -> ChartKind;

    fn surface(&self) -> &Surface;

    fn scene(&self) -> &Scene {
        self.surface().scene()
    }

    /// Recompute scales and geometry for a new viewport. Never rebuilds.
    fn resize(&mut self, viewport: Size);

    /// Whether the chart wants another animation frame.
    fn wants_frame(&self) -> bool {
        false
    }

    /// Run one animation step; returns whether another frame is wanted.
    fn on_frame(&mut self) -> bool {
        false
    }

    fn on_pointer(&mut self, _event: PointerEvent) {}

    /// Where region geometry should be fetched from, if anywhere.
    fn geometry_source(&self) -> Option<Arc<dyn GeometrySource>> {
        None
    }

    /// Deliver the one-shot geometry fetch result.
    fn on_geometry(&mut self, _regions: Result<Vec<Region>>) {}

    /// Stop all running work. Safe to call more than once.
    fn stop(&mut self) {}
}

/// Build and fully draw a chart for `data` on `surface`.
pub fn build(surface: Surface, data: ChartData, options: &Options) -> Box<dyn Visualization> {
    match data {
        ChartData::Growth(d) => Box::new(GrowthChart::new(surface, d, options)),
        ChartData::Bubbles(items) => Box::new(BubbleChart::new(surface, items, options)),
        ChartData::WorldMap { scores, source } => {
            Box::new(WorldMapChart::new(surface, scores, source, options))
        }
    }
}
