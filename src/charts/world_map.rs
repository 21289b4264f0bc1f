//! World readiness map. Starts empty; regions arrive through the one-shot
//! geometry fetch the host runs after mount.

use super::{ChartKind, PointerEvent, Surface, Visualization};
use crate::choropleth::ChoroplethRenderer;
use crate::config::Options;
use crate::error::Result;
use crate::geo::{GeometrySource, Region};
use crate::models::{ScoreTable, Size};
use crate::scale::GeoScale;
use std::sync::Arc;

pub struct WorldMapChart {
    surface: Surface,
    map: ChoroplethRenderer,
    source: Arc<dyn GeometrySource>,
    loaded: bool,
}

impl std::fmt::Debug for WorldMapChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldMapChart")
            .field("source", &self.source.describe())
            .field("regions", &self.map.region_count())
            .field("loaded", &self.loaded)
            .finish()
    }
}

impl WorldMapChart {
    pub fn new(
        mut surface: Surface,
        scores: ScoreTable,
        source: Arc<dyn GeometrySource>,
        options: &Options,
    ) -> Self {
        let scale = GeoScale::world(options.projection, surface.size());
        let scene = surface.scene_mut();
        let root = scene.root();
        let map = ChoroplethRenderer::new(
            scene,
            root,
            scale,
            scores,
            options.buckets(),
            options.zoom_extent,
        );
        Self {
            surface,
            map,
            source,
            loaded: false,
        }
    }

    pub fn map(&self) -> &ChoroplethRenderer {
        &self.map
    }

    /// Whether a geometry result (success or failure) has been delivered.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

impl Visualization for WorldMapChart {
    fn kind(&self) -> ChartKind {
        ChartKind::WorldMap
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }

    fn resize(&mut self, viewport: Size) {
        let size = self.surface.fit(viewport);
        self.map.resize(self.surface.scene_mut(), size);
        log::debug!("map resized to {}x{}", size.width, size.height);
    }

    fn on_pointer(&mut self, event: PointerEvent) {
        let scene = self.surface.scene_mut();
        match event {
            PointerEvent::Move(at) => self.map.pointer_move(scene, at),
            PointerEvent::Leave => self.map.clear_hover(scene),
            PointerEvent::RegionEnter(i) => self.map.pointer_enter(scene, i),
            PointerEvent::RegionLeave(i) => self.map.pointer_leave(scene, i),
            PointerEvent::Wheel { factor, anchor } => self.map.zoom_by(scene, factor, anchor),
            PointerEvent::Drag { dx, dy } => self.map.pan_by(scene, dx, dy),
        }
    }

    fn geometry_source(&self) -> Option<Arc<dyn GeometrySource>> {
        if self.loaded {
            None
        } else {
            Some(Arc::clone(&self.source))
        }
    }

    fn on_geometry(&mut self, regions: Result<Vec<Region>>) {
        self.loaded = true;
        match regions {
            Ok(regions) => {
                log::info!(
                    "loaded {} regions from {}",
                    regions.len(),
                    self.source.describe()
                );
                self.map.set_regions(self.surface.scene_mut(), regions);
            }
            Err(e) => {
                log::error!("geometry fetch from {} failed: {e}", self.source.describe());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::Sizing;
    use crate::error::VizError;
    use crate::geo::{GeoPoint, StaticSource};

    fn region(code: &str, lon: f64) -> Region {
        Region {
            code: code.to_string(),
            name: code.to_string(),
            polygons: vec![vec![vec![
                GeoPoint::new(lon, 0.0),
                GeoPoint::new(lon + 10.0, 0.0),
                GeoPoint::new(lon + 10.0, 10.0),
                GeoPoint::new(lon, 10.0),
            ]]],
        }
    }

    fn chart() -> WorldMapChart {
        let surface = Surface::new(Size::new(960.0, 500.0), Sizing::Aspect { ratio: 1.92 });
        let scores: ScoreTable = [("USA", 68.0)].into_iter().collect();
        WorldMapChart::new(
            surface,
            scores,
            Arc::new(StaticSource::default()),
            &Options::default(),
        )
    }

    #[test]
    fn empty_until_geometry_arrives() {
        let mut c = chart();
        assert_eq!(c.scene().count_class("region"), 0);
        assert!(c.geometry_source().is_some());
        c.on_geometry(Ok(vec![region("USA", -100.0), region("XXX", 20.0)]));
        assert_eq!(c.scene().count_class("region"), 2);
        assert!(c.geometry_source().is_none());
    }

    #[test]
    fn failed_fetch_leaves_an_empty_map() {
        let mut c = chart();
        c.on_geometry(Err(VizError::Status(503)));
        assert!(c.is_loaded());
        assert_eq!(c.map().region_count(), 0);
        c.on_pointer(PointerEvent::RegionEnter(0));
        assert!(c.map().tooltip().is_none());
    }

    #[test]
    fn tooltip_follows_pointer_events() {
        let mut c = chart();
        c.on_geometry(Ok(vec![region("USA", -100.0)]));
        c.on_pointer(PointerEvent::RegionEnter(0));
        let tip = c.map().tooltip().unwrap();
        assert_eq!(
            c.scene().get(tip).and_then(|n| n.text_content()),
            Some("USA: 68%")
        );
        c.on_pointer(PointerEvent::Leave);
        assert_eq!(c.scene().count_class("tooltip"), 0);
    }
}
