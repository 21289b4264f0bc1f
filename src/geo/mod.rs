//! Geographic data: region polygons, projection to screen space and screen-space
//! geometry helpers (path, centroid, hit testing).

pub mod iso;
pub mod projection;
pub mod source;
pub mod topology;

pub use projection::{GeoPoint, Projection, ProjectionKind};
pub use source::{FileSource, GeometrySource, HttpSource, StaticSource, WORLD_ATLAS_URL};
pub use topology::parse_regions;

use crate::models::Point;
use crate::scale::{GeoScale, ScaleModel};
use crate::viz::scene::PathData;

/// Closed ring of geographic coordinates.
pub type Ring = Vec<GeoPoint>;

/// A country (or any polygonal area) keyed by its region code.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Upper-case alpha-3 code when one could be resolved, otherwise the name.
    pub code: String,
    pub name: String,
    /// Polygons, each an exterior ring followed by its holes.
    pub polygons: Vec<Vec<Ring>>,
}

/// A region projected to pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRegion {
    pub rings: Vec<Vec<Point>>,
    pub min: Point,
    pub max: Point,
}

impl ProjectedRegion {
    pub fn project(region: &Region, scale: &GeoScale) -> Self {
        let rings: Vec<Vec<Point>> = region
            .polygons
            .iter()
            .flatten()
            .map(|ring| ring.iter().map(|g| scale.scale(*g)).collect())
            .collect();
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in rings.iter().flatten() {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        Self { rings, min, max }
    }

    pub fn to_path(&self) -> PathData {
        let mut path = PathData::new();
        for ring in &self.rings {
            path.polyline(ring);
            path.close();
        }
        path
    }

    /// Area-weighted planar centroid; falls back to the vertex mean for zero-area shapes.
    pub fn centroid(&self) -> Option<Point> {
        let (mut a, mut cx, mut cy) = (0.0, 0.0, 0.0);
        for ring in &self.rings {
            for (p, q) in ring.iter().zip(ring.iter().cycle().skip(1)) {
                let cross = p.x * q.y - q.x * p.y;
                a += cross;
                cx += (p.x + q.x) * cross;
                cy += (p.y + q.y) * cross;
            }
        }
        if a.abs() > 1e-9 {
            return Some(Point::new(cx / (3.0 * a), cy / (3.0 * a)));
        }
        let n = self.rings.iter().map(Vec::len).sum::<usize>();
        (n > 0).then(|| {
            let (sx, sy) = self
                .rings
                .iter()
                .flatten()
                .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
            Point::new(sx / n as f64, sy / n as f64)
        })
    }

    /// Even-odd point-in-polygon over all rings, with a bounding-box prefilter.
    pub fn contains(&self, p: Point) -> bool {
        if p.x < self.min.x || p.x > self.max.x || p.y < self.min.y || p.y > self.max.y {
            return false;
        }
        let mut inside = false;
        for ring in &self.rings {
            let n = ring.len();
            let mut j = n.wrapping_sub(1);
            for i in 0..n {
                let (a, b) = (ring[i], ring[j]);
                if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
                    inside = !inside;
                }
                j = i;
            }
        }
        inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, side: f64) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x0 + side, y0),
            Point::new(x0 + side, y0 + side),
            Point::new(x0, y0 + side),
        ]
    }

    fn projected(rings: Vec<Vec<Point>>) -> ProjectedRegion {
        let pts: Vec<Point> = rings.iter().flatten().copied().collect();
        let min = pts.iter().fold(Point::new(f64::INFINITY, f64::INFINITY), |m, p| {
            Point::new(m.x.min(p.x), m.y.min(p.y))
        });
        let max = pts.iter().fold(Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY), |m, p| {
            Point::new(m.x.max(p.x), m.y.max(p.y))
        });
        ProjectedRegion { rings, min, max }
    }

    #[test]
    fn centroid_of_square() {
        let r = projected(vec![square(10.0, 20.0, 4.0)]);
        let c = r.centroid().unwrap();
        assert!((c.x - 12.0).abs() < 1e-9 && (c.y - 22.0).abs() < 1e-9);
    }

    #[test]
    fn holes_are_excluded_from_hit_testing() {
        let mut hole = square(4.0, 4.0, 2.0);
        hole.reverse();
        let r = projected(vec![square(0.0, 0.0, 10.0), hole]);
        assert!(r.contains(Point::new(1.0, 1.0)));
        assert!(!r.contains(Point::new(5.0, 5.0)));
        assert!(!r.contains(Point::new(11.0, 5.0)));
    }
}
