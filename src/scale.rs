//! Domain-to-pixel mappings.
//!
//! Both scales are recomputed on resize through [`ScaleModel::invert_range`], which
//! takes the new container extent and keeps the orientation of the current range.

use crate::geo::projection::{GeoPoint, Projection, ProjectionKind};
use crate::models::{Point, Size};

/// Shared contract of the linear and the geographic scale.
pub trait ScaleModel {
    type Domain: Copy;
    type Pixel: Copy;
    type Extent: Copy;

    /// Map a domain value to pixel space.
    fn scale(&self, value: Self::Domain) -> Self::Pixel;

    /// Refit the pixel range to a new container extent. Idempotent for equal extents.
    fn invert_range(&mut self, extent: Self::Extent);
}

/// Closed interval `[lo, hi]` on a linear axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub lo: f64,
    pub hi: f64,
}

impl Domain {
    pub const UNIT: Domain = Domain { lo: 0.0, hi: 1.0 };

    /// Build a domain, recovering from malformed input.
    ///
    /// Inverted or non-finite bounds fall back to the unit domain. A degenerate
    /// domain (`lo == hi`) is kept; scales map every value of it to `range.lo`.
    pub fn new(lo: f64, hi: f64) -> Self {
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            log::debug!("malformed domain [{lo}, {hi}], using unit domain");
            return Self::UNIT;
        }
        Self { lo, hi }
    }

    pub fn span(&self) -> f64 {
        self.hi - self.lo
    }

    pub fn is_degenerate(&self) -> bool {
        self.span() == 0.0
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.lo && v <= self.hi
    }
}

/// Linear interpolation from a [`Domain`] onto a pixel range.
///
/// The range may run backwards (`lo > hi`), which is how y axes put larger values
/// higher on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: Domain,
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: Domain, range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Range `[0, len]`, used for x axes.
    pub fn horizontal(domain: Domain, len: f64) -> Self {
        Self::new(domain, (0.0, len))
    }

    /// Range `[len, 0]`, used for y axes.
    pub fn vertical(domain: Domain, len: f64) -> Self {
        Self::new(domain, (len, 0.0))
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn set_domain(&mut self, domain: Domain) {
        self.domain = domain;
    }

    pub fn is_reversed(&self) -> bool {
        self.range.0 > self.range.1
    }

    /// Pixel position of `value`. Values outside the domain extrapolate.
    pub fn map(&self, value: f64) -> f64 {
        let (r0, r1) = self.range;
        let span = self.domain.span();
        if span == 0.0 || !value.is_finite() {
            return r0;
        }
        r0 + (value - self.domain.lo) / span * (r1 - r0)
    }

    /// Domain value at pixel `px`.
    pub fn invert(&self, px: f64) -> f64 {
        let (r0, r1) = self.range;
        if r1 == r0 {
            return self.domain.lo;
        }
        self.domain.lo + (px - r0) / (r1 - r0) * self.domain.span()
    }
}

impl ScaleModel for LinearScale {
    type Domain = f64;
    type Pixel = f64;
    type Extent = f64;

    fn scale(&self, value: f64) -> f64 {
        self.map(value)
    }

    fn invert_range(&mut self, len: f64) {
        let len = if len.is_finite() { len.max(0.0) } else { 0.0 };
        self.range = if self.is_reversed() {
            (len, 0.0)
        } else {
            (0.0, len)
        };
    }
}

/// Longitude/latitude bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoExtent {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoExtent {
    pub const WORLD: GeoExtent = GeoExtent {
        west: -180.0,
        south: -90.0,
        east: 180.0,
        north: 90.0,
    };

    /// Invalid boxes (inverted, out of bounds, non-finite) fall back to the whole world.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        let valid = [west, south, east, north].iter().all(|v| v.is_finite())
            && west < east
            && south < north
            && west >= -180.0
            && east <= 180.0
            && south >= -90.0
            && north <= 90.0;
        if valid {
            Self {
                west,
                south,
                east,
                north,
            }
        } else {
            log::debug!("invalid geographic extent, using world extent");
            Self::WORLD
        }
    }
}

/// Scale wrapping a map projection: fits a geographic extent into a pixel box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoScale {
    projection: Projection,
    extent: GeoExtent,
    size: Size,
}

impl GeoScale {
    pub fn new(kind: ProjectionKind, extent: GeoExtent, size: Size) -> Self {
        let mut scale = Self {
            projection: Projection::new(kind),
            extent,
            size: size.sanitized(),
        };
        scale.fit();
        scale
    }

    pub fn world(kind: ProjectionKind, size: Size) -> Self {
        Self::new(kind, GeoExtent::WORLD, size)
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Derive projection scale and translate so the extent is centered and fully visible.
    fn fit(&mut self) {
        let unit = Projection::new(self.projection.kind());
        let e = self.extent;
        let samples = 16;
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for i in 0..=samples {
            let t = i as f64 / samples as f64;
            let lon = e.west + (e.east - e.west) * t;
            let lat = e.south + (e.north - e.south) * t;
            for g in [
                GeoPoint::new(lon, e.south),
                GeoPoint::new(lon, e.north),
                GeoPoint::new(e.west, lat),
                GeoPoint::new(e.east, lat),
            ] {
                let p = unit.project(g);
                min = Point::new(min.x.min(p.x), min.y.min(p.y));
                max = Point::new(max.x.max(p.x), max.y.max(p.y));
            }
        }
        let (bw, bh) = (max.x - min.x, max.y - min.y);
        let k = if bw > 0.0 && bh > 0.0 {
            (self.size.width / bw).min(self.size.height / bh)
        } else {
            0.0
        };
        let center = Point::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
        self.projection = Projection::new(self.projection.kind()).with_transform(
            k,
            Point::new(
                self.size.width / 2.0 - center.x * k,
                self.size.height / 2.0 - center.y * k,
            ),
        );
    }
}

impl ScaleModel for GeoScale {
    type Domain = GeoPoint;
    type Pixel = Point;
    type Extent = Size;

    fn scale(&self, value: GeoPoint) -> Point {
        self.projection.project(value)
    }

    fn invert_range(&mut self, size: Size) {
        self.size = size.sanitized();
        self.fit();
    }
}

/// The x and y scale of one cartesian plot, resized together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotScales {
    pub x: LinearScale,
    pub y: LinearScale,
}

impl PlotScales {
    /// x runs left to right over the plot width, y bottom to top over its height.
    pub fn new(x_domain: Domain, y_domain: Domain, plot: Size) -> Self {
        let plot = plot.sanitized();
        Self {
            x: LinearScale::horizontal(x_domain, plot.width),
            y: LinearScale::vertical(y_domain, plot.height),
        }
    }

    pub fn plot_size(&self) -> Size {
        let (x0, x1) = self.x.range();
        let (y0, y1) = self.y.range();
        Size::new((x1 - x0).abs(), (y1 - y0).abs())
    }

    /// Pixel y band of the plot, low edge first.
    pub fn y_bounds(&self) -> (f64, f64) {
        let (a, b) = self.y.range();
        (a.min(b), a.max(b))
    }
}

impl ScaleModel for PlotScales {
    type Domain = Point;
    type Pixel = Point;
    type Extent = Size;

    fn scale(&self, value: Point) -> Point {
        Point::new(self.x.map(value.x), self.y.map(value.y))
    }

    fn invert_range(&mut self, plot: Size) {
        let plot = plot.sanitized();
        self.x.invert_range(plot.width);
        self.y.invert_range(plot.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_range_survives_resize() {
        let mut y = LinearScale::vertical(Domain::new(0.0, 150.0), 240.0);
        assert_eq!(y.map(0.0), 240.0);
        assert_eq!(y.map(150.0), 0.0);
        y.invert_range(120.0);
        assert_eq!(y.range(), (120.0, 0.0));
        assert_eq!(y.map(75.0), 60.0);
    }

    #[test]
    fn invert_undoes_map() {
        let x = LinearScale::horizontal(Domain::new(2020.0, 2025.0), 600.0);
        assert_eq!(x.invert(x.map(2023.0)), 2023.0);
        let flat = LinearScale::horizontal(Domain::new(2020.0, 2025.0), 0.0);
        assert_eq!(flat.invert(10.0), 2020.0);
    }

    #[test]
    fn malformed_domains_recover() {
        assert_eq!(Domain::new(5.0, 1.0), Domain::UNIT);
        assert_eq!(Domain::new(f64::NAN, 1.0), Domain::UNIT);
        assert!(Domain::new(3.0, 3.0).is_degenerate());
    }

    #[test]
    fn geo_extent_falls_back_to_world() {
        assert_eq!(GeoExtent::new(10.0, 0.0, -10.0, 5.0), GeoExtent::WORLD);
        assert_eq!(GeoExtent::new(-200.0, 0.0, 10.0, 5.0), GeoExtent::WORLD);
        let europe = GeoExtent::new(-25.0, 34.0, 45.0, 72.0);
        assert_eq!(europe.west, -25.0);
    }

    #[test]
    fn plot_scales_resize_together() {
        let mut s = PlotScales::new(
            Domain::new(2020.0, 2025.0),
            Domain::new(0.0, 150.0),
            Size::new(520.0, 240.0),
        );
        s.invert_range(Size::new(230.0, 240.0));
        assert_eq!(s.scale(Point::new(2025.0, 150.0)), Point::new(230.0, 0.0));
        assert_eq!(s.plot_size(), Size::new(230.0, 240.0));
        assert_eq!(s.y_bounds(), (0.0, 240.0));
    }
}
