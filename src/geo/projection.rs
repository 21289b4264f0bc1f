//! World projections from longitude/latitude (degrees) to planar screen coordinates.
//!
//! Both projections are pseudo-cylindrical with finite poles, so every valid
//! coordinate maps to a finite point. Screen y grows downwards.

use crate::models::Point;
use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectionKind {
    /// Natural Earth I (compromise, visually pleasing world maps).
    #[default]
    NaturalEarth,
    /// Equal Earth (equal-area).
    EqualEarth,
}

/// A projection with a uniform scale and a pixel translate applied after the raw formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    kind: ProjectionKind,
    scale: f64,
    translate: Point,
}

impl Projection {
    /// Unit projection: scale 1, no translate.
    pub fn new(kind: ProjectionKind) -> Self {
        Self {
            kind,
            scale: 1.0,
            translate: Point::default(),
        }
    }

    pub fn with_transform(mut self, scale: f64, translate: Point) -> Self {
        self.scale = scale;
        self.translate = translate;
        self
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> Point {
        self.translate
    }

    pub fn project(&self, g: GeoPoint) -> Point {
        let lambda = g.lon.clamp(-180.0, 180.0).to_radians();
        let phi = g.lat.clamp(-90.0, 90.0).to_radians();
        let (x, y) = match self.kind {
            ProjectionKind::NaturalEarth => natural_earth(lambda, phi),
            ProjectionKind::EqualEarth => equal_earth(lambda, phi),
        };
        Point::new(
            self.translate.x + self.scale * x,
            self.translate.y - self.scale * y,
        )
    }
}

fn natural_earth(lambda: f64, phi: f64) -> (f64, f64) {
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    let x = lambda
        * (0.8707 - 0.131979 * phi2
            + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4)));
    let y = phi
        * (1.007226
            + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)));
    (x, y)
}

const EE_A1: f64 = 1.340264;
const EE_A2: f64 = -0.081106;
const EE_A3: f64 = 0.000893;
const EE_A4: f64 = 0.003796;

fn equal_earth(lambda: f64, phi: f64) -> (f64, f64) {
    let m = 3f64.sqrt() / 2.0;
    let l = (m * phi.sin()).clamp(-1.0, 1.0).asin();
    let l2 = l * l;
    let l6 = l2 * l2 * l2;
    let x = lambda * l.cos() / (m * (EE_A1 + 3.0 * EE_A2 * l2 + l6 * (7.0 * EE_A3 + 9.0 * EE_A4 * l2)));
    let y = l * (EE_A1 + EE_A2 * l2 + l6 * (EE_A3 + EE_A4 * l2));
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn poles_stay_finite() {
        for kind in [ProjectionKind::NaturalEarth, ProjectionKind::EqualEarth] {
            let p = Projection::new(kind);
            for g in [
                GeoPoint::new(0.0, 90.0),
                GeoPoint::new(180.0, -90.0),
                GeoPoint::new(-180.0, 90.0),
            ] {
                let xy = p.project(g);
                assert!(xy.x.is_finite() && xy.y.is_finite(), "{kind:?} {g:?}");
            }
        }
    }

    #[test]
    fn north_is_up_and_east_is_right() {
        let p = Projection::new(ProjectionKind::NaturalEarth)
            .with_transform(100.0, Point::new(480.0, 250.0));
        let origin = p.project(GeoPoint::new(0.0, 0.0));
        assert_eq!(origin, Point::new(480.0, 250.0));
        assert!(p.project(GeoPoint::new(0.0, 45.0)).y < origin.y);
        assert!(p.project(GeoPoint::new(30.0, 0.0)).x > origin.x);
    }

    #[test]
    fn natural_earth_world_width_matches_formula() {
        let p = Projection::new(ProjectionKind::NaturalEarth);
        let w = p.project(GeoPoint::new(180.0, 0.0)).x - p.project(GeoPoint::new(-180.0, 0.0)).x;
        assert!((w - 2.0 * PI * 0.8707).abs() < 1e-9);
    }
}
