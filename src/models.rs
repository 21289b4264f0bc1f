use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A position in pixel (or data) space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Pixel size of a container or viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Negative or non-finite extents collapse to zero.
    pub fn sanitized(self) -> Self {
        let fix = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self::new(fix(self.width), fix(self.height))
    }
}

/// One observation of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SeriesPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, label: None }
    }

    pub fn labeled(x: f64, y: f64, label: impl Into<String>) -> Self {
        Self {
            x,
            y,
            label: Some(label.into()),
        }
    }
}

/// An ordered run of points identified by a stable key.
///
/// Callers provide strictly increasing x values; the engine never sorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub key: String,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn new(key: impl Into<String>, points: Vec<SeriesPoint>) -> Self {
        Self {
            key: key.into(),
            points,
        }
    }

    pub fn from_xy(key: impl Into<String>, xy: &[(f64, f64)]) -> Self {
        Self::new(key, xy.iter().map(|&(x, y)| SeriesPoint::new(x, y)).collect())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_strictly_increasing(&self) -> bool {
        self.points.windows(2).all(|w| w[0].x < w[1].x)
    }

    pub fn x_extent(&self) -> Option<(f64, f64)> {
        extent(self.points.iter().map(|p| p.x))
    }

    pub fn y_extent(&self) -> Option<(f64, f64)> {
        extent(self.points.iter().map(|p| p.y))
    }

    pub fn y_at(&self, x: f64) -> Option<f64> {
        self.points.iter().find(|p| p.x == x).map(|p| p.y)
    }
}

/// Min/max over finite values.
pub fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Vertical span between two series at one shared x.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapSpan {
    pub x: f64,
    pub lo: f64,
    pub hi: f64,
}

impl GapSpan {
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }
}

/// Gap band between two series: one span per x present in both, in `a`'s order.
/// Which series is on top is decided per x by the data.
pub fn gap_band(a: &Series, b: &Series) -> Vec<GapSpan> {
    a.points
        .iter()
        .filter_map(|pa| {
            let yb = b.y_at(pa.x)?;
            Some(GapSpan {
                x: pa.x,
                lo: pa.y.min(yb),
                hi: pa.y.max(yb),
            })
        })
        .collect()
}

/// Input item for the packed bubble chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleItem {
    pub id: String,
    pub label: String,
    /// Non-negative; negative and NaN inputs are treated as zero.
    pub magnitude: f64,
    pub color: crate::color::Color,
}

impl BubbleItem {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        magnitude: f64,
        color: crate::color::Color,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            magnitude,
            color,
        }
    }

    pub fn magnitude(&self) -> f64 {
        if self.magnitude.is_finite() {
            self.magnitude.max(0.0)
        } else {
            0.0
        }
    }
}

/// Region code -> score table for the choropleth.
///
/// Codes are matched case-insensitively; anything absent is "no data".
/// Deserialized keys go through [`ScoreTable::insert`], so `{"usa": 68}` finds `USA`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScoreTable {
    scores: BTreeMap<String, f64>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: &str, score: f64) {
        self.scores.insert(code.trim().to_ascii_uppercase(), score);
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.scores
            .get(&code.trim().to_ascii_uppercase())
            .copied()
            .filter(|s| s.is_finite())
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl<'de> Deserialize<'de> for ScoreTable {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
        Ok(raw.iter().map(|(code, score)| (code.as_str(), *score)).collect())
    }
}

impl<'a> FromIterator<(&'a str, f64)> for ScoreTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut table = ScoreTable::new();
        for (code, score) in iter {
            table.insert(code, score);
        }
        table
    }
}

/// Current pan/zoom state of a map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.translate_x,
            p.y * self.scale + self.translate_y,
        )
    }

    pub fn invert(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.translate_x) / self.scale,
            (p.y - self.translate_y) / self.scale,
        )
    }
}
