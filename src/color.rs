//! Colors and the score-to-color bucket policy used by the choropleth.
//!
//! Colors serialize as `#RRGGBB` hex strings so option files stay readable.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    // Palette shared by the charts.
    pub const BLUE: Color = Color::rgb(0x3B, 0x82, 0xF6);
    pub const GREEN: Color = Color::rgb(0x10, 0xB9, 0x81);
    pub const AMBER: Color = Color::rgb(0xF5, 0x9E, 0x0B);
    pub const ORANGE: Color = Color::rgb(0xF9, 0x73, 0x16);
    pub const RED: Color = Color::rgb(0xEF, 0x44, 0x44);
    pub const NEUTRAL: Color = Color::rgb(0xE5, 0xE7, 0xEB);

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color {:?}, expected #RGB or #RRGGBB", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()
            .ok_or_else(err)?;
        match digits.as_slice() {
            [r, g, b] => Ok(Color::rgb(r * 17, g * 17, b * 17)),
            [r1, r0, g1, g0, b1, b0] => Ok(Color::rgb(r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0)),
            _ => Err(err()),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One `(threshold, color)` pair: scores `>= threshold` take `color`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub threshold: f64,
    pub color: Color,
}

impl Bucket {
    pub const fn new(threshold: f64, color: Color) -> Self {
        Self { threshold, color }
    }
}

/// Score-to-color policy.
///
/// Buckets are kept sorted highest-threshold-first and the first bucket whose
/// threshold the score reaches wins, so the result depends only on the score and
/// never on the order buckets were supplied in. Scores below every threshold take
/// the lowest bucket's color; a missing (or NaN) score takes `no_data`.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorBuckets {
    buckets: Vec<Bucket>,
    no_data: Color,
}

impl ColorBuckets {
    pub fn new(buckets: impl IntoIterator<Item = Bucket>, no_data: Color) -> Self {
        let mut buckets: Vec<Bucket> = buckets
            .into_iter()
            .filter(|b| b.threshold.is_finite())
            .collect();
        buckets.sort_by(|a, b| b.threshold.total_cmp(&a.threshold));
        buckets.dedup_by(|later, earlier| later.threshold == earlier.threshold);
        Self { buckets, no_data }
    }

    pub fn color_for(&self, score: Option<f64>) -> Color {
        let Some(score) = score.filter(|s| !s.is_nan()) else {
            return self.no_data;
        };
        self.buckets
            .iter()
            .find(|b| score >= b.threshold)
            .or_else(|| self.buckets.last())
            .map(|b| b.color)
            .unwrap_or(self.no_data)
    }

    pub fn no_data(&self) -> Color {
        self.no_data
    }

    /// Buckets in evaluation order (highest threshold first).
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }
}

pub fn default_buckets() -> Vec<Bucket> {
    vec![
        Bucket::new(70.0, Color::GREEN),
        Bucket::new(55.0, Color::AMBER),
        Bucket::new(40.0, Color::ORANGE),
        Bucket::new(0.0, Color::RED),
    ]
}

impl Default for ColorBuckets {
    fn default() -> Self {
        Self::new(default_buckets(), Color::NEUTRAL)
    }
}
