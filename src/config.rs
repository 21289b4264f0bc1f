//! Rendering options.
//!
//! Every field has a default; option files may set any subset (camelCase keys) and
//! unset keys fall back silently. Values outside their meaningful range are
//! clamped by [`Options::sanitized`].
//!
//! ```
//! let opts = gapviz::Options::from_json_str(r#"{ "tickCount": 4, "interpolation": "linear" }"#)?;
//! assert_eq!(opts.tick_count, 4);
//! assert_eq!(opts.center_strength, 0.05);
//! # Ok::<(), gapviz::VizError>(())
//! ```

use crate::color::{Bucket, Color, ColorBuckets, default_buckets};
use crate::error::{Result, VizError};
use crate::geo::ProjectionKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a series path passes through its points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Straight segments.
    Linear,
    /// Cardinal spline through every point.
    #[default]
    Smoothed,
}

/// Steps for alpha to decay from 1 to `alpha_min` under the default decay rate.
const DEFAULT_TICKS: f64 = 300.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    pub tick_count: usize,
    pub interpolation: Interpolation,
    /// Cardinal spline tension in `[0, 1]`; 1 degenerates to straight segments.
    pub tension: f64,
    pub color_buckets: Vec<Bucket>,
    pub no_data_color: Color,
    pub zoom_extent: [f64; 2],
    pub center_strength: f64,
    pub collision_strength: f64,
    /// Per-tick alpha decay of the force layout.
    pub decay_rate: f64,
    /// Fraction of velocity lost per tick.
    pub velocity_decay: f64,
    pub alpha_min: f64,
    /// Alpha the layout is raised to when the container resizes.
    pub reheat_alpha: f64,
    /// `k` in `radius = k * sqrt(magnitude)`.
    pub radius_scale: f64,
    /// Minimum gap between two bubbles.
    pub collision_padding: f64,
    pub marker_radius: f64,
    pub projection: ProjectionKind,
    /// Locale tag for tick labels (`en`, `de`, `fr`, ...).
    pub locale: String,
}

impl Default for Options {
    fn default() -> Self {
        let alpha_min = 0.001f64;
        Self {
            tick_count: 6,
            interpolation: Interpolation::Smoothed,
            tension: 0.0,
            color_buckets: default_buckets(),
            no_data_color: Color::NEUTRAL,
            zoom_extent: [1.0, 8.0],
            center_strength: 0.05,
            collision_strength: 0.8,
            decay_rate: 1.0 - alpha_min.powf(1.0 / DEFAULT_TICKS),
            velocity_decay: 0.4,
            alpha_min,
            reheat_alpha: 0.3,
            radius_scale: 2.0,
            collision_padding: 20.0,
            marker_radius: 5.0,
            projection: ProjectionKind::NaturalEarth,
            locale: "en".to_string(),
        }
    }
}

impl Options {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let opts: Options = serde_json::from_str(s)?;
        Ok(opts.sanitized())
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| VizError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    pub fn buckets(&self) -> ColorBuckets {
        ColorBuckets::new(self.color_buckets.iter().copied(), self.no_data_color)
    }

    /// Clamp every field into its usable range, logging each correction.
    pub fn sanitized(mut self) -> Self {
        let d = Options::default();
        let fix = |name: &str, ok: bool, apply: &mut dyn FnMut()| {
            if !ok {
                log::warn!("option {name} out of range, using fallback");
                apply();
            }
        };

        let tc = self.tick_count;
        fix("tickCount", (1..=50).contains(&tc), &mut || self.tick_count = tc.clamp(1, 50));
        let t = self.tension;
        fix("tension", (0.0..=1.0).contains(&t), &mut || {
            self.tension = if t.is_finite() { t.clamp(0.0, 1.0) } else { d.tension }
        });
        let [z0, z1] = self.zoom_extent;
        fix(
            "zoomExtent",
            z0.is_finite() && z1.is_finite() && z0 > 0.0 && z0 <= z1,
            &mut || self.zoom_extent = d.zoom_extent,
        );
        let cs = self.center_strength;
        fix("centerStrength", (0.0..=1.0).contains(&cs), &mut || {
            self.center_strength = d.center_strength
        });
        // Strength must stay below 1 to avoid overshooting collisions.
        let col = self.collision_strength;
        fix("collisionStrength", col > 0.0 && col < 1.0, &mut || {
            self.collision_strength = d.collision_strength
        });
        let dr = self.decay_rate;
        fix("decayRate", dr > 0.0 && dr < 1.0, &mut || self.decay_rate = d.decay_rate);
        let vd = self.velocity_decay;
        fix("velocityDecay", (0.0..1.0).contains(&vd), &mut || {
            self.velocity_decay = d.velocity_decay
        });
        let am = self.alpha_min;
        fix("alphaMin", am > 0.0 && am < 1.0, &mut || self.alpha_min = d.alpha_min);
        let ra = self.reheat_alpha;
        fix("reheatAlpha", (0.0..=1.0).contains(&ra), &mut || {
            self.reheat_alpha = d.reheat_alpha
        });
        let rs = self.radius_scale;
        fix("radiusScale", rs.is_finite() && rs > 0.0, &mut || {
            self.radius_scale = d.radius_scale
        });
        let cp = self.collision_padding;
        fix("collisionPadding", cp.is_finite() && cp >= 0.0, &mut || {
            self.collision_padding = d.collision_padding
        });
        let mr = self.marker_radius;
        fix("markerRadius", mr.is_finite() && mr >= 0.0, &mut || {
            self.marker_radius = d.marker_radius
        });
        self
    }
}
