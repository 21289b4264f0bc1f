//! Growth-gap chart: one or two series over years, the gap between them filled,
//! per-point markers and labels, axes and an inline legend.
//!
//! With a single series the chart is a plain line chart with a labelled y axis.

use super::{ChartKind, Surface, Visualization};
use crate::color::Color;
use crate::config::{Interpolation, Options};
use crate::models::{Series, Size, extent};
use crate::scale::{Domain, PlotScales, ScaleModel};
use crate::viz::axis::{AxisRenderer, AxisSpec};
use crate::viz::curve::{CurveRenderer, GapHandle, SeriesHandle, SeriesStyle};
use crate::viz::legend::{Legend, LegendEntry};
use crate::viz::scene::{Node, NodeId, Style, Transform};
use crate::viz::types::TickFormat;
use crate::viz::util::nice_step;
use serde::{Deserialize, Serialize};

/// Space around the plot for axes and titles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

pub const MARGINS: Margins = Margins {
    top: 20.0,
    right: 30.0,
    bottom: 40.0,
    left: 50.0,
};

const GAP_OPACITY: f64 = 0.1;
const LABEL_FONT_PX: f64 = 8.0;
/// Label offsets: above primary points, below secondary points.
const PRIMARY_LABEL_DY: f64 = -10.0;
const SECONDARY_LABEL_DY: f64 = 15.0;

fn default_x_title() -> String {
    "Year".to_string()
}

fn default_gap_label() -> String {
    "Readiness Gap".to_string()
}

/// Input of the growth chart. Series keys double as legend labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthData {
    pub primary: Series,
    #[serde(default)]
    pub secondary: Option<Series>,
    #[serde(default)]
    pub x_domain: Option<[f64; 2]>,
    #[serde(default)]
    pub y_domain: Option<[f64; 2]>,
    #[serde(default = "default_x_title")]
    pub x_title: String,
    #[serde(default)]
    pub y_title: Option<String>,
    #[serde(default = "default_gap_label")]
    pub gap_label: String,
}

impl GrowthData {
    pub fn single(series: Series) -> Self {
        Self {
            primary: series,
            secondary: None,
            x_domain: None,
            y_domain: None,
            x_title: default_x_title(),
            y_title: Some("Value".to_string()),
            gap_label: default_gap_label(),
        }
    }

    pub fn pair(primary: Series, secondary: Series) -> Self {
        Self {
            secondary: Some(secondary),
            y_title: Some("Capability / Adaptation".to_string()),
            ..Self::single(primary)
        }
    }

    fn all_series(&self) -> impl Iterator<Item = &Series> {
        std::iter::once(&self.primary).chain(self.secondary.as_ref())
    }

    /// Given domain, else the x extent of all points.
    pub fn x_domain(&self) -> Domain {
        if let Some([lo, hi]) = self.x_domain {
            return Domain::new(lo, hi);
        }
        extent(self.all_series().flat_map(|s| s.points.iter().map(|p| p.x)))
            .map(|(lo, hi)| Domain::new(lo, hi))
            .unwrap_or(Domain::UNIT)
    }

    /// Given domain, else zero (or the minimum, if negative) up to the maximum plus
    /// 15 % of the span as headroom, rounded up to a whole tick step.
    pub fn y_domain(&self) -> Domain {
        if let Some([lo, hi]) = self.y_domain {
            return Domain::new(lo, hi);
        }
        let Some((lo, hi)) = extent(self.all_series().flat_map(|s| s.points.iter().map(|p| p.y)))
        else {
            return Domain::UNIT;
        };
        let lo = lo.min(0.0);
        if hi <= lo {
            return Domain::new(lo, lo);
        }
        let top = hi + (hi - lo) * 0.15;
        let step = nice_step((top - lo) / 5.0);
        Domain::new(lo, (top / step).ceil() * step)
    }
}

#[derive(Debug)]
pub struct GrowthChart {
    surface: Surface,
    scales: PlotScales,
    plot: NodeId,
    x_axis: AxisRenderer,
    y_axis: AxisRenderer,
    curves: CurveRenderer,
    primary: SeriesHandle,
    secondary: Option<SeriesHandle>,
    gap: Option<GapHandle>,
    legend: Option<Legend>,
}

fn plot_size(size: Size) -> Size {
    Size::new(
        size.width - MARGINS.left - MARGINS.right,
        size.height - MARGINS.top - MARGINS.bottom,
    )
    .sanitized()
}

impl GrowthChart {
    pub fn new(mut surface: Surface, data: GrowthData, options: &Options) -> Self {
        if !data.all_series().all(Series::is_strictly_increasing) {
            log::warn!("growth chart input has non-increasing x values; drawing as given");
        }
        let plot_px = plot_size(surface.size());
        let scales = PlotScales::new(data.x_domain(), data.y_domain(), plot_px);
        let scene = surface.scene_mut();
        let root = scene.root();
        let plot = scene.append(
            root,
            Node::group()
                .with_class("plot")
                .with_transform(Transform::translate(MARGINS.left, MARGINS.top)),
        );

        let y_format = if data.secondary.is_some() {
            TickFormat::Silent
        } else {
            TickFormat::Grouped
        };
        let x_spec = AxisSpec::bottom(options.tick_count, TickFormat::Integer)
            .with_title(data.x_title.clone())
            .with_locale(options.locale.clone());
        let mut y_spec = AxisSpec::left(5, y_format).with_locale(options.locale.clone());
        if let Some(t) = &data.y_title {
            y_spec = y_spec.with_title(t.clone());
        }
        let x_axis = AxisRenderer::new(scene, plot, x_spec);
        let y_axis = AxisRenderer::new(scene, plot, y_spec);
        x_axis.draw(scene, &scales.x, plot_px.height);
        y_axis.draw(scene, &scales.y, 0.0);

        let curves = CurveRenderer::new(plot);
        let primary_style =
            SeriesStyle::new(Color::BLUE, options.interpolation).with_tension(options.tension);
        let secondary_style = SeriesStyle::new(Color::GREEN, Interpolation::Linear);

        let mut primary = curves.draw_series(scene, &data.primary, &primary_style, &scales);
        let mut secondary = data
            .secondary
            .as_ref()
            .map(|s| curves.draw_series(scene, s, &secondary_style, &scales));
        let gap = data.secondary.as_ref().map(|b| {
            curves.draw_gap_area(
                scene,
                &data.primary,
                b,
                Style::filled(Color::RED).with_fill_opacity(GAP_OPACITY),
                &scales,
            )
        });

        curves.draw_markers(scene, &mut primary, options.marker_radius, Color::BLUE, &scales);
        if let Some(h) = secondary.as_mut() {
            curves.draw_markers(scene, h, options.marker_radius, Color::GREEN, &scales);
        }

        let legend = if let (Some(h), Some(s)) = (secondary.as_mut(), data.secondary.as_ref()) {
            curves.draw_labels(
                scene,
                &mut primary,
                &data.primary,
                PRIMARY_LABEL_DY,
                Style::text(Color::BLUE, LABEL_FONT_PX),
                &scales,
            );
            curves.draw_labels(
                scene,
                h,
                s,
                SECONDARY_LABEL_DY,
                Style::text(Color::GREEN, LABEL_FONT_PX),
                &scales,
            );
            let entries = [
                LegendEntry::line(data.primary.key.clone(), Color::BLUE, primary_style.stroke_width),
                LegendEntry::line(s.key.clone(), Color::GREEN, secondary_style.stroke_width),
                LegendEntry::area(data.gap_label.clone(), Color::RED, GAP_OPACITY),
            ];
            Some(Legend::draw(scene, plot, &entries, plot_px.width))
        } else {
            None
        };

        log::debug!("growth chart drew {} nodes", scene.len());
        Self {
            surface,
            scales,
            plot,
            x_axis,
            y_axis,
            curves,
            primary,
            secondary,
            gap,
            legend,
        }
    }

    pub fn scales(&self) -> &PlotScales {
        &self.scales
    }

    pub fn plot_group(&self) -> NodeId {
        self.plot
    }

    pub fn primary(&self) -> &SeriesHandle {
        &self.primary
    }

    pub fn secondary(&self) -> Option<&SeriesHandle> {
        self.secondary.as_ref()
    }

    pub fn gap(&self) -> Option<&GapHandle> {
        self.gap.as_ref()
    }

    pub fn x_axis(&self) -> &AxisRenderer {
        &self.x_axis
    }
}

impl Visualization for GrowthChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Growth
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }

    fn resize(&mut self, viewport: Size) {
        let size = self.surface.fit(viewport);
        let plot_px = plot_size(size);
        self.scales.invert_range(plot_px);
        log::debug!("growth chart resized to {}x{}", size.width, size.height);

        let scene = self.surface.scene_mut();
        self.x_axis.draw(scene, &self.scales.x, plot_px.height);
        self.y_axis.draw(scene, &self.scales.y, 0.0);
        self.curves.update_path(scene, &self.primary, &self.scales);
        if let Some(h) = &self.secondary {
            self.curves.update_path(scene, h, &self.scales);
        }
        if let Some(g) = &self.gap {
            self.curves.update_gap(scene, g, &self.scales);
        }
        if let Some(l) = &self.legend {
            l.place(scene, plot_px.width);
        }
    }
}
