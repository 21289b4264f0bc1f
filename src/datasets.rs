//! Built-in sample data sets, one per chart.

use crate::charts::{ChartData, ChartKind, GrowthData};
use crate::color::Color;
use crate::geo::GeometrySource;
use crate::models::{BubbleItem, ScoreTable, Series, SeriesPoint};
use std::sync::Arc;

const TIMELINE: [(f64, &str, f64, &str, f64); 6] = [
    (2020.0, "GPT-3 launches", 30.0, "EU proposes AI Act", 25.0),
    (2021.0, "AlphaFold 2 released", 40.0, "First AI ethics frameworks", 30.0),
    (2022.0, "Stable Diffusion & DALL-E 2", 55.0, "U.S. CHIPS Act", 35.0),
    (2023.0, "GPT-4 released", 75.0, "Global AI safety summit", 40.0),
    (2024.0, "Multimodal AI systems", 100.0, "International AI treaties", 45.0),
    (2025.0, "AI co-scientist systems", 130.0, "AI literacy programs", 50.0),
];

/// Capability vs. adaptation, 2020-2025, with one event label per point.
pub fn growth_gap() -> GrowthData {
    let ai = TIMELINE
        .iter()
        .map(|&(x, label, y, _, _)| SeriesPoint::labeled(x, y, label))
        .collect();
    let society = TIMELINE
        .iter()
        .map(|&(x, _, _, label, y)| SeriesPoint::labeled(x, y, label))
        .collect();
    let mut data = GrowthData::pair(
        Series::new("AI Advancement", ai),
        Series::new("Societal Adaptation", society),
    );
    data.x_domain = Some([2020.0, 2025.0]);
    data.y_domain = Some([0.0, 150.0]);
    data
}

/// The capability curve alone, as a plain line chart.
pub fn growth_line() -> GrowthData {
    let points: Vec<(f64, f64)> = TIMELINE.iter().map(|&(x, _, y, _, _)| (x, y)).collect();
    GrowthData::single(Series::from_xy("AI Advancement", &points))
}

/// Readiness by world region.
pub fn regional_readiness() -> Vec<BubbleItem> {
    [
        ("north-america", "North America", 65.0, Color::GREEN),
        ("europe", "Europe", 60.0, Color::AMBER),
        ("asia", "Asia", 50.0, Color::AMBER),
        ("south-america", "South America", 40.0, Color::ORANGE),
        ("africa", "Africa", 30.0, Color::RED),
        ("oceania", "Oceania", 55.0, Color::AMBER),
    ]
    .into_iter()
    .map(|(id, label, m, c)| BubbleItem::new(id, label, m, c))
    .collect()
}

/// Readiness scores by ISO alpha-3 country code.
pub fn country_readiness() -> ScoreTable {
    [
        ("USA", 68.0),
        ("CAN", 72.0),
        ("GBR", 65.0),
        ("DEU", 70.0),
        ("FRA", 63.0),
        ("ESP", 58.0),
        ("ITA", 55.0),
        ("JPN", 75.0),
        ("KOR", 73.0),
        ("AUS", 67.0),
        ("NZL", 66.0),
        ("CHN", 60.0),
        ("IND", 45.0),
        ("BRA", 48.0),
        ("RUS", 52.0),
        ("ZAF", 43.0),
        ("NGA", 35.0),
        ("EGY", 40.0),
        ("SAU", 55.0),
        ("ARE", 62.0),
    ]
    .into_iter()
    .collect()
}

/// Sample input for `kind`. Maps take their geometry from `source`.
pub fn sample(kind: ChartKind, source: Arc<dyn GeometrySource>) -> ChartData {
    match kind {
        ChartKind::Growth => ChartData::Growth(growth_gap()),
        ChartKind::Bubbles => ChartData::Bubbles(regional_readiness()),
        ChartKind::WorldMap => ChartData::WorldMap {
            scores: country_readiness(),
            source,
        },
    }
}
