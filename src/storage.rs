//! Loading and saving chart data sets.
//!
//! CSV and JSON are supported, picked by file extension. CSV layouts:
//! - series: `series,x,y,label` (label optional), one row per point; rows of one
//!   series keep their file order
//! - bubbles: `id,label,magnitude,color` with `#RRGGBB` colours
//! - scores: `code,score`

use crate::charts::GrowthData;
use crate::error::{Result, VizError};
use crate::models::{BubbleItem, ScoreTable, Series, SeriesPoint};
use csv::{ReaderBuilder, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Json,
}

impl DataFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(DataFormat::Csv),
            Some("json") => Ok(DataFormat::Json),
            _ => Err(VizError::Config(format!(
                "{}: expected a .csv or .json file",
                path.display()
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeriesRow {
    series: String,
    x: f64,
    y: f64,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScoreRow {
    code: String,
    score: f64,
}

fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let f = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(f))?)
}

fn read_csv<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Vec<T>> {
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;
    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Series from a long-format CSV, in order of first appearance.
pub fn load_series_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Series>> {
    let mut out: Vec<Series> = Vec::new();
    for row in read_csv::<SeriesRow, _>(path)? {
        let point = SeriesPoint {
            x: row.x,
            y: row.y,
            label: row.label.filter(|l| !l.is_empty()),
        };
        match out.iter_mut().find(|s| s.key == row.series) {
            Some(s) => s.points.push(point),
            None => out.push(Series::new(row.series, vec![point])),
        }
    }
    Ok(out)
}

/// One series makes a line chart, two a growth-gap chart. Extra series are ignored.
pub fn growth_from_series(mut series: Vec<Series>) -> Result<GrowthData> {
    if series.len() > 2 {
        log::warn!("{} series given, only the first two are drawn", series.len());
        series.truncate(2);
    }
    let mut it = series.into_iter();
    match (it.next(), it.next()) {
        (Some(a), Some(b)) => Ok(GrowthData::pair(a, b)),
        (Some(a), None) => Ok(GrowthData::single(a)),
        _ => Err(VizError::Config("no series in input".into())),
    }
}

/// Growth chart input: long-format CSV or a `GrowthData` JSON document.
pub fn load_growth<P: AsRef<Path>>(path: P) -> Result<GrowthData> {
    let path = path.as_ref();
    match DataFormat::from_path(path)? {
        DataFormat::Csv => growth_from_series(load_series_csv(path)?),
        DataFormat::Json => read_json(path),
    }
}

pub fn load_bubbles<P: AsRef<Path>>(path: P) -> Result<Vec<BubbleItem>> {
    let path = path.as_ref();
    match DataFormat::from_path(path)? {
        DataFormat::Csv => read_csv(path),
        DataFormat::Json => read_json(path),
    }
}

pub fn load_scores<P: AsRef<Path>>(path: P) -> Result<ScoreTable> {
    let path = path.as_ref();
    match DataFormat::from_path(path)? {
        DataFormat::Csv => {
            let mut table = ScoreTable::new();
            for row in read_csv::<ScoreRow, _>(path)? {
                if !row.score.is_finite() {
                    log::warn!("skipping non-finite score for {}", row.code);
                    continue;
                }
                table.insert(&row.code, row.score);
            }
            Ok(table)
        }
        DataFormat::Json => read_json(path),
    }
}

/// Save series in the long CSV layout [`load_series_csv`] reads.
pub fn save_series_csv<P: AsRef<Path>>(series: &[Series], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("series", "x", "y", "label"))?;
    for s in series {
        for p in &s.points {
            wtr.serialize((&s.key, p.x, p.y, p.label.as_deref().unwrap_or("")))?;
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_bubbles_csv<P: AsRef<Path>>(items: &[BubbleItem], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("id", "label", "magnitude", "color"))?;
    for b in items {
        wtr.serialize((&b.id, &b.label, b.magnitude, b.color.to_hex()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save any data set as pretty JSON.
pub fn save_json<T: Serialize + ?Sized, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(value)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
