use gapviz::datasets;
use gapviz::storage::{self, DataFormat};
use gapviz::{VizError, models::Series};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn growth_json_round_trips_the_sample() {
    let dir = tempdir().unwrap();
    let p = dir.path().join("growth.json");
    let sample = datasets::growth_gap();
    storage::save_json(&sample, &p).unwrap();
    let txt = fs::read_to_string(&p).unwrap();
    assert!(txt.contains("\"xDomain\""));
    assert_eq!(storage::load_growth(&p).unwrap(), sample);
}

#[test]
fn growth_csv_keeps_labels_and_pairs_series() {
    let dir = tempdir().unwrap();
    let p = dir.path().join("growth.csv");
    let d = datasets::growth_gap();
    let series: Vec<Series> = std::iter::once(d.primary.clone()).chain(d.secondary.clone()).collect();
    storage::save_series_csv(&series, &p).unwrap();

    let loaded = storage::load_growth(&p).unwrap();
    assert_eq!(loaded.primary, d.primary);
    assert_eq!(loaded.secondary, d.secondary);
}

#[test]
fn more_than_two_series_are_truncated() {
    let dir = tempdir().unwrap();
    let p = dir.path().join("three.csv");
    fs::write(
        &p,
        "series,x,y\nA,1,1\nB,1,2\nC,1,3\nA,2,2\nB,2,3\nC,2,4\n",
    )
    .unwrap();
    let g = storage::load_growth(&p).unwrap();
    assert_eq!(g.primary.key, "A");
    assert_eq!(g.secondary.map(|s| s.key), Some("B".to_string()));
}

#[test]
fn bubbles_load_from_json_and_csv() {
    let dir = tempdir().unwrap();
    let items = datasets::regional_readiness();
    let json = dir.path().join("b.json");
    let csv = dir.path().join("b.csv");
    storage::save_json(&items, &json).unwrap();
    storage::save_bubbles_csv(&items, &csv).unwrap();
    assert_eq!(storage::load_bubbles(&json).unwrap(), items);
    assert_eq!(storage::load_bubbles(&csv).unwrap(), items);
    let csv_txt = fs::read_to_string(&csv).unwrap();
    assert!(csv_txt.starts_with("id,label,magnitude,color"));
    assert!(csv_txt.contains("#10B981"));
}

#[test]
fn scores_csv_skips_non_finite_values() {
    let dir = tempdir().unwrap();
    let p = dir.path().join("scores.csv");
    fs::write(&p, "code,score\nusa, 68\nDEU,NaN\n can ,72\n").unwrap();
    let t = storage::load_scores(&p).unwrap();
    assert_eq!(t.len(), 2);
    assert_eq!(t.get("USA"), Some(68.0));
    assert_eq!(t.get("CAN"), Some(72.0));
    assert_eq!(t.get("DEU"), None);
}

#[test]
fn scores_json_is_a_plain_object() {
    let dir = tempdir().unwrap();
    let p = dir.path().join("scores.json");
    fs::write(&p, r#"{ "USA": 68, "JPN": 75.5, "can": 72, " deu ": 70 }"#).unwrap();
    let t = storage::load_scores(&p).unwrap();
    assert_eq!(t.get("jpn"), Some(75.5));
    assert_eq!(t.get("CAN"), Some(72.0));
    assert_eq!(t.get("DEU"), Some(70.0));
}

#[test]
fn format_follows_the_extension() {
    assert_eq!(DataFormat::from_path(Path::new("a.CSV")).unwrap(), DataFormat::Csv);
    assert_eq!(DataFormat::from_path(Path::new("a.json")).unwrap(), DataFormat::Json);
    assert!(matches!(
        DataFormat::from_path(Path::new("a.xlsx")),
        Err(VizError::Config(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = storage::load_growth(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, VizError::Io(_)));
}
