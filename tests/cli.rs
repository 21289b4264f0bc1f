use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

const GEOJSON: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        { "type": "Feature", "id": "840", "properties": { "name": "United States" },
          "geometry": { "type": "Polygon", "coordinates": [[[-120,30],[-80,30],[-80,48],[-120,48],[-120,30]]] } },
        { "type": "Feature", "properties": { "name": "Germany", "iso_a3": "DEU" },
          "geometry": { "type": "Polygon", "coordinates": [[[6,47],[15,47],[15,55],[6,55],[6,47]]] } }
    ]
}"#;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("gapviz").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("gapviz"))
        .stdout(predicate::str::contains("render"));
}

#[test]
fn render_growth_svg_with_summary() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("growth.svg");
    let mut cmd = Command::cargo_bin("gapviz").unwrap();
    cmd.args(["render", "--chart", "growth", "--width", "680", "--resize", "380", "--summary", "-o"])
        .arg(&out);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("chart=growth size=380x300"))
        .stdout(predicate::str::contains("tick="))
        .stdout(predicate::str::contains("marker=12"));
    assert!(fs::read_to_string(&out).unwrap().contains("<svg"));
}

#[test]
fn render_map_from_local_geometry() {
    let dir = tempdir().unwrap();
    let geo = dir.path().join("world.geojson");
    fs::write(&geo, GEOJSON).unwrap();
    let out = dir.path().join("map.svg");
    let mut cmd = Command::cargo_bin("gapviz").unwrap();
    cmd.args(["render", "--chart", "map", "--width", "960", "--summary", "--geometry"])
        .arg(&geo)
        .arg("-o")
        .arg(&out);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("chart=map size=960x500"))
        .stdout(predicate::str::contains("region=2"));
    assert!(out.exists());
}

#[test]
fn render_bubbles_from_csv_data() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("b.csv");
    fs::write(&data, "id,label,magnitude,color\na,Alpha,40,#10B981\nb,Beta,20,#EF4444\n").unwrap();
    let out = dir.path().join("b.svg");
    let mut cmd = Command::cargo_bin("gapviz").unwrap();
    cmd.args(["render", "--chart", "bubbles", "--summary", "--data"])
        .arg(&data)
        .arg("-o")
        .arg(&out);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("bubble=2"));
}

#[test]
fn sample_writes_data_files() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("growth.csv");
    Command::cargo_bin("gapviz")
        .unwrap()
        .args(["sample", "--chart", "growth", "-o"])
        .arg(&csv)
        .assert()
        .success();
    let txt = fs::read_to_string(&csv).unwrap();
    assert!(txt.starts_with("series,x,y,label"));
    assert!(txt.contains("GPT-4 released"));

    let scores = dir.path().join("scores.csv");
    Command::cargo_bin("gapviz")
        .unwrap()
        .args(["sample", "--chart", "map", "-o"])
        .arg(&scores)
        .assert()
        .failure()
        .stderr(predicate::str::contains(".json"));
}

#[test]
fn invalid_width_is_rejected() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("gapviz")
        .unwrap()
        .args(["render", "--width", "0", "-o"])
        .arg(dir.path().join("x.svg"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--width"));
}
