//! Live geometry test. Run with: `cargo test --features online`
#![cfg(feature = "online")]

use gapviz::geo::{GeometrySource, HttpSource};

#[test]
fn world_atlas_resolves_to_alpha3_codes() {
    let regions = HttpSource::default().load().unwrap();
    assert!(regions.len() > 150, "only {} regions", regions.len());
    for code in ["USA", "DEU", "JPN", "BRA"] {
        assert!(regions.iter().any(|r| r.code == code), "missing {code}");
    }
}
