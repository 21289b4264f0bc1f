//! Decoding of world geometry documents into [`Region`]s.
//!
//! Accepts TopoJSON topologies (quantized or not) and plain GeoJSON feature
//! collections. Geometries that are not polygons, reference missing arcs or fail
//! to parse are skipped with a debug log; only a document whose top-level shape is
//! wrong is an error.

use super::iso::alpha3_from_numeric;
use super::projection::GeoPoint;
use super::{Region, Ring};
use crate::error::{Result, VizError};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Document {
    Topology(Topology),
    FeatureCollection(FeatureCollection),
}

/// TopoJSON topology (position 0 of the format: shared arcs + named objects).
#[derive(Debug, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub transform: Option<TopoTransform>,
    pub arcs: Vec<Vec<Vec<f64>>>,
    pub objects: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TopoTransform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum TopoGeometry {
    GeometryCollection {
        geometries: Vec<Value>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        #[serde(default, deserialize_with = "de_code_from_string_or_number")]
        id: Option<String>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        #[serde(default, deserialize_with = "de_code_from_string_or_number")]
        id: Option<String>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default, deserialize_with = "de_code_from_string_or_number")]
    id: Option<String>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    geometry: Option<GeoGeometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoGeometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    #[serde(other)]
    Unsupported,
}

/// Serde helper: region ids are strings in some files and numbers in others
/// (world-atlas uses numeric ISO codes). Normalize both to a string.
fn de_code_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct CodeVisitor;

    impl<'de> Visitor<'de> for CodeVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a string or integer region id")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
            Ok(Some(format!("{}", v.trunc() as i64)))
        }

        fn visit_str<E: de::Error>(self, s: &str) -> std::result::Result<Self::Value, E> {
            Ok(Some(s.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(CodeVisitor)
}

/// Parse a TopoJSON or GeoJSON document into regions.
pub fn parse_regions(bytes: &[u8]) -> Result<Vec<Region>> {
    let v: Value = serde_json::from_slice(bytes)?;
    regions_from_value(v)
}

pub fn regions_from_value(v: Value) -> Result<Vec<Region>> {
    let kind = v
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("<missing>")
        .to_string();
    let doc: Document = serde_json::from_value(v)
        .map_err(|e| VizError::UnsupportedGeometry(format!("type {kind}: {e}")))?;
    Ok(match doc {
        Document::Topology(topo) => topology_regions(&topo),
        Document::FeatureCollection(fc) => fc
            .features
            .into_iter()
            .filter_map(|f| match serde_json::from_value::<Feature>(f) {
                Ok(f) => feature_region(f),
                Err(e) => {
                    log::debug!("skipping feature: {e}");
                    None
                }
            })
            .collect(),
    })
}

/// All polygonal geometries of every object in the topology, in document order.
pub fn topology_regions(topo: &Topology) -> Vec<Region> {
    let arcs = decode_arcs(topo);
    let mut out = Vec::new();
    for object in topo.objects.values() {
        collect_geometry(object.clone(), &arcs, &mut out);
    }
    out
}

/// Absolute coordinates of every arc (undoing quantization and delta encoding).
fn decode_arcs(topo: &Topology) -> Vec<Vec<GeoPoint>> {
    topo.arcs
        .iter()
        .map(|arc| match topo.transform {
            Some(t) => {
                let (mut x, mut y) = (0.0, 0.0);
                arc.iter()
                    .filter(|p| p.len() >= 2)
                    .map(|p| {
                        x += p[0];
                        y += p[1];
                        GeoPoint::new(
                            x * t.scale[0] + t.translate[0],
                            y * t.scale[1] + t.translate[1],
                        )
                    })
                    .collect()
            }
            None => arc
                .iter()
                .filter(|p| p.len() >= 2)
                .map(|p| GeoPoint::new(p[0], p[1]))
                .collect(),
        })
        .collect()
}

fn collect_geometry(v: Value, arcs: &[Vec<GeoPoint>], out: &mut Vec<Region>) {
    let geometry = match serde_json::from_value::<TopoGeometry>(v) {
        Ok(g) => g,
        Err(e) => {
            log::debug!("skipping geometry: {e}");
            return;
        }
    };
    match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for g in geometries {
                collect_geometry(g, arcs, out);
            }
        }
        TopoGeometry::Polygon {
            arcs: rings,
            id,
            properties,
        } => {
            if let Some(polygon) = stitch_polygon(&rings, arcs) {
                out.push(make_region(id, properties.as_ref(), vec![polygon]));
            }
        }
        TopoGeometry::MultiPolygon {
            arcs: polygons,
            id,
            properties,
        } => {
            let polygons: Vec<Vec<Ring>> = polygons
                .iter()
                .filter_map(|rings| stitch_polygon(rings, arcs))
                .collect();
            if !polygons.is_empty() {
                out.push(make_region(id, properties.as_ref(), polygons));
            }
        }
        TopoGeometry::Unsupported => {}
    }
}

/// Join arcs into rings; a negative index `i` means arc `!i` reversed.
fn stitch_polygon(rings: &[Vec<i64>], arcs: &[Vec<GeoPoint>]) -> Option<Vec<Ring>> {
    let mut polygon = Vec::with_capacity(rings.len());
    for ring_arcs in rings {
        let mut ring: Ring = Vec::new();
        for &index in ring_arcs {
            let (slot, reversed) = if index >= 0 {
                (index as usize, false)
            } else {
                ((!index) as usize, true)
            };
            let Some(arc) = arcs.get(slot) else {
                log::debug!("arc index {index} out of bounds");
                return None;
            };
            let points: Box<dyn Iterator<Item = &GeoPoint>> = if reversed {
                Box::new(arc.iter().rev())
            } else {
                Box::new(arc.iter())
            };
            let skip = usize::from(!ring.is_empty());
            ring.extend(points.skip(skip).copied());
        }
        if ring.len() >= 3 {
            polygon.push(ring);
        }
    }
    (!polygon.is_empty()).then_some(polygon)
}

fn feature_region(f: Feature) -> Option<Region> {
    let to_ring = |ring: &Vec<Vec<f64>>| -> Ring {
        ring.iter()
            .filter(|p| p.len() >= 2)
            .map(|p| GeoPoint::new(p[0], p[1]))
            .collect()
    };
    let polygons: Vec<Vec<Ring>> = match f.geometry? {
        GeoGeometry::Polygon { coordinates } => vec![coordinates.iter().map(to_ring).collect()],
        GeoGeometry::MultiPolygon { coordinates } => coordinates
            .iter()
            .map(|poly| poly.iter().map(to_ring).collect())
            .collect(),
        GeoGeometry::Unsupported => return None,
    };
    let polygons: Vec<Vec<Ring>> = polygons
        .into_iter()
        .map(|rings: Vec<Ring>| rings.into_iter().filter(|r| r.len() >= 3).collect::<Vec<_>>())
        .filter(|rings| !rings.is_empty())
        .collect();
    if polygons.is_empty() {
        return None;
    }
    Some(make_region(f.id, f.properties.as_ref(), polygons))
}

fn make_region(id: Option<String>, props: Option<&Map<String, Value>>, polygons: Vec<Vec<Ring>>) -> Region {
    let name = prop_str(props, &["name", "NAME", "admin", "ADMIN"]);
    let code = resolve_code(id.as_deref(), props)
        .or_else(|| name.clone())
        .unwrap_or_default();
    Region {
        name: name.unwrap_or_else(|| code.clone()),
        code,
        polygons,
    }
}

fn prop_str(props: Option<&Map<String, Value>>, keys: &[&str]) -> Option<String> {
    let props = props?;
    keys.iter()
        .filter_map(|k| props.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// `iso_a3` property, else an alpha-3 id, else a numeric ISO-3166 id.
pub fn resolve_code(id: Option<&str>, props: Option<&Map<String, Value>>) -> Option<String> {
    if let Some(code) = prop_str(props, &["iso_a3", "ISO_A3", "iso3"]).filter(|c| c != "-99") {
        return Some(code.to_ascii_uppercase());
    }
    let id = id?.trim();
    if id.len() == 3 && id.chars().all(|c| c.is_ascii_alphabetic()) {
        return Some(id.to_ascii_uppercase());
    }
    id.parse::<u16>()
        .ok()
        .and_then(alpha3_from_numeric)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_and_numeric_ids_resolve() {
        assert_eq!(resolve_code(Some("840"), None).as_deref(), Some("USA"));
        assert_eq!(resolve_code(Some("036"), None).as_deref(), Some("AUS"));
        assert_eq!(resolve_code(Some("deu"), None).as_deref(), Some("DEU"));
        assert_eq!(resolve_code(Some("-99"), None), None);
        let mut props = Map::new();
        props.insert("iso_a3".into(), Value::String("fra".into()));
        assert_eq!(resolve_code(Some("250"), Some(&props)).as_deref(), Some("FRA"));
    }

    #[test]
    fn reversed_arcs_are_walked_backwards() {
        let arcs = vec![
            vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0), GeoPoint::new(1.0, 1.0)],
            vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0), GeoPoint::new(1.0, 1.0)],
        ];
        let poly = stitch_polygon(&[vec![0, !1]], &arcs).unwrap();
        let ring = &poly[0];
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[3], GeoPoint::new(0.0, 1.0));
        assert_eq!(ring.first(), ring.last());
        assert!(stitch_polygon(&[vec![7]], &arcs).is_none());
    }
}
