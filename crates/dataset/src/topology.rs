//! Topology-encoded boundary sets (TopoJSON).
//!
//! Some boundary providers ship quantized topologies instead of plain
//! FeatureCollections: shared borders are stored once as delta-encoded arcs,
//! and each geometry references arcs by index. Decoding is one conversion
//! step back to per-feature geometries; nothing downstream sees topology.

use serde_json::{Map, Value};

use crate::feature::{Feature, FeatureSet, GeoPoint, Geometry};

#[derive(Debug)]
pub enum TopologyError {
    NotATopology,
    MissingObject(String),
    InvalidArc { index: usize, reason: String },
    InvalidGeometry { reason: String },
}

impl std::fmt::Display for TopologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyError::NotATopology => write!(f, "expected TopoJSON Topology"),
            TopologyError::MissingObject(name) => {
                write!(f, "topology has no object named {name:?}")
            }
            TopologyError::InvalidArc { index, reason } => {
                write!(f, "invalid arc at index {index}: {reason}")
            }
            TopologyError::InvalidGeometry { reason } => {
                write!(f, "invalid topology geometry: {reason}")
            }
        }
    }
}

impl std::error::Error for TopologyError {}

/// Linear quantization transform: `position = delta_sum * scale + translate`.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

pub fn from_topojson_str(
    payload: &str,
    object_name: Option<&str>,
) -> Result<FeatureSet, TopologyError> {
    let value: Value = serde_json::from_str(payload).map_err(|e| TopologyError::InvalidArc {
        index: 0,
        reason: format!("JSON parse error: {e}"),
    })?;
    from_topojson_value(&value, object_name)
}

pub fn from_topojson_value(
    value: &Value,
    object_name: Option<&str>,
) -> Result<FeatureSet, TopologyError> {
    let obj = value.as_object().ok_or(TopologyError::NotATopology)?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or(TopologyError::NotATopology)?;
    if ty != "Topology" {
        return Err(TopologyError::NotATopology);
    }

    let transform = parse_transform(obj.get("transform"))?;
    let arcs = decode_arcs(obj.get("arcs"), transform)?;

    let objects = obj
        .get("objects")
        .and_then(|v| v.as_object())
        .ok_or(TopologyError::NotATopology)?;
    let target = match object_name {
        Some(name) => objects
            .get(name)
            .ok_or_else(|| TopologyError::MissingObject(name.to_string()))?,
        None => {
            // With exactly one object there is nothing to choose.
            let mut values = objects.values();
            match (values.next(), values.next()) {
                (Some(single), None) => single,
                _ => return Err(TopologyError::MissingObject("<unnamed>".to_string())),
            }
        }
    };

    let mut features = Vec::new();
    collect_features(target, transform, &arcs, &mut features)?;
    Ok(FeatureSet { features })
}

fn parse_transform(value: Option<&Value>) -> Result<Option<Transform>, TopologyError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let obj = value
        .as_object()
        .ok_or_else(|| TopologyError::InvalidGeometry {
            reason: "transform must be an object".to_string(),
        })?;
    let scale = parse_pair(obj.get("scale"), "transform.scale")?;
    let translate = parse_pair(obj.get("translate"), "transform.translate")?;
    Ok(Some(Transform { scale, translate }))
}

fn parse_pair(value: Option<&Value>, what: &str) -> Result<[f64; 2], TopologyError> {
    let arr = value
        .and_then(|v| v.as_array())
        .ok_or_else(|| TopologyError::InvalidGeometry {
            reason: format!("{what} must be a [x, y] array"),
        })?;
    if arr.len() != 2 {
        return Err(TopologyError::InvalidGeometry {
            reason: format!("{what} must have exactly two numbers"),
        });
    }
    let x = arr[0].as_f64().ok_or_else(|| TopologyError::InvalidGeometry {
        reason: format!("{what}[0] must be a number"),
    })?;
    let y = arr[1].as_f64().ok_or_else(|| TopologyError::InvalidGeometry {
        reason: format!("{what}[1] must be a number"),
    })?;
    Ok([x, y])
}

/// Decodes every arc to absolute geographic positions.
///
/// Quantized arcs accumulate integer deltas before the transform is applied;
/// unquantized topologies store absolute positions directly.
fn decode_arcs(
    value: Option<&Value>,
    transform: Option<Transform>,
) -> Result<Vec<Vec<GeoPoint>>, TopologyError> {
    let arcs_val = value
        .and_then(|v| v.as_array())
        .ok_or(TopologyError::NotATopology)?;

    let mut arcs = Vec::with_capacity(arcs_val.len());
    for (index, arc_val) in arcs_val.iter().enumerate() {
        let points_val = arc_val
            .as_array()
            .ok_or_else(|| TopologyError::InvalidArc {
                index,
                reason: "arc must be an array of positions".to_string(),
            })?;

        let mut arc = Vec::with_capacity(points_val.len());
        let mut acc = [0.0_f64, 0.0_f64];
        for point_val in points_val {
            let pair = parse_pair(Some(point_val), "arc position").map_err(|_| {
                TopologyError::InvalidArc {
                    index,
                    reason: "arc position must be [x, y]".to_string(),
                }
            })?;
            let position = match transform {
                Some(t) => {
                    acc[0] += pair[0];
                    acc[1] += pair[1];
                    [
                        acc[0] * t.scale[0] + t.translate[0],
                        acc[1] * t.scale[1] + t.translate[1],
                    ]
                }
                None => pair,
            };
            arc.push(GeoPoint::new(position[0], position[1]));
        }
        if arc.len() < 2 {
            return Err(TopologyError::InvalidArc {
                index,
                reason: "arc must have at least two positions".to_string(),
            });
        }
        arcs.push(arc);
    }
    Ok(arcs)
}

fn collect_features(
    value: &Value,
    transform: Option<Transform>,
    arcs: &[Vec<GeoPoint>],
    out: &mut Vec<Feature>,
) -> Result<(), TopologyError> {
    let obj = value
        .as_object()
        .ok_or_else(|| TopologyError::InvalidGeometry {
            reason: "geometry must be an object".to_string(),
        })?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| TopologyError::InvalidGeometry {
            reason: "geometry missing type".to_string(),
        })?;

    if ty == "GeometryCollection" {
        let geometries = obj
            .get("geometries")
            .and_then(|v| v.as_array())
            .ok_or_else(|| TopologyError::InvalidGeometry {
                reason: "GeometryCollection missing geometries".to_string(),
            })?;
        for geom in geometries {
            collect_features(geom, transform, arcs, out)?;
        }
        return Ok(());
    }

    let geometry = match ty {
        "Point" => {
            let pair = parse_pair(obj.get("coordinates"), "Point coordinates")?;
            let position = match transform {
                Some(t) => [
                    pair[0] * t.scale[0] + t.translate[0],
                    pair[1] * t.scale[1] + t.translate[1],
                ],
                None => pair,
            };
            Geometry::Point(GeoPoint::new(position[0], position[1]))
        }
        "Polygon" => Geometry::Polygon(assemble_rings(obj.get("arcs"), arcs)?),
        "MultiPolygon" => {
            let polys_val = obj.get("arcs").and_then(|v| v.as_array()).ok_or_else(|| {
                TopologyError::InvalidGeometry {
                    reason: "MultiPolygon missing arcs".to_string(),
                }
            })?;
            let mut polys = Vec::with_capacity(polys_val.len());
            for poly in polys_val {
                polys.push(assemble_rings(Some(poly), arcs)?);
            }
            Geometry::MultiPolygon(polys)
        }
        other => {
            return Err(TopologyError::InvalidGeometry {
                reason: format!("unsupported geometry type: {other}"),
            });
        }
    };

    let id = match obj.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    let properties: Map<String, Value> = obj
        .get("properties")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    out.push(Feature {
        id,
        properties,
        geometry,
    });
    Ok(())
}

fn assemble_rings(
    value: Option<&Value>,
    arcs: &[Vec<GeoPoint>],
) -> Result<Vec<Vec<GeoPoint>>, TopologyError> {
    let rings_val = value
        .and_then(|v| v.as_array())
        .ok_or_else(|| TopologyError::InvalidGeometry {
            reason: "Polygon missing arc indices".to_string(),
        })?;

    let mut rings = Vec::with_capacity(rings_val.len());
    for ring_val in rings_val {
        let indices = ring_val
            .as_array()
            .ok_or_else(|| TopologyError::InvalidGeometry {
                reason: "ring must be an array of arc indices".to_string(),
            })?;
        rings.push(stitch_ring(indices, arcs)?);
    }
    Ok(rings)
}

/// Concatenates referenced arcs into one ring.
///
/// A negative index `i` selects arc `!i` reversed. Consecutive arcs share
/// their junction point, so every arc after the first drops its first vertex.
fn stitch_ring(indices: &[Value], arcs: &[Vec<GeoPoint>]) -> Result<Vec<GeoPoint>, TopologyError> {
    let mut ring: Vec<GeoPoint> = Vec::new();
    for idx_val in indices {
        let raw = idx_val
            .as_i64()
            .ok_or_else(|| TopologyError::InvalidGeometry {
                reason: "arc index must be an integer".to_string(),
            })?;
        let (arc_index, reversed) = if raw < 0 {
            ((!raw) as usize, true)
        } else {
            (raw as usize, false)
        };
        let arc = arcs
            .get(arc_index)
            .ok_or_else(|| TopologyError::InvalidGeometry {
                reason: format!("arc index {raw} out of range"),
            })?;

        let mut points: Vec<GeoPoint> = arc.clone();
        if reversed {
            points.reverse();
        }
        if ring.is_empty() {
            ring.extend(points);
        } else {
            ring.extend(points.into_iter().skip(1));
        }
    }
    Ok(ring)
}
