use geomath::ring_centroid;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    pub fn position(&self) -> [f64; 2] {
        [self.lon_deg, self.lat_deg]
    }
}

/// Boundary geometry kinds the choropleth understands.
///
/// Administrative units arrive as Polygon or MultiPolygon; Point is kept for
/// datasets that carry capital/seat locations alongside the boundaries.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(GeoPoint),
    Polygon(Vec<Vec<GeoPoint>>),
    MultiPolygon(Vec<Vec<Vec<GeoPoint>>>),
}

impl Geometry {
    /// Visits every vertex as `[lon, lat]`.
    pub fn each_position<F: FnMut([f64; 2])>(&self, f: &mut F) {
        match self {
            Geometry::Point(p) => f(p.position()),
            Geometry::Polygon(rings) => {
                for ring in rings {
                    for p in ring {
                        f(p.position());
                    }
                }
            }
            Geometry::MultiPolygon(polys) => {
                for rings in polys {
                    for ring in rings {
                        for p in ring {
                            f(p.position());
                        }
                    }
                }
            }
        }
    }

    /// All polygon rings, outer ring first per polygon. Points yield nothing.
    pub fn rings(&self) -> Vec<&[GeoPoint]> {
        match self {
            Geometry::Point(_) => Vec::new(),
            Geometry::Polygon(rings) => rings.iter().map(Vec::as_slice).collect(),
            Geometry::MultiPolygon(polys) => polys
                .iter()
                .flat_map(|rings| rings.iter().map(Vec::as_slice))
                .collect(),
        }
    }

    /// Representative anchor position: the point itself, or the centroid of
    /// the first outer ring.
    pub fn anchor(&self) -> Option<[f64; 2]> {
        match self {
            Geometry::Point(p) => Some(p.position()),
            Geometry::Polygon(rings) => outer_ring_centroid(rings.first()?),
            Geometry::MultiPolygon(polys) => outer_ring_centroid(polys.first()?.first()?),
        }
    }
}

fn outer_ring_centroid(ring: &[GeoPoint]) -> Option<[f64; 2]> {
    let positions: Vec<[f64; 2]> = ring.iter().map(GeoPoint::position).collect();
    ring_centroid(&positions)
}

/// One administrative unit: geometry plus descriptive properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

impl Feature {
    /// First non-empty string property among `keys`, trimmed.
    ///
    /// Boundary datasets from different providers disagree on which key
    /// carries a given attribute, so lookups always probe an ordered list.
    pub fn string_property(&self, keys: &[&str]) -> Option<&str> {
        for key in keys {
            if let Some(Value::String(s)) = self.properties.get(*key) {
                let trimmed = s.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed);
                }
            }
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureSet {
    pub features: Vec<Feature>,
}

impl FeatureSet {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn from_geojson_str(payload: &str) -> Result<Self, FeatureSetError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| FeatureSetError::InvalidFeature {
                index: 0,
                reason: format!("JSON parse error: {e}"),
            })?;
        Self::from_geojson_value(value)
    }

    pub fn from_geojson_value(value: Value) -> Result<Self, FeatureSetError> {
        let obj = value
            .as_object()
            .ok_or(FeatureSetError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(FeatureSetError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(FeatureSetError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(FeatureSetError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.iter().enumerate() {
            features.push(parse_feature(index, feat_val)?);
        }

        Ok(Self { features })
    }
}

#[derive(Debug)]
pub enum FeatureSetError {
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for FeatureSetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureSetError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            FeatureSetError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for FeatureSetError {}

fn parse_feature(index: usize, value: &Value) -> Result<Feature, FeatureSetError> {
    let obj = value
        .as_object()
        .ok_or_else(|| FeatureSetError::InvalidFeature {
            index,
            reason: "feature must be an object".to_string(),
        })?;

    let feat_type =
        obj.get("type")
            .and_then(|v| v.as_str())
            .ok_or_else(|| FeatureSetError::InvalidFeature {
                index,
                reason: "feature missing type".to_string(),
            })?;
    if feat_type != "Feature" {
        return Err(FeatureSetError::InvalidFeature {
            index,
            reason: format!("unexpected feature type: {feat_type}"),
        });
    }

    let id = match obj.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let properties = obj
        .get("properties")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    let geometry_val = obj
        .get("geometry")
        .ok_or_else(|| FeatureSetError::InvalidFeature {
            index,
            reason: "feature missing geometry".to_string(),
        })?;
    let geometry = parse_geometry(geometry_val)
        .map_err(|reason| FeatureSetError::InvalidFeature { index, reason })?;

    Ok(Feature {
        id,
        properties,
        geometry,
    })
}

fn parse_geometry(value: &Value) -> Result<Geometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(Geometry::Point(parse_point(coords)?)),
        "Polygon" => Ok(Geometry::Polygon(parse_rings(coords)?)),
        "MultiPolygon" => Ok(Geometry::MultiPolygon(parse_multi_polygon(coords)?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<GeoPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("Point coordinates must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("Point coordinates must have [lon, lat]".to_string());
    }
    let lon = arr[0]
        .as_f64()
        .ok_or("Point lon must be a number".to_string())?;
    let lat = arr[1]
        .as_f64()
        .ok_or("Point lat must be a number".to_string())?;
    Ok(GeoPoint::new(lon, lat))
}

fn parse_ring(coords: &Value) -> Result<Vec<GeoPoint>, String> {
    let arr = coords
        .as_array()
        .ok_or("ring coordinates must be an array".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        out.push(parse_point(item)?);
    }
    Ok(out)
}

fn parse_rings(coords: &Value) -> Result<Vec<Vec<GeoPoint>>, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    let mut out = Vec::with_capacity(rings.len());
    for ring in rings {
        out.push(parse_ring(ring)?);
    }
    Ok(out)
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Vec<GeoPoint>>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    let mut out = Vec::with_capacity(polys.len());
    for poly in polys {
        out.push(parse_rings(poly)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{FeatureSet, FeatureSetError, Geometry};

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": 12,
                "properties": {"state": "Lagos", "code": "LA"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[3.0, 6.0], [4.0, 6.0], [4.0, 7.0], [3.0, 7.0], [3.0, 6.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"state": "  Rivers "},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[6.5, 4.5], [7.5, 4.5], [7.5, 5.5], [6.5, 5.5], [6.5, 4.5]]],
                        [[[6.0, 4.0], [6.2, 4.0], [6.2, 4.2], [6.0, 4.2], [6.0, 4.0]]]
                    ]
                }
            }
        ]
    }"#;

    #[test]
    fn parses_polygons_and_multipolygons() {
        let set = FeatureSet::from_geojson_str(SAMPLE).expect("parse");
        assert_eq!(set.len(), 2);
        assert_eq!(set.features[0].id.as_deref(), Some("12"));
        assert!(matches!(set.features[0].geometry, Geometry::Polygon(_)));
        assert!(matches!(
            set.features[1].geometry,
            Geometry::MultiPolygon(_)
        ));
        assert_eq!(set.features[1].geometry.rings().len(), 2);
    }

    #[test]
    fn string_property_probes_and_trims() {
        let set = FeatureSet::from_geojson_str(SAMPLE).expect("parse");
        let f = &set.features[1];
        assert_eq!(f.string_property(&["missing", "state"]), Some("Rivers"));
        assert_eq!(f.string_property(&["missing"]), None);
    }

    #[test]
    fn each_position_visits_every_vertex() {
        let set = FeatureSet::from_geojson_str(SAMPLE).expect("parse");
        let mut count = 0;
        set.features[1].geometry.each_position(&mut |_| count += 1);
        assert_eq!(count, 10);
    }

    #[test]
    fn anchor_is_outer_ring_mean() {
        let set = FeatureSet::from_geojson_str(SAMPLE).expect("parse");
        let anchor = set.features[0].geometry.anchor().expect("anchor");
        assert!((anchor[0] - 3.4).abs() < 1e-9);
        assert!((anchor[1] - 6.4).abs() < 1e-9);
    }

    #[test]
    fn rejects_unsupported_geometry_kind() {
        let payload = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {},
                "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}
            }]
        }"#;
        let err = FeatureSet::from_geojson_str(payload).unwrap_err();
        match err {
            FeatureSetError::InvalidFeature { index, reason } => {
                assert_eq!(index, 0);
                assert!(reason.contains("LineString"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_non_collections() {
        let err = FeatureSet::from_geojson_str(r#"{"type": "Feature"}"#).unwrap_err();
        assert!(matches!(err, FeatureSetError::NotAFeatureCollection));
    }
}
