use dataset::{Feature, GeoPoint, Geometry};

/// Finds the feature under a geographic position.
///
/// Ordering contract: the lowest index wins when shapes overlap, so picking
/// is deterministic for the same feature list.
pub fn pick_feature(features: &[&Feature], lon_deg: f64, lat_deg: f64) -> Option<usize> {
    features
        .iter()
        .position(|feature| geometry_contains(&feature.geometry, lon_deg, lat_deg))
}

/// Even-odd containment over all rings of the geometry.
///
/// XOR-ing ring membership handles holes without classifying rings: a point
/// inside both the outer ring and a hole toggles back to outside.
pub fn geometry_contains(geometry: &Geometry, lon_deg: f64, lat_deg: f64) -> bool {
    match geometry {
        Geometry::Point(_) => false,
        Geometry::Polygon(rings) => polygon_contains(rings, lon_deg, lat_deg),
        Geometry::MultiPolygon(polys) => polys
            .iter()
            .any(|rings| polygon_contains(rings, lon_deg, lat_deg)),
    }
}

fn polygon_contains(rings: &[Vec<GeoPoint>], lon_deg: f64, lat_deg: f64) -> bool {
    rings
        .iter()
        .fold(false, |inside, ring| inside ^ ring_contains(ring, lon_deg, lat_deg))
}

/// Ray-cast point-in-ring test (crossings to the east of the point).
fn ring_contains(ring: &[GeoPoint], lon_deg: f64, lat_deg: f64) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = (ring[i].lon_deg, ring[i].lat_deg);
        let (xj, yj) = (ring[j].lon_deg, ring[j].lat_deg);
        if (yi > lat_deg) != (yj > lat_deg)
            && lon_deg < (xj - xi) * (lat_deg - yi) / (yj - yi) + xi
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
