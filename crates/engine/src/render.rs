use crate::hover::Tooltip;
use crate::map::MapEngine;

/// One feature outline in screen space, ready to stroke/fill.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapePath {
    pub name: String,
    pub rings: Vec<Vec<[f64; 2]>>,
    /// Paint color if the feature is highlighted; neutral fill otherwise.
    pub fill: Option<String>,
}

/// A marker projected through the camera; moves with pan/zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub position_px: [f64; 2],
    pub label: String,
    pub icon: String,
}

/// An annotation resolved from canvas percentages to pixels; ignores the
/// camera entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedAnnotation {
    pub position_px: [f64; 2],
    pub text: String,
}

/// Everything a renderer needs for one frame, fully projected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderSnapshot {
    pub shapes: Vec<ShapePath>,
    pub markers: Vec<PlacedMarker>,
    pub annotations: Vec<PlacedAnnotation>,
    pub tooltip: Option<Tooltip>,
}

/// Projects the engine's current state into screen space.
///
/// Pure read: extraction never mutates the engine, so callers may extract as
/// often as they repaint.
pub fn extract(engine: &MapEngine) -> RenderSnapshot {
    let camera = engine.camera();
    let config = engine.config();
    let [vw, vh] = camera.viewport();

    let shapes = engine
        .visible_features()
        .map(|(name, feature)| ShapePath {
            name: name.to_string(),
            rings: feature
                .geometry
                .rings()
                .iter()
                .map(|ring| {
                    ring.iter()
                        .map(|p| camera.project(p.lon_deg, p.lat_deg))
                        .collect()
                })
                .collect(),
            fill: config.highlight.get(name).cloned(),
        })
        .collect();

    let markers = config
        .markers
        .iter()
        .filter_map(|marker| {
            let position_px = camera.project(marker.lon, marker.lat);
            // A marker at a projection singularity has no screen position.
            if !position_px[0].is_finite() || !position_px[1].is_finite() {
                return None;
            }
            Some(PlacedMarker {
                position_px,
                label: marker.label.clone(),
                icon: marker.icon.clone(),
            })
        })
        .collect();

    let annotations = config
        .annotations
        .iter()
        .map(|annotation| PlacedAnnotation {
            position_px: [annotation.x / 100.0 * vw, annotation.y / 100.0 * vh],
            text: annotation.text.clone(),
        })
        .collect();

    RenderSnapshot {
        shapes,
        markers,
        annotations,
        tooltip: engine.tooltip().cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::extract;
    use crate::config::MapConfiguration;
    use crate::map::{EngineEvent, MapEngine};
    use dataset::{Feature, FeatureSet, GeoPoint, Geometry};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const VIEWPORT: [f64; 2] = [800.0, 600.0];

    fn state(name: &str, lon: f64, lat: f64) -> Feature {
        let half = 0.5;
        Feature {
            id: None,
            properties: json!({"state": name}).as_object().cloned().unwrap_or_default(),
            geometry: Geometry::Polygon(vec![vec![
                GeoPoint::new(lon - half, lat - half),
                GeoPoint::new(lon + half, lat - half),
                GeoPoint::new(lon + half, lat + half),
                GeoPoint::new(lon - half, lat + half),
                GeoPoint::new(lon - half, lat - half),
            ]]),
        }
    }

    fn engine_with_states() -> MapEngine {
        let mut engine = MapEngine::new(MapConfiguration::for_scope("nigeria"), VIEWPORT);
        let generation = engine
            .drain_events()
            .into_iter()
            .find_map(|event| match event {
                EngineEvent::LoadRequested(req) => Some(req.generation),
                _ => None,
            })
            .expect("load request");
        let set = FeatureSet {
            features: vec![state("Lagos", 3.4, 6.5), state("Kano", 8.5, 11.9)],
        };
        engine.apply_dataset(generation, Ok(set));
        engine
    }

    #[test]
    fn highlighted_shapes_carry_their_fill() {
        let mut engine = engine_with_states();
        engine.set_brush_color("#abcdef");
        engine.handle_click(engine.camera().project(3.4, 6.5));

        let snapshot = extract(&engine);
        assert_eq!(snapshot.shapes.len(), 2);
        let lagos = snapshot
            .shapes
            .iter()
            .find(|s| s.name == "Lagos")
            .expect("lagos shape");
        assert_eq!(lagos.fill.as_deref(), Some("#abcdef"));
        assert_eq!(lagos.rings.len(), 1);
        assert_eq!(lagos.rings[0].len(), 5);

        let kano = snapshot.shapes.iter().find(|s| s.name == "Kano").expect("kano");
        assert_eq!(kano.fill, None);
    }

    #[test]
    fn markers_follow_the_camera_annotations_do_not() {
        let mut engine = engine_with_states();
        engine.add_marker(6.5244, 3.3792, "Ikeja", "pin");
        engine.add_annotation(25.0, 75.0, "Coastal belt");

        let before = extract(&engine);
        assert_eq!(before.annotations[0].position_px, [200.0, 450.0]);
        let marker_before = before.markers[0].position_px;

        engine.zoom_by(2.0);
        let after = extract(&engine);
        assert!(after.markers[0].position_px != marker_before);
        assert_eq!(after.annotations[0].position_px, [200.0, 450.0]);
    }

    #[test]
    fn tooltip_rides_along() {
        let mut engine = engine_with_states();
        assert!(extract(&engine).tooltip.is_none());

        engine.pointer_moved(engine.camera().project(8.5, 11.9));
        let snapshot = extract(&engine);
        assert_eq!(snapshot.tooltip.map(|t| t.text), Some("Kano".to_string()));
    }
}
