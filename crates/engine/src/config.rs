use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::scope;

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 20.0;

/// Fill applied by a toggle-on before the operator picks a brush color.
pub const DEFAULT_BRUSH_COLOR: &str = "#2e7d32";

/// A labeled point bound to geographic coordinates; follows the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub label: String,
    #[serde(default = "default_marker_icon")]
    pub icon: String,
}

fn default_marker_icon() -> String {
    "pin".to_string()
}

/// Free-floating text bound to percentage-of-canvas coordinates; ignores the
/// projection entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// 0-100, fraction of canvas width.
    pub x: f64,
    /// 0-100, fraction of canvas height.
    pub y: f64,
    pub text: String,
}

/// The persisted unit of map state.
///
/// The engine never stores this anywhere: every mutation produces a new value
/// emitted through [`crate::map::EngineEvent::ConfigChanged`], and the owning
/// document editor round-trips it back in as the next render's input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfiguration {
    pub scope: String,
    /// Pan target as [longitude, latitude] in degrees.
    pub center: [f64; 2],
    pub zoom: f64,
    /// Feature name -> color hex. Absent key = unpainted (neutral fill).
    #[serde(default, deserialize_with = "deserialize_highlight")]
    pub highlight: BTreeMap<String, String>,
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl MapConfiguration {
    /// Fresh configuration with the scope's default view and no overlays.
    ///
    /// Zoom is pinned to 1 at the district tier, where the auto-fit owns the
    /// view and pan/zoom controls are disabled.
    pub fn for_scope(scope_name: &str) -> Self {
        let info = scope::resolve(scope_name);
        Self {
            scope: scope_name.trim().to_string(),
            center: info.default_center,
            zoom: 1.0,
            highlight: BTreeMap::new(),
            markers: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn clamp_zoom(zoom: f64) -> f64 {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    }

    /// Paints `name` with `color`, or un-paints it if already painted.
    pub fn toggle_highlight(&mut self, name: &str, color: &str) {
        if self.highlight.remove(name).is_none() {
            self.highlight.insert(name.to_string(), color.to_string());
        }
    }

    /// Overwrites the color of an already-painted feature. Membership is not
    /// changed; unpainted names are ignored.
    pub fn recolor(&mut self, name: &str, color: &str) -> bool {
        match self.highlight.get_mut(name) {
            Some(existing) => {
                *existing = color.to_string();
                true
            }
            None => false,
        }
    }
}

/// Accepts legacy highlight shapes at the boundary and normalizes them into
/// the canonical name -> color map. Older documents stored a single name
/// string or a bare list of names (pre-dating per-feature colors); those
/// entries get the default brush color. Core logic never sees these shapes.
fn deserialize_highlight<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(normalize_highlight(&value))
}

pub fn normalize_highlight(value: &Value) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    match value {
        Value::Object(map) => {
            for (name, color) in map {
                let color = color
                    .as_str()
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or(DEFAULT_BRUSH_COLOR);
                out.insert(name.clone(), color.to_string());
            }
        }
        Value::String(name) => {
            if !name.trim().is_empty() {
                out.insert(name.clone(), DEFAULT_BRUSH_COLOR.to_string());
            }
        }
        Value::Array(names) => {
            for item in names {
                if let Some(name) = item.as_str()
                    && !name.trim().is_empty()
                {
                    out.insert(name.to_string(), DEFAULT_BRUSH_COLOR.to_string());
                }
            }
        }
        _ => {}
    }
    out
}
