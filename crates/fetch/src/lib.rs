//! Boundary dataset retrieval.
//!
//! The engine itself never touches the network: it emits
//! [`engine::EngineEvent::LoadRequested`] and expects the completed result
//! via [`engine::MapEngine::apply_dataset`]. This crate is the host-side
//! plumbing between the two.

use dataset::topology::{self, TopologyError};
use dataset::{FeatureSet, FeatureSetError};
use engine::{LoadRequest, MapEngine};
use serde_json::Value;
use tracing::{info, warn};

/// Payload-level decode failure, independent of transport.
#[derive(Debug)]
pub enum DecodeError {
    Json(serde_json::Error),
    GeoJson(FeatureSetError),
    Topology(TopologyError),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Json(e) => write!(f, "payload is not valid JSON: {e}"),
            DecodeError::GeoJson(e) => write!(f, "GeoJSON decode failed: {e}"),
            DecodeError::Topology(e) => write!(f, "topology decode failed: {e}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Json(e) => Some(e),
            DecodeError::GeoJson(e) => Some(e),
            DecodeError::Topology(e) => Some(e),
        }
    }
}

/// Transport + decode failure for one dataset fetch.
#[derive(Debug)]
pub enum FetchError {
    Http(reqwest::Error),
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    Decode {
        url: String,
        source: DecodeError,
    },
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Http(e) => write!(f, "HTTP request failed: {e}"),
            FetchError::Status { url, status } => {
                write!(f, "unexpected status {status} from {url}")
            }
            FetchError::Decode { url, source } => {
                write!(f, "could not decode payload from {url}: {source}")
            }
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Http(e) => Some(e),
            FetchError::Status { .. } => None,
            FetchError::Decode { source, .. } => Some(source),
        }
    }
}

/// Decodes a boundary payload, sniffing the container format.
///
/// Providers serve both plain GeoJSON FeatureCollections and topology-encoded
/// files from the same kind of endpoint, so the payload's own `type` field
/// decides, not the URL.
pub fn decode_payload(
    payload: &str,
    topology_object: Option<&str>,
) -> Result<FeatureSet, DecodeError> {
    let value: Value = serde_json::from_str(payload).map_err(DecodeError::Json)?;
    let kind = value.get("type").and_then(Value::as_str);
    if kind == Some("Topology") {
        topology::from_topojson_value(&value, topology_object).map_err(DecodeError::Topology)
    } else {
        FeatureSet::from_geojson_value(value).map_err(DecodeError::GeoJson)
    }
}

/// Thin HTTP client for boundary datasets. Clone-cheap; reuses one
/// connection pool across loads.
#[derive(Debug, Clone, Default)]
pub struct DatasetClient {
    client: reqwest::Client,
}

impl DatasetClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches and decodes the dataset a scope points at.
    pub async fn fetch(&self, dataset: &engine::DatasetRef) -> Result<FeatureSet, FetchError> {
        let response = self
            .client
            .get(&dataset.url)
            .send()
            .await
            .map_err(FetchError::Http)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: dataset.url.clone(),
                status,
            });
        }
        let body = response.text().await.map_err(FetchError::Http)?;
        decode_payload(&body, dataset.topology_object.as_deref()).map_err(|source| {
            FetchError::Decode {
                url: dataset.url.clone(),
                source,
            }
        })
    }
}

/// Services one load request end to end.
///
/// Failures are handed to the engine rather than returned: it owns the
/// degraded-but-interactive behavior, and its generation check drops results
/// that a newer scope change has superseded.
pub async fn run_load(client: &DatasetClient, engine: &mut MapEngine, request: LoadRequest) {
    match client.fetch(&request.dataset).await {
        Ok(set) => {
            info!(
                scope = %request.scope,
                generation = request.generation,
                features = set.len(),
                "dataset fetched"
            );
            engine.apply_dataset(request.generation, Ok(set));
        }
        Err(error) => {
            warn!(
                scope = %request.scope,
                generation = request.generation,
                %error,
                "dataset fetch failed"
            );
            engine.apply_dataset(request.generation, Err(Box::new(error)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DatasetClient, DecodeError, FetchError, decode_payload, run_load};
    use engine::{EngineEvent, MapConfiguration, MapEngine};

    const GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"name": "Nigeria"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[3.0, 4.0], [14.0, 4.0], [14.0, 14.0], [3.0, 14.0], [3.0, 4.0]]]
            }
        }]
    }"#;

    const TOPOJSON: &str = r#"{
        "type": "Topology",
        "transform": {"scale": [0.001, 0.001], "translate": [3.0, 4.0]},
        "objects": {
            "NGA_adm1": {
                "type": "GeometryCollection",
                "geometries": [{
                    "type": "Polygon",
                    "properties": {"state": "Lagos"},
                    "arcs": [[0]]
                }]
            }
        },
        "arcs": [[[0, 0], [100, 0], [0, 100], [-100, 0], [0, -100]]]
    }"#;

    #[test]
    fn sniffs_geojson_by_payload_type() {
        let set = decode_payload(GEOJSON, None).expect("decode");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn sniffs_topology_by_payload_type() {
        let set = decode_payload(TOPOJSON, Some("NGA_adm1")).expect("decode");
        assert_eq!(set.len(), 1);
        assert_eq!(set.features[0].string_property(&["state"]), Some("Lagos"));
    }

    #[test]
    fn missing_topology_object_is_a_decode_error() {
        let err = decode_payload(TOPOJSON, Some("NGA_adm2")).unwrap_err();
        assert!(matches!(err, DecodeError::Topology(_)));
    }

    #[test]
    fn non_json_payload_is_a_decode_error() {
        let err = decode_payload("<html>rate limited</html>", None).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[tokio::test]
    async fn unreachable_host_surfaces_as_http_error() {
        let client = DatasetClient::new();
        let dataset = engine::DatasetRef {
            url: "http://127.0.0.1:1/boundaries.json".to_string(),
            topology_object: None,
        };
        let err = client.fetch(&dataset).await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
    }

    #[tokio::test]
    async fn failed_load_leaves_engine_empty_but_interactive() {
        let mut engine = MapEngine::new(MapConfiguration::for_scope("nigeria"), [800.0, 600.0]);
        let request = engine
            .drain_events()
            .into_iter()
            .find_map(|event| match event {
                EngineEvent::LoadRequested(mut req) => {
                    // Point the request at a dead endpoint instead of the
                    // real provider.
                    req.dataset.url = "http://127.0.0.1:1/boundaries.json".to_string();
                    Some(req)
                }
                _ => None,
            })
            .expect("load request");

        run_load(&DatasetClient::new(), &mut engine, request).await;

        assert_eq!(engine.visible_features().count(), 0);
        engine.zoom_by(2.0);
        assert_eq!(engine.config().zoom, 2.0);
    }
}
