use dataset::{Feature, FeatureSet, Tier, filter_by_state, resolve_name};
use tracing::{info, warn};

use crate::animator::ViewAnimator;
use crate::camera::Camera;
use crate::config::{Annotation, DEFAULT_BRUSH_COLOR, MapConfiguration, Marker};
use crate::hover::Tooltip;
use crate::modes::InteractionMode;
use crate::picking;
use crate::scope::{self, DatasetRef, ScopeInfo};

/// Padding around the auto-fitted district extent, in pixels.
const AUTO_FIT_PADDING_PX: f64 = 20.0;

/// One dataset load issued by the engine.
///
/// The generation is monotonically increasing; a completion whose generation
/// no longer matches the engine's current one is stale and must be dropped,
/// otherwise a slow response can paint districts for the wrong scope.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub generation: u64,
    pub scope: String,
    pub dataset: DatasetRef,
}

/// Events emitted toward the embedding host, drained per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The single outbound interface: the consumer persists the
    /// configuration verbatim.
    ConfigChanged(MapConfiguration),
    /// The host should fetch the referenced dataset and hand the result to
    /// [`MapEngine::apply_dataset`].
    LoadRequested(LoadRequest),
}

/// Error surface for a completed dataset load.
pub type LoadError = Box<dyn std::error::Error + Send + Sync>;

/// Marker placement awaiting an explicit label + confirm. Placement and
/// confirmation are two steps so a stray click never creates a marker.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MarkerDraft {
    pub lat: f64,
    pub lon: f64,
}

/// The interactive choropleth/annotation engine.
///
/// Owns no durable storage: the configuration it was given and the ones it
/// emits through [`EngineEvent::ConfigChanged`] are its only persistent
/// handles. All interaction state lives on the instance, so multiple maps in
/// one document are independent.
#[derive(Debug, Clone)]
pub struct MapEngine {
    config: MapConfiguration,
    scope_info: ScopeInfo,
    features: FeatureSet,
    /// Indices into `features` that the current scope renders.
    visible: Vec<usize>,
    /// Resolved display names, parallel to `visible`.
    names: Vec<String>,
    camera: Camera,
    mode: InteractionMode,
    brush_color: String,
    pending_marker: Option<MarkerDraft>,
    tooltip: Option<Tooltip>,
    animator: ViewAnimator,
    dragging: bool,
    generation: u64,
    events: Vec<EngineEvent>,
}

impl MapEngine {
    /// Builds the engine from a persisted configuration and issues the
    /// initial dataset load.
    pub fn new(config: MapConfiguration, viewport: [f64; 2]) -> Self {
        let scope_info = scope::resolve(&config.scope);
        let animator = ViewAnimator::new(config.center, config.zoom);
        let camera = initial_camera(&scope_info, &config, viewport);
        let mut engine = Self {
            config,
            scope_info,
            features: FeatureSet::default(),
            visible: Vec::new(),
            names: Vec::new(),
            camera,
            mode: InteractionMode::default(),
            brush_color: DEFAULT_BRUSH_COLOR.to_string(),
            pending_marker: None,
            tooltip: None,
            animator,
            dragging: false,
            generation: 0,
            events: Vec::new(),
        };
        engine.request_load();
        engine
    }

    pub fn config(&self) -> &MapConfiguration {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn pending_marker(&self) -> Option<MarkerDraft> {
        self.pending_marker
    }

    pub fn brush_color(&self) -> &str {
        &self.brush_color
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Features of the active scope with their resolved names, in render
    /// order.
    pub fn visible_features(&self) -> impl Iterator<Item = (&str, &Feature)> {
        self.visible
            .iter()
            .zip(self.names.iter())
            .map(|(&idx, name)| (name.as_str(), &self.features.features[idx]))
    }

    /// Drains pending outbound events; the host reacts to each in order.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // ---- scope & dataset -------------------------------------------------

    /// Switches scope. Highlight, markers and annotations are scope-bound
    /// and cleared immediately, before any fetch resolves; the view resets
    /// to the new scope's defaults (zoom pinned to 1 at the district tier).
    pub fn set_scope(&mut self, scope_name: &str) {
        self.config = MapConfiguration::for_scope(scope_name);
        self.scope_info = scope::resolve(scope_name);
        self.features = FeatureSet::default();
        self.visible.clear();
        self.names.clear();
        self.tooltip = None;
        self.pending_marker = None;
        self.mode = InteractionMode::Painting;
        self.animator = ViewAnimator::new(self.config.center, self.config.zoom);
        self.camera = initial_camera(&self.scope_info, &self.config, self.camera.viewport());
        self.request_load();
        self.emit_config();
    }

    /// Completion entry point for a dataset load.
    ///
    /// Loads are never cancelled, so a response for a superseded scope can
    /// still arrive; the generation check drops it. Failures leave the
    /// feature layer empty and the map interactive.
    pub fn apply_dataset(&mut self, generation: u64, result: Result<FeatureSet, LoadError>) {
        if generation != self.generation {
            info!(
                generation,
                current = self.generation,
                "discarding stale dataset response"
            );
            return;
        }
        match result {
            Ok(set) => {
                info!(features = set.len(), scope = %self.config.scope, "dataset loaded");
                self.features = set;
            }
            Err(error) => {
                warn!(
                    scope = %self.config.scope,
                    %error,
                    "dataset fetch failed; feature layer stays empty"
                );
                self.features = FeatureSet::default();
            }
        }
        self.rebuild_visible();
    }

    fn request_load(&mut self) {
        self.generation += 1;
        let request = LoadRequest {
            generation: self.generation,
            scope: self.config.scope.clone(),
            dataset: self.scope_info.dataset.clone(),
        };
        info!(
            generation = request.generation,
            scope = %request.scope,
            url = %request.dataset.url,
            "requesting boundary dataset"
        );
        self.events.push(EngineEvent::LoadRequested(request));
    }

    /// Recomputes the visible subset, resolved names and (at the district
    /// tier) the auto-fit. Runs only when the loaded feature list changes,
    /// never per render.
    fn rebuild_visible(&mut self) {
        self.visible = match self.scope_info.tier {
            Tier::District => filter_by_state(&self.features.features, &self.config.scope),
            _ => (0..self.features.len()).collect(),
        };
        self.names = self
            .visible
            .iter()
            .enumerate()
            .map(|(pos, &idx)| {
                resolve_name(&self.features.features[idx], self.scope_info.tier, pos)
            })
            .collect();

        if self.scope_info.tier == Tier::District {
            let mut positions = Vec::new();
            for &idx in &self.visible {
                self.features.features[idx]
                    .geometry
                    .each_position(&mut |p| positions.push(p));
            }
            self.camera = Camera::auto_fit(
                positions,
                self.camera.viewport(),
                AUTO_FIT_PADDING_PX,
                self.scope_info.default_scale,
                self.scope_info.default_center,
            );
        }
    }

    // ---- clicks & placement ----------------------------------------------

    /// Routes a canvas click according to the active interaction mode.
    pub fn handle_click(&mut self, screen_px: [f64; 2]) {
        match self.mode {
            InteractionMode::Painting => {
                let [lon, lat] = self.camera.unproject(screen_px);
                let Some(pos) = self.pick_at(lon, lat) else {
                    return;
                };
                let name = self.names[pos].clone();
                let color = self.brush_color.clone();
                self.config.toggle_highlight(&name, &color);
                self.emit_config();
            }
            InteractionMode::DroppingPin => {
                // Accepted numerically even near projection edge cases; no
                // geographic bounds validation on the inverse result.
                let [lon, lat] = self.camera.unproject(screen_px);
                self.pending_marker = Some(MarkerDraft { lat, lon });
            }
            InteractionMode::Annotating => {
                let [vw, vh] = self.camera.viewport();
                self.config.annotations.push(Annotation {
                    x: screen_px[0] / vw * 100.0,
                    y: screen_px[1] / vh * 100.0,
                    text: "New Label".to_string(),
                });
                self.mode = InteractionMode::Painting;
                self.emit_config();
            }
        }
    }

    /// Confirms the pending marker draft with its label and icon.
    pub fn confirm_marker(&mut self, label: &str, icon: &str) {
        let Some(draft) = self.pending_marker.take() else {
            return;
        };
        self.mode = InteractionMode::Painting;
        if !draft.lat.is_finite() || !draft.lon.is_finite() {
            warn!(
                lat = draft.lat,
                lon = draft.lon,
                "rejecting marker with non-finite coordinates"
            );
            return;
        }
        self.config.markers.push(Marker {
            lat: draft.lat,
            lon: draft.lon,
            label: label.to_string(),
            icon: icon.to_string(),
        });
        self.emit_config();
    }

    pub fn cancel_marker(&mut self) {
        self.pending_marker = None;
        self.mode = InteractionMode::Painting;
    }

    pub fn add_marker(&mut self, lat: f64, lon: f64, label: &str, icon: &str) {
        if !lat.is_finite() || !lon.is_finite() {
            warn!(lat, lon, "rejecting marker with non-finite coordinates");
            return;
        }
        self.config.markers.push(Marker {
            lat,
            lon,
            label: label.to_string(),
            icon: icon.to_string(),
        });
        self.emit_config();
    }

    pub fn remove_marker(&mut self, index: usize) -> bool {
        if index >= self.config.markers.len() {
            return false;
        }
        self.config.markers.remove(index);
        self.emit_config();
        true
    }

    /// Appends an annotation. Coordinates are canvas percentages and get
    /// clamped into 0-100; click-derived placements are already in range,
    /// this guards the public entry point.
    pub fn add_annotation(&mut self, x_percent: f64, y_percent: f64, text: &str) {
        if !x_percent.is_finite() || !y_percent.is_finite() {
            warn!(
                x = x_percent,
                y = y_percent,
                "rejecting annotation with non-finite coordinates"
            );
            return;
        }
        self.config.annotations.push(Annotation {
            x: x_percent.clamp(0.0, 100.0),
            y: y_percent.clamp(0.0, 100.0),
            text: text.to_string(),
        });
        self.emit_config();
    }

    pub fn edit_annotation(&mut self, index: usize, text: &str) -> bool {
        let Some(annotation) = self.config.annotations.get_mut(index) else {
            return false;
        };
        annotation.text = text.to_string();
        self.emit_config();
        true
    }

    pub fn remove_annotation(&mut self, index: usize) -> bool {
        if index >= self.config.annotations.len() {
            return false;
        }
        self.config.annotations.remove(index);
        self.emit_config();
        true
    }

    // ---- painting ---------------------------------------------------------

    /// The brush color applies to the next toggle-on; already-painted
    /// features keep their color.
    pub fn set_brush_color(&mut self, color: &str) {
        self.brush_color = color.to_string();
    }

    /// Overwrites an already-painted feature's color without toggling it.
    pub fn recolor(&mut self, name: &str, color: &str) {
        if self.config.recolor(name, color) {
            self.emit_config();
        }
    }

    // ---- modes -------------------------------------------------------------

    pub fn toggle_drop_pin_mode(&mut self) {
        self.mode = self.mode.toggle_drop_pin();
        if self.mode != InteractionMode::DroppingPin {
            self.pending_marker = None;
        }
    }

    pub fn toggle_annotate_mode(&mut self) {
        self.mode = self.mode.toggle_annotate();
        // Entering annotate mode abandons any half-placed marker.
        self.pending_marker = None;
    }

    // ---- hover -------------------------------------------------------------

    pub fn pointer_moved(&mut self, screen_px: [f64; 2]) {
        let [lon, lat] = self.camera.unproject(screen_px);
        self.tooltip = self
            .pick_at(lon, lat)
            .map(|pos| Tooltip::at_pointer(self.names[pos].as_str(), screen_px));
    }

    pub fn pointer_left(&mut self) {
        self.tooltip = None;
    }

    fn pick_at(&self, lon: f64, lat: f64) -> Option<usize> {
        let features: Vec<&Feature> = self
            .visible
            .iter()
            .map(|&idx| &self.features.features[idx])
            .collect();
        picking::pick_feature(&features, lon, lat)
    }

    // ---- pan & zoom --------------------------------------------------------

    /// External step-change target; animates through the spring. Ignored at
    /// the district tier, where auto-fit owns the view.
    pub fn fly_to(&mut self, center: [f64; 2], zoom: f64) {
        if !self.camera.allows_pan_zoom() {
            return;
        }
        self.animator.retarget(center, zoom);
    }

    /// Manual drag by a pixel delta; writes the rendered view directly.
    pub fn drag_by(&mut self, delta_px: [f64; 2]) {
        if !self.camera.allows_pan_zoom() || !self.mode.allows_gestures() {
            return;
        }
        let [vw, vh] = self.camera.viewport();
        let center = self
            .camera
            .unproject([vw * 0.5 - delta_px[0], vh * 0.5 - delta_px[1]]);
        let (_, zoom) = self.animator.view();
        self.animator.set_view(center, zoom);
        self.camera.set_view(center, zoom);
        self.dragging = true;
    }

    /// Commits the settled view into the configuration at drag end.
    pub fn end_gesture(&mut self) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        self.commit_view();
    }

    /// Discrete wheel / +/- zoom step; commits immediately.
    pub fn zoom_by(&mut self, factor: f64) {
        if !self.camera.allows_pan_zoom() || !self.mode.allows_gestures() {
            return;
        }
        self.animator.zoom_by(factor);
        let (center, zoom) = self.animator.view();
        self.camera.set_view(center, zoom);
        self.commit_view();
    }

    /// Per-frame animation step. Commits the configuration once the springs
    /// settle on their target.
    pub fn tick(&mut self, dt: f64) {
        if !self.camera.allows_pan_zoom() || self.dragging || self.animator.settled() {
            return;
        }
        let (center, zoom) = self.animator.tick(dt);
        self.camera.set_view(center, zoom);
        if self.animator.settled() {
            self.commit_view();
        }
    }

    fn commit_view(&mut self) {
        let (center, zoom) = self.animator.view();
        self.config.center = center;
        self.config.zoom = zoom;
        self.emit_config();
    }

    fn emit_config(&mut self) {
        self.events
            .push(EngineEvent::ConfigChanged(self.config.clone()));
    }
}

fn initial_camera(info: &ScopeInfo, config: &MapConfiguration, viewport: [f64; 2]) -> Camera {
    match info.tier {
        Tier::District => Camera::auto_fit(
            std::iter::empty(),
            viewport,
            AUTO_FIT_PADDING_PX,
            info.default_scale,
            info.default_center,
        ),
        _ => Camera::fixed(
            info.default_scale,
            config.center,
            MapConfiguration::clamp_zoom(config.zoom),
            viewport,
        ),
    }
}
