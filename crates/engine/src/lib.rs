pub mod animator;
pub mod camera;
pub mod config;
pub mod hover;
pub mod map;
pub mod modes;
pub mod picking;
pub mod render;
pub mod scope;

pub use config::{Annotation, MapConfiguration, Marker, MAX_ZOOM, MIN_ZOOM};
pub use map::{EngineEvent, LoadRequest, MapEngine, MarkerDraft};
pub use render::{RenderSnapshot, extract};
pub use modes::InteractionMode;
pub use scope::{DatasetRef, ScopeInfo};
