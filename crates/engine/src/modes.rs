/// Click semantics of the map. Exactly one mode is active at a time.
///
/// Completing a placement (marker confirmed, annotation dropped) returns to
/// `Painting` automatically.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum InteractionMode {
    /// Click toggles a feature's highlight with the active brush color.
    #[default]
    Painting,
    /// Click inverse-projects to a pending marker draft.
    DroppingPin,
    /// Click drops a placeholder annotation at canvas-percent coordinates.
    Annotating,
}

impl InteractionMode {
    pub fn toggle_drop_pin(self) -> Self {
        match self {
            InteractionMode::DroppingPin => InteractionMode::Painting,
            _ => InteractionMode::DroppingPin,
        }
    }

    pub fn toggle_annotate(self) -> Self {
        match self {
            InteractionMode::Annotating => InteractionMode::Painting,
            _ => InteractionMode::Annotating,
        }
    }

    /// Drag/zoom gestures conflict with precise placement, so they are only
    /// allowed while painting.
    pub fn allows_gestures(self) -> bool {
        matches!(self, InteractionMode::Painting)
    }
}
