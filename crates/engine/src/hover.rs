/// Pixel offset between the pointer and the tooltip anchor, so the tooltip
/// does not sit under the cursor.
pub const TOOLTIP_OFFSET_PX: [f64; 2] = [12.0, -8.0];

/// Transient label for the feature under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub text: String,
    pub position_px: [f64; 2],
}

impl Tooltip {
    pub fn at_pointer(text: impl Into<String>, pointer_px: [f64; 2]) -> Self {
        Self {
            text: text.into(),
            position_px: [
                pointer_px[0] + TOOLTIP_OFFSET_PX[0],
                pointer_px[1] + TOOLTIP_OFFSET_PX[1],
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TOOLTIP_OFFSET_PX, Tooltip};

    #[test]
    fn anchored_with_offset() {
        let t = Tooltip::at_pointer("Lagos", [100.0, 200.0]);
        assert_eq!(t.text, "Lagos");
        assert_eq!(
            t.position_px,
            [100.0 + TOOLTIP_OFFSET_PX[0], 200.0 + TOOLTIP_OFFSET_PX[1]]
        );
    }
}
