use crate::bounds::Extent;
use crate::mercator::Mercator;

/// Canvas target for an auto-fit, in pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FitCanvas {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl FitCanvas {
    pub fn new(width: f64, height: f64, padding: f64) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }
}

/// Derives a Mercator whose scale and translate make every supplied
/// geographic position land inside the canvas (minus padding).
///
/// The Mercator forward transform is linear in `scale` for a fixed reference
/// longitude, so fitting reduces to projecting once at unit scale, taking the
/// extent, and solving for the scale/translate that map that extent onto the
/// canvas.
///
/// Degenerate inputs (no finite positions, or a single point) keep the
/// fallback scale and center the extent, so the caller always gets a usable
/// projection.
pub fn fit_positions<I>(positions: I, canvas: FitCanvas, fallback_scale: f64) -> Mercator
where
    I: IntoIterator<Item = [f64; 2]>,
{
    let unit = Mercator::unit();
    let mut extent = Extent::empty();
    for pos in positions {
        extent.extend(unit.project(pos[0], pos[1]));
    }

    let half_canvas = [canvas.width * 0.5, canvas.height * 0.5];
    if extent.is_empty() {
        return Mercator::new(0.0, fallback_scale, half_canvas);
    }

    let inner_w = (canvas.width - 2.0 * canvas.padding).max(1.0);
    let inner_h = (canvas.height - 2.0 * canvas.padding).max(1.0);

    let scale = if extent.width() <= 0.0 && extent.height() <= 0.0 {
        fallback_scale
    } else {
        let sx = if extent.width() > 0.0 {
            inner_w / extent.width()
        } else {
            f64::INFINITY
        };
        let sy = if extent.height() > 0.0 {
            inner_h / extent.height()
        } else {
            f64::INFINITY
        };
        sx.min(sy)
    };

    let center = extent.center();
    let translate = [
        half_canvas[0] - scale * center[0],
        half_canvas[1] - scale * center[1],
    ];
    Mercator::new(0.0, scale, translate)
}
