use geomath::{FitCanvas, Mercator, fit_positions};

/// Projection regime for the active tier.
///
/// Both regimes render with no clip rectangle; clipping would draw a visible
/// bounding frame around the auto-fitted districts.
#[derive(Debug, Clone, PartialEq)]
pub enum Camera {
    /// Tiers 0-1: a fixed base projection composed multiplicatively with the
    /// current pan center and zoom. The combination stays an affine transform
    /// of the base projection, so the inverse is exact.
    Fixed {
        base: Mercator,
        center: [f64; 2],
        zoom: f64,
        viewport: [f64; 2],
    },
    /// Tier 2: scale and translate derived once from the bounding extent of
    /// the filtered district set. Pan/zoom is disabled; the fit owns the view.
    AutoFit {
        projection: Mercator,
        viewport: [f64; 2],
    },
}

impl Camera {
    pub fn fixed(default_scale: f64, center: [f64; 2], zoom: f64, viewport: [f64; 2]) -> Self {
        Camera::Fixed {
            base: Mercator::new(0.0, default_scale, [0.0, 0.0]),
            center,
            zoom,
            viewport,
        }
    }

    /// Builds the auto-fit regime from the filtered feature positions.
    ///
    /// With no positions yet (fetch outstanding or failed) the fallback scale
    /// keeps the camera usable, centered on the scope default.
    pub fn auto_fit<I>(
        positions: I,
        viewport: [f64; 2],
        padding: f64,
        fallback_scale: f64,
        fallback_center: [f64; 2],
    ) -> Self
    where
        I: IntoIterator<Item = [f64; 2]>,
    {
        let points: Vec<[f64; 2]> = positions
            .into_iter()
            .filter(|p| p[0].is_finite() && p[1].is_finite())
            .collect();
        let projection = if points.is_empty() {
            centered(fallback_scale, fallback_center, viewport)
        } else {
            let canvas = FitCanvas::new(viewport[0], viewport[1], padding);
            fit_positions(points, canvas, fallback_scale)
        };
        Camera::AutoFit {
            projection,
            viewport,
        }
    }

    pub fn viewport(&self) -> [f64; 2] {
        match self {
            Camera::Fixed { viewport, .. } | Camera::AutoFit { viewport, .. } => *viewport,
        }
    }

    pub fn allows_pan_zoom(&self) -> bool {
        matches!(self, Camera::Fixed { .. })
    }

    /// Geographic degrees to screen pixels.
    pub fn project(&self, lon_deg: f64, lat_deg: f64) -> [f64; 2] {
        match self {
            Camera::Fixed {
                base,
                center,
                zoom,
                viewport,
            } => {
                let p = base.project(lon_deg, lat_deg);
                let c = base.project(center[0], center[1]);
                [
                    (p[0] - c[0]) * zoom + viewport[0] * 0.5,
                    (p[1] - c[1]) * zoom + viewport[1] * 0.5,
                ]
            }
            Camera::AutoFit { projection, .. } => projection.project(lon_deg, lat_deg),
        }
    }

    /// Screen pixels back to geographic degrees `[lon, lat]`.
    pub fn unproject(&self, screen_px: [f64; 2]) -> [f64; 2] {
        match self {
            Camera::Fixed {
                base,
                center,
                zoom,
                viewport,
            } => {
                let c = base.project(center[0], center[1]);
                let p = [
                    (screen_px[0] - viewport[0] * 0.5) / zoom + c[0],
                    (screen_px[1] - viewport[1] * 0.5) / zoom + c[1],
                ];
                base.invert(p)
            }
            Camera::AutoFit { projection, .. } => projection.invert(screen_px),
        }
    }

    /// Updates the rendered pan/zoom. No-op in the auto-fit regime.
    pub fn set_view(&mut self, new_center: [f64; 2], new_zoom: f64) {
        if let Camera::Fixed { center, zoom, .. } = self {
            *center = new_center;
            *zoom = new_zoom;
        }
    }
}

fn centered(scale: f64, center: [f64; 2], viewport: [f64; 2]) -> Mercator {
    let base = Mercator::new(0.0, scale, [0.0, 0.0]);
    let c = base.project(center[0], center[1]);
    Mercator::new(
        0.0,
        scale,
        [viewport[0] * 0.5 - c[0], viewport[1] * 0.5 - c[1]],
    )
}

#[cfg(test)]
mod tests {
    use super::Camera;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn fixed_regime_round_trips_under_pan_and_zoom() {
        for &zoom in &[0.5, 1.0, 3.7, 20.0] {
            let camera = Camera::fixed(2_800.0, [8.6753, 9.0820], zoom, [800.0, 600.0]);
            for &(lon, lat) in &[(3.3792, 6.5244), (13.15, 11.88), (8.6753, 9.0820)] {
                let rt = camera.unproject(camera.project(lon, lat));
                assert_close(rt[0], lon, 1e-9);
                assert_close(rt[1], lat, 1e-9);
            }
        }
    }

    #[test]
    fn fixed_center_lands_on_viewport_center() {
        let camera = Camera::fixed(2_800.0, [8.0, 9.0], 2.0, [800.0, 600.0]);
        let p = camera.project(8.0, 9.0);
        assert_close(p[0], 400.0, 1e-9);
        assert_close(p[1], 300.0, 1e-9);
    }

    #[test]
    fn auto_fit_round_trips_and_ignores_set_view() {
        let positions = vec![[3.0, 6.0], [4.0, 6.0], [4.0, 7.0], [3.0, 7.0]];
        let mut camera = Camera::auto_fit(positions, [800.0, 600.0], 20.0, 8_000.0, [3.5, 6.5]);
        assert!(!camera.allows_pan_zoom());

        let before = camera.project(3.5, 6.5);
        camera.set_view([10.0, 10.0], 5.0);
        let after = camera.project(3.5, 6.5);
        assert_eq!(before, after);

        let rt = camera.unproject(before);
        assert_close(rt[0], 3.5, 1e-9);
        assert_close(rt[1], 6.5, 1e-9);
    }

    #[test]
    fn empty_auto_fit_centers_on_fallback() {
        let camera = Camera::auto_fit(
            std::iter::empty(),
            [800.0, 600.0],
            20.0,
            8_000.0,
            [3.39, 6.52],
        );
        let p = camera.project(3.39, 6.52);
        assert_close(p[0], 400.0, 1e-9);
        assert_close(p[1], 300.0, 1e-9);
    }
}
