use std::f64::consts::FRAC_PI_4;

/// Highest latitude the spherical Mercator transform can represent (degrees).
pub const MERCATOR_LAT_LIMIT_DEG: f64 = 85.051_128_78;

/// Spherical Mercator projection into planar render units.
///
/// Forward maps `(lon, lat)` in degrees to `[x, y]` with y growing downward,
/// matching screen coordinates. The inverse is exact (closed form), so
/// `invert(project(p)) == p` up to floating-point error for any latitude
/// inside the Mercator limit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mercator {
    /// Reference (central) longitude in degrees.
    pub ref_lon_deg: f64,
    /// Planar units per radian.
    pub scale: f64,
    /// Post-projection offset in planar units.
    pub translate: [f64; 2],
}

impl Mercator {
    pub fn new(ref_lon_deg: f64, scale: f64, translate: [f64; 2]) -> Self {
        Self {
            ref_lon_deg,
            scale,
            translate,
        }
    }

    /// Unit projection: scale 1, zero translate, reference longitude 0.
    pub fn unit() -> Self {
        Self::new(0.0, 1.0, [0.0, 0.0])
    }

    /// Projects geographic degrees to planar coordinates.
    ///
    /// Latitude is clamped to the Mercator limit before the transform so the
    /// output stays finite for any finite input.
    pub fn project(&self, lon_deg: f64, lat_deg: f64) -> [f64; 2] {
        let lon_rad = (lon_deg - self.ref_lon_deg).to_radians();
        let lat_rad = lat_deg
            .clamp(-MERCATOR_LAT_LIMIT_DEG, MERCATOR_LAT_LIMIT_DEG)
            .to_radians();

        let x = self.scale * lon_rad + self.translate[0];
        let y = -self.scale * (FRAC_PI_4 + lat_rad * 0.5).tan().ln() + self.translate[1];
        [x, y]
    }

    /// Inverts planar coordinates back to geographic degrees `[lon, lat]`.
    pub fn invert(&self, point: [f64; 2]) -> [f64; 2] {
        let x = (point[0] - self.translate[0]) / self.scale;
        let y = -(point[1] - self.translate[1]) / self.scale;

        let lon_deg = x.to_degrees() + self.ref_lon_deg;
        let lat_deg = (2.0 * y.exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
        [lon_deg, lat_deg]
    }
}

#[cfg(test)]
mod tests {
    use super::{MERCATOR_LAT_LIMIT_DEG, Mercator};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn origin_projects_to_translate() {
        let m = Mercator::new(0.0, 100.0, [400.0, 300.0]);
        let p = m.project(0.0, 0.0);
        assert_close(p[0], 400.0, 1e-12);
        assert_close(p[1], 300.0, 1e-12);
    }

    #[test]
    fn north_is_up() {
        let m = Mercator::unit();
        let equator = m.project(0.0, 0.0);
        let north = m.project(0.0, 45.0);
        assert!(north[1] < equator[1], "screen y must shrink northward");
    }

    #[test]
    fn round_trip_within_domain() {
        let m = Mercator::new(8.0, 2_800.0, [400.0, 300.0]);
        for &(lon, lat) in &[
            (3.3792, 6.5244),
            (8.6753, 9.0820),
            (-17.44, 14.72),
            (51.0, -29.0),
            (0.0, 84.9),
        ] {
            let rt = m.invert(m.project(lon, lat));
            assert_close(rt[0], lon, 1e-9);
            assert_close(rt[1], lat, 1e-9);
        }
    }

    #[test]
    fn latitude_clamped_to_limit() {
        let m = Mercator::unit();
        let pole = m.project(0.0, 90.0);
        let limit = m.project(0.0, MERCATOR_LAT_LIMIT_DEG);
        assert!(pole[0].is_finite() && pole[1].is_finite());
        assert_close(pole[1], limit[1], 1e-12);
    }
}
