use crate::config::MapConfiguration;

// Shared spring constants across the lon, lat and zoom channels.
const STIFFNESS: f64 = 170.0;
const MASS: f64 = 1.0;

/// Snap-to-target threshold for both displacement and velocity.
const SETTLE_EPS: f64 = 1e-4;

/// Upper bound on a single animation step; a frame gap beyond this advances
/// the spring as if only this much time had passed.
const MAX_DT: f64 = 0.1;

/// Internal integration step. The semi-implicit Euler update is only stable
/// for these constants well below `MAX_DT`, so a large step is integrated in
/// substeps instead of one jump.
const SUBSTEP: f64 = 1.0 / 60.0;

fn critical_damping() -> f64 {
    2.0 * (STIFFNESS * MASS).sqrt()
}

/// One critically-damped second-order channel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spring {
    value: f64,
    velocity: f64,
    target: f64,
}

impl Spring {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            velocity: 0.0,
            target: value,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn retarget(&mut self, target: f64) {
        self.target = target;
    }

    /// Manual write: jumps the channel with no residual velocity.
    pub fn set(&mut self, value: f64) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    pub fn settled(&self) -> bool {
        (self.value - self.target).abs() < SETTLE_EPS && self.velocity.abs() < SETTLE_EPS
    }

    /// Advances the channel by `dt` seconds (semi-implicit Euler, subdivided
    /// into stable substeps) and returns the new value. Snaps exactly onto
    /// the target once inside the settle threshold so convergence terminates.
    pub fn tick(&mut self, dt: f64) -> f64 {
        let mut remaining = dt.clamp(0.0, MAX_DT);
        while remaining > 0.0 && !self.settled() {
            let step = remaining.min(SUBSTEP);
            let accel = (STIFFNESS * (self.target - self.value)
                - critical_damping() * self.velocity)
                / MASS;
            self.velocity += accel * step;
            self.value += self.velocity * step;
            remaining -= step;
        }
        if self.settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
        self.value
    }
}

/// Smooths externally supplied (center, zoom) targets toward the rendered
/// view; lon, lat and zoom animate independently with shared constants.
///
/// Zoom is clamped on every write, animated or manual.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewAnimator {
    lon: Spring,
    lat: Spring,
    zoom: Spring,
}

impl ViewAnimator {
    pub fn new(center: [f64; 2], zoom: f64) -> Self {
        Self {
            lon: Spring::new(center[0]),
            lat: Spring::new(center[1]),
            zoom: Spring::new(MapConfiguration::clamp_zoom(zoom)),
        }
    }

    pub fn view(&self) -> ([f64; 2], f64) {
        (
            [self.lon.value(), self.lat.value()],
            MapConfiguration::clamp_zoom(self.zoom.value()),
        )
    }

    pub fn settled(&self) -> bool {
        self.lon.settled() && self.lat.settled() && self.zoom.settled()
    }

    /// External step-change target (scope switch, narrative advance).
    pub fn retarget(&mut self, center: [f64; 2], zoom: f64) {
        self.lon.retarget(center[0]);
        self.lat.retarget(center[1]);
        self.zoom.retarget(MapConfiguration::clamp_zoom(zoom));
    }

    /// Manual write from a drag or wheel gesture; bypasses the spring.
    pub fn set_view(&mut self, center: [f64; 2], zoom: f64) {
        self.lon.set(center[0]);
        self.lat.set(center[1]);
        self.zoom.set(MapConfiguration::clamp_zoom(zoom));
    }

    /// Multiplicative zoom step from wheel or +/- controls.
    pub fn zoom_by(&mut self, factor: f64) {
        let next = MapConfiguration::clamp_zoom(self.zoom.value() * factor);
        self.zoom.set(next);
    }

    pub fn tick(&mut self, dt: f64) -> ([f64; 2], f64) {
        self.lon.tick(dt);
        self.lat.tick(dt);
        let zoom = MapConfiguration::clamp_zoom(self.zoom.tick(dt));
        ([self.lon.value(), self.lat.value()], zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::{Spring, ViewAnimator};
    use crate::config::{MAX_ZOOM, MIN_ZOOM};

    #[test]
    fn spring_converges_without_oscillation() {
        let mut s = Spring::new(0.0);
        s.retarget(10.0);
        let mut prev = 0.0;
        for _ in 0..600 {
            let v = s.tick(1.0 / 60.0);
            // Critically damped: approach is monotonic, no overshoot.
            assert!(v >= prev - 1e-9, "regressed from {prev} to {v}");
            assert!(v <= 10.0 + 1e-6, "overshot to {v}");
            prev = v;
        }
        assert!(s.settled());
        assert_eq!(s.value(), 10.0);
    }

    #[test]
    fn converges_at_the_largest_admitted_step() {
        // Ticking at the frame-gap cap (a 10 fps host) must behave like any
        // other cadence: monotonic approach, no overshoot, no blow-up.
        let mut s = Spring::new(0.0);
        s.retarget(10.0);
        let mut prev = 0.0;
        for _ in 0..200 {
            let v = s.tick(super::MAX_DT);
            assert!(v >= prev - 1e-9, "regressed from {prev} to {v}");
            assert!(v <= 10.0 + 1e-6, "overshot to {v}");
            prev = v;
        }
        assert!(s.settled());
        assert_eq!(s.value(), 10.0);
    }

    #[test]
    fn manual_set_skips_animation() {
        let mut s = Spring::new(0.0);
        s.retarget(10.0);
        s.set(4.0);
        assert!(s.settled());
        assert_eq!(s.value(), 4.0);
    }

    #[test]
    fn zoom_stays_clamped_through_any_sequence() {
        let mut animator = ViewAnimator::new([8.0, 9.0], 1.0);
        for _ in 0..50 {
            animator.zoom_by(10.0);
        }
        assert_eq!(animator.view().1, MAX_ZOOM);

        for _ in 0..50 {
            animator.zoom_by(0.01);
        }
        assert_eq!(animator.view().1, MIN_ZOOM);

        // Animated targets clamp too.
        animator.retarget([8.0, 9.0], 1_000.0);
        for _ in 0..600 {
            let (_, zoom) = animator.tick(1.0 / 60.0);
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(&zoom));
        }
        assert_eq!(animator.view().1, MAX_ZOOM);
    }

    #[test]
    fn retarget_animates_all_channels() {
        let mut animator = ViewAnimator::new([0.0, 0.0], 1.0);
        animator.retarget([8.6753, 9.0820], 3.0);
        for _ in 0..600 {
            animator.tick(1.0 / 60.0);
        }
        assert!(animator.settled());
        let (center, zoom) = animator.view();
        assert!((center[0] - 8.6753).abs() < 1e-3);
        assert!((center[1] - 9.0820).abs() < 1e-3);
        assert!((zoom - 3.0).abs() < 1e-3);
    }
}
