/// Planar axis-aligned extent over `[x, y]`.
///
/// Starts inverted (`min > max`) so the first `extend` sets both corners.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Extent {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Extent {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Extent { min, max }
    }

    pub fn empty() -> Self {
        Extent {
            min: [f64::INFINITY, f64::INFINITY],
            max: [f64::NEG_INFINITY, f64::NEG_INFINITY],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min[0] > self.max[0] || self.min[1] > self.max[1]
    }

    /// Grows the extent to include `point`. Non-finite points are ignored.
    pub fn extend(&mut self, point: [f64; 2]) {
        if !point[0].is_finite() || !point[1].is_finite() {
            return;
        }
        self.min[0] = self.min[0].min(point[0]);
        self.min[1] = self.min[1].min(point[1]);
        self.max[0] = self.max[0].max(point[0]);
        self.max[1] = self.max[1].max(point[1]);
    }

    pub fn union(&self, other: &Extent) -> Extent {
        let mut out = *self;
        out.extend(other.min);
        out.extend(other.max);
        out
    }

    pub fn width(&self) -> f64 {
        (self.max[0] - self.min[0]).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.max[1] - self.min[1]).max(0.0)
    }

    pub fn center(&self) -> [f64; 2] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        ]
    }

    pub fn contains(&self, point: [f64; 2]) -> bool {
        point[0] >= self.min[0]
            && point[0] <= self.max[0]
            && point[1] >= self.min[1]
            && point[1] <= self.max[1]
    }
}

/// Mean of the finite vertices of a ring.
///
/// Good enough as a label/tooltip anchor for administrative boundaries;
/// this is not an area-weighted centroid.
pub fn ring_centroid(ring: &[[f64; 2]]) -> Option<[f64; 2]> {
    let mut sum = [0.0, 0.0];
    let mut count = 0.0_f64;
    for v in ring {
        if v[0].is_finite() && v[1].is_finite() {
            sum[0] += v[0];
            sum[1] += v[1];
            count += 1.0;
        }
    }
    if count <= 0.0 {
        return None;
    }
    Some([sum[0] / count, sum[1] / count])
}
