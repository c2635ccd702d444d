use crate::vec::Coord;

/// Closed 1D interval with an absorbing empty identity
/// (`min = +∞`, `max = -∞`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Default for Range {
    fn default() -> Self {
        Self::empty()
    }
}

impl Range {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    #[must_use]
    pub fn size(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max - self.min
        }
    }

    #[must_use]
    pub fn center(&self) -> f64 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    #[must_use]
    pub fn lerp(&self, f: f64) -> f64 {
        self.min + (self.max - self.min) * f
    }

    /// Inverse of [`Range::lerp`]. `None` for a zero-size range.
    #[must_use]
    pub fn index_of(&self, value: f64) -> Option<f64> {
        let size = self.max - self.min;
        if size.abs() < crate::vec::TOLERANCE {
            return None;
        }
        Some((value - self.min) / size)
    }

    pub fn expand_value(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    pub fn expand_values(&mut self, values: impl IntoIterator<Item = f64>) {
        for v in values {
            self.expand_value(v);
        }
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}

/// Interval of dot products against a fixed direction.
///
/// Used to pre-reject intersection candidates: a point is inside when its
/// projection onto `dir` falls within `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneRange<V: Coord> {
    pub dir: V,
    pub min: f64,
    pub max: f64,
}

impl<V: Coord> PlaneRange<V> {
    #[must_use]
    pub fn new(dir: V, min: f64, max: f64) -> Self {
        Self { dir, min, max }
    }

    #[must_use]
    pub fn empty(dir: V) -> Self {
        Self {
            dir,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    #[must_use]
    pub fn contains_dot(&self, d: f64) -> bool {
        self.min <= d && d <= self.max
    }

    #[must_use]
    pub fn contains_point(&self, p: &V) -> bool {
        self.contains_dot(self.dir.dot(p))
    }

    pub fn expand_point(&mut self, p: &V) {
        let d = self.dir.dot(p);
        if d < self.min {
            self.min = d;
        }
        if d > self.max {
            self.max = d;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::vec::{Vec2, TOLERANCE};

    #[test]
    fn empty_range_absorbs() {
        let mut r = Range::empty();
        assert!(r.is_empty());
        r.expand_value(3.0);
        assert!(!r.is_empty());
        assert!((r.min - 3.0).abs() < TOLERANCE);
        assert!((r.max - 3.0).abs() < TOLERANCE);
        r.expand_value(-1.0);
        assert!((r.size() - 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn lerp_and_index_of_are_inverse() {
        let r = Range::new(10.0, 20.0);
        let v = r.lerp(0.3);
        assert!((r.index_of(v).unwrap() - 0.3).abs() < TOLERANCE);
    }

    #[test]
    fn index_of_zero_size_is_none() {
        assert!(Range::new(5.0, 5.0).index_of(5.0).is_none());
    }

    #[test]
    fn plane_range_projects() {
        let mut pr = PlaneRange::empty(Vec2::new(1.0, 0.0));
        pr.expand_point(&Vec2::new(2.0, 7.0));
        pr.expand_point(&Vec2::new(5.0, -3.0));
        assert!(pr.contains_point(&Vec2::new(3.0, 100.0)));
        assert!(!pr.contains_point(&Vec2::new(6.0, 0.0)));
    }
}
