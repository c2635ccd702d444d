//! Axis-aligned bounding boxes.

use crate::error::{GeometryError, GeokernError, Result};
use crate::vec::{Coord, Vec2, Vec3};

/// Axis-aligned bounding box with an absorbing empty identity
/// (`min = +∞`, `max = -∞` on every axis).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb<V: Coord> {
    pub min: V,
    pub max: V,
}

/// 2D bounding box.
pub type Box2 = Aabb<Vec2>;

/// 3D bounding box.
pub type Box3 = Aabb<Vec3>;

impl<V: Coord> Default for Aabb<V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<V: Coord> Aabb<V> {
    #[must_use]
    pub fn new(min: V, max: V) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn empty() -> Self {
        let mut min = V::zeros();
        let mut max = V::zeros();
        for i in 0..V::DIM {
            min.set_axis(i, f64::INFINITY);
            max.set_axis(i, f64::NEG_INFINITY);
        }
        Self { min, max }
    }

    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a V>) -> Self {
        let mut out = Self::empty();
        out.expand_points(points);
        out
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        (0..V::DIM).any(|i| self.min.axis(i) > self.max.axis(i))
    }

    pub fn expand_point(&mut self, p: &V) {
        for i in 0..V::DIM {
            let v = p.axis(i);
            if v < self.min.axis(i) {
                self.min.set_axis(i, v);
            }
            if v > self.max.axis(i) {
                self.max.set_axis(i, v);
            }
        }
    }

    pub fn expand_points<'a>(&mut self, points: impl IntoIterator<Item = &'a V>) {
        for p in points {
            self.expand_point(p);
        }
    }

    pub fn expand_scalar(&mut self, amount: f64) {
        for i in 0..V::DIM {
            self.min.set_axis(i, self.min.axis(i) - amount);
            self.max.set_axis(i, self.max.axis(i) + amount);
        }
    }

    /// Smallest box covering both. An empty box is the identity, so the
    /// corners are combined per axis rather than treated as points.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut out = *self;
        for i in 0..V::DIM {
            out.min.set_axis(i, self.min.axis(i).min(other.min.axis(i)));
            out.max.set_axis(i, self.max.axis(i).max(other.max.axis(i)));
        }
        out
    }

    #[must_use]
    pub fn contains(&self, p: &V) -> bool {
        (0..V::DIM)
            .all(|i| self.min.axis(i) <= p.axis(i) && p.axis(i) <= self.max.axis(i))
    }

    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        (0..V::DIM).all(|i| {
            self.min.axis(i) <= other.max.axis(i) && other.min.axis(i) <= self.max.axis(i)
        })
    }

    #[must_use]
    pub fn center(&self) -> V {
        self.min.mid_to(&self.max)
    }

    #[must_use]
    pub fn size(&self) -> V {
        self.max - self.min
    }

    #[must_use]
    pub fn axis_size(&self, i: usize) -> f64 {
        self.max.axis(i) - self.min.axis(i)
    }

    #[must_use]
    pub fn max_size(&self) -> f64 {
        (0..V::DIM)
            .map(|i| self.axis_size(i))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Index of the longest axis.
    #[must_use]
    pub fn max_side(&self) -> usize {
        let mut side = 0;
        for i in 1..V::DIM {
            if self.axis_size(i) > self.axis_size(side) {
                side = i;
            }
        }
        side
    }

    /// Point inside the box closest to `p`.
    #[must_use]
    pub fn clamp_point(&self, p: &V) -> V {
        let mut out = *p;
        for i in 0..V::DIM {
            out.set_axis(i, p.axis(i).clamp(self.min.axis(i), self.max.axis(i)));
        }
        out
    }

    #[must_use]
    pub fn dist_to_point_sq(&self, p: &V) -> f64 {
        self.clamp_point(p).dist_sq_to(p)
    }

    #[must_use]
    pub fn dist_to_point(&self, p: &V) -> f64 {
        self.dist_to_point_sq(p).sqrt()
    }
}

impl Box2 {
    #[must_use]
    pub fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(Vec2::new(min_x, min_y), Vec2::new(max_x, max_y))
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.axis_size(0) * self.axis_size(1)
    }

    /// Corners in ring order: min, (max.x, min.y), max, (min.x, max.y).
    #[must_use]
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// Flat `[min_x, min_y, max_x, max_y]` form.
    #[must_use]
    pub fn to_array(&self) -> [f64; 4] {
        [self.min.x, self.min.y, self.max.x, self.max.y]
    }

    pub fn from_array(values: &[f64]) -> Result<Self> {
        if values.len() != 4 {
            return Err(GeokernError::Geometry(GeometryError::InvalidArrayLength {
                expected: 4,
                got: values.len(),
            }));
        }
        Ok(Self::from_coords(values[0], values[1], values[2], values[3]))
    }

    /// Clips the segment `a`→`b` to the box. `None` when the segment lies
    /// entirely outside.
    #[must_use]
    pub fn clip_line(&self, a: &Vec2, b: &Vec2) -> Option<(Vec2, Vec2)> {
        if a.x < self.min.x && b.x < self.min.x {
            return None;
        }
        if a.y < self.min.y && b.y < self.min.y {
            return None;
        }
        if a.x > self.max.x && b.x > self.max.x {
            return None;
        }
        if a.y > self.max.y && b.y > self.max.y {
            return None;
        }

        let ca = self.clip_line_point(*a, a, b);
        let cb = self.clip_line_point(*b, &ca, b);
        Some((ca, cb))
    }

    fn clip_line_point(&self, mut p: Vec2, a: &Vec2, b: &Vec2) -> Vec2 {
        if p.x < self.min.x {
            p.y = a.y + (b.y - a.y) * (self.min.x - a.x) / (b.x - a.x);
            p.x = self.min.x;
        } else if p.x > self.max.x {
            p.y = a.y + (b.y - a.y) * (self.max.x - a.x) / (b.x - a.x);
            p.x = self.max.x;
        }
        if p.y < self.min.y {
            p.x = a.x + (b.x - a.x) * (self.min.y - a.y) / (b.y - a.y);
            p.y = self.min.y;
        } else if p.y > self.max.y {
            p.x = a.x + (b.x - a.x) * (self.max.y - a.y) / (b.y - a.y);
            p.y = self.max.y;
        }
        p
    }
}

impl Box3 {
    /// Flat `[min_x, min_y, min_z, max_x, max_y, max_z]` form.
    #[must_use]
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z,
        ]
    }

    pub fn from_array(values: &[f64]) -> Result<Self> {
        if values.len() != 6 {
            return Err(GeokernError::Geometry(GeometryError::InvalidArrayLength {
                expected: 6,
                got: values.len(),
            }));
        }
        Ok(Self::new(
            Vec3::new(values[0], values[1], values[2]),
            Vec3::new(values[3], values[4], values[5]),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::vec::TOLERANCE;

    #[test]
    fn empty_identity_absorbs() {
        let mut b = Box2::empty();
        assert!(b.is_empty());
        b.expand_point(&Vec2::new(1.0, 2.0));
        assert!(!b.is_empty());
        assert!(b.contains(&Vec2::new(1.0, 2.0)));

        let other = Box2::from_points(&[Vec2::new(-1.0, 0.0)]);
        let u = b.union(&other);
        assert!((u.min.x + 1.0).abs() < TOLERANCE);
        assert!((u.max.y - 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn union_with_empty_is_identity() {
        let b = Box2::from_coords(0.0, 0.0, 2.0, 3.0);
        assert_eq!(b.union(&Box2::empty()), b);
        assert_eq!(Box2::empty().union(&b), b);
        assert!(Box2::empty().union(&Box2::empty()).is_empty());
    }

    #[test]
    fn max_side_picks_longest_axis() {
        let b = Box3::from_points(&[Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 5.0, 2.0)]);
        assert_eq!(b.max_side(), 1);
        assert!((b.max_size() - 5.0).abs() < TOLERANCE);
    }

    #[test]
    fn dist_to_point_outside_and_inside() {
        let b = Box2::from_coords(0.0, 0.0, 2.0, 2.0);
        assert!((b.dist_to_point(&Vec2::new(5.0, 1.0)) - 3.0).abs() < TOLERANCE);
        assert!(b.dist_to_point(&Vec2::new(1.0, 1.0)) < TOLERANCE);
    }

    #[test]
    fn array_round_trip() {
        let b = Box3::from_array(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(b.to_array(), [0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(Box2::from_array(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn clip_line_crossing() {
        let b = Box2::from_coords(0.0, 0.0, 10.0, 10.0);
        let (a, c) = b
            .clip_line(&Vec2::new(-5.0, 5.0), &Vec2::new(15.0, 5.0))
            .unwrap();
        assert!((a.x).abs() < TOLERANCE && (a.y - 5.0).abs() < TOLERANCE);
        assert!((c.x - 10.0).abs() < TOLERANCE && (c.y - 5.0).abs() < TOLERANCE);
    }

    #[test]
    fn clip_line_outside_is_none() {
        let b = Box2::from_coords(0.0, 0.0, 10.0, 10.0);
        assert!(b
            .clip_line(&Vec2::new(-5.0, -1.0), &Vec2::new(15.0, -1.0))
            .is_none());
    }
}
