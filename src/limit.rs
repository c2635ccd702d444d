//! 2D half-planes.

use crate::error::{GeometryError, GeokernError, Result};
use crate::ray::Ray2;
use crate::vec::{rotated_90, Coord, Vec2, TOLERANCE};

/// Half-plane bounded by the line `normal · p = constant`; the kept side
/// is `normal · p ≤ constant`. `normal` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limit {
    pub normal: Vec2,
    pub constant: f64,
}

impl Limit {
    #[must_use]
    pub fn new(normal: Vec2, constant: f64) -> Self {
        Self { normal, constant }
    }

    #[must_use]
    pub fn from_normal_and_point(normal: Vec2, p: &Vec2) -> Self {
        Self {
            normal,
            constant: normal.dot(p),
        }
    }

    /// Boundary through `a` and `b`, normal pointing left of `a`→`b`.
    /// `None` when the points coincide.
    #[must_use]
    pub fn from_points(a: &Vec2, b: &Vec2) -> Option<Self> {
        let d = *b - *a;
        if d.norm() < TOLERANCE {
            return None;
        }
        let normal = rotated_90(&d.normalized());
        Some(Self {
            normal,
            constant: normal.dot(a),
        })
    }

    #[must_use]
    pub fn dist_from_origin(&self) -> f64 {
        self.constant
    }

    /// Signed distance of `p` from the boundary, positive on the cut side.
    #[must_use]
    pub fn signed_dist(&self, p: &Vec2) -> f64 {
        self.normal.dot(p) - self.constant
    }

    #[must_use]
    pub fn contains(&self, p: &Vec2) -> bool {
        self.signed_dist(p) <= 0.0
    }

    /// Foot of the perpendicular from `p` onto the boundary.
    #[must_use]
    pub fn closest_point(&self, p: &Vec2) -> Vec2 {
        *p + self.normal * (self.constant - self.normal.dot(p))
    }

    /// The complementary half-plane.
    #[must_use]
    pub fn negated(&self) -> Self {
        Self {
            normal: -self.normal,
            constant: -self.constant,
        }
    }

    /// Where a ray crosses the boundary, within the ray's parameter
    /// range. `None` when parallel.
    #[must_use]
    pub fn intersection(&self, ray: &Ray2) -> Option<Vec2> {
        let cos = -self.normal.dot(&ray.dir);
        if cos.abs() < TOLERANCE {
            return None;
        }
        let t = self.signed_dist(&ray.org) / cos;
        if t < ray.min_dist() {
            return None;
        }
        Some(ray.at_dist(t))
    }

    /// Flat `[normal_x, normal_y, constant]` form.
    #[must_use]
    pub fn to_array(&self) -> [f64; 3] {
        [self.normal.x, self.normal.y, self.constant]
    }

    pub fn from_array(values: &[f64]) -> Result<Self> {
        if values.len() != 3 {
            return Err(GeokernError::Geometry(GeometryError::InvalidArrayLength {
                expected: 3,
                got: values.len(),
            }));
        }
        Ok(Self::new(Vec2::new(values[0], values[1]), values[2]))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn from_points_keeps_right_side() {
        // Boundary along +x; normal points left (+y), so the kept side
        // is y <= 0.
        let l = Limit::from_points(&Vec2::new(0.0, 0.0), &Vec2::new(1.0, 0.0)).unwrap();
        assert!(l.contains(&Vec2::new(5.0, -1.0)));
        assert!(!l.contains(&Vec2::new(5.0, 1.0)));
        assert!((l.signed_dist(&Vec2::new(0.0, 3.0)) - 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn from_coincident_points_is_none() {
        let p = Vec2::new(1.0, 2.0);
        assert!(Limit::from_points(&p, &p).is_none());
    }

    #[test]
    fn closest_point_is_on_boundary() {
        let l = Limit::new(Vec2::new(0.0, 1.0), 2.0);
        let c = l.closest_point(&Vec2::new(7.0, 5.0));
        assert!((c.x - 7.0).abs() < TOLERANCE);
        assert!((c.y - 2.0).abs() < TOLERANCE);
        assert!(l.signed_dist(&c).abs() < TOLERANCE);
    }

    #[test]
    fn negated_swaps_sides() {
        let l = Limit::new(Vec2::new(0.0, 1.0), 2.0);
        let p = Vec2::new(0.0, 5.0);
        assert!(!l.contains(&p));
        assert!(l.negated().contains(&p));
        assert!((l.negated().signed_dist(&p) + l.signed_dist(&p)).abs() < TOLERANCE);
    }

    #[test]
    fn ray_intersection_respects_range() {
        let l = Limit::new(Vec2::new(0.0, 1.0), 2.0);
        let up = Ray2::new(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)).unwrap();
        let hit = l.intersection(&up).unwrap();
        assert!((hit.y - 2.0).abs() < TOLERANCE);

        let down = Ray2::new(Vec2::new(1.0, 0.0), Vec2::new(0.0, -1.0)).unwrap();
        assert!(l.intersection(&down).is_none());
        let two_sided = Ray2::two_sided(Vec2::new(1.0, 0.0), Vec2::new(0.0, -1.0)).unwrap();
        assert!(l.intersection(&two_sided).is_some());

        let parallel = Ray2::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)).unwrap();
        assert!(l.intersection(&parallel).is_none());
    }

    #[test]
    fn array_round_trip() {
        let l = Limit::from_array(&[0.6, 0.8, 3.0]).unwrap();
        assert_eq!(l.to_array(), [0.6, 0.8, 3.0]);
        assert!(Limit::from_array(&[1.0]).is_err());
    }
}
