//! Circles and spheres.

use std::f64::consts::TAU;

use crate::farthest::farthest_pair;
use crate::vec::{Coord, Vec2, Vec3, TOLERANCE};

/// Ball with a center and radius; [`Circle`] in 2D, [`Sphere`] in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball<V: Coord> {
    pub center: V,
    pub radius: f64,
}

pub type Circle = Ball<Vec2>;
pub type Sphere = Ball<Vec3>;

impl<V: Coord> Ball<V> {
    #[must_use]
    pub fn new(center: V, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Boundary inclusive.
    #[must_use]
    pub fn contains(&self, p: &V) -> bool {
        self.center.dist_sq_to(p) <= self.radius * self.radius
    }

    /// Bounding ball whose diameter is the farthest pair of the set.
    ///
    /// Cheap and usually tight, but not the minimal enclosing ball: a
    /// point near the perpendicular bisector of the pair can stick out
    /// slightly. `None` for fewer than 2 points.
    #[must_use]
    pub fn from_points(points: &[V]) -> Option<Self> {
        let (a, b, d) = farthest_pair(points)?;
        Some(Self::new(a.mid_to(&b), d / 2.0))
    }

    #[must_use]
    pub fn dist_to_point(&self, p: &V) -> f64 {
        self.center.dist_to(p) - self.radius
    }
}

impl Circle {
    #[must_use]
    pub fn circumference(&self) -> f64 {
        self.radius * TAU
    }

    /// Circumcircle of three points. `None` when collinear.
    #[must_use]
    pub fn from_three_points(a: &Vec2, b: &Vec2, c: &Vec2) -> Option<Self> {
        let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
        if d.abs() < TOLERANCE {
            return None;
        }
        let aa = a.norm_sq();
        let bb = b.norm_sq();
        let cc = c.norm_sq();
        let center = Vec2::new(
            (aa * (b.y - c.y) + bb * (c.y - a.y) + cc * (a.y - b.y)) / d,
            (aa * (c.x - b.x) + bb * (a.x - c.x) + cc * (b.x - a.x)) / d,
        );
        Some(Self::new(center, center.dist_to(a)))
    }

    /// `count` points spaced over the azimuth range `[start, end)`,
    /// clockwise from north.
    #[must_use]
    pub fn points_along_circumference(&self, count: usize, start: f64, end: f64) -> Vec<Vec2> {
        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            let a = start + (end - start) * (i as f64 / count as f64);
            out.push(self.center + Vec2::new(a.sin(), a.cos()) * self.radius);
        }
        out
    }
}
