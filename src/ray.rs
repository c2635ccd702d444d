//! Rays in 2D and 3D, one-sided or two-sided.

use crate::error::{GeometryError, GeokernError, Result};
use crate::bounds::Aabb;
use crate::line::{Line, Line2, Line3};
use crate::plane::Plane;
use crate::range::PlaneRange;
use crate::vec::{rotated_90, Coord, Vec2, Vec3, TOLERANCE};

/// Half-line from `org` along the unit direction `dir`.
///
/// The parameter range starts at `min_dist` (`0` for an ordinary ray,
/// `-∞` for a two-sided one), so the range checks in the intersection
/// code cover both kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray<V: Coord> {
    pub org: V,
    pub dir: V,
    min_dist: f64,
}

/// 2D ray.
pub type Ray2 = Ray<Vec2>;

/// 3D ray.
pub type Ray3 = Ray<Vec3>;

/// Crossing of two 2D rays (or a ray and a segment), with the parameter
/// distance along each.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayIntersection {
    pub point: Vec2,
    pub dist_a: f64,
    pub dist_b: f64,
}

impl<V: Coord> Ray<V> {
    /// A one-sided ray. The direction is normalized; a zero direction is
    /// rejected.
    pub fn new(org: V, dir: V) -> Result<Self> {
        Self::build(org, dir, 0.0)
    }

    /// A two-sided ray (full carrier line).
    pub fn two_sided(org: V, dir: V) -> Result<Self> {
        Self::build(org, dir, f64::NEG_INFINITY)
    }

    pub fn from_points(org: V, towards: V) -> Result<Self> {
        Self::build(org, towards - org, 0.0)
    }

    pub fn two_sided_from_points(org: V, towards: V) -> Result<Self> {
        Self::build(org, towards - org, f64::NEG_INFINITY)
    }

    fn build(org: V, dir: V, min_dist: f64) -> Result<Self> {
        if dir.norm() < TOLERANCE {
            return Err(GeokernError::Geometry(GeometryError::ZeroVector));
        }
        Ok(Self {
            org,
            dir: dir.normalized(),
            min_dist,
        })
    }

    // Internal constructor for segments lifted to rays; the caller owns
    // the degeneracy check.
    pub(crate) fn raw(org: V, dir: V, min_dist: f64) -> Self {
        Self { org, dir, min_dist }
    }

    #[must_use]
    pub fn is_two_sided(&self) -> bool {
        self.min_dist == f64::NEG_INFINITY
    }

    #[must_use]
    pub fn min_dist(&self) -> f64 {
        self.min_dist
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            org: self.org,
            dir: self.dir * -1.0,
            min_dist: self.min_dist,
        }
    }

    /// Parameter distance of `p`'s projection onto the ray.
    #[must_use]
    pub fn dist_of(&self, p: &V) -> f64 {
        self.dir.dot(p) - self.dir.dot(&self.org)
    }

    #[must_use]
    pub fn at_dist(&self, dist: f64) -> V {
        self.org + self.dir * dist
    }

    #[must_use]
    pub fn closest_point(&self, p: &V) -> V {
        self.at_dist(self.dist_of(p).max(self.min_dist))
    }

    #[must_use]
    pub fn dist_to_point(&self, p: &V) -> f64 {
        self.closest_point(p).dist_to(p)
    }

    #[must_use]
    pub fn dist_to_point_sq(&self, p: &V) -> f64 {
        self.closest_point(p).dist_sq_to(p)
    }

    /// Dot interval covered by the ray along its direction.
    #[must_use]
    pub fn plane_range(&self) -> PlaneRange<V> {
        let min = if self.is_two_sided() {
            f64::NEG_INFINITY
        } else {
            self.dir.dot(&self.org)
        };
        PlaneRange::new(self.dir, min, f64::INFINITY)
    }

    /// First hit on a ball surface within the parameter range.
    #[must_use]
    pub fn intersect_ball(&self, center: &V, radius: f64) -> Option<V> {
        let oc = *center - self.org;
        let tca = oc.dot(&self.dir);
        let d2 = oc.dot(&oc) - tca * tca;
        let r2 = radius * radius;
        if d2 > r2 {
            return None;
        }
        let thc = (r2 - d2).sqrt();
        let t0 = tca - thc;
        let t1 = tca + thc;
        if t1 < self.min_dist {
            return None;
        }
        let t = if t0 < self.min_dist { t1 } else { t0 };
        Some(self.at_dist(t))
    }

    /// Entry point on an axis-aligned box (slab test), or the exit point
    /// when the ray starts inside.
    #[must_use]
    pub fn intersect_box(&self, b: &Aabb<V>) -> Option<V> {
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;
        for i in 0..V::DIM {
            let inv = 1.0 / self.dir.axis(i);
            let mut t0 = (b.min.axis(i) - self.org.axis(i)) * inv;
            let mut t1 = (b.max.axis(i) - self.org.axis(i)) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            // NaN from 0 * inf falls through both comparisons.
            if t0 > t_min {
                t_min = t0;
            }
            if t1 < t_max {
                t_max = t1;
            }
            if t_min > t_max {
                return None;
            }
        }
        if t_max < self.min_dist {
            return None;
        }
        let t = if t_min >= self.min_dist { t_min } else { t_max };
        Some(self.at_dist(t))
    }
}

impl Ray2 {
    /// Unit left normal of the direction.
    #[must_use]
    pub fn normal(&self) -> Vec2 {
        rotated_90(&self.dir)
    }

    // Parameter along `self` where the two carrier lines meet.
    fn carrier_dist(&self, that: &Ray2) -> Option<f64> {
        let normal = self.normal();
        let cos = self.dir.dot(&that.dir);
        let sin = normal.dot(&that.dir);
        if sin.abs() < TOLERANCE {
            return None;
        }
        let delta = that.org - self.org;
        let away = normal.dot(&delta);
        Some(self.dir.dot(&delta) - away * cos / sin)
    }

    fn intersect_in_range(
        &self,
        that: &Ray2,
        range_a: (f64, f64),
        range_b: (f64, f64),
    ) -> Option<RayIntersection> {
        let dist_a = self.carrier_dist(that)?;
        if dist_a < range_a.0 || range_a.1 < dist_a {
            return None;
        }
        let point = self.at_dist(dist_a);
        let dist_b = that.dist_of(&point);
        if dist_b < range_b.0 || range_b.1 < dist_b {
            return None;
        }
        Some(RayIntersection {
            point,
            dist_a,
            dist_b,
        })
    }

    /// Ray×ray crossing within both parameter ranges.
    #[must_use]
    pub fn intersect_ray(&self, that: &Ray2) -> Option<RayIntersection> {
        self.intersect_in_range(
            that,
            (self.min_dist, f64::INFINITY),
            (that.min_dist, f64::INFINITY),
        )
    }

    /// Ray×segment crossing; `dist_b` runs from `0` at `that.a`.
    #[must_use]
    pub fn intersect_line(&self, that: &Line2) -> Option<RayIntersection> {
        let len = that.len();
        if len < TOLERANCE {
            return None;
        }
        let carrier = Ray2::raw(that.a, that.delta() * (1.0 / len), 0.0);
        self.intersect_in_range(&carrier, (self.min_dist, f64::INFINITY), (0.0, len))
    }
}

impl Ray3 {
    /// Parameter distance to a plane crossing. `None` when parallel or
    /// behind a one-sided ray.
    #[must_use]
    pub fn dist_of_plane(&self, plane: &Plane) -> Option<f64> {
        let denom = plane.normal.dot(&self.dir);
        if denom.abs() < TOLERANCE {
            return None;
        }
        let t = (plane.constant - plane.normal.dot(&self.org)) / denom;
        if t < self.min_dist {
            return None;
        }
        Some(t)
    }

    #[must_use]
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vec3> {
        self.dist_of_plane(plane).map(|t| self.at_dist(t))
    }

    /// Parameter distances of the closest approach between the two
    /// carrier lines, unclamped. `None` when near-parallel.
    #[must_use]
    pub fn closest_dists_with_ray(&self, that: &Ray3) -> Option<(f64, f64)> {
        if self.dir.dot(&that.dir).abs() > 0.999_999_9 {
            return None;
        }
        let nv = self.dir.cross(&that.dir);
        let na = self.dir.cross(&nv).normalize();
        let nb = that.dir.cross(&nv).normalize();
        let da = (that.org - self.org).dot(&nb) / self.dir.dot(&nb);
        let db = (self.org - that.org).dot(&na) / that.dir.dot(&na);
        Some((da, db))
    }

    /// Closest points between two rays, clamped to both parameter ranges.
    #[must_use]
    pub fn closest_points_with_ray(&self, that: &Ray3) -> Option<(Vec3, Vec3)> {
        let (da, db) = self.closest_dists_with_ray(that)?;
        let a_behind = da < self.min_dist;
        let b_behind = db < that.min_dist;
        if a_behind && b_behind {
            return Some((self.org, that.org));
        }
        if a_behind {
            return Some((self.org, that.closest_point(&self.org)));
        }
        if b_behind {
            return Some((self.closest_point(&that.org), that.org));
        }
        Some((self.at_dist(da), that.at_dist(db)))
    }

    /// Closest points between the ray and a segment.
    #[must_use]
    pub fn closest_points_with_line(&self, that: &Line3) -> Option<(Vec3, Vec3)> {
        let len = that.len();
        if len < TOLERANCE {
            return None;
        }
        let carrier = Ray3::raw(that.a, that.delta() * (1.0 / len), 0.0);
        let (da, db) = self.closest_dists_with_ray(&carrier)?;
        if da < self.min_dist && db < 0.0 {
            return Some((self.org, that.a));
        }
        if da < self.min_dist {
            return Some((self.org, carrier.closest_point(&self.org)));
        }
        if db < 0.0 {
            return Some((self.closest_point(&that.a), that.a));
        }
        if db > len {
            return Some((self.closest_point(&that.b), that.b));
        }
        Some((self.at_dist(da), carrier.at_dist(db)))
    }

    #[must_use]
    pub fn dist_to_line(&self, that: &Line3) -> Option<f64> {
        self.closest_points_with_line(that).map(|(a, b)| a.dist_to(&b))
    }
}
