//! 3D planes.
//!
//! The convention matches [`crate::limit::Limit`]: the plane is the set
//! `normal · p = constant` and signed distances are `normal · p - constant`.

use crate::bounds::Box3;
use crate::error::{GeokernError, GeometryError, Result};
use crate::line::Line3;
use crate::vec::{Coord, Vec2, Vec3, TOLERANCE};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub constant: f64,
}

impl Plane {
    #[must_use]
    pub fn new(normal: Vec3, constant: f64) -> Self {
        Self { normal, constant }
    }

    #[must_use]
    pub fn from_normal_and_point(normal: Vec3, p: &Vec3) -> Self {
        Self {
            normal,
            constant: normal.dot(p),
        }
    }

    /// Plane through three points, normal along `(b-a) × (c-a)`.
    /// `None` when the points are collinear.
    #[must_use]
    pub fn from_points(a: &Vec3, b: &Vec3, c: &Vec3) -> Option<Self> {
        let n = (b - a).cross(&(c - a));
        if n.norm() < TOLERANCE {
            return None;
        }
        Some(Self::from_normal_and_point(n.normalize(), a))
    }

    #[must_use]
    pub fn facing(axis: usize) -> Self {
        let mut n = Vec3::zeros();
        n.set_axis(axis, 1.0);
        Self::new(n, 0.0)
    }

    #[must_use]
    pub fn dist_from_origin(&self) -> f64 {
        self.constant
    }

    /// Signed distance, positive on the normal side.
    #[must_use]
    pub fn signed_dist(&self, p: &Vec3) -> f64 {
        self.normal.dot(p) - self.constant
    }

    #[must_use]
    pub fn closest_point(&self, p: &Vec3) -> Vec3 {
        p - self.normal * self.signed_dist(p)
    }

    #[must_use]
    pub fn negated(&self) -> Self {
        Self {
            normal: -self.normal,
            constant: -self.constant,
        }
    }

    /// Height of the plane over an XY position. `None` for a vertical
    /// plane.
    #[must_use]
    pub fn z_at_xy(&self, p: &Vec2) -> Option<f64> {
        if self.normal.z.abs() < TOLERANCE {
            return None;
        }
        Some((self.constant - p.x * self.normal.x - p.y * self.normal.y) / self.normal.z)
    }

    /// Fractional position along the segment's carrier line where it
    /// crosses the plane. `None` when the segment lies parallel.
    #[must_use]
    pub fn intersection_index(&self, line: &Line3) -> Option<f64> {
        let da = self.normal.dot(&line.a);
        let db = self.normal.dot(&line.b);
        if (da - db).abs() < TOLERANCE {
            return None;
        }
        Some((self.constant - da) / (db - da))
    }

    /// Segment×plane crossing, endpoint inclusive.
    #[must_use]
    pub fn intersect_line(&self, line: &Line3) -> Option<Vec3> {
        let da = self.normal.dot(&line.a);
        let db = self.normal.dot(&line.b);
        let c = self.constant;
        let straddles = (da <= c && c <= db) || (db <= c && c <= da);
        if !straddles || (da - db).abs() < TOLERANCE {
            return None;
        }
        let f = (c - da) / (db - da);
        Some(line.a.lerp_to(&line.b, f))
    }

    /// Signed clearance between the plane and a box: negative when the box
    /// is entirely on the back side, zero when it straddles.
    #[must_use]
    pub fn dist_to_box(&self, b: &Box3) -> f64 {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for x in [b.min.x, b.max.x] {
            for y in [b.min.y, b.max.y] {
                for z in [b.min.z, b.max.z] {
                    let d = self.signed_dist(&Vec3::new(x, y, z));
                    min = min.min(d);
                    max = max.max(d);
                }
            }
        }
        if max <= 0.0 {
            return max;
        }
        if min >= 0.0 {
            return min;
        }
        0.0
    }

    /// Horizontal downhill direction of the plane. `None` for a level
    /// plane.
    #[must_use]
    pub fn azimuth_vector(&self) -> Option<Vec3> {
        if self.normal.x.abs() < TOLERANCE && self.normal.y.abs() < TOLERANCE {
            return None;
        }
        Some(Vec3::new(-self.normal.x, -self.normal.y, 0.0).normalize())
    }

    /// Orthonormal 2D chart on the plane.
    #[must_use]
    pub fn frame(&self) -> PlaneFrame {
        let azimuth = self
            .azimuth_vector()
            .unwrap_or_else(|| Vec3::new(1.0, 0.0, 0.0));
        let y_axis = self.normal.cross(&azimuth).normalize();
        let x_axis = y_axis.cross(&self.normal).normalize();
        PlaneFrame {
            origin: self.normal * self.constant,
            x_axis,
            y_axis,
        }
    }

    /// Flat `[normal_x, normal_y, normal_z, constant]` form.
    #[must_use]
    pub fn to_array(&self) -> [f64; 4] {
        [self.normal.x, self.normal.y, self.normal.z, self.constant]
    }

    pub fn from_array(values: &[f64]) -> Result<Self> {
        if values.len() != 4 {
            return Err(GeokernError::Geometry(GeometryError::InvalidArrayLength {
                expected: 4,
                got: values.len(),
            }));
        }
        Ok(Self::new(
            Vec3::new(values[0], values[1], values[2]),
            values[3],
        ))
    }

    /// Least-squares plane through a point cloud.
    ///
    /// Builds the 3x3 covariance of the centered points and solves the
    /// normal equations along whichever axis elimination is best
    /// conditioned. The normal is oriented to agree with the winding of
    /// the first three points. `None` for fewer than 3 points or
    /// rank-deficient input (collinear clouds).
    #[must_use]
    pub fn best_fit(points: &[Vec3]) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }

        let mut centroid = Vec3::zeros();
        for p in points {
            centroid += p;
        }
        centroid /= points.len() as f64;

        let (mut xx, mut xy, mut xz) = (0.0, 0.0, 0.0);
        let (mut yy, mut yz, mut zz) = (0.0, 0.0, 0.0);
        for p in points {
            let r = p - centroid;
            xx += r.x * r.x;
            xy += r.x * r.y;
            xz += r.x * r.z;
            yy += r.y * r.y;
            yz += r.y * r.z;
            zz += r.z * r.z;
        }

        let det_x = yy * zz - yz * yz;
        let det_y = xx * zz - xz * xz;
        let det_z = xx * yy - xy * xy;
        let det_max = det_x.max(det_y).max(det_z);
        if det_max <= 0.0 {
            return None;
        }

        let normal = if det_max == det_x {
            Vec3::new(det_x, xz * yz - xy * zz, xy * yz - xz * yy)
        } else if det_max == det_y {
            Vec3::new(xz * yz - xy * zz, det_y, xy * xz - yz * xx)
        } else {
            Vec3::new(xy * yz - xz * yy, xy * xz - yz * xx, det_z)
        };
        let mut normal = normal.normalize();

        let winding =
            (points[1] - points[0]).cross(&(points[2] - points[0]));
        if winding.dot(&normal) < 0.0 {
            normal = -normal;
        }
        Some(Self::from_normal_and_point(normal, &centroid))
    }
}

/// 2D chart on a plane, built by [`Plane::frame`].
///
/// `to_2d` followed by `to_3d` is the identity for coplanar points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneFrame {
    pub origin: Vec3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
}

impl PlaneFrame {
    #[must_use]
    pub fn to_2d(&self, p: &Vec3) -> Vec2 {
        Vec2::new(self.x_axis.dot(p), self.y_axis.dot(p))
    }

    #[must_use]
    pub fn to_3d(&self, p: &Vec2) -> Vec3 {
        self.origin + self.x_axis * p.x + self.y_axis * p.y
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::line::Line3;

    #[test]
    fn from_points_orientation() {
        let p = Plane::from_points(
            &Vec3::new(0.0, 0.0, 1.0),
            &Vec3::new(1.0, 0.0, 1.0),
            &Vec3::new(0.0, 1.0, 1.0),
        )
        .unwrap();
        assert!((p.normal.z - 1.0).abs() < TOLERANCE);
        assert!((p.constant - 1.0).abs() < TOLERANCE);
        assert!((p.signed_dist(&Vec3::new(5.0, 5.0, 3.0)) - 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn collinear_points_are_none() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 1.0, 1.0);
        let c = Vec3::new(2.0, 2.0, 2.0);
        assert!(Plane::from_points(&a, &b, &c).is_none());
    }

    #[test]
    fn array_round_trip() {
        let p = Plane::from_array(&[0.0, 0.6, 0.8, 3.0]).unwrap();
        assert_eq!(p.to_array(), [0.0, 0.6, 0.8, 3.0]);
        assert!(Plane::from_array(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn closest_point_projects() {
        let p = Plane::new(Vec3::new(0.0, 0.0, 1.0), 2.0);
        let c = p.closest_point(&Vec3::new(3.0, 4.0, 7.0));
        assert!((c - Vec3::new(3.0, 4.0, 2.0)).norm() < TOLERANCE);
    }

    #[test]
    fn z_at_xy_of_tilted_plane() {
        // Plane z = x.
        let p = Plane::from_points(
            &Vec3::new(0.0, 0.0, 0.0),
            &Vec3::new(0.0, 1.0, 0.0),
            &Vec3::new(1.0, 0.0, 1.0),
        )
        .unwrap();
        let z = p.z_at_xy(&Vec2::new(3.0, 9.0)).unwrap();
        assert!((z - 3.0).abs() < 1e-9, "z={z}");
        // A vertical plane has no z.
        let vertical = Plane::new(Vec3::new(1.0, 0.0, 0.0), 0.0);
        assert!(vertical.z_at_xy(&Vec2::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn segment_straddle_is_inclusive() {
        let p = Plane::new(Vec3::new(0.0, 0.0, 1.0), 1.0);
        let crossing = Line3::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0));
        let hit = p.intersect_line(&crossing).unwrap();
        assert!((hit.z - 1.0).abs() < TOLERANCE);
        assert!((p.intersection_index(&crossing).unwrap() - 0.5).abs() < TOLERANCE);

        // Endpoint exactly on the plane still counts.
        let touching = Line3::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 5.0));
        assert!(p.intersect_line(&touching).is_some());

        // Entirely on one side.
        let above = Line3::new(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, 5.0));
        assert!(p.intersect_line(&above).is_none());

        // Parallel in the plane.
        let coplanar = Line3::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 1.0));
        assert!(p.intersect_line(&coplanar).is_none());
    }

    #[test]
    fn frame_round_trips_coplanar_points() {
        let p = Plane::from_points(
            &Vec3::new(0.0, 0.0, 2.0),
            &Vec3::new(1.0, 0.0, 3.0),
            &Vec3::new(0.0, 1.0, 2.0),
        )
        .unwrap();
        let frame = p.frame();
        for q in [
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(1.0, 0.0, 3.0),
            Vec3::new(0.5, 0.7, 2.5),
        ] {
            let back = frame.to_3d(&frame.to_2d(&q));
            assert!((back - q).norm() < 1e-9, "q={q:?} back={back:?}");
        }
        // The chart preserves distances.
        let a = frame.to_2d(&Vec3::new(0.0, 0.0, 2.0));
        let b = frame.to_2d(&Vec3::new(1.0, 0.0, 3.0));
        assert!((a.dist_to(&b) - 2.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn best_fit_recovers_plane() {
        let points = [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(0.5, 0.5, 1.0),
        ];
        let p = Plane::best_fit(&points).unwrap();
        assert!((p.normal.z - 1.0).abs() < 1e-9, "normal={:?}", p.normal);
        assert!((p.constant - 1.0).abs() < 1e-9);
    }

    #[test]
    fn best_fit_orientation_follows_winding() {
        // Clockwise-wound square (seen from +z) flips the normal down.
        let points = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ];
        let p = Plane::best_fit(&points).unwrap();
        assert!((p.normal.z + 1.0).abs() < 1e-9, "normal={:?}", p.normal);
    }

    #[test]
    fn best_fit_degenerate_input() {
        assert!(Plane::best_fit(&[Vec3::new(0.0, 0.0, 0.0)]).is_none());
        let collinear = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        ];
        assert!(Plane::best_fit(&collinear).is_none());
    }

    #[test]
    fn dist_to_box_sides() {
        let p = Plane::new(Vec3::new(0.0, 0.0, 1.0), 0.0);
        let above = Box3::from_points(&[Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 1.0, 3.0)]);
        assert!((p.dist_to_box(&above) - 2.0).abs() < TOLERANCE);
        let below = Box3::from_points(&[Vec3::new(0.0, 0.0, -3.0), Vec3::new(1.0, 1.0, -2.0)]);
        assert!((p.dist_to_box(&below) + 2.0).abs() < TOLERANCE);
        let straddling =
            Box3::from_points(&[Vec3::new(0.0, 0.0, -1.0), Vec3::new(1.0, 1.0, 1.0)]);
        assert!(p.dist_to_box(&straddling).abs() < TOLERANCE);
    }
}
