//! Triangles with perimeter addressing and threshold banding.

use crate::line::Line;
use crate::polygon::Polygon3;
use crate::vec::{Coord, Vec2, Vec3, TOLERANCE};

/// Triangle with corners `a`, `b`, `c`.
///
/// Perimeter positions are addressed by a fractional index in `0..3`:
/// `0..1` runs along `a→b`, `1..2` along `b→c`, `2..3` along `c→a`.
/// Indices outside that range wrap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle<V: Coord> {
    pub a: V,
    pub b: V,
    pub c: V,
}

pub type Triangle2 = Triangle<Vec2>;
pub type Triangle3 = Triangle<Vec3>;

impl<V: Coord> Triangle<V> {
    #[must_use]
    pub fn new(a: V, b: V, c: V) -> Self {
        Self { a, b, c }
    }

    /// Corner by wrapping index.
    #[must_use]
    pub fn corner(&self, i: i64) -> V {
        match i.rem_euclid(3) {
            0 => self.a,
            1 => self.b,
            _ => self.c,
        }
    }

    /// Point at a fractional perimeter index.
    #[must_use]
    pub fn at_index(&self, i: f64) -> V {
        let i = i.rem_euclid(3.0);
        if i < 1.0 {
            self.a.lerp_to(&self.b, i)
        } else if i < 2.0 {
            self.b.lerp_to(&self.c, i - 1.0)
        } else {
            self.c.lerp_to(&self.a, i - 2.0)
        }
    }

    #[must_use]
    pub fn sides(&self) -> [Line<V>; 3] {
        [
            Line::new(self.a, self.b),
            Line::new(self.b, self.c),
            Line::new(self.c, self.a),
        ]
    }

    #[must_use]
    pub fn side_lengths(&self) -> [f64; 3] {
        [
            self.a.dist_to(&self.b),
            self.b.dist_to(&self.c),
            self.c.dist_to(&self.a),
        ]
    }

    #[must_use]
    pub fn side_lengths_sq(&self) -> [f64; 3] {
        [
            self.a.dist_sq_to(&self.b),
            self.b.dist_sq_to(&self.c),
            self.c.dist_sq_to(&self.a),
        ]
    }

    /// Index of the longest side.
    #[must_use]
    pub fn max_side(&self) -> usize {
        let [ab, bc, ca] = self.side_lengths_sq();
        if ab >= bc && ab >= ca {
            0
        } else if bc >= ca {
            1
        } else {
            2
        }
    }

    /// Index of the shortest side.
    #[must_use]
    pub fn min_side(&self) -> usize {
        let [ab, bc, ca] = self.side_lengths_sq();
        if ab <= bc && ab <= ca {
            0
        } else if bc <= ca {
            1
        } else {
            2
        }
    }

    #[must_use]
    pub fn perimeter(&self) -> f64 {
        let [ab, bc, ca] = self.side_lengths();
        ab + bc + ca
    }

    #[must_use]
    pub fn centroid(&self) -> V {
        (self.a + self.b + self.c) * (1.0 / 3.0)
    }

    #[must_use]
    pub fn closest_point_to_point(&self, p: &V) -> V {
        let mut found = self.a;
        let mut best = f64::INFINITY;
        for side in self.sides() {
            let c = side.closest_point_to_point(p);
            let d = c.dist_sq_to(p);
            if d < best {
                best = d;
                found = c;
            }
        }
        found
    }

    #[must_use]
    pub fn dist_to_point_sq(&self, p: &V) -> f64 {
        self.closest_point_to_point(p).dist_sq_to(p)
    }

    #[must_use]
    pub fn dist_to_point(&self, p: &V) -> f64 {
        self.dist_to_point_sq(p).sqrt()
    }
}

impl Triangle2 {
    /// Positive for clockwise winding in screen coordinates.
    #[must_use]
    pub fn signed_area_of(a: &Vec2, b: &Vec2, c: &Vec2) -> f64 {
        (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y)) / 2.0
    }

    #[must_use]
    pub fn area_of(a: &Vec2, b: &Vec2, c: &Vec2) -> f64 {
        Self::signed_area_of(a, b, c).abs()
    }

    #[must_use]
    pub fn signed_area(&self) -> f64 {
        Self::signed_area_of(&self.a, &self.b, &self.c)
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Area-ratio containment test: the sub-triangle areas at `p` must sum
    /// to the whole within `margin` (relative). Boundary points count as
    /// inside.
    #[must_use]
    pub fn contains(&self, p: &Vec2, margin: f64) -> bool {
        contains_by_area(
            self.area(),
            Self::area_of(p, &self.b, &self.c),
            Self::area_of(&self.a, p, &self.c),
            Self::area_of(&self.a, &self.b, p),
            margin,
        )
    }

    /// Circumcircle center. `None` for collinear corners.
    #[must_use]
    pub fn circumcenter(&self) -> Option<Vec2> {
        let dx = self.b.x - self.a.x;
        let dy = self.b.y - self.a.y;
        let ex = self.c.x - self.a.x;
        let ey = self.c.y - self.a.y;

        let denom = dx * ey - dy * ex;
        if denom.abs() < TOLERANCE {
            return None;
        }
        let d = 0.5 / denom;
        let bl = dx * dx + dy * dy;
        let cl = ex * ex + ey * ey;
        Some(Vec2::new(
            self.a.x + (ey * bl - dy * cl) * d,
            self.a.y + (dx * cl - ex * bl) * d,
        ))
    }
}

impl Triangle3 {
    #[must_use]
    pub fn area_of(a: &Vec3, b: &Vec3, c: &Vec3) -> f64 {
        (*c - *b).cross(&(*a - *b)).norm() * 0.5
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        Self::area_of(&self.a, &self.b, &self.c)
    }

    /// Unit normal by the right-hand rule over `a→b→c`. `None` for a
    /// degenerate triangle.
    #[must_use]
    pub fn normal(&self) -> Option<Vec3> {
        let n = (self.b - self.a).cross(&(self.c - self.a));
        let len = n.norm();
        if len < TOLERANCE {
            return None;
        }
        Some(n * (1.0 / len))
    }

    /// Area-ratio containment of the XY shadow.
    #[must_use]
    pub fn contains_xy(&self, p: &Vec2, margin: f64) -> bool {
        let xy = |v: &Vec3| Vec2::new(v.x, v.y);
        let (a, b, c) = (xy(&self.a), xy(&self.b), xy(&self.c));
        contains_by_area(
            Triangle2::area_of(&a, &b, &c),
            Triangle2::area_of(p, &b, &c),
            Triangle2::area_of(&a, p, &c),
            Triangle2::area_of(&a, &b, p),
            margin,
        )
    }

    /// Height of the triangle's surface above an XY position, by solving
    /// the vertical ray against the triangle. `margin` loosens the edge
    /// test. `None` when the position misses the triangle or the triangle
    /// is vertical.
    #[must_use]
    pub fn z_at_xy(&self, p: &Vec2, margin: f64) -> Option<f64> {
        let (a, b, c) = (&self.a, &self.b, &self.c);
        if p.x < a.x && p.x < b.x && p.x < c.x {
            return None;
        }
        if a.x < p.x && b.x < p.x && c.x < p.x {
            return None;
        }
        if p.y < a.y && p.y < b.y && p.y < c.y {
            return None;
        }
        if a.y < p.y && b.y < p.y && c.y < p.y {
            return None;
        }

        let edge1 = *b - *a;
        let edge2 = *c - *a;
        let normal = edge1.cross(&edge2);

        // The query ray points down the z axis, so the determinant is the
        // normal's z component.
        let mut ddn = normal.z;
        let sign = if ddn > 0.0 {
            1.0
        } else if ddn < 0.0 {
            ddn = -ddn;
            -1.0
        } else {
            return None;
        };

        let diff = Vec3::new(p.x - a.x, p.y - a.y, -a.z);
        let b1 = sign * (diff.x * edge2.y - diff.y * edge2.x);
        if b1 < -margin {
            return None;
        }
        let b2 = sign * (edge1.x * diff.y - edge1.y * diff.x);
        if b2 < -margin {
            return None;
        }
        if b1 + b2 - ddn > margin {
            return None;
        }

        Some(-sign * diff.dot(&normal) / ddn)
    }

    /// Cuts the triangle into bands between consecutive thresholds, one
    /// value per corner interpolated along the perimeter. Band `i` covers
    /// `thresholds[i]..thresholds[i+1]`; bands that do not form a polygon
    /// come back paired with an empty point set.
    #[must_use]
    pub fn divide_by_thresholds(
        &self,
        values: [f64; 3],
        thresholds: &[f64],
    ) -> Vec<(usize, Polygon3)> {
        let mut out = Vec::new();
        for (band, indices) in indices_from_thresholds(values, thresholds)
            .into_iter()
            .enumerate()
        {
            if indices.len() >= 3 {
                let points = indices.iter().map(|&i| self.at_index(i)).collect();
                out.push((band, Polygon3::new(points)));
            }
        }
        out
    }
}

fn contains_by_area(whole: f64, a1: f64, a2: f64, a3: f64, margin: f64) -> bool {
    (whole / (a1 + a2 + a3) - 1.0).abs() < margin
}

/// Perimeter indices of the band boundaries for each threshold interval.
///
/// `values` holds one sample per corner; `thresholds` must be sorted
/// ascending. The result has one entry per interval, listing fractional
/// perimeter indices in corner order: a corner index when its value lies
/// in the interval, and interpolated side crossings where a side spans a
/// threshold. Intervals collecting fewer than 3 indices are emptied, as
/// they cannot form a band polygon.
///
/// Only the interior intervals are reported; to band the open ends, add
/// `-inf` and `+inf` around the thresholds.
#[must_use]
pub fn indices_from_thresholds(values: [f64; 3], thresholds: &[f64]) -> Vec<Vec<f64>> {
    let band_count = thresholds.len().saturating_sub(1);
    let mut bands: Vec<Vec<f64>> = vec![Vec::new(); band_count];

    // Corner order keeps the output indices in perimeter order per band.
    for (band, indices) in bands.iter_mut().enumerate() {
        let tha = thresholds[band];
        let thb = thresholds[band + 1];

        for pi in 0..3 {
            let qi = (pi + 1) % 3;
            let va = values[pi];
            let vb = values[qi];
            let value_diff = vb - va;
            let pi_f = pi as f64;

            if tha <= va && va <= thb {
                indices.push(pi_f);
            }
            if va < vb {
                if va < tha && tha < vb {
                    indices.push(pi_f + (tha - va) / value_diff);
                }
                if va < thb && thb < vb {
                    indices.push(pi_f + (thb - va) / value_diff);
                }
            } else if vb < va {
                if vb < thb && thb < va {
                    indices.push(pi_f + (thb - va) / value_diff);
                }
                if vb < tha && tha < va {
                    indices.push(pi_f + (tha - va) / value_diff);
                }
            }
        }
    }
    for indices in &mut bands {
        if indices.len() < 3 {
            indices.clear();
        }
    }
    bands
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn assert_bands(got: &[Vec<f64>], wanted: &[Vec<f64>]) {
        assert_eq!(got.len(), wanted.len());
        for (g, w) in got.iter().zip(wanted) {
            assert_eq!(g.len(), w.len(), "got={g:?} wanted={w:?}");
            for (gv, wv) in g.iter().zip(w) {
                assert!((gv - wv).abs() < 1e-12, "got={g:?} wanted={w:?}");
            }
        }
    }

    #[test]
    fn area_of_flat_triangle() {
        let t = Triangle3::new(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(5.0, 0.0, 5.0),
            Vec3::new(2.5, 5.0, 5.0),
        );
        assert!((t.area() - 12.5).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_tracks_winding() {
        let t = Triangle2::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 4.0),
            Vec2::new(3.0, 0.0),
        );
        // This winding is counter-clockwise on screen (y down), so the
        // signed area is negative; the reverse winding is positive.
        assert!((t.signed_area() + 6.0).abs() < TOLERANCE);
        let rev = Triangle2::new(t.c, t.b, t.a);
        assert!((rev.signed_area() - 6.0).abs() < TOLERANCE);
    }

    #[test]
    fn perimeter_addressing_wraps() {
        let t = Triangle2::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
        );
        assert!((t.at_index(0.5) - Vec2::new(1.0, 0.0)).norm() < TOLERANCE);
        assert!((t.at_index(1.5) - Vec2::new(2.0, 1.0)).norm() < TOLERANCE);
        assert!((t.at_index(2.5) - Vec2::new(1.0, 1.0)).norm() < TOLERANCE);
        assert!((t.at_index(3.5) - t.at_index(0.5)).norm() < TOLERANCE);
        assert!((t.at_index(-0.5) - t.at_index(2.5)).norm() < TOLERANCE);
    }

    #[test]
    fn contains_with_margin() {
        let t = Triangle2::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(0.0, 4.0),
        );
        assert!(t.contains(&Vec2::new(1.0, 1.0), 0.01));
        assert!(t.contains(&Vec2::new(2.0, 0.0), 0.01));
        assert!(!t.contains(&Vec2::new(3.0, 3.0), 0.01));
    }

    #[test]
    fn circumcenter_of_right_triangle() {
        let t = Triangle2::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(0.0, 3.0),
        );
        let c = t.circumcenter().unwrap();
        assert!((c - Vec2::new(2.0, 1.5)).norm() < TOLERANCE);

        let degenerate = Triangle2::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(2.0, 2.0),
        );
        assert!(degenerate.circumcenter().is_none());
    }

    #[test]
    fn normal_and_z_at_xy() {
        let t = Triangle3::new(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(2.0, 0.0, 1.0),
            Vec3::new(0.0, 2.0, 3.0),
        );
        let n = t.normal().unwrap();
        assert!((n.norm() - 1.0).abs() < TOLERANCE);

        // Surface climbs with y: z = 1 + y.
        let z = t.z_at_xy(&Vec2::new(0.5, 0.5), 0.0).unwrap();
        assert!((z - 1.5).abs() < TOLERANCE, "z={z}");
        assert!(t.z_at_xy(&Vec2::new(5.0, 5.0), 0.0).is_none());
    }

    #[test]
    fn vertical_triangle_has_no_z() {
        let t = Triangle3::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.5, 0.0, 1.0),
        );
        assert!(t.z_at_xy(&Vec2::new(0.5, 0.0), 0.0).is_none());
    }

    #[test]
    fn threshold_indices_ascending_values() {
        let got = indices_from_thresholds([-0.27, 0.49, 1.400_000_000_000_000_1], &[0.0, 1.0, 4.0, 10.0]);
        assert_bands(
            &got,
            &[
                vec![
                    0.355_263_157_894_736_84,
                    1.0,
                    1.560_439_560_439_560_2,
                    2.239_520_958_083_832_4,
                    2.838_323_353_293_413,
                ],
                vec![1.560_439_560_439_560_2, 2.0, 2.239_520_958_083_832_4],
                vec![],
            ],
        );
    }

    #[test]
    fn threshold_indices_descending_values() {
        let got = indices_from_thresholds([1.21, 1.0, 0.29], &[0.0, 1.0, 4.0, 10.0]);
        assert_bands(
            &got,
            &[
                vec![1.0, 2.0, 2.771_739_130_434_782_7],
                vec![0.0, 1.0, 2.771_739_130_434_782_7],
                vec![],
            ],
        );
    }

    #[test]
    fn threshold_indices_with_one_corner_below() {
        let got = indices_from_thresholds([-0.06, 0.23, 0.9], &[0.0, 1.0, 4.0, 10.0]);
        assert_bands(
            &got,
            &[
                vec![0.206_896_551_724_137_9, 1.0, 2.0, 2.937_5],
                vec![],
                vec![],
            ],
        );
    }

    #[test]
    fn threshold_indices_all_in_first_band() {
        let got = indices_from_thresholds([0.3, 0.29, 1.0], &[0.0, 1.0, 4.0, 10.0]);
        assert_bands(&got, &[vec![0.0, 1.0, 2.0], vec![], vec![]]);
    }

    #[test]
    fn divide_by_thresholds_covers_triangle() {
        let t = Triangle3::new(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(5.0, 0.0, 5.0),
            Vec3::new(2.5, 5.0, 5.0),
        );
        let bands = t.divide_by_thresholds(
            [0.0, 1.0, 2.0],
            &[f64::NEG_INFINITY, 0.33, 0.66, f64::INFINITY],
        );
        let total: f64 = bands.iter().map(|(_, p)| p.fan_area()).sum();
        assert!((total - t.area()).abs() < 1e-9, "total={total}");
    }
}
