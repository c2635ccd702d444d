//! Half-plane clipping, plane clipping and the ring-pair intersection.

use super::{ring_contains, Polygon2, Polygon3};
use crate::limit::Limit;
use crate::line::Line2;
use crate::plane::Plane;
use crate::vec::{Coord, Vec2};

impl Polygon2 {
    /// Clips the ring to the half-plane's kept side (`normal·p <=
    /// constant`), inserting boundary crossings. Returns whether anything
    /// was cut away.
    pub fn slice_off(&mut self, limit: &Limit) -> bool {
        let n = self.points.len();
        let mut out: Vec<Vec2> = Vec::new();
        let mut changed = false;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let da = limit.signed_dist(&a);
            let db = limit.signed_dist(&b);
            if da <= 0.0 {
                out.push(a);
            } else {
                changed = true;
            }
            if da * db < 0.0 {
                out.push(a.lerp_to(&b, -da / (db - da)));
                changed = true;
            }
        }
        if changed {
            self.points = out;
        }
        changed
    }

    /// Intersection of two rings as a new ring.
    ///
    /// Walks this ring, tagging entry points and crossings with their
    /// position along `that`, then stitches in `that`'s vertices that lie
    /// inside this ring, ordered by that position. Handles one resulting
    /// ring only: inputs whose overlap falls apart into several pieces
    /// come back as a single self-touching ring.
    #[must_use]
    pub fn intersection(&self, that: &Polygon2) -> Vec<Polygon2> {
        #[derive(Clone, Copy, PartialEq)]
        enum Tag {
            Out,
            Pending,
            At(f64),
        }

        let points_p = &self.points;
        let points_q = &that.points;
        if points_p.is_empty() || points_q.is_empty() {
            return Vec::new();
        }

        let np = points_p.len();
        let nq = points_q.len();
        let mut partial: Vec<(Vec2, Tag)> = Vec::new();
        let mut inside = ring_contains(points_q, points_p[0].x, points_p[0].y);

        for pi in 0..np {
            let pa = points_p[pi];
            let pb = points_p[(pi + 1) % np];
            let line_p = Line2::new(pa, pb);
            let tester = line_p.intersector(true, false, true, false);

            partial.push((pa, if inside { Tag::Pending } else { Tag::Out }));

            let mut crossings: Vec<(f64, Vec2, f64)> = Vec::new();
            for qi in 0..nq {
                let line_q = Line2::new(points_q[qi], points_q[(qi + 1) % nq]);
                let Some(point) = tester.intersect(&line_q) else {
                    continue;
                };
                let Some(fp) = line_p.index_of(&point) else {
                    continue;
                };
                let Some(fq) = line_q.index_of(&point) else {
                    continue;
                };
                crossings.push((pi as f64 + fp, point, qi as f64 + fq));
            }
            crossings.sort_by(|u, v| u.0.total_cmp(&v.0));
            let odd = crossings.len() % 2 == 1;
            for (_, point, qi) in crossings {
                partial.push((point, Tag::At(qi)));
            }
            if odd {
                inside = !inside;
            }
        }

        // Stretch each crossing's position over the run of untagged
        // interior points that follows it.
        let len = partial.len();
        let mut i = 0;
        while i < len {
            if let Tag::At(qi) = partial[i].1 {
                let mut j = i + 1;
                while j < i + len {
                    let k = j % len;
                    if partial[k].1 == Tag::Pending {
                        partial[k].1 = Tag::At(qi);
                    } else {
                        break;
                    }
                    j += 1;
                }
            }
            i += 1;
        }

        let partial_ring: Vec<Vec2> = partial.iter().map(|(p, _)| *p).collect();
        let mut clipped: Vec<(Vec2, f64)> = partial
            .iter()
            .filter_map(|(p, tag)| match tag {
                Tag::Out => None,
                Tag::Pending => Some((*p, 0.0)),
                Tag::At(qi) => Some((*p, *qi)),
            })
            .collect();
        for (qi, q) in points_q.iter().enumerate() {
            if ring_contains(&partial_ring, q.x, q.y) {
                clipped.push((*q, qi as f64));
            }
        }
        clipped.sort_by(|u, v| u.1.total_cmp(&v.1));

        if clipped.is_empty() {
            return Vec::new();
        }
        vec![Polygon2::new(clipped.into_iter().map(|(p, _)| p).collect())]
    }
}

impl Polygon3 {
    /// Whether any edge strictly crosses the plane.
    #[must_use]
    pub fn intersects(&self, plane: &Plane) -> bool {
        let n = self.points.len();
        for i in 0..n {
            let da = plane.signed_dist(&self.points[i]);
            let db = plane.signed_dist(&self.points[(i + 1) % n]);
            if da * db < 0.0 && da != 0.0 && db != 0.0 {
                return true;
            }
        }
        false
    }

    /// Clips the ring to the plane's back side (`normal·p <= constant`),
    /// inserting boundary crossings.
    pub fn cut_off(&mut self, plane: &Plane) {
        let n = self.points.len();
        let mut out = Vec::new();
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let da = plane.signed_dist(&a);
            let db = plane.signed_dist(&b);
            if da <= 0.0 {
                out.push(a);
            }
            if da * db < 0.0 {
                out.push(a.lerp_to(&b, -da / (db - da)));
            }
        }
        self.points = out;
    }

    /// Inserts a vertex at every plane crossing without removing
    /// anything.
    pub fn cut_through(&mut self, plane: &Plane) {
        let mut i = 0;
        while i < self.points.len() {
            let a = self.points[i];
            let b = self.points[(i + 1) % self.points.len()];
            let da = plane.signed_dist(&a);
            let db = plane.signed_dist(&b);
            if da * db < 0.0 && da != 0.0 && db != 0.0 {
                let insert = a.lerp_to(&b, -da / (db - da));
                self.points.insert(i + 1, insert);
                i += 2;
            } else {
                i += 1;
            }
        }
    }

    /// Splits the ring into the plane's back-side and front-side pieces.
    /// Crossing points appear in both; points on the plane go to both
    /// sides. An empty side comes back as `None`.
    #[must_use]
    pub fn split(&self, plane: &Plane) -> (Option<Polygon3>, Option<Polygon3>) {
        let n = self.points.len();
        let dists: Vec<f64> = self.points.iter().map(|p| plane.signed_dist(p)).collect();

        let mut neg = Vec::new();
        let mut pos = Vec::new();
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let da = dists[i];
            let db = dists[(i + 1) % n];
            if da <= 0.0 {
                neg.push(a);
            }
            if da >= 0.0 {
                pos.push(a);
            }
            if da * db < 0.0 {
                let insert = a.lerp_to(&b, -da / (db - da));
                neg.push(insert);
                pos.push(insert);
            }
        }

        (
            (!neg.is_empty()).then(|| Polygon3::new(neg)),
            (!pos.is_empty()).then(|| Polygon3::new(pos)),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::vec::{Vec3, TOLERANCE};

    fn square() -> Polygon2 {
        Polygon2::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(0.0, 4.0),
        ])
    }

    fn flat_square() -> Polygon3 {
        Polygon3::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(4.0, 4.0, 4.0),
            Vec3::new(0.0, 4.0, 4.0),
        ])
    }

    #[test]
    fn slice_off_keeps_back_side() {
        // Keep x <= 2.
        let limit = Limit::new(Vec2::new(1.0, 0.0), 2.0);
        let mut p = square();
        assert!(p.slice_off(&limit));
        assert!((p.area() - 8.0).abs() < TOLERANCE, "area={}", p.area());
        for q in &p.points {
            assert!(q.x <= 2.0 + TOLERANCE);
        }
        // A second slice changes nothing.
        assert!(!p.slice_off(&limit));
    }

    #[test]
    fn slice_off_misses_entirely() {
        let limit = Limit::new(Vec2::new(1.0, 0.0), 10.0);
        let mut p = square();
        assert!(!p.slice_off(&limit));
        assert_eq!(p.count(), 4);
    }

    #[test]
    fn intersection_of_overlapping_squares() {
        let a = square();
        let mut b = square();
        b.translate(&Vec2::new(2.0, 2.0));
        let out = a.intersection(&b);
        assert_eq!(out.len(), 1);
        let ring = &out[0];
        assert!((ring.area() - 4.0).abs() < TOLERANCE, "area={}", ring.area());
        let bbox = ring.bounding_box();
        assert!((bbox.min - Vec2::new(2.0, 2.0)).norm() < TOLERANCE);
        assert!((bbox.max - Vec2::new(4.0, 4.0)).norm() < TOLERANCE);
    }

    #[test]
    fn intersection_with_contained_ring() {
        let a = square();
        let b = Polygon2::new(vec![
            Vec2::new(1.0, 1.0),
            Vec2::new(3.0, 1.0),
            Vec2::new(3.0, 3.0),
            Vec2::new(1.0, 3.0),
        ]);
        let out = a.intersection(&b);
        assert_eq!(out.len(), 1);
        assert!((out[0].area() - 4.0).abs() < TOLERANCE);

        // And the other way around.
        let out = b.intersection(&a);
        assert_eq!(out.len(), 1);
        assert!((out[0].area() - 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn intersection_of_disjoint_rings_is_empty() {
        let a = square();
        let mut b = square();
        b.translate(&Vec2::new(10.0, 0.0));
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn plane_crossing_detection() {
        let p = flat_square();
        let plane = Plane::new(Vec3::new(0.0, 1.0, 0.0), 2.0);
        assert!(p.intersects(&plane));
        let above = Plane::new(Vec3::new(0.0, 1.0, 0.0), 10.0);
        assert!(!p.intersects(&above));
    }

    #[test]
    fn cut_off_keeps_back_side() {
        let mut p = flat_square();
        // Keep y <= 2; crossing points get interpolated z.
        let plane = Plane::new(Vec3::new(0.0, 1.0, 0.0), 2.0);
        p.cut_off(&plane);
        for q in &p.points {
            assert!(q.y <= 2.0 + TOLERANCE);
        }
        let crossing = p.points.iter().find(|q| (q.y - 2.0).abs() < TOLERANCE).unwrap();
        assert!((crossing.z - 2.0).abs() < TOLERANCE, "z={}", crossing.z);
    }

    #[test]
    fn cut_through_only_inserts() {
        let mut p = flat_square();
        let plane = Plane::new(Vec3::new(0.0, 1.0, 0.0), 2.0);
        p.cut_through(&plane);
        assert_eq!(p.count(), 6);
        assert!(p.points.iter().filter(|q| (q.y - 2.0).abs() < TOLERANCE).count() == 2);
    }

    #[test]
    fn split_covers_both_sides() {
        let p = flat_square();
        let plane = Plane::new(Vec3::new(0.0, 1.0, 0.0), 2.0);
        let (neg, pos) = p.split(&plane);
        let neg = neg.unwrap();
        let pos = pos.unwrap();
        assert!(neg.points.iter().all(|q| q.y <= 2.0 + TOLERANCE));
        assert!(pos.points.iter().all(|q| q.y >= 2.0 - TOLERANCE));
        // Shared crossing points.
        assert!((neg.fan_area() + pos.fan_area() - p.fan_area()).abs() < 1e-9);
    }

    #[test]
    fn split_on_one_side_only() {
        let p = flat_square();
        let plane = Plane::new(Vec3::new(0.0, 1.0, 0.0), 10.0);
        let (neg, pos) = p.split(&plane);
        assert!(neg.is_some());
        assert!(pos.is_none());
    }
}
