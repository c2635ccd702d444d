//! Line segments in 2D and 3D.

use crate::bounds::Aabb;
use crate::range::PlaneRange;
use crate::vec::{rotated_90, Coord, Vec2, Vec3, TOLERANCE};

/// Segment between two endpoints.
///
/// Fractional addressing maps `0` to `a` and `1` to `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line<V: Coord> {
    pub a: V,
    pub b: V,
}

/// 2D segment.
pub type Line2 = Line<Vec2>;

/// 3D segment.
pub type Line3 = Line<Vec3>;

/// Point where two 2D segments cross, with the fractional position along
/// each (`0..1`, `a` to `b`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub point: Vec2,
    pub index_a: f64,
    pub index_b: f64,
}

impl<V: Coord> Line<V> {
    #[must_use]
    pub fn new(a: V, b: V) -> Self {
        Self { a, b }
    }

    #[must_use]
    pub fn len(&self) -> f64 {
        self.a.dist_to(&self.b)
    }

    #[must_use]
    pub fn len_sq(&self) -> f64 {
        self.a.dist_sq_to(&self.b)
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.len_sq() < TOLERANCE * TOLERANCE
    }

    #[must_use]
    pub fn delta(&self) -> V {
        self.b - self.a
    }

    /// Unit direction from `a` to `b`. Zero for a degenerate segment.
    #[must_use]
    pub fn dir(&self) -> V {
        self.delta().normalized()
    }

    #[must_use]
    pub fn mid(&self) -> V {
        self.a.mid_to(&self.b)
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.b, self.a)
    }

    /// Point at fractional position `i`, clamped to the segment.
    #[must_use]
    pub fn at_index(&self, i: f64) -> V {
        if i <= 0.0 {
            return self.a;
        }
        if i >= 1.0 {
            return self.b;
        }
        self.a.lerp_to(&self.b, i)
    }

    /// Point at distance `dist` from `a`, clamped to the segment.
    #[must_use]
    pub fn at_dist(&self, dist: f64) -> V {
        if dist <= 0.0 {
            return self.a;
        }
        let len_sq = self.len_sq();
        if dist * dist >= len_sq {
            return self.b;
        }
        self.a.lerp_to(&self.b, dist / len_sq.sqrt())
    }

    /// Unclamped fractional position of `p` projected onto the carrier
    /// line. `None` for a degenerate segment.
    #[must_use]
    pub fn index_of(&self, p: &V) -> Option<f64> {
        let v = self.dir();
        let dot_a = v.dot(&self.a);
        let dot_b = v.dot(&self.b);
        let span = dot_b - dot_a;
        if span.abs() < TOLERANCE {
            return None;
        }
        Some((v.dot(p) - dot_a) / span)
    }

    /// Distance of `p`'s projection from `a` along the carrier line.
    #[must_use]
    pub fn dist_of(&self, p: &V) -> f64 {
        let v = self.dir();
        v.dot(p) - v.dot(&self.a)
    }

    /// Unclamped fractional position of the closest point on the carrier
    /// line. A degenerate segment yields `0`.
    #[must_use]
    pub fn closest_index_to_point(&self, p: &V) -> f64 {
        let pa = *p - self.a;
        let ba = self.delta();
        let ba_dot = ba.dot(&ba);
        if ba_dot < TOLERANCE * TOLERANCE {
            return 0.0;
        }
        ba.dot(&pa) / ba_dot
    }

    #[must_use]
    pub fn closest_point_to_point(&self, p: &V) -> V {
        self.at_index(self.closest_index_to_point(p).clamp(0.0, 1.0))
    }

    #[must_use]
    pub fn dist_to_point_sq(&self, p: &V) -> f64 {
        self.closest_point_to_point(p).dist_sq_to(p)
    }

    #[must_use]
    pub fn dist_to_point(&self, p: &V) -> f64 {
        self.dist_to_point_sq(p).sqrt()
    }

    /// Dot-product interval spanned by the segment along its own direction.
    #[must_use]
    pub fn plane_range(&self) -> PlaneRange<V> {
        let dir = self.dir();
        PlaneRange::new(dir, dir.dot(&self.a), dir.dot(&self.b))
    }

    /// Intersections with a ball (circle in 2D, sphere in 3D), ordered
    /// along the segment. `inclusive` admits hits at the endpoints and the
    /// tangent case.
    #[must_use]
    pub fn intersections_with_ball(&self, center: &V, radius: f64, inclusive: bool) -> Vec<V> {
        let mut out = Vec::new();
        let ab = self.len();
        if ab < TOLERANCE {
            return out;
        }
        let v = self.delta() * (1.0 / ab);
        let t = v.dot(&(*center - self.a));
        let e = self.a + v * t;
        let ec = e.dist_to(center);

        if ec < radius {
            let dt = (radius * radius - ec * ec).sqrt();
            for root in [t - dt, t + dt] {
                let hit = if inclusive {
                    0.0 <= root && root <= ab
                } else {
                    0.0 < root && root < ab
                };
                if hit {
                    out.push(self.a + v * root);
                }
            }
        } else if (ec - radius).abs() < TOLERANCE && inclusive {
            out.push(e);
        }
        out
    }
}

impl Line2 {
    /// Unit left normal (90° counter-clockwise from the direction).
    #[must_use]
    pub fn normal(&self) -> Vec2 {
        rotated_90(&self.dir())
    }

    /// Signed perpendicular distance of `p` from the carrier line,
    /// positive on the normal side.
    #[must_use]
    pub fn dist_away(&self, p: &Vec2) -> f64 {
        let n = self.normal();
        n.dot(p) - n.dot(&self.a)
    }

    /// Cross of the segment delta with `p - a`. Sign tells the side,
    /// magnitude is unnormalized.
    #[must_use]
    pub fn side(&self, p: &Vec2) -> f64 {
        let vy = self.b.x - self.a.x;
        let vx = self.a.y - self.b.y;
        vx * (p.x - self.a.x) + vy * (p.y - self.a.y)
    }

    /// Strict-interior segment intersection. Crossings at either segment's
    /// endpoints (and parallel overlaps) yield `None`.
    #[must_use]
    pub fn intersect_line(&self, that: &Line2) -> Option<Intersection> {
        let point = self.carrier_intersection(that)?;

        let p_dot = self.dot_along(&point);
        let p_min = self.dot_along(&self.a);
        let p_max = self.dot_along(&self.b);
        if !(p_min < p_dot && p_dot < p_max) {
            return None;
        }
        let q_dot = that.dot_along(&point);
        let q_min = that.dot_along(&that.a);
        let q_max = that.dot_along(&that.b);
        if !(q_min < q_dot && q_dot < q_max) {
            return None;
        }

        Some(Intersection {
            point,
            index_a: (p_dot - p_min) / (p_max - p_min),
            index_b: (q_dot - q_min) / (q_max - q_min),
        })
    }

    /// Builds a reusable tester for this segment against many others.
    ///
    /// Precomputes the delta, dot range and bounding box; candidates are
    /// rejected by bbox overlap before the determinant. The four flags
    /// control endpoint inclusivity at this segment's `a`/`b` and the
    /// candidate's `a`/`b`.
    #[must_use]
    pub fn intersector(
        &self,
        pa_inclusive: bool,
        pb_inclusive: bool,
        qa_inclusive: bool,
        qb_inclusive: bool,
    ) -> Intersector {
        Intersector {
            line: *self,
            pd: self.delta(),
            p_dot_min: self.dot_along(&self.a),
            p_dot_max: self.dot_along(&self.b),
            bbox: Aabb::from_points([&self.a, &self.b]),
            pa_inclusive,
            pb_inclusive,
            qa_inclusive,
            qb_inclusive,
        }
    }

    fn dot_along(&self, p: &Vec2) -> f64 {
        let d = self.delta();
        d.x * p.x + d.y * p.y
    }

    /// Intersection of the two carrier lines. `None` when parallel.
    fn carrier_intersection(&self, that: &Line2) -> Option<Vec2> {
        let pd = self.delta();
        let qd = that.delta();
        let d = pd.x * qd.y - pd.y * qd.x;
        if d.abs() < TOLERANCE {
            return None;
        }
        let u1 = self.b.x * self.a.y - self.b.y * self.a.x;
        let u2 = that.b.x * that.a.y - that.b.y * that.a.x;
        Some(Vec2::new(
            (u1 * qd.x - pd.x * u2) / d,
            (u1 * qd.y - pd.y * u2) / d,
        ))
    }
}

/// Precomputed one-against-many segment intersection tester.
///
/// Built by [`Line2::intersector`].
#[derive(Debug, Clone)]
pub struct Intersector {
    line: Line2,
    pd: Vec2,
    p_dot_min: f64,
    p_dot_max: f64,
    bbox: Aabb<Vec2>,
    pa_inclusive: bool,
    pb_inclusive: bool,
    qa_inclusive: bool,
    qb_inclusive: bool,
}

impl Intersector {
    #[must_use]
    pub fn intersect(&self, that: &Line2) -> Option<Vec2> {
        let qa = that.a;
        let qb = that.b;
        if qa.x < self.bbox.min.x && qb.x < self.bbox.min.x {
            return None;
        }
        if self.bbox.max.x < qa.x && self.bbox.max.x < qb.x {
            return None;
        }
        if qa.y < self.bbox.min.y && qb.y < self.bbox.min.y {
            return None;
        }
        if self.bbox.max.y < qa.y && self.bbox.max.y < qb.y {
            return None;
        }

        let point = self.line.carrier_intersection(that)?;

        let p_dot = self.pd.x * point.x + self.pd.y * point.y;
        if (self.pa_inclusive && p_dot < self.p_dot_min)
            || (!self.pa_inclusive && p_dot <= self.p_dot_min)
        {
            return None;
        }
        if (self.pb_inclusive && self.p_dot_max < p_dot)
            || (!self.pb_inclusive && self.p_dot_max <= p_dot)
        {
            return None;
        }

        let qd = that.delta();
        let q_dot = qd.x * point.x + qd.y * point.y;
        let q_dot_min = qd.x * qa.x + qd.y * qa.y;
        let q_dot_max = qd.x * qb.x + qd.y * qb.y;
        if (self.qa_inclusive && q_dot < q_dot_min)
            || (!self.qa_inclusive && q_dot <= q_dot_min)
        {
            return None;
        }
        if (self.qb_inclusive && q_dot_max < q_dot)
            || (!self.qb_inclusive && q_dot_max <= q_dot)
        {
            return None;
        }

        Some(point)
    }
}
