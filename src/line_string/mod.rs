//! Open polylines and their editing operations.

pub mod assemble;

pub use assemble::assemble;

use crate::bounds::Aabb;
use crate::limit::Limit;
use crate::line::{Intersection, Line, Line2};
use crate::plane::Plane;
use crate::ray::{Ray2, RayIntersection};
use crate::vec::{Coord, Vec2, Vec3, TOLERANCE};

/// Ordered open polyline. Fewer than two points has zero length.
///
/// Fractional indices address positions along the string: `i.f` is the
/// lerp at fraction `f` within segment `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineString<V: Coord> {
    pub points: Vec<V>,
}

/// 2D polyline.
pub type LineString2 = LineString<Vec2>;

/// 3D polyline.
pub type LineString3 = LineString<Vec3>;

impl<V: Coord> LineString<V> {
    #[must_use]
    pub fn new(points: Vec<V>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&V> {
        self.points.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&V> {
        self.points.last()
    }

    pub fn segments(&self) -> impl Iterator<Item = Line<V>> + '_ {
        self.points.windows(2).map(|w| Line::new(w[0], w[1]))
    }

    #[must_use]
    pub fn bounding_box(&self) -> Aabb<V> {
        Aabb::from_points(&self.points)
    }

    #[must_use]
    pub fn len(&self) -> f64 {
        self.segments().map(|s| s.len()).sum()
    }

    /// Length of the XY shadow (equals [`LineString::len`] in 2D).
    #[must_use]
    pub fn len_xy(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].dist_to_xy(&w[1])).sum()
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    pub fn translate(&mut self, delta: &V) {
        for p in &mut self.points {
            *p = *p + *delta;
        }
    }

    pub fn transform(&mut self, f: impl Fn(&V) -> V) {
        for p in &mut self.points {
            *p = f(p);
        }
    }

    /// Point at arc distance from the start. With `clamp` the result stays
    /// on the string; without, a negative distance extrapolates backwards
    /// along the first segment, and a distance past the end places the
    /// leftover along the last segment measured from that segment's start.
    /// `None` for fewer than 2 points.
    #[must_use]
    pub fn at_dist(&self, dist: f64, clamp: bool) -> Option<V> {
        if self.points.len() < 2 {
            return None;
        }
        if clamp && dist <= 0.0 {
            return Some(self.points[0]);
        }
        let mut remaining = dist;
        for w in self.points.windows(2) {
            let seg_len = w[0].dist_to(&w[1]);
            if remaining < seg_len {
                return Some(w[0].lerp_to(&w[1], remaining / seg_len));
            }
            remaining -= seg_len;
        }
        if clamp {
            return self.points.last().copied();
        }
        let a = self.points[self.points.len() - 2];
        let b = self.points[self.points.len() - 1];
        let seg_len = a.dist_to(&b);
        Some(a.lerp_to(&b, remaining / seg_len))
    }

    /// Point at a fractional index. Without `clamp`, out-of-range indices
    /// yield `None`.
    #[must_use]
    pub fn at_index(&self, index: f64, clamp: bool) -> Option<V> {
        if self.points.is_empty() {
            return None;
        }
        let mut index = index;
        let max = (self.points.len() - 1) as f64;
        if clamp {
            index = index.clamp(0.0, max);
        }
        if index < 0.0 || index > max {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let i = index.floor() as usize;
        let frac = index - index.floor();
        if frac.abs() < f64::EPSILON {
            return Some(self.points[i]);
        }
        Some(self.points[i].lerp_to(&self.points[i + 1], frac))
    }

    /// Arc distance from the start to a fractional index.
    #[must_use]
    pub fn dist_of_index(&self, index: f64) -> f64 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let whole = (index.floor().max(0.0) as usize).min(self.points.len().saturating_sub(1));
        let mut dist = 0.0;
        for w in self.points.windows(2).take(whole) {
            dist += w[0].dist_to(&w[1]);
        }
        let frac = index - index.floor();
        if frac > 0.0 && whole + 1 < self.points.len() {
            dist += self.points[whole].dist_to(&self.points[whole + 1]) * frac;
        }
        dist
    }

    /// Section between two fractional indices, endpoint inclusive, like a
    /// string slice. A reversed range yields reversed points.
    #[must_use]
    pub fn substring(&self, begin_index: f64, end_index: f64) -> Self {
        let reverse = begin_index > end_index;
        let (mut begin, mut end) = if reverse {
            (end_index, begin_index)
        } else {
            (begin_index, end_index)
        };
        begin = begin.max(0.0);
        end = end.min((self.points.len() - 1) as f64);

        let mut points: Vec<V> = Vec::new();
        if (begin - end).abs() < f64::EPSILON {
            if let Some(p) = self.at_index(begin, true) {
                points.push(p);
            }
        } else {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let begin_inner = begin.ceil() as usize;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let end_inner = end.floor() as usize;
            if begin < begin_inner as f64 {
                points.push(
                    self.points[begin_inner - 1]
                        .lerp_to(&self.points[begin_inner], begin.fract()),
                );
            }
            points.extend_from_slice(&self.points[begin_inner..=end_inner]);
            if end > end_inner as f64 {
                points.push(
                    self.points[end_inner].lerp_to(&self.points[end_inner + 1], end.fract()),
                );
            }
        }
        if reverse {
            points.reverse();
        }
        Self::new(points)
    }

    #[must_use]
    pub fn dist_to(&self, p: &V) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        let mut best = self.points[0].dist_sq_to(p);
        for s in self.segments() {
            best = best.min(s.dist_to_point_sq(p));
        }
        Some(best.sqrt())
    }

    #[must_use]
    pub fn closest_point(&self, p: &V) -> Option<V> {
        if self.points.is_empty() {
            return None;
        }
        let mut found = self.points[0];
        let mut best = found.dist_sq_to(p);
        for s in self.segments() {
            let c = s.closest_point_to_point(p);
            let d = c.dist_sq_to(p);
            if d < best {
                best = d;
                found = c;
            }
        }
        Some(found)
    }

    /// Fractional index of the closest point.
    #[must_use]
    pub fn closest_index(&self, p: &V) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        let mut found = 0.0;
        let mut best = self.points[0].dist_sq_to(p);
        for (i, s) in self.segments().enumerate() {
            let t = s.closest_index_to_point(p).clamp(0.0, 1.0);
            let c = s.at_index(t);
            let d = c.dist_sq_to(p);
            if d < best {
                best = d;
                found = i as f64 + t;
            }
        }
        Some(found)
    }

    /// Joins `other` onto this string at whichever of the four endpoint
    /// pairings is closest. When the joined endpoints are within `epsilon`
    /// the duplicate joint point is dropped.
    pub fn merge(&mut self, other: &Self, epsilon: f64) {
        if self.points.is_empty() || other.points.is_empty() {
            self.points.extend_from_slice(&other.points);
            return;
        }
        let sf = self.points[0];
        let sl = self.points[self.points.len() - 1];
        let of = other.points[0];
        let ol = other.points[other.points.len() - 1];
        let dists = [
            sl.dist_sq_to(&of),
            sl.dist_sq_to(&ol),
            sf.dist_sq_to(&ol),
            sf.dist_sq_to(&of),
        ];
        let mut best = 0;
        for (i, d) in dists.iter().enumerate() {
            if *d < dists[best] {
                best = i;
            }
        }

        let (mut head, tail) = if best < 2 {
            let mut b = other.points.clone();
            if best == 1 {
                b.reverse();
            }
            (std::mem::take(&mut self.points), b)
        } else {
            let mut a = other.points.clone();
            if best == 3 {
                a.reverse();
            }
            (a, std::mem::take(&mut self.points))
        };
        if dists[best] < epsilon * epsilon {
            head.pop();
        }
        head.extend_from_slice(&tail);
        self.points = head;
    }

    /// Drops consecutive points closer than `epsilon`.
    pub fn clean(&mut self, epsilon: f64) {
        let eps_sq = epsilon * epsilon;
        let mut out: Vec<V> = Vec::with_capacity(self.points.len());
        for p in &self.points {
            if out.last().is_none_or(|prev| prev.dist_sq_to(p) > eps_sq) {
                out.push(*p);
            }
        }
        self.points = out;
    }

    /// Splits every segment longer than `interval` into equal pieces,
    /// keeping the original vertices.
    pub fn fragment(&mut self, interval: f64) {
        if self.points.len() < 2 || interval <= 0.0 {
            return;
        }
        let mut out = vec![self.points[0]];
        for w in self.points.windows(2) {
            let (a, b) = (w[0], w[1]);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let count = (a.dist_to(&b) / interval).ceil() as usize;
            for j in 1..count {
                out.push(a.lerp_to(&b, j as f64 / count as f64));
            }
            out.push(b);
        }
        self.points = out;
    }

    /// Redistributes vertices at the uniform spacing
    /// `len / ceil(len / interval)`, keeping the first and last points
    /// exactly.
    pub fn resample(&mut self, interval: f64) {
        if self.points.len() < 2 {
            return;
        }
        let length = self.len();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let interval_count = (length / interval).ceil() as usize;
        let interval_len = length / interval_count as f64;

        let mut out = vec![self.points[0]];
        let mut step_dist = interval_len;
        let mut a_dist = 0.0;
        for w in self.points.windows(2) {
            let (a, b) = (w[0], w[1]);
            let seg_dist = a.dist_to(&b);
            let b_dist = a_dist + seg_dist;
            while step_dist < b_dist && out.len() < interval_count {
                out.push(a.lerp_to(&b, (step_dist - a_dist) / seg_dist));
                step_dist += interval_len;
            }
            a_dist = b_dist;
        }
        out.push(self.points[self.points.len() - 1]);
        self.points = out;
    }

    /// Douglas-Peucker simplification by perpendicular distance.
    pub fn simplify(&mut self, threshold: f64) {
        if self.points.len() < 3 {
            return;
        }
        let mut keep = vec![false; self.points.len()];
        keep[0] = true;
        keep[self.points.len() - 1] = true;

        let mut stack = vec![(0, self.points.len() - 1)];
        while let Some((first, last)) = stack.pop() {
            if last <= first + 1 {
                continue;
            }
            let chord = Line::new(self.points[first], self.points[last]);
            let mut max_dist = 0.0;
            let mut max_i = first;
            for (i, p) in self.points[first + 1..last].iter().enumerate() {
                let d = chord.dist_to_point(p);
                if d > max_dist {
                    max_dist = d;
                    max_i = first + 1 + i;
                }
            }
            if max_dist > threshold {
                keep[max_i] = true;
                stack.push((first, max_i));
                stack.push((max_i, last));
            }
        }
        let mut i = 0;
        self.points.retain(|_| {
            let k = keep[i];
            i += 1;
            k
        });
    }

    /// Laplacian smoothing: each interior vertex moves to the midpoint of
    /// its neighbors, `iterations` times.
    pub fn soften(&mut self, iterations: usize) {
        if self.points.len() < 3 {
            return;
        }
        let mut tmp = self.points.clone();
        for _ in 0..iterations {
            for i in 1..self.points.len() - 1 {
                tmp[i] = self.points[i - 1].mid_to(&self.points[i + 1]);
            }
            self.points.copy_from_slice(&tmp);
        }
    }

    /// Flattens the string onto the chord between its endpoints: interior
    /// points projecting outside the chord are dropped, backtracking
    /// points are averaged into their predecessor, the rest are ordered
    /// by their position along the chord.
    pub fn force_linear(&mut self) {
        if self.points.len() <= 2 {
            return;
        }
        let a = self.points[0];
        let b = self.points[self.points.len() - 1];
        let dir = (b - a).normalized();
        let min = dir.dot(&a);
        let max = dir.dot(&b);

        let mut inner: Vec<(usize, f64)> = (1..self.points.len() - 1)
            .map(|i| (i, dir.dot(&self.points[i])))
            .filter(|(_, d)| min < *d && *d < max)
            .collect();
        inner.sort_by(|x, y| x.1.total_cmp(&y.1));

        let mut out = vec![a];
        let mut prev_index = 0;
        for (i, _) in inner {
            if i <= prev_index {
                let last = out.len() - 1;
                out[last] = out[last].mid_to(&self.points[i]);
            } else {
                prev_index = i;
                out.push(self.points[i]);
            }
        }
        out.push(b);
        self.points = out;
    }

    /// Caps how fast the string may deviate from the chord between its
    /// endpoints: sweeping forward then backward, each vertex's
    /// perpendicular distance may exceed its predecessor's by at most
    /// `factor` times the step along the chord.
    pub fn smooth_amplitude(&mut self, factor: f64) {
        if self.points.len() <= 2 {
            return;
        }
        let chord = Line::new(self.points[0], self.points[self.points.len() - 1]);
        self.smooth_amplitude_pass(&chord, factor, true);
        self.smooth_amplitude_pass(&chord.reversed(), factor, false);
    }

    fn smooth_amplitude_pass(&mut self, chord: &Line<V>, factor: f64, forward: bool) {
        let n = self.points.len();
        let indices: Vec<usize> = if forward {
            (1..n - 1).collect()
        } else {
            (0..n - 1).rev().collect()
        };
        let mut a_dist = 0.0;
        let mut along = 0.0;
        for i in indices {
            let b = self.points[i];
            let step = (chord.dist_of(&b) - along).abs();
            let bcp = chord.closest_point_to_point(&b);
            let mut b_dist = b.dist_to(&bcp);
            let max_dist = step * factor + a_dist;
            if b_dist > max_dist {
                self.points[i] = b.lerp_to(&bcp, 1.0 - max_dist / b_dist);
                b_dist = max_dist;
            }
            a_dist = b_dist;
            along += step;
        }
    }
}

impl LineString2 {
    /// Crossings with a segment; `index_a` becomes the fractional index
    /// along this string.
    #[must_use]
    pub fn intersections_with_line(&self, intersector: &Line2) -> Vec<Intersection> {
        let mut out = Vec::new();
        for (i, s) in self.segments().enumerate() {
            if let Some(mut hit) = s.intersect_line(intersector) {
                // Swap roles: the string is the `a` side.
                std::mem::swap(&mut hit.index_a, &mut hit.index_b);
                hit.index_a += i as f64;
                out.push(hit);
            }
        }
        out
    }

    #[must_use]
    pub fn intersections_with_ray(&self, intersector: &Ray2) -> Vec<RayIntersection> {
        let mut out = Vec::new();
        for s in self.segments() {
            if let Some(hit) = intersector.intersect_line(&s) {
                out.push(hit);
            }
        }
        out
    }

    /// Keeps the parts on the half-plane's positive (cut) side, inserting
    /// boundary crossings. Segments on the kept side are dropped.
    pub fn slice_off(&mut self, limit: &Limit) {
        let mut out: Vec<Vec2> = Vec::new();
        for w in self.points.windows(2) {
            let (a, b) = (w[0], w[1]);
            let da = limit.signed_dist(&a);
            if da > 0.0 {
                out.push(a);
            }
            let db = limit.signed_dist(&b);
            if da * db < 0.0 {
                out.push(a.lerp_to(&b, -da / (db - da)));
            }
        }
        if let Some(last) = self.points.last() {
            if limit.signed_dist(last) > 0.0 {
                out.push(*last);
            }
        }
        self.points = out;
    }
}

impl LineString3 {
    /// Fractional indices where the string crosses a plane.
    #[must_use]
    pub fn plane_crossing_indices(&self, plane: &Plane) -> Vec<f64> {
        let mut out = Vec::new();
        for (i, w) in self.points.windows(2).enumerate() {
            let ad = plane.signed_dist(&w[0]);
            let bd = plane.signed_dist(&w[1]);
            let f = -ad / (bd - ad);
            if (0.0..1.0).contains(&f) {
                out.push(i as f64 + f);
            }
        }
        out
    }

    #[must_use]
    pub fn plane_crossings(&self, plane: &Plane) -> Vec<Vec3> {
        let mut out = Vec::new();
        for w in self.points.windows(2) {
            let ad = plane.signed_dist(&w[0]);
            let bd = plane.signed_dist(&w[1]);
            let f = -ad / (bd - ad);
            if (0.0..1.0).contains(&f) {
                out.push(w[0].lerp_to(&w[1], f));
            }
        }
        out
    }
}
