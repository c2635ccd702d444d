//! Closed rings in 2D and 3D.

mod clip;
mod triangulate;

pub use triangulate::triangulate_ring;

use crate::bounds::Aabb;
use crate::error::Result;
use crate::line::{Intersection, Line, Line2};
use crate::line_string::LineString2;
use crate::plane::Plane;
use crate::ray::Ray2;
use crate::triangle::{Triangle, Triangle2, Triangle3};
use crate::vec::{Coord, Vec2, Vec3, TOLERANCE};

/// Closed ring of points; the edge from the last point back to the first
/// is implied, never stored.
///
/// Ring positions are addressed by a fractional index: `i.f` is the lerp
/// at fraction `f` within the edge leaving point `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<V: Coord> {
    pub points: Vec<V>,
}

pub type Polygon2 = Polygon<Vec2>;
pub type Polygon3 = Polygon<Vec3>;

impl<V: Coord> Polygon<V> {
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

    /// Point by wrapping index.
    #[must_use]
    pub fn at(&self, i: usize) -> Option<&V> {
        if self.points.is_empty() {
            return None;
        }
        Some(&self.points[i % self.points.len()])
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Edges around the ring, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = Line<V>> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| Line::new(self.points[i], self.points[(i + 1) % n]))
    }

    #[must_use]
    pub fn perimeter(&self) -> f64 {
        self.edges().map(|e| e.len()).sum()
    }

    #[must_use]
    pub fn bounding_box(&self) -> Aabb<V> {
        Aabb::from_points(&self.points)
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

    /// Triangles of the fan from the first point. Only a valid cover for
    /// convex rings.
    pub fn fan_triangles(&self) -> impl Iterator<Item = Triangle<V>> + '_ {
        let a = self.points.first().copied();
        (2..self.points.len()).filter_map(move |i| {
            Some(Triangle::new(a?, self.points[i - 1], self.points[i]))
        })
    }
}

impl Polygon2 {
    /// Shoelace area, positive for clockwise winding in screen
    /// coordinates.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            sum += a.x * b.y - b.x * a.y;
        }
        sum / 2.0
    }

    /// Shoelace area, valid for concave rings.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// `None` for fewer than 3 points.
    #[must_use]
    pub fn is_clockwise(&self) -> Option<bool> {
        if self.points.len() < 3 {
            return None;
        }
        Some(self.signed_area() > 0.0)
    }

    /// Area-weighted centroid. `None` for degenerate rings.
    #[must_use]
    pub fn centroid(&self) -> Option<Vec2> {
        if self.points.len() < 3 {
            return None;
        }
        let mut sum = Vec2::zeros();
        let mut area_sum = 0.0;
        for t in self.fan_triangles() {
            let area = Triangle2::signed_area_of(&t.a, &t.b, &t.c);
            sum += t.centroid() * area;
            area_sum += area;
        }
        if area_sum.abs() < TOLERANCE {
            return None;
        }
        Some(sum * (1.0 / area_sum))
    }

    /// Winding-number containment; points on the boundary count as
    /// outside.
    #[must_use]
    pub fn contains(&self, p: &Vec2) -> bool {
        ring_contains(&self.points, p.x, p.y)
    }

    /// Offsets every edge outward along its normal by `dist` and rejoins
    /// the corners: close offset ends are merged, crossing offsets are
    /// trimmed to their intersection, and open convex corners get a bevel
    /// point at the original corner pushed along the mean direction.
    pub fn expand(&mut self, dist: f64) {
        if dist == 0.0 || self.points.len() < 3 {
            return;
        }
        let n = self.points.len();
        let mut offsets: Vec<Line2> = Vec::with_capacity(n);
        let mut corners: Vec<Vec2> = Vec::with_capacity(n);
        for (i, edge) in self.edges().enumerate() {
            let shift = edge.normal() * dist;
            offsets.push(Line2::new(edge.a + shift, edge.b + shift));
            corners.push(self.points[i]);
        }

        let mut out: Vec<Vec2> = Vec::new();
        let mut push_unique = |out: &mut Vec<Vec2>, p: Vec2| {
            if out.last().is_none_or(|last| (*last - p).norm() > TOLERANCE) {
                out.push(p);
            }
        };

        let mut prev = n - 1;
        for i in 0..n {
            if offsets[prev].b.dist_to(&offsets[i].a) <= 0.01 {
                let joint = offsets[i].a.mid_to(&offsets[prev].b);
                offsets[prev].b = joint;
                offsets[i].a = joint;
                push_unique(&mut out, joint);
            } else if let Some(hit) = offsets[prev].intersect_line(&offsets[i]) {
                offsets[prev].b = hit.point;
                offsets[i].a = hit.point;
                push_unique(&mut out, hit.point);
            } else {
                push_unique(&mut out, offsets[prev].b);
                let v = (offsets[prev].dir() - offsets[i].dir()).normalized();
                push_unique(&mut out, corners[i] + v * dist);
                push_unique(&mut out, offsets[i].a);
            }
            prev = i;
        }
        self.points = out;
    }

    /// Crossings with a segment; `index_a` is the fractional ring index,
    /// `index_b` the fraction along the segment.
    #[must_use]
    pub fn intersections_with_line(&self, line: &Line2) -> Vec<Intersection> {
        let mut out = Vec::new();
        for (i, edge) in self.edges().enumerate() {
            if let Some(mut hit) = edge.intersect_line(line) {
                hit.index_a += i as f64;
                out.push(hit);
            }
        }
        out
    }

    /// Crossings with a ray; `index_a` is the fractional ring index,
    /// `index_b` the distance along the ray.
    #[must_use]
    pub fn intersections_with_ray(&self, ray: &Ray2) -> Vec<Intersection> {
        let mut out = Vec::new();
        for (i, edge) in self.edges().enumerate() {
            if let Some(hit) = ray.intersect_line(&edge) {
                out.push(Intersection {
                    point: hit.point,
                    index_a: i as f64 + hit.dist_b / edge.len(),
                    index_b: hit.dist_a,
                });
            }
        }
        out
    }

    /// Crossings with an open polyline; `index_b` becomes the fractional
    /// index along the string.
    #[must_use]
    pub fn intersections_with_line_string(&self, ls: &LineString2) -> Vec<Intersection> {
        let mut out = Vec::new();
        for (i, seg) in ls.segments().enumerate() {
            for mut hit in self.intersections_with_line(&seg) {
                hit.index_b += i as f64;
                out.push(hit);
            }
        }
        out
    }

    /// Ring indices into the ring's own points.
    ///
    /// # Errors
    ///
    /// Fails for fewer than 3 points or a ring the triangulator rejects.
    pub fn triangulate(&self) -> Result<Vec<[usize; 3]>> {
        triangulate_ring(&self.points)
    }

    /// Triangles covering the ring, concave rings included.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Polygon2::triangulate`].
    pub fn triangles(&self) -> Result<Vec<Triangle2>> {
        let indices = self.triangulate()?;
        Ok(indices
            .into_iter()
            .map(|[a, b, c]| Triangle2::new(self.points[a], self.points[b], self.points[c]))
            .collect())
    }
}

impl Polygon3 {
    /// Sum of fan triangle areas. Only valid for convex rings.
    #[must_use]
    pub fn fan_area(&self) -> f64 {
        self.fan_triangles()
            .map(|t| Triangle3::area_of(&t.a, &t.b, &t.c))
            .sum()
    }

    /// Signed shoelace area of the XY shadow.
    #[must_use]
    pub fn fan_area_xy_signed(&self) -> f64 {
        let xy = |v: &Vec3| Vec2::new(v.x, v.y);
        self.fan_triangles()
            .map(|t| Triangle2::signed_area_of(&xy(&t.a), &xy(&t.b), &xy(&t.c)))
            .sum()
    }

    /// Winding-number containment of the XY shadow.
    #[must_use]
    pub fn contains_xy(&self, p: &Vec2) -> bool {
        ring_contains(&self.points, p.x, p.y)
    }

    /// Area-weighted centroid of the fan. Only valid for convex rings;
    /// `None` when degenerate.
    #[must_use]
    pub fn centroid(&self) -> Option<Vec3> {
        if self.points.len() < 3 {
            return None;
        }
        let mut sum = Vec3::zeros();
        let mut area_sum = 0.0;
        for t in self.fan_triangles() {
            let area = Triangle3::area_of(&t.a, &t.b, &t.c);
            sum += t.centroid() * area;
            area_sum += area;
        }
        if area_sum < TOLERANCE {
            return None;
        }
        Some(sum * (1.0 / area_sum))
    }

    #[must_use]
    pub fn best_fit_plane(&self) -> Option<Plane> {
        Plane::best_fit(&self.points)
    }

    /// Triangulates by charting the ring onto its best-fit plane. A ring
    /// with no fit (collinear or too small) yields no triangles.
    ///
    /// # Errors
    ///
    /// Fails when the charted ring cannot be triangulated.
    pub fn triangulate(&self) -> Result<Vec<[usize; 3]>> {
        let Some(plane) = self.best_fit_plane() else {
            return Ok(Vec::new());
        };
        let frame = plane.frame();
        let charted: Vec<Vec2> = self.points.iter().map(|p| frame.to_2d(p)).collect();
        triangulate_ring(&charted)
    }

    #[must_use]
    pub fn closest_point_to_point(&self, p: &Vec3) -> Option<Vec3> {
        let mut found = None;
        let mut best = f64::INFINITY;
        for edge in self.edges() {
            let c = edge.closest_point_to_point(p);
            let d = c.dist_sq_to(p);
            if d < best {
                best = d;
                found = Some(c);
            }
        }
        found
    }
}

/// Winding-number test over a ring of points, using only the first two
/// axes. Points on the boundary, any edge included, count as outside.
pub(crate) fn ring_contains<V: Coord>(points: &[V], px: f64, py: f64) -> bool {
    let cross = |ax: f64, ay: f64, bx: f64, by: f64| (bx - ax) * (py - ay) - (px - ax) * (by - ay);
    let mut wn = 0;
    let n = points.len();
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        let (ax, ay) = (a.axis(0), a.axis(1));
        let (bx, by) = (b.axis(0), b.axis(1));
        let len_sq = (bx - ax) * (bx - ax) + (by - ay) * (by - ay);
        if len_sq < TOLERANCE {
            if (px - ax).abs() < TOLERANCE && (py - ay).abs() < TOLERANCE {
                return false;
            }
            continue;
        }
        // On-edge points are outside, whichever side the winding walk
        // would have counted them on.
        let dot = (px - ax) * (bx - ax) + (py - ay) * (by - ay);
        if cross(ax, ay, bx, by).abs() < TOLERANCE && (-TOLERANCE..=len_sq + TOLERANCE).contains(&dot)
        {
            return false;
        }
        if ay <= py {
            if by > py && cross(ax, ay, bx, by) > 0.0 {
                wn += 1;
            }
        } else if by <= py && cross(ax, ay, bx, by) < 0.0 {
            wn -= 1;
        }
    }
    wn != 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square() -> Polygon2 {
        Polygon2::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(0.0, 4.0),
        ])
    }

    fn l_shape() -> Polygon2 {
        Polygon2::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 2.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(2.0, 4.0),
            Vec2::new(0.0, 4.0),
        ])
    }

    #[test]
    fn shoelace_area_and_winding() {
        let p = square();
        assert!((p.area() - 16.0).abs() < TOLERANCE);
        // In screen coordinates (y down) this ring winds clockwise, so
        // its signed area is positive.
        assert!(p.signed_area() > 0.0);
        assert_eq!(p.is_clockwise(), Some(true));

        let mut r = square();
        r.reverse();
        assert_eq!(r.is_clockwise(), Some(false));
        assert!((r.signed_area() + 16.0).abs() < TOLERANCE);

        assert!(Polygon2::new(vec![Vec2::new(0.0, 0.0)]).is_clockwise().is_none());
    }

    #[test]
    fn concave_area() {
        assert!((l_shape().area() - 12.0).abs() < TOLERANCE);
    }

    #[test]
    fn perimeter_includes_closing_edge() {
        assert!((square().perimeter() - 16.0).abs() < TOLERANCE);
    }

    #[test]
    fn centroid_of_square() {
        let c = square().centroid().unwrap();
        assert!((c - Vec2::new(2.0, 2.0)).norm() < TOLERANCE);
    }

    #[test]
    fn contains_is_boundary_exclusive() {
        let p = square();
        assert!(p.contains(&Vec2::new(2.0, 2.0)));
        assert!(!p.contains(&Vec2::new(5.0, 2.0)));
        // Every edge and corner tests as outside.
        assert!(!p.contains(&Vec2::new(0.0, 2.0)));
        assert!(!p.contains(&Vec2::new(4.0, 2.0)));
        assert!(!p.contains(&Vec2::new(2.0, 0.0)));
        assert!(!p.contains(&Vec2::new(2.0, 4.0)));
        assert!(!p.contains(&Vec2::new(0.0, 0.0)));

        // Concave notch.
        let l = l_shape();
        assert!(l.contains(&Vec2::new(1.0, 3.0)));
        assert!(!l.contains(&Vec2::new(3.0, 3.0)));
    }

    #[test]
    fn expand_grows_a_square() {
        let mut p = square();
        p.reverse(); // wind so the edge normals point outward
        p.expand(1.0);
        let b = p.bounding_box();
        assert!((b.min.x + 1.0).abs() < TOLERANCE, "min.x={}", b.min.x);
        assert!((b.max.x - 5.0).abs() < TOLERANCE, "max.x={}", b.max.x);
        // Beveled corners: more points than before.
        assert!(p.count() > 4);
        // Area grows by the edge strips plus corner bevels.
        assert!(p.area() > 16.0 + 4.0 * 4.0);
    }

    #[test]
    fn line_intersections_carry_ring_index() {
        let p = square();
        let cutter = Line2::new(Vec2::new(-1.0, 2.0), Vec2::new(5.0, 2.0));
        let mut hits = p.intersections_with_line(&cutter);
        hits.sort_by(|u, v| u.index_a.total_cmp(&v.index_a));
        assert_eq!(hits.len(), 2);
        assert!((hits[0].index_a - 1.5).abs() < TOLERANCE);
        assert!((hits[0].point - Vec2::new(4.0, 2.0)).norm() < TOLERANCE);
        assert!((hits[1].index_a - 3.5).abs() < TOLERANCE);
    }

    #[test]
    fn ray_intersections_carry_distances() {
        let p = square();
        let ray = Ray2::new(Vec2::new(-2.0, 2.0), Vec2::new(1.0, 0.0)).unwrap();
        let mut hits = p.intersections_with_ray(&ray);
        hits.sort_by(|u, v| u.index_b.total_cmp(&v.index_b));
        assert_eq!(hits.len(), 2);
        assert!((hits[0].index_b - 2.0).abs() < TOLERANCE);
        assert!((hits[1].index_b - 6.0).abs() < TOLERANCE);
    }

    #[test]
    fn line_string_intersections_carry_string_index() {
        let p = square();
        let ls = LineString2::new(vec![
            Vec2::new(-1.0, 2.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(2.0, 5.0),
        ]);
        let hits = p.intersections_with_line_string(&ls);
        assert_eq!(hits.len(), 2);
        // Second hit is on the string's second segment.
        assert!(hits.iter().any(|h| h.index_b > 1.0 && h.index_b < 2.0));
    }

    #[test]
    fn fan_area_of_flat_ring() {
        let p = Polygon3::new(vec![
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(4.0, 0.0, 2.0),
            Vec3::new(4.0, 4.0, 2.0),
            Vec3::new(0.0, 4.0, 2.0),
        ]);
        assert!((p.fan_area() - 16.0).abs() < TOLERANCE);
        assert!(p.contains_xy(&Vec2::new(1.0, 1.0)));
        let c = p.centroid().unwrap();
        assert!((c - Vec3::new(2.0, 2.0, 2.0)).norm() < TOLERANCE);
    }

    #[test]
    fn closest_point_sits_on_ring() {
        let p = Polygon3::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(4.0, 4.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
        ]);
        let c = p.closest_point_to_point(&Vec3::new(2.0, -3.0, 0.0)).unwrap();
        assert!((c - Vec3::new(2.0, 0.0, 0.0)).norm() < TOLERANCE);
    }
}
