//! Farthest-pair queries over point sets.

use crate::vec::Coord;

/// The two most distant points of a set, with their distance.
///
/// Exact O(n²) scan. `None` for fewer than two points.
#[must_use]
pub fn farthest_pair<V: Coord>(points: &[V]) -> Option<(V, V, f64)> {
    if points.len() < 2 {
        return None;
    }
    let mut best_sq = -1.0;
    let mut best = (points[0], points[1]);
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let d = a.dist_sq_to(b);
            if d > best_sq {
                best_sq = d;
                best = (*a, *b);
            }
        }
    }
    Some((best.0, best.1, best_sq.sqrt()))
}

/// The largest pairwise distance. `None` for fewer than two points.
#[must_use]
pub fn farthest_dist_between<V: Coord>(points: &[V]) -> Option<f64> {
    farthest_pair(points).map(|(_, _, d)| d)
}

/// Whether every pairwise distance is below `dist`. Bails out on the first
/// violation instead of scanning the full grid.
#[must_use]
pub fn farthest_dist_between_less_than<V: Coord>(points: &[V], dist: f64) -> bool {
    let dist_sq = dist * dist;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            if a.dist_sq_to(b) >= dist_sq {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::vec::{Vec2, Vec3, TOLERANCE};

    #[test]
    fn pair_of_square_corners() {
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.3, 0.4),
        ];
        let (a, b, d) = farthest_pair(&points).unwrap();
        assert!((d - 2.0_f64.sqrt()).abs() < TOLERANCE, "d={d}");
        assert!((a.dist_to(&b) - d).abs() < TOLERANCE);
    }

    #[test]
    fn too_few_points() {
        assert!(farthest_pair::<Vec3>(&[]).is_none());
        assert!(farthest_pair(&[Vec3::new(1.0, 2.0, 3.0)]).is_none());
    }

    #[test]
    fn less_than_threshold() {
        let points = [Vec2::new(0.0, 0.0), Vec2::new(3.0, 0.0)];
        assert!(farthest_dist_between_less_than(&points, 3.1));
        assert!(!farthest_dist_between_less_than(&points, 3.0));
    }
}
