//! Best-fit carriers for point clouds.

use crate::ray::Ray;
use crate::stats::mean_coord;
use crate::vec::{Coord, Vec2, TOLERANCE};

/// Two-sided ray through the centroid along the consensus direction of a
/// point cloud.
///
/// Every pairwise difference votes for a direction; votes are sign
/// corrected against the running total so opposite-pointing pairs
/// reinforce instead of cancelling. `None` for fewer than 2 points or
/// when all points coincide.
#[must_use]
pub fn best_fit_ray<V: Coord>(points: &[V]) -> Option<Ray<V>> {
    if points.len() < 2 {
        return None;
    }

    let mut v = V::zeros();
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let mut d = *a - *b;
            if v.dot(&d) < 0.0 {
                d = d * -1.0;
            }
            v = v + d;
        }
    }
    if v.norm() < TOLERANCE {
        return None;
    }

    let centroid = mean_coord(points)?;
    Ray::two_sided(centroid, v).ok()
}

/// Least-squares `y = m*x + b` fit. `None` for empty input or a vertical
/// point cloud.
#[must_use]
pub fn line_m_and_b(points: &[Vec2]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let x_sum: f64 = points.iter().map(|p| p.x).sum();
    let y_sum: f64 = points.iter().map(|p| p.y).sum();
    let xy_sum: f64 = points.iter().map(|p| p.x * p.y).sum();
    let xx_sum: f64 = points.iter().map(|p| p.x * p.x).sum();

    let ssxx = xx_sum - x_sum * x_sum / n;
    if ssxx.abs() < TOLERANCE {
        return None;
    }
    let ssxy = xy_sum - x_sum * y_sum / n;
    let m = ssxy / ssxx;
    let b = y_sum / n - (x_sum / n) * m;
    Some((m, b))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::vec::Vec3;

    #[test]
    fn ray_through_noisy_line() {
        let points = [
            Vec2::new(0.0, 0.1),
            Vec2::new(1.0, -0.1),
            Vec2::new(2.0, 0.05),
            Vec2::new(3.0, 0.0),
        ];
        let ray = best_fit_ray(&points).unwrap();
        assert!(ray.dir.x.abs() > 0.99, "dir={:?}", ray.dir);
        assert!((ray.org.x - 1.5).abs() < TOLERANCE);
        // Two sided: points behind the centroid are still close.
        assert!(ray.dist_to_point(&Vec2::new(0.0, 0.0)) < 0.1);
    }

    #[test]
    fn ray_in_3d() {
        let points = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(2.0, 2.0, 2.0),
        ];
        let ray = best_fit_ray(&points).unwrap();
        let d = ray.dir;
        assert!((d.x.abs() - d.y.abs()).abs() < TOLERANCE);
        assert!((d.y.abs() - d.z.abs()).abs() < TOLERANCE);
    }

    #[test]
    fn degenerate_clouds() {
        assert!(best_fit_ray::<Vec2>(&[]).is_none());
        assert!(best_fit_ray(&[Vec2::new(1.0, 1.0)]).is_none());
        let coincident = [Vec2::new(2.0, 2.0), Vec2::new(2.0, 2.0)];
        assert!(best_fit_ray(&coincident).is_none());
    }

    #[test]
    fn slope_and_intercept() {
        let points = [
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 3.0),
            Vec2::new(2.0, 5.0),
        ];
        let (m, b) = line_m_and_b(&points).unwrap();
        assert!((m - 2.0).abs() < TOLERANCE, "m={m}");
        assert!((b - 1.0).abs() < TOLERANCE, "b={b}");
    }

    #[test]
    fn vertical_cloud_is_none() {
        let points = [Vec2::new(1.0, 0.0), Vec2::new(1.0, 5.0)];
        assert!(line_m_and_b(&points).is_none());
    }
}
