//! Convex hull by monotone chain.

use crate::vec::Vec2;

fn removes_middle(a: &Vec2, b: &Vec2, c: &Vec2) -> bool {
    let cross = (a.x - b.x) * (c.y - b.y) - (a.y - b.y) * (c.x - b.x);
    let dot = (a.x - b.x) * (c.x - b.x) + (a.y - b.y) * (c.y - b.y);
    cross < 0.0 || (cross == 0.0 && dot <= 0.0)
}

/// Convex hull of a point set, in counter-clockwise order without a
/// repeated closing point. Collinear interior points are dropped.
#[must_use]
pub fn convex_hull(points: &[Vec2]) -> Vec<Vec2> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));

    let n = sorted.len();
    let mut hull: Vec<Vec2> = Vec::with_capacity(n + 1);
    for i in 0..2 * n {
        let j = if i < n { i } else { 2 * n - 1 - i };
        while hull.len() >= 2
            && removes_middle(&hull[hull.len() - 2], &hull[hull.len() - 1], &sorted[j])
        {
            hull.pop();
        }
        hull.push(sorted[j]);
    }
    hull.pop();
    hull
}
