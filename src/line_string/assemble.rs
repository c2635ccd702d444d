//! Chains loose polyline fragments into continuous strings.

use std::collections::HashMap;

use super::LineString;
use crate::bounds::Aabb;
use crate::vec::Coord;

/// Endpoint of one input fragment: index into the input and whether it is
/// the fragment's last point.
type Endpoint = (usize, bool);

/// Joins fragments whose endpoints lie within `epsilon` of each other.
///
/// Endpoints are bucketed by their coordinate along the longest axis of
/// the overall bounding box, so matching scans only neighboring buckets
/// instead of every fragment. Each chain grows greedily at both ends,
/// always taking the closest unconsumed endpoint; fragments are reversed
/// as needed so the joined string runs in one direction. The joint keeps
/// the attached fragment's endpoint. Output order follows the input order
/// of each chain's seed fragment.
#[must_use]
pub fn assemble<V: Coord>(parts: &[LineString<V>], epsilon: f64) -> Vec<LineString<V>> {
    let eps_sq = epsilon * epsilon;

    let mut bbox = Aabb::empty();
    for part in parts {
        bbox.expand_points(&part.points);
    }
    let sort_axis = bbox.max_side();
    #[allow(clippy::cast_possible_truncation)]
    let key_of = |p: &V| (p.axis(sort_axis) / epsilon).floor() as i64;

    let mut buckets: HashMap<i64, Vec<Endpoint>> = HashMap::new();
    for (i, part) in parts.iter().enumerate() {
        if let (Some(first), Some(last)) = (part.first(), part.last()) {
            buckets.entry(key_of(first)).or_default().push((i, false));
            buckets.entry(key_of(last)).or_default().push((i, true));
        }
    }

    let mut consumed: Vec<bool> = parts.iter().map(LineString::is_empty).collect();
    let mut out = Vec::new();

    for seed in 0..parts.len() {
        if consumed[seed] {
            continue;
        }
        consumed[seed] = true;
        let mut chain = parts[seed].points.clone();

        loop {
            let mut grew = false;
            for grow_at_tail in [true, false] {
                let endpoint = if grow_at_tail {
                    chain[chain.len() - 1]
                } else {
                    chain[0]
                };

                let mut best: Option<(f64, usize, bool)> = None;
                let key = key_of(&endpoint);
                for k in key - 1..=key + 1 {
                    let Some(candidates) = buckets.get(&k) else {
                        continue;
                    };
                    for &(j, is_last) in candidates {
                        if consumed[j] {
                            continue;
                        }
                        let other = if is_last {
                            parts[j].points[parts[j].points.len() - 1]
                        } else {
                            parts[j].points[0]
                        };
                        let d = endpoint.dist_sq_to(&other);
                        if best.is_none_or(|(bd, _, _)| d < bd) {
                            best = Some((d, j, is_last));
                        }
                    }
                }

                let Some((d, j, is_last)) = best else {
                    continue;
                };
                if d >= eps_sq {
                    continue;
                }
                consumed[j] = true;
                let mut points = parts[j].points.clone();
                if grow_at_tail {
                    if is_last {
                        points.reverse();
                    }
                    chain.pop();
                    chain.extend_from_slice(&points);
                } else {
                    if !is_last {
                        points.reverse();
                    }
                    points.pop();
                    points.extend_from_slice(&chain);
                    chain = points;
                }
                grew = true;
            }
            if !grew {
                break;
            }
        }
        out.push(LineString::new(chain));
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::vec::{Vec2, TOLERANCE};

    fn ls(points: &[(f64, f64)]) -> LineString<Vec2> {
        LineString::new(points.iter().map(|&(x, y)| Vec2::new(x, y)).collect())
    }

    #[test]
    fn chains_three_fragments() {
        let parts = [
            ls(&[(0.0, 0.0), (1.0, 0.0)]),
            ls(&[(1.0, 0.0), (2.0, 0.0)]),
            ls(&[(2.0, 0.0), (3.0, 0.0)]),
        ];
        let joined = assemble(&parts, 1e-6);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].points.len(), 4);
        assert!((joined[0].points[0]).norm() < TOLERANCE);
        assert!((joined[0].points[3] - Vec2::new(3.0, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn reverses_backwards_fragments() {
        // Second fragment runs the wrong way.
        let parts = [
            ls(&[(0.0, 0.0), (1.0, 0.0)]),
            ls(&[(2.0, 0.0), (1.0, 0.0)]),
        ];
        let joined = assemble(&parts, 1e-6);
        assert_eq!(joined.len(), 1);
        let points = &joined[0].points;
        assert_eq!(points.len(), 3);
        assert!((points[2] - Vec2::new(2.0, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn grows_at_the_front() {
        let parts = [
            ls(&[(1.0, 0.0), (2.0, 0.0)]),
            ls(&[(0.0, 0.0), (1.0, 0.0)]),
        ];
        let joined = assemble(&parts, 1e-6);
        assert_eq!(joined.len(), 1);
        let points = &joined[0].points;
        assert_eq!(points.len(), 3);
        assert!((points[0]).norm() < TOLERANCE);
        assert!((points[2] - Vec2::new(2.0, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn distant_fragments_stay_separate() {
        let parts = [
            ls(&[(0.0, 0.0), (1.0, 0.0)]),
            ls(&[(5.0, 0.0), (6.0, 0.0)]),
        ];
        let joined = assemble(&parts, 1e-3);
        assert_eq!(joined.len(), 2);
    }

    #[test]
    fn tolerates_jitter_within_epsilon() {
        let parts = [
            ls(&[(0.0, 0.0), (1.0, 0.0)]),
            ls(&[(1.0, 0.000_4), (2.0, 0.0)]),
        ];
        let joined = assemble(&parts, 1e-3);
        assert_eq!(joined.len(), 1);
        // The joint keeps the attached fragment's endpoint.
        assert!((joined[0].points[1].y - 0.000_4).abs() < TOLERANCE);
    }

    #[test]
    fn empty_inputs_are_dropped() {
        let parts = [ls(&[]), ls(&[(0.0, 0.0), (1.0, 0.0)])];
        let joined = assemble(&parts, 1e-6);
        assert_eq!(joined.len(), 1);
    }
}
