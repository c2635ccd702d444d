//! Scalar statistics helpers used by the fitting and smoothing code.

use crate::range::Range;
use crate::vec::Coord;

/// One-pass summary of a number sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub min: f64,
    pub max: f64,
    pub middle: f64,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    pub mean_deviation: f64,
    pub standard_deviation: f64,
}

#[must_use]
pub fn sum(numbers: &[f64]) -> f64 {
    numbers.iter().sum()
}

#[must_use]
pub fn mean(numbers: &[f64]) -> Option<f64> {
    if numbers.is_empty() {
        return None;
    }
    Some(sum(numbers) / numbers.len() as f64)
}

/// Componentwise mean of a point set.
#[must_use]
pub fn mean_coord<V: Coord>(points: &[V]) -> Option<V> {
    if points.is_empty() {
        return None;
    }
    let mut acc = V::zeros();
    for p in points {
        acc = acc + *p;
    }
    Some(acc * (1.0 / points.len() as f64))
}

#[must_use]
pub fn standard_deviation(numbers: &[f64]) -> Option<f64> {
    let m = mean(numbers)?;
    let variance =
        numbers.iter().map(|n| (n - m) * (n - m)).sum::<f64>() / numbers.len() as f64;
    Some(variance.sqrt())
}

fn median_of_sorted(sorted: &[f64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

#[must_use]
pub fn median(numbers: &[f64]) -> Option<f64> {
    let mut sorted = numbers.to_vec();
    sorted.sort_by(f64::total_cmp);
    median_of_sorted(&sorted)
}

/// Lower and upper quartile by median split (the median itself is left out
/// of both halves for odd-length input).
#[must_use]
pub fn quartiles(numbers: &[f64]) -> Option<Range> {
    if numbers.is_empty() {
        return None;
    }
    let mut sorted = numbers.to_vec();
    sorted.sort_by(f64::total_cmp);

    let half = sorted.len() / 2;
    let (lower, upper) = if sorted.len() % 2 == 0 {
        (&sorted[..half], &sorted[half..])
    } else {
        (&sorted[..half], &sorted[half + 1..])
    };
    Some(Range::new(median_of_sorted(lower)?, median_of_sorted(upper)?))
}

/// Linear-interpolated percentile, `p` in `[0, 1]`.
#[must_use]
pub fn percentile(numbers: &[f64], p: f64) -> Option<f64> {
    if numbers.is_empty() {
        return None;
    }
    let mut sorted = numbers.to_vec();
    sorted.sort_by(f64::total_cmp);

    let index = p * (sorted.len() - 1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lower = index.floor() as usize;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let upper = index.ceil() as usize;
    let weight = index - index.floor();
    Some(sorted[lower] * (1.0 - weight) + sorted[upper] * weight)
}

/// Consecutive differences, `numbers[i+1] - numbers[i]`.
#[must_use]
pub fn differences(numbers: &[f64]) -> Vec<f64> {
    numbers.windows(2).map(|w| w[1] - w[0]).collect()
}

#[must_use]
pub fn stats(numbers: &[f64]) -> Option<Stats> {
    if numbers.is_empty() {
        return None;
    }
    let mut sorted = numbers.to_vec();
    sorted.sort_by(f64::total_cmp);

    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let total = sum(&sorted);
    let mean = total / sorted.len() as f64;
    let median = median_of_sorted(&sorted)?;
    let mean_deviation =
        sorted.iter().map(|n| (n - mean).abs()).sum::<f64>() / sorted.len() as f64;
    let variance =
        sorted.iter().map(|n| (n - mean) * (n - mean)).sum::<f64>() / sorted.len() as f64;

    Some(Stats {
        min,
        max,
        middle: (min + max) * 0.5,
        sum: total,
        mean,
        median,
        mean_deviation,
        standard_deviation: variance.sqrt(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::vec::{Vec2, TOLERANCE};

    #[test]
    fn empty_input_is_none() {
        assert!(mean(&[]).is_none());
        assert!(median(&[]).is_none());
        assert!(quartiles(&[]).is_none());
        assert!(percentile(&[], 0.5).is_none());
        assert!(stats(&[]).is_none());
    }

    #[test]
    fn median_even_and_odd() {
        assert!((median(&[3.0, 1.0, 2.0]).unwrap() - 2.0).abs() < TOLERANCE);
        assert!((median(&[4.0, 1.0, 2.0, 3.0]).unwrap() - 2.5).abs() < TOLERANCE);
    }

    #[test]
    fn quartiles_of_known_set() {
        let q = quartiles(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]).unwrap();
        assert!((q.min - 2.0).abs() < TOLERANCE, "lq={}", q.min);
        assert!((q.max - 6.0).abs() < TOLERANCE, "uq={}", q.max);
    }

    #[test]
    fn percentile_interpolates() {
        let p = percentile(&[0.0, 10.0], 0.25).unwrap();
        assert!((p - 2.5).abs() < TOLERANCE, "p={p}");
    }

    #[test]
    fn stats_summary() {
        let s = stats(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_relative_eq!(s.mean, 2.5);
        assert_relative_eq!(s.median, 2.5);
        assert_relative_eq!(s.middle, 2.5);
        assert_relative_eq!(s.sum, 10.0);
        assert_relative_eq!(s.mean_deviation, 1.0);
        assert_relative_eq!(s.standard_deviation, 1.25_f64.sqrt());
    }

    #[test]
    fn mean_of_points() {
        let m = mean_coord(&[Vec2::new(0.0, 0.0), Vec2::new(2.0, 4.0)]).unwrap();
        assert!((m.x - 1.0).abs() < TOLERANCE);
        assert!((m.y - 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn differences_of_sequence() {
        let d = differences(&[1.0, 4.0, 2.0]);
        assert_eq!(d.len(), 2);
        assert!((d[0] - 3.0).abs() < TOLERANCE);
        assert!((d[1] + 2.0).abs() < TOLERANCE);
    }
}
