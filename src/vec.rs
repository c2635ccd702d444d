use std::f64::consts::TAU;

use crate::error::{GeometryError, GeokernError, Result};

/// 2D coordinate type.
pub type Vec2 = nalgebra::Vector2<f64>;

/// 3D coordinate type.
pub type Vec3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Capability set shared by [`Vec2`] and [`Vec3`].
///
/// Line-string, polygon and bounding code is written once against this
/// trait and works in both dimensions. All measures are Euclidean; the
/// `_xy` variants measure the XY shadow (for `Vec2` they equal the plain
/// variants).
pub trait Coord:
    Copy
    + PartialEq
    + std::fmt::Debug
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<f64, Output = Self>
    + 'static
{
    const DIM: usize;

    fn zeros() -> Self;

    fn axis(&self, i: usize) -> f64;

    fn set_axis(&mut self, i: usize, value: f64);

    fn dot(&self, other: &Self) -> f64;

    fn dist_sq_to_xy(&self, other: &Self) -> f64;

    /// All components finite (excludes NaN and infinities).
    fn is_valid(&self) -> bool;

    /// Angle from the +y axis, clockwise positive, in `(-π, π]`.
    ///
    /// `None` for a vector with no XY extent.
    fn azimuth(&self) -> Option<f64>;

    fn norm_sq(&self) -> f64 {
        self.dot(self)
    }

    fn norm(&self) -> f64 {
        self.norm_sq().sqrt()
    }

    fn dist_sq_to(&self, other: &Self) -> f64 {
        (*other - *self).norm_sq()
    }

    fn dist_to(&self, other: &Self) -> f64 {
        self.dist_sq_to(other).sqrt()
    }

    fn dist_to_xy(&self, other: &Self) -> f64 {
        self.dist_sq_to_xy(other).sqrt()
    }

    fn lerp_to(&self, other: &Self, f: f64) -> Self {
        *self + (*other - *self) * f
    }

    fn mid_to(&self, other: &Self) -> Self {
        self.lerp_to(other, 0.5)
    }

    /// Unit vector in the same direction. A zero-length vector is
    /// returned unchanged.
    fn normalized(&self) -> Self {
        let n = self.norm();
        if n < TOLERANCE {
            *self
        } else {
            *self * (1.0 / n)
        }
    }

    /// Componentwise fractional part.
    fn frac(&self) -> Self {
        let mut out = *self;
        for i in 0..Self::DIM {
            let v = self.axis(i);
            out.set_axis(i, v - v.floor());
        }
        out
    }
}

impl Coord for Vec2 {
    const DIM: usize = 2;

    fn zeros() -> Self {
        Self::new(0.0, 0.0)
    }

    fn axis(&self, i: usize) -> f64 {
        self[i]
    }

    fn set_axis(&mut self, i: usize, value: f64) {
        self[i] = value;
    }

    fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    fn dist_sq_to_xy(&self, other: &Self) -> f64 {
        self.dist_sq_to(other)
    }

    fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    fn azimuth(&self) -> Option<f64> {
        if self.x.abs() < TOLERANCE && self.y.abs() < TOLERANCE {
            return None;
        }
        Some(self.x.atan2(self.y))
    }
}

impl Coord for Vec3 {
    const DIM: usize = 3;

    fn zeros() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    fn axis(&self, i: usize) -> f64 {
        self[i]
    }

    fn set_axis(&mut self, i: usize, value: f64) {
        self[i] = value;
    }

    fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    fn dist_sq_to_xy(&self, other: &Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    fn azimuth(&self) -> Option<f64> {
        if self.x.abs() < TOLERANCE && self.y.abs() < TOLERANCE {
            return None;
        }
        Some(self.x.atan2(self.y))
    }
}

/// 2D perpendicular, 90° counter-clockwise: `(x, y) → (-y, x)`.
#[must_use]
pub fn rotated_90(v: &Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Elevation angle of a 3D vector against the XY plane, in `[-π/2, π/2]`.
#[must_use]
pub fn pitch(v: &Vec3) -> f64 {
    v.z.atan2((v.x * v.x + v.y * v.y).sqrt())
}

/// Azimuth of the direction from `a` to `b`. `None` when the points share
/// their XY position.
#[must_use]
pub fn azimuth_between<V: Coord>(a: &V, b: &V) -> Option<f64> {
    (*b - *a).azimuth()
}

/// Rotates the XY part of `v` to the given azimuth, preserving its planar
/// length. Any z component is untouched.
#[must_use]
pub fn with_azimuth<V: Coord>(v: &V, azimuth: f64) -> V {
    let x = v.axis(0);
    let y = v.axis(1);
    let l = (x * x + y * y).sqrt();
    let mut out = *v;
    out.set_axis(0, azimuth.sin() * l);
    out.set_axis(1, azimuth.cos() * l);
    out
}

/// Tilts `v` to the given elevation angle, preserving its length and
/// azimuth. A vector with no XY extent has no azimuth and is returned
/// unchanged.
#[must_use]
pub fn with_pitch(v: &Vec3, pitch: f64) -> Vec3 {
    let l = v.norm();
    let planar = (v.x * v.x + v.y * v.y).sqrt();
    if planar < TOLERANCE {
        return *v;
    }
    let scale = pitch.cos() * l / planar;
    Vec3::new(v.x * scale, v.y * scale, pitch.sin() * l)
}

/// Unit vector pointing along the given azimuth.
#[must_use]
pub fn from_azimuth(azimuth: f64) -> Vec2 {
    Vec2::new(azimuth.sin(), azimuth.cos())
}

/// Vector of the given length along an azimuth and elevation angle.
#[must_use]
pub fn from_azimuth_and_pitch(azimuth: f64, pitch: f64, len: f64) -> Vec3 {
    let cos = pitch.cos();
    Vec3::new(
        azimuth.sin() * cos * len,
        azimuth.cos() * cos * len,
        pitch.sin() * len,
    )
}

/// Normalizes an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_azimuth(angle: f64) -> f64 {
    let a = angle % TAU;
    if a < 0.0 {
        a + TAU
    } else {
        a
    }
}

/// Interior angle at `b` of the triangle `a`, `b`, `c` (law of cosines).
///
/// `None` when either arm is degenerate.
#[must_use]
pub fn angle_abc<V: Coord>(a: &V, b: &V, c: &V) -> Option<f64> {
    let ab = b.dist_to(a);
    let cb = b.dist_to(c);
    if ab < TOLERANCE || cb < TOLERANCE {
        return None;
    }
    let ac = a.dist_to(c);
    let cos = (ab * ab + cb * cb - ac * ac) / (2.0 * ab * cb);
    Some(cos.clamp(-1.0, 1.0).acos())
}

/// Builds a [`Vec2`] from a flat `[x, y]` slice.
pub fn vec2_from_slice(values: &[f64]) -> Result<Vec2> {
    if values.len() < 2 {
        return Err(GeokernError::Geometry(GeometryError::InvalidArrayLength {
            expected: 2,
            got: values.len(),
        }));
    }
    Ok(Vec2::new(values[0], values[1]))
}

/// Builds a [`Vec3`] from a flat `[x, y, z]` slice. A missing `z` defaults
/// to zero so 2D positions lift cleanly.
pub fn vec3_from_slice(values: &[f64]) -> Result<Vec3> {
    if values.len() < 2 {
        return Err(GeokernError::Geometry(GeometryError::InvalidArrayLength {
            expected: 3,
            got: values.len(),
        }));
    }
    let z = if values.len() >= 3 { values[2] } else { 0.0 };
    Ok(Vec3::new(values[0], values[1], z))
}
