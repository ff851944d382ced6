// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::fmt;
use core::ops::{Add, AddAssign, Sub, SubAssign};

use crate::tolerance::is_zero;
use crate::Vector3;

/// A location in space, as opposed to a displacement.
///
/// Zero-cost wrapper over [`Vector3`] that only admits the operations that
/// make sense for points: translating by a vector, taking the difference of
/// two points, and measuring distance. Arithmetic is delegated to the inner
/// vector, so the same flushing and sentinel rules apply.
///
/// Equality is absolute: two points are equal when every coordinate
/// difference is within [`crate::DOUBLE_UNDERFLOW`] of zero.
#[derive(Debug, Copy, Clone, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Point3(Vector3);

impl Point3 {
    /// The origin.
    pub const ORIGIN: Self = Self(Vector3::ZERO);

    /// Creates a point, flushing near-zero coordinates to `0.0`.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// X coordinate.
    pub fn x(&self) -> f64 {
        self.0.x()
    }

    /// Y coordinate.
    pub fn y(&self) -> f64 {
        self.0.y()
    }

    /// Z coordinate.
    pub fn z(&self) -> f64 {
        self.0.z()
    }

    /// Position vector from the origin.
    pub fn to_vector(self) -> Vector3 {
        self.0
    }

    /// Coordinates as an array, unmodified.
    pub fn to_array(self) -> [f64; 3] {
        self.0.to_array()
    }

    /// Returns `true` when any coordinate carries the sentinel.
    pub fn is_invalid(&self) -> bool {
        self.0.is_invalid()
    }

    /// Scales every coordinate about the origin.
    pub fn scale(&self, scalar: f64) -> Self {
        Self(self.0.scale(scalar))
    }

    /// Divides every coordinate; sentinel on a near-zero divisor.
    pub fn divide(&self, divisor: f64) -> Self {
        Self(self.0.divide(divisor))
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).length()
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(value: [f64; 3]) -> Self {
        Self(Vector3::from(value))
    }
}

impl From<Point3> for [f64; 3] {
    fn from(value: Point3) -> Self {
        value.to_array()
    }
}

impl From<Vector3> for Point3 {
    fn from(value: Vector3) -> Self {
        Self(value)
    }
}

impl PartialEq for Point3 {
    fn eq(&self, other: &Self) -> bool {
        is_zero(self.x() - other.x()) && is_zero(self.y() - other.y()) && is_zero(self.z() - other.z())
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Add<Vector3> for Point3 {
    type Output = Self;
    fn add(self, rhs: Vector3) -> Self {
        Self(self.0 + rhs)
    }
}

impl AddAssign<Vector3> for Point3 {
    fn add_assign(&mut self, rhs: Vector3) {
        self.0 += rhs;
    }
}

impl Sub<Vector3> for Point3 {
    type Output = Self;
    fn sub(self, rhs: Vector3) -> Self {
        Self(self.0 - rhs)
    }
}

impl SubAssign<Vector3> for Point3 {
    fn sub_assign(&mut self, rhs: Vector3) {
        self.0 -= rhs;
    }
}

/// Displacement from `rhs` to `self`.
impl Sub for Point3 {
    type Output = Vector3;
    fn sub(self, rhs: Self) -> Vector3 {
        self.0 - rhs.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_difference_is_a_vector() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(4.0, 6.0, 3.0);
        let d: Vector3 = b - a;
        assert_eq!(d.to_array(), [3.0, 4.0, 0.0]);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(a + d, b);
    }

    #[test]
    fn point_equality_is_absolute() {
        let a = Point3::new(1.0, 0.0, 0.0);
        assert_eq!(a, Point3::from([1.0 + 1e-26, 0.0, 0.0]));
        assert_ne!(a, Point3::new(1.0 + 1e-12, 0.0, 0.0));
    }

    #[test]
    fn divide_by_near_zero_is_sentinel() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let q = p.divide(1e-30);
        assert!(q.is_invalid());
        assert_eq!(q.to_array(), [crate::INVALID; 3]);
        assert_eq!(p.divide(2.0).to_array(), [0.5, 1.0, 1.5]);
        assert!(!p.is_invalid());
    }

    #[test]
    fn scale_is_about_the_origin() {
        let p = Point3::new(1.0, -2.0, 0.5);
        assert_eq!(p.scale(2.0).to_array(), [2.0, -4.0, 1.0]);
        assert_eq!(p.scale(0.0), Point3::ORIGIN);
        assert_eq!(Point3::ORIGIN.to_array(), [0.0; 3]);
    }

    #[test]
    fn translate_in_place() {
        let mut p = Point3::new(1.0, 2.0, 3.0);
        p += Vector3::UNIT_X;
        p -= Vector3::UNIT_Y;
        assert_eq!(p.to_array(), [2.0, 1.0, 3.0]);
        assert_eq!(p - Vector3::UNIT_Z, Point3::new(2.0, 1.0, 2.0));
    }
}
