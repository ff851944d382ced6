// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use core::str::FromStr;

use thiserror::Error;

use crate::tolerance::{are_equal, flush_underflow, is_zero, INVALID};
use crate::Matrix3x3;

/// Three-component `f64` vector exchanged across the plugin boundary.
///
/// * Components are metres, metres per second or radians per second depending
///   on the calling context (see the aliases in the crate root).
/// * Every operation that produces a new vector flushes components with
///   magnitude below [`crate::DOUBLE_UNDERFLOW`] to exactly `0.0`.
/// * `==` compares component-wise with [`crate::are_equal`].
/// * Conversions from and to `[f64; 3]` are exact; they do not flush.
#[derive(Debug, Copy, Clone, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "[f64; 3]", into = "[f64; 3]")
)]
pub struct Vector3 {
    data: [f64; 3],
}

impl Vector3 {
    /// The zero vector.
    pub const ZERO: Self = Self::raw(0.0, 0.0, 0.0);

    /// Unit vector pointing along the positive X axis.
    pub const UNIT_X: Self = Self::raw(1.0, 0.0, 0.0);

    /// Unit vector pointing along the positive Y axis.
    pub const UNIT_Y: Self = Self::raw(0.0, 1.0, 0.0);

    /// Unit vector pointing along the positive Z axis.
    pub const UNIT_Z: Self = Self::raw(0.0, 0.0, 1.0);

    /// Result of an undefined operation: every component is [`INVALID`].
    pub const INVALID: Self = Self::raw(INVALID, INVALID, INVALID);

    const fn raw(x: f64, y: f64, z: f64) -> Self {
        Self { data: [x, y, z] }
    }

    /// Creates a vector, flushing near-zero components to `0.0`.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self::raw(flush_underflow(x), flush_underflow(y), flush_underflow(z))
    }

    /// Returns the components as an array, unmodified.
    pub fn to_array(self) -> [f64; 3] {
        self.data
    }

    pub(crate) fn component(&self, idx: usize) -> f64 {
        self.data[idx]
    }

    /// X component.
    pub fn x(&self) -> f64 {
        self.data[0]
    }

    /// Y component.
    pub fn y(&self) -> f64 {
        self.data[1]
    }

    /// Z component.
    pub fn z(&self) -> f64 {
        self.data[2]
    }

    /// Overwrites the X component.
    pub fn set_x(&mut self, x: f64) {
        self.data[0] = x;
    }

    /// Overwrites the Y component.
    pub fn set_y(&mut self, y: f64) {
        self.data[1] = y;
    }

    /// Overwrites the Z component.
    pub fn set_z(&mut self, z: f64) {
        self.data[2] = z;
    }

    /// Returns `true` when any component carries the [`INVALID`] sentinel.
    pub fn is_invalid(&self) -> bool {
        self.data.iter().any(|&c| c == INVALID)
    }

    /// Scales the vector by a scalar.
    pub fn scale(&self, scalar: f64) -> Self {
        Self::new(
            self.component(0) * scalar,
            self.component(1) * scalar,
            self.component(2) * scalar,
        )
    }

    /// Divides every component by `divisor`.
    ///
    /// Returns [`Vector3::INVALID`] when `divisor` is within
    /// [`crate::DOUBLE_UNDERFLOW`] of zero.
    ///
    /// # Examples
    /// ```
    /// use granul_math::Vector3;
    /// let v = Vector3::new(1.0, 2.0, 3.0);
    /// assert!(v.divide(1e-30).is_invalid());
    /// assert_eq!(v.divide(2.0).to_array(), [0.5, 1.0, 1.5]);
    /// ```
    pub fn divide(&self, divisor: f64) -> Self {
        if is_zero(divisor) {
            return Self::INVALID;
        }
        Self::new(
            self.component(0) / divisor,
            self.component(1) / divisor,
            self.component(2) / divisor,
        )
    }

    /// Dot product with another vector.
    pub fn dot(&self, other: &Self) -> f64 {
        self.component(0) * other.component(0)
            + self.component(1) * other.component(1)
            + self.component(2) * other.component(2)
    }

    /// Right-handed cross product with another vector.
    pub fn cross(&self, other: &Self) -> Self {
        let ax = self.component(0);
        let ay = self.component(1);
        let az = self.component(2);
        let bx = other.component(0);
        let by = other.component(1);
        let bz = other.component(2);
        Self::new(ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx)
    }

    /// Vector length (magnitude).
    ///
    /// Stays finite for finite components whose squares would overflow.
    pub fn length(&self) -> f64 {
        let len_sq = self.length_squared();
        if len_sq.is_finite() {
            return len_sq.sqrt();
        }
        let largest = self.largest_magnitude();
        if !largest.is_finite() {
            return len_sq.sqrt();
        }
        largest * self.scale(1.0 / largest).length_squared().sqrt()
    }

    fn largest_magnitude(&self) -> f64 {
        self.data.iter().fold(0.0, |acc: f64, c| acc.max(c.abs()))
    }

    /// Squared magnitude of the vector.
    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Normalises the vector in place and returns the result.
    ///
    /// A vector whose squared length is within [`crate::DOUBLE_UNDERFLOW`] of
    /// zero is left untouched, so the zero vector stays zero. When the squared
    /// length overflows, the vector is first brought down by its largest
    /// component; vectors with non-finite components are left untouched.
    pub fn normalize(&mut self) -> Self {
        let len_sq = self.length_squared();
        if is_zero(len_sq) {
            return *self;
        }
        if len_sq.is_finite() {
            *self = self.scale(1.0 / len_sq.sqrt());
        } else {
            let largest = self.largest_magnitude();
            if largest.is_finite() {
                let reduced = self.scale(1.0 / largest);
                *self = reduced.scale(1.0 / reduced.length_squared().sqrt());
            }
        }
        *self
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(value: [f64; 3]) -> Self {
        Self { data: value }
    }
}

impl From<Vector3> for [f64; 3] {
    fn from(value: Vector3) -> Self {
        value.data
    }
}

impl PartialEq for Vector3 {
    fn eq(&self, other: &Self) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(&a, &b)| are_equal(a, b))
    }
}

/// `(x, y, z)`; a precision (`{:.3}`) applies to every component.
impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.data;
        match f.precision() {
            Some(p) => write!(f, "({x:.p$}, {y:.p$}, {z:.p$})"),
            None => write!(f, "({x}, {y}, {z})"),
        }
    }
}

/// Failure to read a [`Vector3`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseVectorError {
    /// The text did not contain exactly three components.
    #[error("expected 3 components, found {0}")]
    Arity(usize),
    /// A component was not a number.
    #[error("invalid component {0:?}")]
    Component(String),
}

/// Reads three numbers separated by whitespace and/or commas.
///
/// ```
/// use granul_math::Vector3;
/// let v: Vector3 = "1, 2.5 -3".parse().unwrap();
/// assert_eq!(v.to_array(), [1.0, 2.5, -3.0]);
/// ```
impl FromStr for Vector3 {
    type Err = ParseVectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|field| !field.is_empty())
            .collect();
        if fields.len() != 3 {
            return Err(ParseVectorError::Arity(fields.len()));
        }
        let mut out = [0.0; 3];
        for (slot, field) in out.iter_mut().zip(fields) {
            *slot = field
                .parse()
                .map_err(|_| ParseVectorError::Component(field.to_owned()))?;
        }
        Ok(Self::new(out[0], out[1], out[2]))
    }
}

impl Add for Vector3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.component(0) + rhs.component(0),
            self.component(1) + rhs.component(1),
            self.component(2) + rhs.component(2),
        )
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vector3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.component(0) - rhs.component(0),
            self.component(1) - rhs.component(1),
            self.component(2) - rhs.component(2),
        )
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Vector3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.component(0), -self.component(1), -self.component(2))
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Mul<Vector3> for f64 {
    type Output = Vector3;
    fn mul(self, rhs: Vector3) -> Vector3 {
        rhs.scale(self)
    }
}

impl MulAssign<f64> for Vector3 {
    fn mul_assign(&mut self, rhs: f64) {
        *self = self.scale(rhs);
    }
}

/// Row vector times frame; see [`Matrix3x3::transform`].
impl Mul<Matrix3x3> for Vector3 {
    type Output = Self;
    fn mul(self, rhs: Matrix3x3) -> Self {
        rhs.transform(&self)
    }
}

impl MulAssign<Matrix3x3> for Vector3 {
    fn mul_assign(&mut self, rhs: Matrix3x3) {
        *self = rhs.transform(self);
    }
}

impl Div<f64> for Vector3 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        self.divide(rhs)
    }
}

impl DivAssign<f64> for Vector3 {
    fn div_assign(&mut self, rhs: f64) {
        *self = self.divide(rhs);
    }
}

impl Sum for Vector3 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
