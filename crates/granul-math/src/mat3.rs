// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::fmt;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::tolerance::{are_equal, is_zero, INVALID};
use crate::Vector3;

/// Row‑major 3×3 matrix, typically an orientation frame.
///
/// Rows and columns are labelled X, Y, Z:
///
/// ```text
/// XX XY XZ
/// YX YY YZ
/// ZX ZY ZZ
/// ```
///
/// - Stored in the same order the host exchanges frames, so
///   [`Matrix3x3::from`]`([f64; 9])` and [`Matrix3x3::to_array`] are exact.
/// - Components are never flushed; only vectors produced from a matrix are.
/// - Division by a near-zero scalar and inversion of a near-singular matrix
///   return [`Matrix3x3::INVALID`].
///
/// # Examples
/// ```
/// use granul_math::{Matrix3x3, Vector3};
/// let m = Matrix3x3::new([2.0, 0.0, 0.0, 0.0, 4.0, 0.0, 0.0, 0.0, 8.0]);
/// assert_eq!(m.determinant(), 64.0);
/// let v = Vector3::new(1.0, 1.0, 1.0) * m.inverse();
/// assert_eq!(v.to_array(), [0.5, 0.25, 0.125]);
/// ```
#[derive(Debug, Copy, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "[f64; 9]", into = "[f64; 9]")
)]
pub struct Matrix3x3 {
    data: [f64; 9],
}

impl Matrix3x3 {
    /// The identity frame.
    pub const IDENTITY: Self = Self::new([
        1.0, 0.0, 0.0, // row X
        0.0, 1.0, 0.0, // row Y
        0.0, 0.0, 1.0, // row Z
    ]);

    /// Result of an undefined operation: every component is [`INVALID`].
    pub const INVALID: Self = Self::new([INVALID; 9]);

    /// Returns the identity matrix.
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Creates a matrix from row-major data (`XX, XY, XZ, YX, …, ZZ`).
    pub const fn new(data: [f64; 9]) -> Self {
        Self { data }
    }

    /// Creates a matrix from three rows.
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        let [x, y, z] = rows;
        Self::new([x[0], x[1], x[2], y[0], y[1], y[2], z[0], z[1], z[2]])
    }

    /// Builds a rotation frame from a unit `axis` and an `angle` in radians.
    ///
    /// With `c = cos(angle)`, `s = sin(angle)` and axis `(x, y, z)`:
    ///
    /// ```text
    /// XX = 1 + (1-c)(x²-1)   XY = -z·s + (1-c)xy    XZ =  y·s + (1-c)xz
    /// YX =  z·s + (1-c)xy    YY = 1 + (1-c)(y²-1)   YZ = -x·s + (1-c)yz
    /// ZX = -y·s + (1-c)xz    ZY =  x·s + (1-c)yz    ZZ = 1 + (1-c)(z²-1)
    /// ```
    ///
    /// The axis is used as given; callers normalise it first. Under
    /// `vector * frame` a positive angle turns counter-clockwise about the
    /// axis (90° about +Z maps +X onto +Y).
    pub fn from_axis_angle(axis: Vector3, angle: f64) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        let t = 1.0 - c;
        let (x, y, z) = (axis.x(), axis.y(), axis.z());
        Self::new([
            1.0 + t * (x * x - 1.0),
            -z * s + t * x * y,
            y * s + t * x * z,
            z * s + t * x * y,
            1.0 + t * (y * y - 1.0),
            -x * s + t * y * z,
            -y * s + t * x * z,
            x * s + t * y * z,
            1.0 + t * (z * z - 1.0),
        ])
    }

    /// Returns the matrix as a row‑major array.
    pub fn to_array(self) -> [f64; 9] {
        self.data
    }

    /// Component at (`row`, `col`), both in `0..3`.
    ///
    /// # Panics
    /// Panics when either index is out of range.
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.data[row * 3 + col]
    }

    /// Overwrites the component at (`row`, `col`).
    ///
    /// # Panics
    /// Panics when either index is out of range.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * 3 + col] = value;
    }

    /// Row `idx` as a vector (flushed like any produced vector).
    ///
    /// # Panics
    /// Panics when `idx` is not in `0..3`.
    pub fn row(&self, idx: usize) -> Vector3 {
        Vector3::new(self.at(idx, 0), self.at(idx, 1), self.at(idx, 2))
    }

    /// Column `idx` as a vector (flushed like any produced vector).
    ///
    /// # Panics
    /// Panics when `idx` is not in `0..3`.
    pub fn column(&self, idx: usize) -> Vector3 {
        Vector3::new(self.at(0, idx), self.at(1, idx), self.at(2, idx))
    }

    /// XX component.
    pub fn xx(&self) -> f64 {
        self.data[0]
    }
    /// XY component.
    pub fn xy(&self) -> f64 {
        self.data[1]
    }
    /// XZ component.
    pub fn xz(&self) -> f64 {
        self.data[2]
    }
    /// YX component.
    pub fn yx(&self) -> f64 {
        self.data[3]
    }
    /// YY component.
    pub fn yy(&self) -> f64 {
        self.data[4]
    }
    /// YZ component.
    pub fn yz(&self) -> f64 {
        self.data[5]
    }
    /// ZX component.
    pub fn zx(&self) -> f64 {
        self.data[6]
    }
    /// ZY component.
    pub fn zy(&self) -> f64 {
        self.data[7]
    }
    /// ZZ component.
    pub fn zz(&self) -> f64 {
        self.data[8]
    }

    /// Returns `true` when any component carries the [`INVALID`] sentinel.
    pub fn is_invalid(&self) -> bool {
        self.data.iter().any(|&c| c == INVALID)
    }

    /// Returns `true` when every component differs from `other` by at most
    /// `epsilon`.
    ///
    /// Use this instead of `==` when comparing against exact zeros: the
    /// relative `==` treats `1e-17` and `0.0` as different.
    pub fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        let mut out = self.data;
        for value in &mut out {
            *value = f(*value);
        }
        Self::new(out)
    }

    fn zip_with(&self, rhs: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let mut out = [0.0; 9];
        for (idx, value) in out.iter_mut().enumerate() {
            *value = f(self.data[idx], rhs.data[idx]);
        }
        Self::new(out)
    }

    /// Multiplies every component by `scalar`.
    pub fn scale(&self, scalar: f64) -> Self {
        self.map(|v| v * scalar)
    }

    /// Divides every component by `divisor`.
    ///
    /// Returns [`Matrix3x3::INVALID`] when `divisor` is within
    /// [`crate::DOUBLE_UNDERFLOW`] of zero.
    pub fn divide(&self, divisor: f64) -> Self {
        if is_zero(divisor) {
            return Self::INVALID;
        }
        self.map(|v| v / divisor)
    }

    /// Multiplies the matrix with another matrix (`self * rhs`).
    ///
    /// `result[r][c] = Σₖ self[r][k] · rhs[k][c]`. Not commutative.
    pub fn multiply(&self, rhs: &Self) -> Self {
        let mut out = [0.0; 9];
        for row in 0..3 {
            for col in 0..3 {
                let mut sum = 0.0;
                for k in 0..3 {
                    sum += self.at(row, k) * rhs.at(k, col);
                }
                out[row * 3 + col] = sum;
            }
        }
        Self::new(out)
    }

    /// Applies the frame to `v` treated as a row vector on the left.
    ///
    /// `x' = x·XX + y·XY + z·XZ`, `y' = x·YX + y·YY + z·YZ`,
    /// `z' = x·ZX + y·ZY + z·ZZ`. This is the mapping used to rotate
    /// velocities by an orientation frame at the host boundary.
    pub fn transform(&self, v: &Vector3) -> Vector3 {
        let x = v.component(0);
        let y = v.component(1);
        let z = v.component(2);

        let nx = x * self.at(0, 0) + y * self.at(0, 1) + z * self.at(0, 2);
        let ny = x * self.at(1, 0) + y * self.at(1, 1) + z * self.at(1, 2);
        let nz = x * self.at(2, 0) + y * self.at(2, 1) + z * self.at(2, 2);

        Vector3::new(nx, ny, nz)
    }

    /// Cofactor expansion along the X row.
    ///
    /// `XX·YY·ZZ + XY·YZ·ZX + XZ·YX·ZY − XX·YZ·ZY − XY·YX·ZZ − XZ·YY·ZX`
    pub fn determinant(&self) -> f64 {
        let (xx, xy, xz) = (self.xx(), self.xy(), self.xz());
        let (yx, yy, yz) = (self.yx(), self.yy(), self.yz());
        let (zx, zy, zz) = (self.zx(), self.zy(), self.zz());
        xx * yy * zz + xy * yz * zx + xz * yx * zy - xx * yz * zy - xy * yx * zz - xz * yy * zx
    }

    /// Adjugate divided by the determinant.
    ///
    /// Returns [`Matrix3x3::INVALID`] when the determinant is within
    /// [`crate::DOUBLE_UNDERFLOW`] of zero. Otherwise each component is
    /// exactly `cofactor / det`.
    pub fn inverse(&self) -> Self {
        let det = self.determinant();
        if is_zero(det) {
            return Self::INVALID;
        }

        let (xx, xy, xz) = (self.xx(), self.xy(), self.xz());
        let (yx, yy, yz) = (self.yx(), self.yy(), self.yz());
        let (zx, zy, zz) = (self.zx(), self.zy(), self.zz());
        Self::new([
            (yy * zz - yz * zy) / det,
            (xz * zy - xy * zz) / det,
            (xy * yz - xz * yy) / det,
            (yz * zx - yx * zz) / det,
            (xx * zz - xz * zx) / det,
            (xz * yx - xx * yz) / det,
            (yx * zy - yy * zx) / det,
            (xy * zx - xx * zy) / det,
            (xx * yy - xy * yx) / det,
        ])
    }

    /// Swaps rows and columns.
    pub fn transpose(&self) -> Self {
        let d = &self.data;
        Self::new([d[0], d[3], d[6], d[1], d[4], d[7], d[2], d[5], d[8]])
    }
}

impl Default for Matrix3x3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[f64; 9]> for Matrix3x3 {
    fn from(value: [f64; 9]) -> Self {
        Self { data: value }
    }
}

impl From<Matrix3x3> for [f64; 9] {
    fn from(value: Matrix3x3) -> Self {
        value.data
    }
}

impl PartialEq for Matrix3x3 {
    fn eq(&self, other: &Self) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(&a, &b)| are_equal(a, b))
    }
}

/// Rows separated by `;`, e.g. `[1, 0, 0; 0, 1, 0; 0, 0, 1]`. A precision
/// applies to every element.
impl fmt::Display for Matrix3x3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision();
        f.write_str("[")?;
        for (idx, value) in self.data.iter().enumerate() {
            match idx {
                0 => {}
                3 | 6 => f.write_str("; ")?,
                _ => f.write_str(", ")?,
            }
            match precision {
                Some(p) => write!(f, "{value:.p$}")?,
                None => write!(f, "{value}")?,
            }
        }
        f.write_str("]")
    }
}

impl Add for Matrix3x3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.zip_with(&rhs, |a, b| a + b)
    }
}

impl AddAssign for Matrix3x3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Matrix3x3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.zip_with(&rhs, |a, b| a - b)
    }
}

impl SubAssign for Matrix3x3 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Matrix3x3 {
    type Output = Self;
    fn neg(self) -> Self {
        self.map(|v| -v)
    }
}

impl Mul for Matrix3x3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(&rhs)
    }
}

impl MulAssign for Matrix3x3 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = self.multiply(&rhs);
    }
}

impl MulAssign<&Matrix3x3> for Matrix3x3 {
    fn mul_assign(&mut self, rhs: &Matrix3x3) {
        *self = self.multiply(rhs);
    }
}

impl Mul<f64> for Matrix3x3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl MulAssign<f64> for Matrix3x3 {
    fn mul_assign(&mut self, rhs: f64) {
        *self = self.scale(rhs);
    }
}

impl Div<f64> for Matrix3x3 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        self.divide(rhs)
    }
}

impl DivAssign<f64> for Matrix3x3 {
    fn div_assign(&mut self, rhs: f64) {
        *self = self.divide(rhs);
    }
}
