// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Floating-point zero tests and relative equality.
//!
//! Two thresholds are in play:
//! - [`DOUBLE_UNDERFLOW`] (`1e-25`, exclusive) decides whether a divisor or a
//!   squared length is usable, and is the magnitude below which vector
//!   components are flushed to `0.0`.
//! - [`REALLY_REALLY_ZERO`] (`1e-40`, inclusive) decides whether an operand of
//!   [`are_equal`] may be divided by.
//!
//! Contract: every predicate is pure and total over finite inputs. NaN and
//! infinities are outside the contract.

/// Magnitude below which a value counts as zero for divisions and clamping.
pub const DOUBLE_UNDERFLOW: f64 = 1e-25;

/// Much tighter zero threshold used by [`are_equal`].
pub const REALLY_REALLY_ZERO: f64 = 1e-40;

/// Maximum relative difference `|a/b - 1|` for two values to compare equal.
pub const RELATIVE_EPSILON: f64 = 1e-12;

/// Sentinel written into every component of an undefined result.
///
/// Not NaN and not zero; ordinary float comparison against it works.
pub const INVALID: f64 = 9e30;

/// Returns `true` when `-1e-25 < value < 1e-25`.
///
/// # Examples
/// ```
/// use granul_math::is_zero;
/// assert!(is_zero(1e-26));
/// assert!(!is_zero(1e-25));
/// ```
pub fn is_zero(value: f64) -> bool {
    is_zero_within(value, DOUBLE_UNDERFLOW)
}

/// Returns `true` when `-threshold < value < threshold`.
pub fn is_zero_within(value: f64, threshold: f64) -> bool {
    value < threshold && value > -threshold
}

/// Returns `true` when `-1e-40 <= value <= 1e-40`.
pub fn is_really_really_zero(value: f64) -> bool {
    is_really_really_zero_within(value, REALLY_REALLY_ZERO)
}

/// Returns `true` when `-tolerance <= value <= tolerance` (bounds inclusive).
pub fn is_really_really_zero_within(value: f64, tolerance: f64) -> bool {
    value <= tolerance && value >= -tolerance
}

/// Relative equality with the default [`REALLY_REALLY_ZERO`] tolerance.
///
/// # Examples
/// ```
/// use granul_math::are_equal;
/// assert!(are_equal(1.0, 1.0 + 1e-13));
/// assert!(are_equal(0.0, 1e-41));
/// assert!(!are_equal(1.0, 1.1));
/// ```
pub fn are_equal(a: f64, b: f64) -> bool {
    are_equal_within(a, b, REALLY_REALLY_ZERO)
}

/// Relative equality that divides by whichever operand is non-zero.
///
/// `b` is tried first, then `a`; when both are within `tolerance` of zero
/// the values are equal.
pub fn are_equal_within(a: f64, b: f64, tolerance: f64) -> bool {
    if !is_really_really_zero_within(b, tolerance) {
        (a / b - 1.0).abs() < RELATIVE_EPSILON
    } else if !is_really_really_zero_within(a, tolerance) {
        (b / a - 1.0).abs() < RELATIVE_EPSILON
    } else {
        true
    }
}

/// Flushes `value` to exactly `0.0` when [`is_zero`] holds.
///
/// Also canonicalizes `-0.0` to `+0.0`.
pub(crate) fn flush_underflow(value: f64) -> f64 {
    if is_zero(value) {
        0.0
    } else {
        value
    }
}
