// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use granul_math::{
    are_equal, are_equal_within, is_really_really_zero, is_really_really_zero_within, is_zero,
    is_zero_within, DOUBLE_UNDERFLOW, REALLY_REALLY_ZERO,
};

#[test]
fn are_equal_is_reflexive_for_finite_values() {
    for x in [0.0, -0.0, 1.0, -1.0, 1e-41, 1e-30, 3.5e12, -7.25e-3, f64::MAX, f64::MIN_POSITIVE] {
        assert!(are_equal(x, x), "are_equal({x}, {x}) must hold");
    }
}

#[test]
fn are_equal_treats_values_below_really_really_zero_as_zero() {
    assert!(are_equal(0.0, 1e-41));
    assert!(are_equal(1e-41, 0.0));
    assert!(are_equal(-1e-40, 1e-40));
}

#[test]
fn are_equal_is_relative() {
    assert!(are_equal(1.0, 1.0 + 1e-13));
    assert!(are_equal(1.0e20, 1.0e20 + 1.0e7));
    assert!(!are_equal(1.0, 1.1));
    assert!(!are_equal(1.0e-20, 1.1e-20));
    // A tiny value is not equal to zero once it exceeds the zero threshold.
    assert!(!are_equal(1e-17, 0.0));
    assert!(!are_equal(0.0, 1e-17));
}

#[test]
fn are_equal_divides_by_the_non_zero_operand() {
    // b is zero, a is not: |b/a - 1| == 1.
    assert!(!are_equal(2.0, 0.0));
    // b is non-zero: |a/b - 1| == 1.
    assert!(!are_equal(0.0, 2.0));
}

#[test]
fn are_equal_with_wider_tolerance() {
    assert!(are_equal_within(1e-10, 0.0, 1e-9));
    assert!(!are_equal_within(1e-8, 0.0, 1e-9));
}

#[test]
fn zero_thresholds() {
    assert!(is_zero(0.99e-25));
    assert!(!is_zero(DOUBLE_UNDERFLOW));
    assert!(is_zero_within(0.5, 1.0));
    assert!(!is_zero_within(1.0, 1.0));

    assert!(is_really_really_zero(REALLY_REALLY_ZERO));
    assert!(!is_really_really_zero(1e-39));
    assert!(is_really_really_zero_within(1.0, 1.0));
    assert!(!is_really_really_zero_within(-1.5, 1.0));
}
