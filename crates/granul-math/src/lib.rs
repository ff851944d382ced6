// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! granul-math: the vector/frame kernel shared by granul DEM plugins.
//!
//! Positions, velocities, angular velocities and orientation frames cross the
//! host boundary as flat `f64` arrays. This crate turns them into [`Vector3`]
//! and [`Matrix3x3`] values with a tolerance-based equality model and turns
//! the results back into arrays.
//!
//! The kernel never panics and never returns `Result`. Undefined operations
//! (division by a near-zero scalar, inversion of a near-singular frame) yield
//! values whose components all equal [`INVALID`]; callers check with
//! `is_invalid()` where an operation may be singular.
//!
//! # Layout conventions
//! - Triples are `x, y, z`.
//! - Frames are row-major `XX, XY, XZ, YX, YY, YZ, ZX, ZY, ZZ`.
//! - `vector * frame` maps `x' = x·XX + y·XY + z·XZ` (and so on per row).
#![forbid(unsafe_code)]

mod mat3;
mod point;
pub mod tolerance;
mod vec3;

pub use mat3::Matrix3x3;
pub use point::Point3;
pub use tolerance::{
    are_equal, are_equal_within, is_really_really_zero, is_really_really_zero_within, is_zero,
    is_zero_within, DOUBLE_UNDERFLOW, INVALID, REALLY_REALLY_ZERO, RELATIVE_EPSILON,
};
pub use vec3::{ParseVectorError, Vector3};

/// Linear velocity, metres per second.
pub type Velocity = Vector3;

/// Angular velocity, radians per second about each axis.
pub type AngularVelocity = Vector3;

/// Force, newtons.
pub type Force = Vector3;

/// Torque, newton-metres.
pub type Torque = Vector3;

/// π to `f64` precision.
pub const PI: f64 = core::f64::consts::PI;
