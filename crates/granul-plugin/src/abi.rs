// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! C-compatible entry points.
//!
//! A host loads the plugin library, creates a factory with
//! [`granul_factory_new`], configures it with [`granul_factory_setup`], then
//! polls [`granul_factory_create_particle`] each timestep. The frame helpers
//! (`granul_rotate`, `granul_invert_frame`, ...) expose the kernel to hosts
//! that only hold flat `double` arrays.
//!
//! No function unwinds across the boundary; null pointers are reported as
//! `false` or `-1`.
#![allow(unsafe_code)]
#![allow(non_camel_case_types)]

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::path::Path;
use std::slice;

use granul_math::{Matrix3x3, Vector3};
use tracing::warn;

use crate::factory::{
    HostApi, ParticleFactory, ParticleOut, FACTORY_INTERFACE_VERSION, TYPE_NAME_BUFFER_LEN,
};
use crate::SeedFileFactory;

/// Opaque factory pointer exposed over the C ABI.
pub struct GranulFactory {
    inner: SeedFileFactory,
    host: HostApi,
    out: ParticleOut,
}

/// Particle record filled by [`granul_factory_create_particle`].
#[repr(C)]
#[derive(Clone, Copy)]
pub struct granul_particle {
    /// NUL-terminated host particle type.
    pub type_name: [c_char; TYPE_NAME_BUFFER_LEN],
    /// Scale relative to the template particle.
    pub scale: f64,
    /// Centre `x, y, z`.
    pub position: [f64; 3],
    /// Linear velocity.
    pub velocity: [f64; 3],
    /// Angular velocity.
    pub angular_velocity: [f64; 3],
    /// Orientation, row-major `XX..ZZ`.
    pub orientation: [f64; 9],
    /// Whether the host should call again this timestep.
    pub additional_required: bool,
}

impl granul_particle {
    #[allow(clippy::cast_possible_wrap)]
    fn copy_from(&mut self, out: &ParticleOut) {
        for (dst, &src) in self.type_name.iter_mut().zip(out.type_name.iter()) {
            *dst = src as c_char;
        }
        self.scale = out.scale;
        self.position = out.position;
        self.velocity = out.velocity;
        self.angular_velocity = out.angular_velocity;
        self.orientation = out.orientation;
        self.additional_required = out.additional_required;
    }
}

/// Creates an unconfigured seed-file factory.
///
/// # Safety
/// The caller assumes ownership of the returned pointer and must release it
/// via [`granul_factory_free`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn granul_factory_new() -> *mut GranulFactory {
    Box::into_raw(Box::new(GranulFactory {
        inner: SeedFileFactory::new(),
        host: HostApi::default(),
        out: ParticleOut::default(),
    }))
}

/// Releases a factory created by [`granul_factory_new`].
///
/// # Safety
/// `factory` must be a pointer previously returned by [`granul_factory_new`]
/// that has not already been freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn granul_factory_free(factory: *mut GranulFactory) {
    if factory.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(factory));
    }
}

/// Packed factory interface version (`major << 16 | minor << 8 | patch`).
#[unsafe(no_mangle)]
pub extern "C" fn granul_factory_interface_version() -> c_int {
    FACTORY_INTERFACE_VERSION.packed()
}

/// Reads the preference file at `pref_path` and loads its seeds.
///
/// # Safety
/// `factory` must come from [`granul_factory_new`]; `pref_path` must be a
/// NUL-terminated UTF-8 string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn granul_factory_setup(
    factory: *mut GranulFactory,
    pref_path: *const c_char,
) -> bool {
    let Some(factory) = (unsafe { factory.as_mut() }) else {
        return false;
    };
    if pref_path.is_null() {
        return false;
    }
    let Ok(path) = unsafe { CStr::from_ptr(pref_path) }.to_str() else {
        warn!("preference path is not UTF-8");
        return false;
    };
    let host = factory.host;
    factory.inner.setup(&host, Path::new(path)).is_ok()
        && factory.inner.starting(&host).is_ok()
}

/// Produces the next particle for simulation `time`.
///
/// Returns `1` when `out` was filled, `0` when the factory has nothing more
/// to add, and `-1` on error (null pointer, factory not set up, or a type
/// name that does not fit).
///
/// # Safety
/// `factory` must come from [`granul_factory_new`]; `out` must point to a
/// writable [`granul_particle`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn granul_factory_create_particle(
    factory: *mut GranulFactory,
    time: f64,
    out: *mut granul_particle,
) -> c_int {
    let Some(factory) = (unsafe { factory.as_mut() }) else {
        return -1;
    };
    let Some(out) = (unsafe { out.as_mut() }) else {
        return -1;
    };
    match factory.inner.create_particle(time) {
        Ok(Some(particle)) => {
            if let Err(err) = particle.write_to(&mut factory.out) {
                warn!(error = %err, "particle rejected at the boundary");
                return -1;
            }
            out.copy_from(&factory.out);
            1
        }
        Ok(None) => 0,
        Err(_) => -1,
    }
}

/// Writes `v * orientation` to `out`.
///
/// # Safety
/// `orientation` must reference 9 doubles; `v` and `out` 3 doubles each.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn granul_rotate(
    orientation: *const f64,
    v: *const f64,
    out: *mut f64,
) -> bool {
    let (Some(m), Some(v)) = (unsafe { read_frame(orientation) }, unsafe { read_vec3(v) }) else {
        return false;
    };
    unsafe { write_slice(out, &(v * m).to_array()) }
}

/// Writes the inverse of `m` to `out`; `false` when `m` is singular.
///
/// The sentinel frame is still written for singular input.
///
/// # Safety
/// `m` and `out` must each reference 9 doubles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn granul_invert_frame(m: *const f64, out: *mut f64) -> bool {
    let Some(m) = (unsafe { read_frame(m) }) else {
        return false;
    };
    let inv = m.inverse();
    unsafe { write_slice(out, &inv.to_array()) && !inv.is_invalid() }
}

/// Writes the transpose of `m` to `out`.
///
/// # Safety
/// `m` and `out` must each reference 9 doubles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn granul_transpose_frame(m: *const f64, out: *mut f64) -> bool {
    let Some(m) = (unsafe { read_frame(m) }) else {
        return false;
    };
    unsafe { write_slice(out, &m.transpose().to_array()) }
}

/// Writes the rotation frame of `angle` radians about unit `axis` to `out`.
///
/// # Safety
/// `axis` must reference 3 doubles and `out` 9 doubles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn granul_frame_from_axis_angle(
    axis: *const f64,
    angle: f64,
    out: *mut f64,
) -> bool {
    let Some(axis) = (unsafe { read_vec3(axis) }) else {
        return false;
    };
    unsafe { write_slice(out, &Matrix3x3::from_axis_angle(axis, angle).to_array()) }
}

unsafe fn read_vec3(ptr: *const f64) -> Option<Vector3> {
    if ptr.is_null() {
        return None;
    }
    // Safety: callers guarantee `ptr` references at least 3 doubles.
    let values = unsafe { slice::from_raw_parts(ptr, 3) };
    Some(Vector3::from([values[0], values[1], values[2]]))
}

unsafe fn read_frame(ptr: *const f64) -> Option<Matrix3x3> {
    if ptr.is_null() {
        return None;
    }
    let mut data = [0.0; 9];
    // Safety: callers guarantee `ptr` references at least 9 doubles.
    data.copy_from_slice(unsafe { slice::from_raw_parts(ptr, 9) });
    Some(Matrix3x3::from(data))
}

unsafe fn write_slice(ptr: *mut f64, values: &[f64]) -> bool {
    if ptr.is_null() {
        return false;
    }
    // Safety: callers guarantee `ptr` references a buffer with len >= values.len().
    unsafe { slice::from_raw_parts_mut(ptr, values.len()) }.copy_from_slice(values);
    true
}
