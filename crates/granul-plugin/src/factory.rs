// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Particle factory lifecycle and the flat buffers particles are written to.

use std::fmt;
use std::path::Path;

use granul_math::{AngularVelocity, Matrix3x3, Point3, Velocity};

use crate::FactoryError;

/// Size in bytes of the host's particle type buffer, terminator included.
pub const TYPE_NAME_BUFFER_LEN: usize = 256;

/// Longest particle type name the host accepts, in bytes.
pub const TYPE_NAME_MAX_LEN: usize = TYPE_NAME_BUFFER_LEN - 1;

/// Version of the factory interface this crate implements.
pub const FACTORY_INTERFACE_VERSION: InterfaceVersion = InterfaceVersion::new(2, 0, 0);

/// Three-part interface version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InterfaceVersion {
    /// Breaking revision.
    pub major: u8,
    /// Additive revision.
    pub minor: u8,
    /// Fix revision.
    pub patch: u8,
}

impl InterfaceVersion {
    /// Creates a version triple.
    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Packs the triple as `major << 16 | minor << 8 | patch`.
    ///
    /// ```
    /// use granul_plugin::FACTORY_INTERFACE_VERSION;
    /// assert_eq!(FACTORY_INTERFACE_VERSION.packed(), 0x02_00_00);
    /// ```
    #[allow(clippy::cast_lossless)]
    pub const fn packed(self) -> i32 {
        ((self.major as i32) << 16) | ((self.minor as i32) << 8) | self.patch as i32
    }

    /// Inverse of [`InterfaceVersion::packed`]; bits above the major byte are ignored.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn from_packed(packed: i32) -> Self {
        Self::new(
            (packed >> 16) as u8,
            (packed >> 8) as u8,
            packed as u8,
        )
    }
}

impl fmt::Display for InterfaceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Host API version (`major.minor`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    /// Major revision.
    pub major: u32,
    /// Minor revision.
    pub minor: u32,
}

impl ApiVersion {
    /// Creates a version pair.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// What the factory knows about the host that loaded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostApi {
    version: ApiVersion,
}

impl HostApi {
    /// Host speaking API `version`.
    pub const fn new(version: ApiVersion) -> Self {
        Self { version }
    }

    /// API version the host reported.
    pub const fn version(&self) -> ApiVersion {
        self.version
    }

    /// Fails with [`FactoryError::UnsupportedHost`] when the host is older than `required`.
    pub fn require(&self, required: ApiVersion) -> Result<(), FactoryError> {
        if self.version < required {
            return Err(FactoryError::UnsupportedHost {
                found: self.version,
                required,
            });
        }
        Ok(())
    }
}

impl Default for HostApi {
    fn default() -> Self {
        Self::new(ApiVersion::new(1, 0))
    }
}

/// A particle the factory wants the host to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewParticle {
    /// Host particle type the new particle belongs to.
    pub type_name: String,
    /// Scale relative to the host's template particle.
    pub scale: f64,
    /// Centre of the particle.
    pub position: Point3,
    /// Initial linear velocity.
    pub velocity: Velocity,
    /// Initial angular velocity.
    pub angular_velocity: AngularVelocity,
    /// Initial orientation frame.
    pub orientation: Matrix3x3,
    /// Whether the host should call the factory again in the same timestep.
    pub additional_required: bool,
}

impl NewParticle {
    /// Copies the particle into the host's flat buffers.
    ///
    /// Fails with [`FactoryError::TypeNameTooLong`] when the type name (plus
    /// its terminator) does not fit the host buffer. Nothing is written in
    /// that case.
    pub fn write_to(&self, out: &mut ParticleOut) -> Result<(), FactoryError> {
        let name = self.type_name.as_bytes();
        if name.len() > TYPE_NAME_MAX_LEN {
            return Err(FactoryError::TypeNameTooLong {
                len: name.len(),
                max: TYPE_NAME_MAX_LEN,
            });
        }
        out.type_name = [0; TYPE_NAME_BUFFER_LEN];
        out.type_name[..name.len()].copy_from_slice(name);
        out.scale = self.scale;
        out.position = self.position.to_array();
        out.velocity = self.velocity.to_array();
        out.angular_velocity = self.angular_velocity.to_array();
        out.orientation = self.orientation.to_array();
        out.additional_required = self.additional_required;
        Ok(())
    }
}

/// Flat particle buffers in host layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleOut {
    /// NUL-terminated type name.
    pub type_name: [u8; TYPE_NAME_BUFFER_LEN],
    /// Scale relative to the template particle.
    pub scale: f64,
    /// `x, y, z` of the centre.
    pub position: [f64; 3],
    /// Linear velocity.
    pub velocity: [f64; 3],
    /// Angular velocity.
    pub angular_velocity: [f64; 3],
    /// Orientation, row-major `XX, XY, XZ, YX, .., ZZ`.
    pub orientation: [f64; 9],
    /// Whether the host should call again this timestep.
    pub additional_required: bool,
}

impl ParticleOut {
    /// Type name up to the first NUL, if it is valid UTF-8.
    pub fn type_name_str(&self) -> Option<&str> {
        let end = self
            .type_name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(TYPE_NAME_BUFFER_LEN);
        std::str::from_utf8(&self.type_name[..end]).ok()
    }
}

impl Default for ParticleOut {
    fn default() -> Self {
        Self {
            type_name: [0; TYPE_NAME_BUFFER_LEN],
            scale: 0.0,
            position: [0.0; 3],
            velocity: [0.0; 3],
            angular_velocity: [0.0; 3],
            orientation: Matrix3x3::IDENTITY.to_array(),
            additional_required: false,
        }
    }
}

/// A plugin that inserts particles into a running simulation.
///
/// The host drives the lifecycle:
/// 1. [`preference_file_name`](Self::preference_file_name) when saving a deck,
/// 2. [`setup`](Self::setup) once the preference file is known,
/// 3. [`starting`](Self::starting) before the first timestep,
/// 4. [`create_particle`](Self::create_particle) repeatedly each timestep
///    until it returns `None` or a particle with `additional_required == false`,
/// 5. [`stopping`](Self::stopping) when the run ends.
pub trait ParticleFactory {
    /// Preference file chosen by the last successful `setup`, if any.
    fn preference_file_name(&self) -> Option<&Path>;

    /// Reads the preference file and prepares the factory.
    fn setup(&mut self, host: &HostApi, preference_file: &Path) -> Result<(), FactoryError>;

    /// Called once before the first timestep.
    fn starting(&mut self, _host: &HostApi) -> Result<(), FactoryError> {
        Ok(())
    }

    /// Called once after the last timestep.
    fn stopping(&mut self, _host: &HostApi) {}

    /// Next particle to insert at simulation `time`, or `None` when the
    /// factory has nothing to add.
    fn create_particle(&mut self, time: f64) -> Result<Option<NewParticle>, FactoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use granul_math::Vector3;

    fn particle(name: &str) -> NewParticle {
        NewParticle {
            type_name: name.to_owned(),
            scale: 1.5,
            position: Point3::new(1.0, 2.0, 3.0),
            velocity: Vector3::new(0.0, 0.0, -1.0),
            angular_velocity: Vector3::ZERO,
            orientation: Matrix3x3::IDENTITY,
            additional_required: true,
        }
    }

    #[test]
    fn interface_version_packs_into_bytes() {
        let v = InterfaceVersion::new(2, 1, 3);
        assert_eq!(v.packed(), 0x02_01_03);
        assert_eq!(InterfaceVersion::from_packed(v.packed()), v);
        assert_eq!(v.to_string(), "2.1.3");
    }

    #[test]
    fn host_version_gate() {
        let host = HostApi::new(ApiVersion::new(1, 2));
        assert!(host.require(ApiVersion::new(1, 0)).is_ok());
        assert!(host.require(ApiVersion::new(1, 2)).is_ok());
        assert!(matches!(
            host.require(ApiVersion::new(2, 0)),
            Err(FactoryError::UnsupportedHost { .. })
        ));
    }

    #[test]
    fn write_to_fills_flat_buffers() {
        let mut out = ParticleOut::default();
        particle("grain").write_to(&mut out).unwrap();
        assert_eq!(out.type_name_str(), Some("grain"));
        assert_eq!(out.type_name[5], 0);
        assert_eq!(out.scale, 1.5);
        assert_eq!(out.position, [1.0, 2.0, 3.0]);
        assert_eq!(out.velocity, [0.0, 0.0, -1.0]);
        assert_eq!(out.orientation, Matrix3x3::IDENTITY.to_array());
        assert!(out.additional_required);
    }

    #[test]
    fn shorter_name_clears_previous_bytes() {
        let mut out = ParticleOut::default();
        particle("longer-name").write_to(&mut out).unwrap();
        particle("ab").write_to(&mut out).unwrap();
        assert_eq!(out.type_name_str(), Some("ab"));
    }

    #[test]
    fn name_must_leave_room_for_terminator() {
        let mut out = ParticleOut::default();
        particle(&"x".repeat(TYPE_NAME_MAX_LEN))
            .write_to(&mut out)
            .unwrap();
        let err = particle(&"x".repeat(TYPE_NAME_BUFFER_LEN))
            .write_to(&mut out)
            .unwrap_err();
        assert!(matches!(
            err,
            FactoryError::TypeNameTooLong { len: 256, max: 255 }
        ));
    }
}
