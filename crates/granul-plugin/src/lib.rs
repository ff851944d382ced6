// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! granul-plugin: the host-facing side of a granul particle factory.
//!
//! A DEM host loads the plugin, asks for its preference file, calls `setup`,
//! then polls `create_particle` every timestep until the factory reports that
//! it has nothing more to add. This crate models that lifecycle as the
//! [`ParticleFactory`] trait, ships one implementation driven by seed files
//! ([`SeedFileFactory`]), and exposes both through a C ABI ([`abi`]).
//!
//! Values cross the boundary as flat `f64` arrays; the only translation point
//! between those arrays and the kernel types is [`ParticleOut`] and the
//! helpers in [`abi`].

pub mod abi;
mod error;
mod factory;
mod seed;

pub use error::FactoryError;
pub use factory::{
    ApiVersion, HostApi, InterfaceVersion, NewParticle, ParticleFactory, ParticleOut,
    FACTORY_INTERFACE_VERSION, TYPE_NAME_BUFFER_LEN, TYPE_NAME_MAX_LEN,
};
pub use seed::{SeedFileFactory, SeedSettings};
