// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Preference files for granul plugins.
//!
//! Hosts hand a plugin the path of a plain `key=value` file. This crate parses
//! those files ([`KeyValueFile`]) and offers a small storage port
//! ([`ConfigStore`]) so tools can look files up by logical name under a
//! directory or the platform config dir.

mod config;
mod fs;
mod key_value;

pub use config::{ConfigError, ConfigService, ConfigStore};
pub use fs::FsConfigStore;
pub use key_value::KeyValueFile;
