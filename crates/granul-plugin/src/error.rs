// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use std::path::PathBuf;

use granul_config::ConfigError;
use thiserror::Error;

use crate::ApiVersion;

/// Errors surfaced by particle factories.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// The preference file was missing or malformed.
    #[error("preference file: {0}")]
    Config(#[from] ConfigError),
    /// A seed file could not be read.
    #[error("{path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// A seed file line did not have the expected shape.
    #[error("{path}:{line}: {reason}")]
    Seed {
        /// File being read.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        reason: String,
    },
    /// The centre and radius files list different numbers of particles.
    #[error("{centers} centres but {radii} radii")]
    CountMismatch {
        /// Number of centres read.
        centers: usize,
        /// Number of radii read.
        radii: usize,
    },
    /// The particle type name does not fit the host buffer.
    #[error("particle type name is {len} bytes; the host accepts at most {max}")]
    TypeNameTooLong {
        /// Length of the configured name in bytes.
        len: usize,
        /// Maximum accepted length.
        max: usize,
    },
    /// A preference value parsed but is not usable.
    #[error("setting {key}: {reason}")]
    InvalidSetting {
        /// Preference key (or key group) at fault.
        key: &'static str,
        /// What was wrong with it.
        reason: &'static str,
    },
    /// The host offers an older API than the factory needs.
    #[error("host API {found} is older than required {required}")]
    UnsupportedHost {
        /// Version offered by the host.
        found: ApiVersion,
        /// Minimum version required.
        required: ApiVersion,
    },
    /// `create_particle` was called before a successful `setup`.
    #[error("factory used before setup")]
    NotSetUp,
}
