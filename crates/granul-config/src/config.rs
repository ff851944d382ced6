// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config service and storage port.

use thiserror::Error;

use crate::KeyValueFile;

/// Storage port for raw preference blobs (keyed by logical name).
pub trait ConfigStore {
    /// Load a raw blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key or file not present.
    #[error("not found: {0}")]
    NotFound(String),
    /// I/O error while reading.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A non-blank, non-comment line without a usable `=`.
    #[error("line {line}: {reason}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: &'static str,
    },
    /// The same key appeared twice.
    #[error("line {line}: duplicate key {key:?}")]
    DuplicateKey {
        /// 1-based line number of the second occurrence.
        line: usize,
        /// The repeated key.
        key: String,
    },
    /// A value could not be converted to the requested type.
    #[error("key {key:?}: cannot parse {value:?}")]
    Parse {
        /// Key whose value failed to parse.
        key: String,
        /// The raw value.
        value: String,
    },
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Thin service that parses preference files and delegates storage to a `ConfigStore`.
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and parse the preference file `name`. Returns `Ok(None)` if missing.
    pub fn load(&self, name: &str) -> Result<Option<KeyValueFile>, ConfigError> {
        match self.store.load_raw(name) {
            Ok(bytes) => {
                let text = String::from_utf8(bytes)
                    .map_err(|_| ConfigError::Other(format!("{name}: not valid UTF-8")))?;
                Ok(Some(KeyValueFile::parse(&text)?))
            }
            Err(ConfigError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
