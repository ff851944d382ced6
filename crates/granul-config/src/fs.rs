// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed `ConfigStore` (a directory of preference files).

use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, ConfigStore};

/// Preference files stored as `<base>/<name>.txt`.
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// Create a store rooted at `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Create a store rooted at the user config directory (e.g., `~/.config/granul`).
    pub fn from_user_config_dir() -> Result<Self, ConfigError> {
        let proj = ProjectDirs::from("dev", "flyingrobots", "granul")
            .ok_or_else(|| ConfigError::Other("could not resolve config dir".into()))?;
        Ok(Self::new(proj.config_dir()))
    }

    /// Directory the store reads from.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Full path of the preference file `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.txt"))
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(ConfigError::NotFound(path.display().to_string()))
            }
            Err(err) => Err(ConfigError::Io(err)),
        }
    }
}
