// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `key=value` preference files.
//!
//! Format, line by line:
//! - leading/trailing ASCII whitespace (space, `\t`, `\r`, `\n`, `\v`, `\f`)
//!   is ignored;
//! - blank lines and lines starting with `#` are skipped;
//! - every other line must contain `=` after at least one character; the key
//!   is everything before the first `=`, the value everything after (possibly
//!   empty), both trimmed;
//! - a key may appear only once.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::str::FromStr;

use crate::ConfigError;

const WHITESPACE: &[char] = &[' ', '\t', '\r', '\n', '\x0b', '\x0c'];

/// Parsed preference file. Keys iterate in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValueFile {
    entries: BTreeMap<String, String>,
}

impl KeyValueFile {
    /// Parses preference text.
    ///
    /// # Examples
    /// ```
    /// use granul_config::KeyValueFile;
    /// let file = KeyValueFile::parse("# seeds\nradius = 0.25\nname=\n").unwrap();
    /// assert_eq!(file.get_f64("radius").unwrap(), Some(0.25));
    /// assert_eq!(file.get_str("name"), Some(""));
    /// ```
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut entries = BTreeMap::new();
        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim_matches(WHITESPACE);
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = match line.split_once('=') {
                Some((key, _)) if key.is_empty() => {
                    return Err(ConfigError::Malformed {
                        line: line_no,
                        reason: "missing key before '='",
                    })
                }
                Some(pair) => pair,
                None => {
                    return Err(ConfigError::Malformed {
                        line: line_no,
                        reason: "expected key=value",
                    })
                }
            };
            let key = key.trim_matches(WHITESPACE).to_owned();
            let value = value.trim_matches(WHITESPACE).to_owned();
            if entries.contains_key(&key) {
                return Err(ConfigError::DuplicateKey { line: line_no, key });
            }
            entries.insert(key, value);
        }
        Ok(Self { entries })
    }

    /// Reads and parses the file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(ConfigError::NotFound(path.display().to_string()))
            }
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Returns `true` when `key` is present.
    pub fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Raw value for `key`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Owned raw value for `key`.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    /// Value for `key` parsed as `T`.
    ///
    /// `Ok(None)` when the key is missing; `Err(Parse)` when the value does
    /// not parse. Parsing is strict: `"12abc"` is not an integer.
    pub fn get<T: FromStr>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(value) => value.parse().map(Some).map_err(|_| ConfigError::Parse {
                key: key.to_owned(),
                value: value.clone(),
            }),
        }
    }

    /// Value for `key` parsed as `i64`.
    pub fn get_i64(&self, key: &str) -> Result<Option<i64>, ConfigError> {
        self.get(key)
    }

    /// Value for `key` parsed as `f64`.
    pub fn get_f64(&self, key: &str) -> Result<Option<f64>, ConfigError> {
        self.get(key)
    }

    /// Like [`KeyValueFile::get`] but a missing key is `Err(NotFound)`.
    pub fn require<T: FromStr>(&self, key: &str) -> Result<T, ConfigError> {
        self.get(key)?
            .ok_or_else(|| ConfigError::NotFound(key.to_owned()))
    }

    /// Value for `key` parsed as `f64`, or `Err(NotFound)`.
    pub fn require_f64(&self, key: &str) -> Result<f64, ConfigError> {
        self.require(key)
    }

    /// Raw value for `key`, or `Err(NotFound)`.
    pub fn require_str(&self, key: &str) -> Result<&str, ConfigError> {
        self.get_str(key)
            .ok_or_else(|| ConfigError::NotFound(key.to_owned()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the file held no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Writes every entry as a `key=value` line, sorted by key.
    pub fn dump(&self, out: &mut impl io::Write) -> io::Result<()> {
        for (key, value) in self.iter() {
            writeln!(out, "{key}={value}")?;
        }
        Ok(())
    }
}
