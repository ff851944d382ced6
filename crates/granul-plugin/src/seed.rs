// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Particle factory fed by seed files.
//!
//! The preference file is a `key=value` file naming two CSV files: particle
//! centres (`index,x,y,z`) and radii (`index,r`), one particle per line and
//! in the same order. Optional keys:
//!
//! | key | meaning | default |
//! |---|---|---|
//! | `type` | host particle type | `particle` |
//! | `speed` | initial speed along the particle's +Z | `0` |
//! | `axis_x`, `axis_y`, `axis_z`, `angle` | initial orientation (radians) | identity |
//! | `per_step` | particles inserted per timestep | `1` |
//!
//! Relative CSV paths resolve against the preference file's directory.

use std::fs;
use std::path::{Path, PathBuf};

use granul_config::KeyValueFile;
use granul_math::{is_zero, Matrix3x3, Point3, Vector3};
use tracing::{debug, info, instrument, warn};

use crate::factory::{ApiVersion, HostApi, NewParticle, ParticleFactory, TYPE_NAME_MAX_LEN};
use crate::FactoryError;

const DEFAULT_TYPE: &str = "particle";

/// Centre and radius of one seeded particle.
type Seed = (Point3, f64);

/// Settings read from a seed preference file.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSettings {
    /// CSV of `index,x,y,z` centres.
    pub centers: PathBuf,
    /// CSV of `index,r` radii.
    pub radii: PathBuf,
    /// Host particle type.
    pub type_name: String,
    /// Initial speed along the particle's +Z.
    pub speed: f64,
    /// Initial orientation.
    pub orientation: Matrix3x3,
    /// Particles inserted per timestep.
    pub per_step: usize,
}

impl SeedSettings {
    /// Reads settings from parsed preferences; relative paths join `base_dir`.
    pub fn from_preferences(prefs: &KeyValueFile, base_dir: &Path) -> Result<Self, FactoryError> {
        let centers = base_dir.join(prefs.require_str("centers")?);
        let radii = base_dir.join(prefs.require_str("radii")?);

        let type_name = prefs.get_str("type").unwrap_or(DEFAULT_TYPE).to_owned();
        if type_name.len() > TYPE_NAME_MAX_LEN {
            return Err(FactoryError::TypeNameTooLong {
                len: type_name.len(),
                max: TYPE_NAME_MAX_LEN,
            });
        }

        let speed = prefs.get_f64("speed")?.unwrap_or(0.0);

        let angle = prefs.get_f64("angle")?.unwrap_or(0.0);
        let axis = Vector3::new(
            prefs.get_f64("axis_x")?.unwrap_or(0.0),
            prefs.get_f64("axis_y")?.unwrap_or(0.0),
            prefs.get_f64("axis_z")?.unwrap_or(0.0),
        );
        let orientation = if angle == 0.0 {
            Matrix3x3::IDENTITY
        } else if is_zero(axis.length_squared()) {
            return Err(FactoryError::InvalidSetting {
                key: "axis",
                reason: "rotation axis must be non-zero",
            });
        } else {
            let mut unit = axis;
            Matrix3x3::from_axis_angle(unit.normalize(), angle)
        };

        let per_step = prefs.get::<usize>("per_step")?.unwrap_or(1);
        if per_step == 0 {
            return Err(FactoryError::InvalidSetting {
                key: "per_step",
                reason: "must be at least 1",
            });
        }

        Ok(Self {
            centers,
            radii,
            type_name,
            speed,
            orientation,
            per_step,
        })
    }

    /// Initial velocity: `(0, 0, speed)` carried through the orientation.
    pub fn velocity(&self) -> Vector3 {
        Vector3::new(0.0, 0.0, self.speed) * self.orientation
    }
}

/// [`ParticleFactory`] that replays particles listed in seed files.
#[derive(Debug, Default)]
pub struct SeedFileFactory {
    preference_file: Option<PathBuf>,
    settings: Option<SeedSettings>,
    seeds: Vec<Seed>,
    next: usize,
    step_time: Option<f64>,
    emitted_in_step: usize,
}

impl SeedFileFactory {
    /// Oldest host API the factory accepts in `setup`.
    pub const MIN_HOST_API: ApiVersion = ApiVersion::new(1, 0);

    /// Factory with no seeds; call [`ParticleFactory::setup`] before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings from the last successful setup.
    pub fn settings(&self) -> Option<&SeedSettings> {
        self.settings.as_ref()
    }

    /// Number of seeds loaded.
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    /// Returns `true` when no seeds are loaded.
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Seeds not yet handed to the host.
    pub fn remaining(&self) -> usize {
        self.seeds.len() - self.next
    }

    fn load(preference_file: &Path) -> Result<(SeedSettings, Vec<Seed>), FactoryError> {
        let prefs = KeyValueFile::from_path(preference_file)?;
        let base = preference_file.parent().unwrap_or_else(|| Path::new(""));
        let settings = SeedSettings::from_preferences(&prefs, base)?;

        let centers = read_rows::<3>(&settings.centers, "expected index,x,y,z")?;
        let radii = read_rows::<1>(&settings.radii, "expected index,r")?;
        if centers.len() != radii.len() {
            return Err(FactoryError::CountMismatch {
                centers: centers.len(),
                radii: radii.len(),
            });
        }
        let seeds = centers
            .into_iter()
            .zip(radii)
            .map(|(c, [r])| (Point3::from(c), r))
            .collect();
        Ok((settings, seeds))
    }
}

impl ParticleFactory for SeedFileFactory {
    fn preference_file_name(&self) -> Option<&Path> {
        self.preference_file.as_deref()
    }

    #[instrument(skip(self, host), fields(host_api = %host.version()))]
    fn setup(&mut self, host: &HostApi, preference_file: &Path) -> Result<(), FactoryError> {
        *self = Self::default();
        match host
            .require(Self::MIN_HOST_API)
            .and_then(|()| Self::load(preference_file))
        {
            Ok((settings, seeds)) => {
                info!(
                    seeds = seeds.len(),
                    particle_type = %settings.type_name,
                    "seed factory ready"
                );
                self.preference_file = Some(preference_file.to_path_buf());
                self.settings = Some(settings);
                self.seeds = seeds;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "seed factory setup failed");
                Err(err)
            }
        }
    }

    fn starting(&mut self, _host: &HostApi) -> Result<(), FactoryError> {
        if self.settings.is_none() {
            return Err(FactoryError::NotSetUp);
        }
        self.next = 0;
        self.step_time = None;
        self.emitted_in_step = 0;
        info!(seeds = self.seeds.len(), "seed factory starting");
        Ok(())
    }

    fn stopping(&mut self, _host: &HostApi) {
        info!(
            created = self.next,
            remaining = self.remaining(),
            "seed factory stopping"
        );
    }

    fn create_particle(&mut self, time: f64) -> Result<Option<NewParticle>, FactoryError> {
        let Some(settings) = self.settings.as_ref() else {
            warn!("create_particle called before setup");
            return Err(FactoryError::NotSetUp);
        };
        let Some(&(position, scale)) = self.seeds.get(self.next) else {
            return Ok(None);
        };

        if self.step_time != Some(time) {
            self.step_time = Some(time);
            self.emitted_in_step = 0;
        }
        self.next += 1;
        self.emitted_in_step += 1;

        let additional_required =
            self.next < self.seeds.len() && self.emitted_in_step < settings.per_step;
        debug!(index = self.next - 1, time, %position, scale, "created particle");

        Ok(Some(NewParticle {
            type_name: settings.type_name.clone(),
            scale,
            position,
            velocity: settings.velocity(),
            angular_velocity: Vector3::ZERO,
            orientation: settings.orientation,
            additional_required,
        }))
    }
}

/// Reads `index,v1..vN` rows. The index column is required but not checked.
fn read_rows<const N: usize>(path: &Path, shape: &str) -> Result<Vec<[f64; N]>, FactoryError> {
    let text = fs::read_to_string(path).map_err(|source| FactoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let seed_err = |line: usize, reason: String| FactoryError::Seed {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut rows = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != N + 1 {
            return Err(seed_err(
                idx + 1,
                format!("{shape}, found {} fields", fields.len()),
            ));
        }
        let mut row = [0.0; N];
        for (slot, field) in row.iter_mut().zip(&fields[1..]) {
            *slot = field
                .parse()
                .map_err(|_| seed_err(idx + 1, format!("invalid number '{field}'")))?;
        }
        rows.push(row);
    }
    Ok(rows)
}
