// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! granul CLI
//!
//! Developer tool for granul plugin decks: runs a seed-file factory the way a
//! host would and exposes the frame kernel from the shell.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use granul_math::{is_zero, Matrix3x3, Vector3};
use granul_plugin::{HostApi, NewParticle, ParticleFactory, SeedFileFactory};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "granul", author, version, about = "granul plugin developer CLI")]
struct Args {
    /// Digits after the decimal point in printed vectors and frames
    #[arg(long, global = true, default_value_t = 6)]
    precision: usize,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a seed deck until the factory is exhausted
    Seed {
        /// Seed preference file (key=value)
        #[arg(long)]
        config: PathBuf,
        /// Simulated time between host timesteps, seconds
        #[arg(long, default_value_t = 1e-3)]
        time_step: f64,
        /// Emit one JSON object per particle instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Invert a row-major 3x3 frame
    Invert {
        /// XX XY XZ YX YY YZ ZX ZY ZZ
        #[arg(num_args = 9, allow_negative_numbers = true, required = true)]
        values: Vec<f64>,
    },
    /// Rotate a vector by an axis-angle frame (`v * R`)
    Rotate {
        /// Rotation axis `x,y,z`; normalised before use
        #[arg(long, allow_hyphen_values = true)]
        axis: Vector3,
        /// Rotation angle, radians
        #[arg(long, allow_hyphen_values = true)]
        angle: f64,
        /// Vector `x,y,z` to rotate
        #[arg(allow_hyphen_values = true)]
        vector: Vector3,
    },
}

/// One created particle as reported by `granul seed`.
#[derive(Debug, Serialize)]
struct SeedRow {
    index: usize,
    time: f64,
    #[serde(rename = "type")]
    type_name: String,
    scale: f64,
    position: [f64; 3],
    velocity: [f64; 3],
    angular_velocity: [f64; 3],
    orientation: [f64; 9],
}

impl SeedRow {
    fn new(index: usize, time: f64, particle: &NewParticle) -> Self {
        Self {
            index,
            time,
            type_name: particle.type_name.clone(),
            scale: particle.scale,
            position: particle.position.to_array(),
            velocity: particle.velocity.to_array(),
            angular_velocity: particle.angular_velocity.to_array(),
            orientation: particle.orientation.to_array(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(io::stderr)
        .init();

    let mut out = io::stdout().lock();
    match args.cmd {
        Command::Seed {
            config,
            time_step,
            json,
        } => {
            let rows = run_seed(&config, time_step)?;
            if json {
                for row in &rows {
                    writeln!(out, "{}", serde_json::to_string(row)?)?;
                }
            } else {
                writeln!(out, "{}", seed_table(&rows, args.precision))?;
            }
        }
        Command::Invert { values } => {
            let data: [f64; 9] = values.as_slice().try_into()?;
            let frame = Matrix3x3::from(data);
            let inverse = frame.inverse();
            if inverse.is_invalid() {
                bail!(
                    "frame is singular (determinant {})",
                    frame.determinant()
                );
            }
            writeln!(out, "{inverse:.prec$}", prec = args.precision)?;
        }
        Command::Rotate {
            axis,
            angle,
            vector,
        } => {
            if is_zero(axis.length_squared()) {
                bail!("rotation axis must be non-zero");
            }
            let mut unit = axis;
            let frame = Matrix3x3::from_axis_angle(unit.normalize(), angle);
            writeln!(out, "{:.prec$}", vector * frame, prec = args.precision)?;
        }
    }
    Ok(())
}

/// Drives the factory like a host: each timestep polls until the factory
/// stops asking for more, and the run ends once it has nothing left.
fn run_seed(config: &Path, time_step: f64) -> Result<Vec<SeedRow>> {
    if time_step <= 0.0 {
        bail!("--time-step must be positive");
    }
    let host = HostApi::default();
    let mut factory = SeedFileFactory::new();
    factory
        .setup(&host, config)
        .with_context(|| format!("loading seed deck {}", config.display()))?;
    factory.starting(&host)?;

    let mut rows = Vec::with_capacity(factory.len());
    let mut step: u32 = 0;
    'steps: loop {
        let time = f64::from(step) * time_step;
        loop {
            let Some(particle) = factory.create_particle(time)? else {
                break 'steps;
            };
            rows.push(SeedRow::new(rows.len(), time, &particle));
            if !particle.additional_required {
                break;
            }
        }
        step += 1;
    }
    factory.stopping(&host);
    info!(created = rows.len(), timesteps = step + 1, "seed deck exhausted");
    Ok(rows)
}

fn seed_table(rows: &[SeedRow], precision: usize) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "time", "type", "scale", "position", "velocity"]);
    for row in rows {
        table.add_row(vec![
            row.index.to_string(),
            format!("{:.prec$}", row.time, prec = precision),
            row.type_name.clone(),
            format!("{:.prec$}", row.scale, prec = precision),
            format!("{:.prec$}", Vector3::from(row.position), prec = precision),
            format!("{:.prec$}", Vector3::from(row.velocity), prec = precision),
        ]);
    }
    table
}
