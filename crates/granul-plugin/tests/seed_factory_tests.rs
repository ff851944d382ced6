// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use std::fs;
use std::path::{Path, PathBuf};

use granul_math::{Matrix3x3, Point3, Vector3};
use granul_plugin::{
    ApiVersion, FactoryError, HostApi, ParticleFactory, ParticleOut, SeedFileFactory,
};
use tempfile::TempDir;

const CENTERS: &str = "0,0.0,0.0,1.0\n1,0.5,-0.5,2.0\n\n2,1e-3,2e-3,3e-3\n";
const RADII: &str = "0,0.01\n1,0.02\n2,0.03\n";

fn deck(prefs: &str, centers: &str, radii: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("centers.csv"), centers).unwrap();
    fs::write(dir.path().join("radii.csv"), radii).unwrap();
    let pref = dir.path().join("seed.txt");
    fs::write(&pref, prefs).unwrap();
    (dir, pref)
}

fn host() -> HostApi {
    HostApi::new(ApiVersion::new(2, 0))
}

fn ready(prefs: &str) -> (TempDir, SeedFileFactory) {
    let (dir, pref) = deck(prefs, CENTERS, RADII);
    let mut factory = SeedFileFactory::new();
    factory.setup(&host(), &pref).unwrap();
    (dir, factory)
}

#[test]
fn yields_seeds_in_order_then_none() {
    let (_dir, mut factory) = ready("centers = centers.csv\nradii = radii.csv\ntype = grain\n");
    assert_eq!(factory.len(), 3);

    let mut created = Vec::new();
    let mut time = 0.0;
    while let Some(p) = factory.create_particle(time).unwrap() {
        created.push(p);
        time += 1e-4;
    }
    assert_eq!(created.len(), 3);
    assert_eq!(created[0].position, Point3::new(0.0, 0.0, 1.0));
    assert_eq!(created[1].position, Point3::new(0.5, -0.5, 2.0));
    assert_eq!(created[2].scale, 0.03);
    assert!(created.iter().all(|p| p.type_name == "grain"));
    assert!(created.iter().all(|p| p.angular_velocity == Vector3::ZERO));
    assert!(created.iter().all(|p| p.orientation == Matrix3x3::IDENTITY));

    assert!(factory.create_particle(time).unwrap().is_none());
    assert!(factory.create_particle(time + 1.0).unwrap().is_none());
    assert_eq!(factory.remaining(), 0);
}

#[test]
fn one_particle_per_timestep_by_default() {
    let (_dir, mut factory) = ready("centers=centers.csv\nradii=radii.csv\n");
    let first = factory.create_particle(0.0).unwrap().unwrap();
    assert!(!first.additional_required);
    assert_eq!(first.type_name, "particle");
}

#[test]
fn per_step_batches_within_a_timestep() {
    let (_dir, mut factory) = ready("centers=centers.csv\nradii=radii.csv\nper_step=2\n");
    let a = factory.create_particle(0.0).unwrap().unwrap();
    let b = factory.create_particle(0.0).unwrap().unwrap();
    assert!(a.additional_required);
    assert!(!b.additional_required);
    // Last seed: nothing further to ask for.
    let c = factory.create_particle(0.1).unwrap().unwrap();
    assert!(!c.additional_required);
}

#[test]
fn speed_follows_orientation() {
    // 90 degrees about +X carries +Z onto -Y under v * M.
    let (_dir, mut factory) = ready(
        "centers=centers.csv\nradii=radii.csv\nspeed=2\naxis_x=3\naxis_y=0\naxis_z=0\nangle=1.5707963267948966\n",
    );
    let p = factory.create_particle(0.0).unwrap().unwrap();
    assert!((p.velocity - Vector3::new(0.0, -2.0, 0.0)).length() < 1e-12);
    assert_eq!(
        p.orientation,
        Matrix3x3::from_axis_angle(Vector3::UNIT_X, std::f64::consts::FRAC_PI_2)
    );
}

#[test]
fn starting_rewinds_and_preference_file_is_reported() {
    let (dir, mut factory) = ready("centers=centers.csv\nradii=radii.csv\n");
    assert_eq!(
        factory.preference_file_name(),
        Some(dir.path().join("seed.txt").as_path())
    );
    while factory.create_particle(0.0).unwrap().is_some() {}
    factory.stopping(&host());
    factory.starting(&host()).unwrap();
    assert_eq!(factory.remaining(), 3);
}

#[test]
fn absolute_csv_paths_are_used_as_is() {
    let data = tempfile::tempdir().unwrap();
    let centers = data.path().join("c.csv");
    let radii = data.path().join("r.csv");
    fs::write(&centers, "7,1,2,3\n").unwrap();
    fs::write(&radii, "7,0.5\n").unwrap();
    let prefs = format!("centers={}\nradii={}\n", centers.display(), radii.display());
    let (_dir, pref) = deck(&prefs, "", "");

    let mut factory = SeedFileFactory::new();
    factory.setup(&host(), &pref).unwrap();
    assert_eq!(factory.len(), 1);
}

#[test]
fn count_mismatch_fails_setup() {
    let (_dir, pref) = deck(
        "centers=centers.csv\nradii=radii.csv\n",
        CENTERS,
        "0,0.01\n1,0.02\n",
    );
    let mut factory = SeedFileFactory::new();
    let err = factory.setup(&host(), &pref).unwrap_err();
    assert!(matches!(
        err,
        FactoryError::CountMismatch {
            centers: 3,
            radii: 2
        }
    ));
    assert!(matches!(
        factory.create_particle(0.0),
        Err(FactoryError::NotSetUp)
    ));
    assert!(factory.preference_file_name().is_none());
}

#[test]
fn setup_errors_are_specific() {
    let mut factory = SeedFileFactory::new();

    let (_d1, pref) = deck("radii=radii.csv\n", CENTERS, RADII);
    assert!(matches!(
        factory.setup(&host(), &pref),
        Err(FactoryError::Config(_))
    ));

    let (_d2, pref) = deck("centers=missing.csv\nradii=radii.csv\n", CENTERS, RADII);
    assert!(matches!(
        factory.setup(&host(), &pref),
        Err(FactoryError::Io { .. })
    ));

    let (_d3, pref) = deck("centers=centers.csv\nradii=radii.csv\n", "0,1,2\n", RADII);
    assert!(matches!(
        factory.setup(&host(), &pref),
        Err(FactoryError::Seed { line: 1, .. })
    ));

    let long = "t".repeat(300);
    let (_d4, pref) = deck(
        &format!("centers=centers.csv\nradii=radii.csv\ntype={long}\n"),
        CENTERS,
        RADII,
    );
    assert!(matches!(
        factory.setup(&host(), &pref),
        Err(FactoryError::TypeNameTooLong { len: 300, .. })
    ));

    assert!(matches!(
        factory.setup(&host(), Path::new("/definitely/not/here.txt")),
        Err(FactoryError::Config(_))
    ));
}

#[test]
fn particles_write_into_host_buffers() {
    let (_dir, mut factory) = ready("centers=centers.csv\nradii=radii.csv\ntype=Katya\n");
    let mut out = ParticleOut::default();
    factory
        .create_particle(0.0)
        .unwrap()
        .unwrap()
        .write_to(&mut out)
        .unwrap();
    assert_eq!(out.type_name_str(), Some("Katya"));
    assert_eq!(out.position, [0.0, 0.0, 1.0]);
    assert_eq!(out.scale, 0.01);
}

#[test]
fn unusable_settings_are_typed_errors() {
    let mut factory = SeedFileFactory::new();

    let (_d1, pref) = deck("centers=centers.csv\nradii=radii.csv\nper_step=0\n", CENTERS, RADII);
    assert!(matches!(
        factory.setup(&host(), &pref),
        Err(FactoryError::InvalidSetting { key: "per_step", .. })
    ));

    let (_d2, pref) = deck("centers=centers.csv\nradii=radii.csv\nangle=0.5\n", CENTERS, RADII);
    assert!(matches!(
        factory.setup(&host(), &pref),
        Err(FactoryError::InvalidSetting { key: "axis", .. })
    ));
}

#[test]
fn setup_refuses_hosts_older_than_the_minimum() {
    let (_dir, pref) = deck("centers=centers.csv\nradii=radii.csv\n", CENTERS, RADII);
    let mut factory = SeedFileFactory::new();
    let old_host = HostApi::new(ApiVersion::new(0, 9));

    match factory.setup(&old_host, &pref) {
        Err(FactoryError::UnsupportedHost { found, required }) => {
            assert_eq!(found, ApiVersion::new(0, 9));
            assert_eq!(required, SeedFileFactory::MIN_HOST_API);
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert!(matches!(
        factory.create_particle(0.0),
        Err(FactoryError::NotSetUp)
    ));

    factory
        .setup(&HostApi::new(SeedFileFactory::MIN_HOST_API), &pref)
        .unwrap();
    assert_eq!(factory.len(), 3);
}
