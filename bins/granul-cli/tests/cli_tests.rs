// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn granul() -> Command {
    Command::cargo_bin("granul").unwrap()
}

fn deck(extra: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("centers.csv"), "0,1,2,3\n1,4,5,6\n2,7,8,9\n").unwrap();
    fs::write(dir.path().join("radii.csv"), "0,0.5\n1,0.25\n2,0.125\n").unwrap();
    let pref = dir.path().join("deck.txt");
    fs::write(
        &pref,
        format!("centers = centers.csv\nradii = radii.csv\ntype = Katya\n{extra}"),
    )
    .unwrap();
    (dir, pref)
}

#[test]
fn seed_prints_a_table() {
    let (_dir, pref) = deck("");
    granul()
        .args(["seed", "--config"])
        .arg(&pref)
        .args(["--precision", "2"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Katya")
                .and(predicate::str::contains("(4.00, 5.00, 6.00)"))
                .and(predicate::str::contains("0.25")),
        );
}

#[test]
fn seed_json_lines_follow_timesteps() {
    let (_dir, pref) = deck("per_step = 2\nspeed = 3\n");
    let output = granul()
        .args(["seed", "--json", "--time-step", "0.5", "--config"])
        .arg(&pref)
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: Vec<serde_json::Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["time"], 0.0);
    assert_eq!(rows[1]["time"], 0.0);
    assert_eq!(rows[2]["time"], 0.5);
    assert_eq!(rows[2]["index"], 2);
    assert_eq!(rows[0]["type"], "Katya");
    assert_eq!(rows[1]["position"], serde_json::json!([4.0, 5.0, 6.0]));
    assert_eq!(rows[0]["velocity"], serde_json::json!([0.0, 0.0, 3.0]));
}

#[test]
fn seed_reports_bad_decks() {
    let dir = tempfile::tempdir().unwrap();
    let pref = dir.path().join("deck.txt");
    fs::write(&pref, "centers = nope.csv\nradii = nope.csv\n").unwrap();
    granul()
        .args(["seed", "--config"])
        .arg(&pref)
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading seed deck"));
}

#[test]
fn invert_prints_the_inverse() {
    granul()
        .args(["--precision", "3", "invert", "2", "0", "0", "0", "4", "0", "0", "0", "8"])
        .assert()
        .success()
        .stdout("[0.500, 0.000, 0.000; 0.000, 0.250, 0.000; 0.000, 0.000, 0.125]\n");
}

#[test]
fn invert_rejects_singular_frames() {
    granul()
        .args(["invert", "1", "2", "3", "2", "4", "6", "0", "-1", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("singular"));
}

#[test]
fn invert_needs_nine_values() {
    granul().args(["invert", "1", "2", "3"]).assert().failure();
}

#[test]
fn rotate_quarter_turn_about_z() {
    granul()
        .args([
            "rotate",
            "--axis",
            "0,0,2",
            "--angle",
            "1.5707963267948966",
            "1,0,0",
        ])
        .assert()
        .success()
        .stdout("(0.000000, 1.000000, 0.000000)\n");
}

#[test]
fn rotate_rejects_zero_axis() {
    granul()
        .args(["rotate", "--axis", "0,0,0", "--angle", "1", "1,0,0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-zero"));
}
