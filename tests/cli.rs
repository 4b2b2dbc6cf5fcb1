use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const ALGAE: &str = "alphabet: [A, B]
axiom: A
iterations: 4
productions:
  - key: A
    successor: AB
  - key: B
    successor: A
";

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn expand_uses_configured_iterations() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "algae.yaml", ALGAE);

    let mut cmd = cargo_bin_cmd!("lsystem");
    cmd.arg("expand").arg(&path);
    cmd.assert().success().stdout("ABAABABA\n");
}

#[test]
fn expand_overrides_iterations() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "algae.yml", ALGAE);

    let mut cmd = cargo_bin_cmd!("lsystem");
    cmd.arg("expand").arg(&path).arg("--iterations").arg("2");
    cmd.assert().success().stdout("ABA\n");
}

#[test]
fn expand_json_definition_with_format() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "branch.json",
        r#"{
            "alphabet": ["F"],
            "axiom": "F(4)",
            "productions": [{ "key": "F(x)", "successor": "F(x/2)+(30)F(x/2)" }]
        }"#,
    );

    let mut cmd = cargo_bin_cmd!("lsystem");
    cmd.arg("expand").arg(&path).arg("--format").arg("parametric");
    cmd.assert().success().stdout("F(2)+(30)F(2)\n");
}

#[test]
fn expand_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "algae.yaml", ALGAE);

    let mut cmd = cargo_bin_cmd!("lsystem");
    cmd.arg("expand").arg(&path).arg("-f").arg("svg");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("format 'svg' not found"));
}

#[test]
fn expand_reports_invalid_definitions() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "broken.yaml",
        "alphabet: [A]\nproductions:\n  - key: B\n    successor: A\n",
    );

    let mut cmd = cargo_bin_cmd!("lsystem");
    cmd.arg("expand").arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid definition"));
}

#[test]
fn expand_reports_missing_files() {
    let mut cmd = cargo_bin_cmd!("lsystem");
    cmd.arg("expand").arg("does-not-exist.yaml");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error loading definition"));
}

#[test]
fn list_formats_shows_builtins() {
    let mut cmd = cargo_bin_cmd!("lsystem");
    cmd.arg("list-formats");
    cmd.assert().success().stdout(
        predicate::str::contains("json")
            .and(predicate::str::contains("parametric"))
            .and(predicate::str::contains("symbols"))
            .and(predicate::str::contains("yaml")),
    );
}
