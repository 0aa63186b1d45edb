//! End-to-end tests of the docl10n binary

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn project_json(description: &str) -> Value {
    json!({
        "id": 0,
        "name": "demo",
        "variant": "project",
        "kind": 1,
        "flags": {},
        "children": [{
            "id": 1,
            "name": "Worker",
            "variant": "declaration",
            "kind": 128,
            "flags": {},
            "children": [{
                "id": 2,
                "name": "doThing",
                "variant": "declaration",
                "kind": 2048,
                "flags": {},
                "comment": {
                    "summary": [],
                    "blockTags": [{
                        "tag": "@description",
                        "content": [{ "kind": "text", "text": description }]
                    }]
                }
            }],
            "groups": [{ "title": "Methods", "children": [2] }]
        }],
        "groups": [{ "title": "Workers", "children": [1] }]
    })
}

fn setup(description: &str) -> TempDir {
    let dir = tempdir().unwrap();
    write_json(&dir.path().join("docs.json"), &project_json(description));
    std::fs::write(dir.path().join("README.md"), "# Translating\n").unwrap();
    dir
}

fn write_json(path: &Path, value: &Value) {
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn docl10n(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("docl10n").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("DOCL10N_LANG")
        .env_remove("DOCL10N_MODE")
        .env_remove("DOCL10N_TRANSLATIONS_DIR");
    cmd
}

fn staging_path(dir: &TempDir, lang: &str) -> std::path::PathBuf {
    dir.path()
        .join("translations/staging")
        .join(lang)
        .join("translation.json")
}

/// Fill in every staging entry whose original text matches
fn translate(dir: &TempDir, lang: &str, original: &str, translation: &str) {
    let path = staging_path(dir, lang);
    let mut snapshot = read_json(&path);
    for entry in snapshot.as_object_mut().unwrap().values_mut() {
        if entry["originalText"] == original {
            entry["translation"] = json!(translation);
        }
    }
    write_json(&path, &snapshot);
}

fn description(tree: &Value) -> &Value {
    &tree["children"][0]["children"][0]["comment"]["summary"][0]["text"]
}

#[test]
fn test_help() {
    let dir = tempdir().unwrap();
    docl10n(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("inject"));
}

#[test]
fn test_generate_writes_staging_snapshot() {
    let dir = setup("Do the thing.");

    docl10n(&dir)
        .args(["generate", "docs.json", "--lang", "fr"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries: 2"));

    let snapshot = read_json(&staging_path(&dir, "fr"));
    let entries = snapshot.as_object().unwrap();
    assert_eq!(entries.len(), 2);

    let method = entries
        .values()
        .find(|e| e["originalText"] == "Do the thing.")
        .unwrap();
    assert_eq!(method["kind"], "method");
    assert_eq!(method["translation"], "");

    let readme = dir.path().join("translations/staging/fr/README.md");
    assert_eq!(std::fs::read_to_string(readme).unwrap(), "# Translating\n");

    // Without --output the source tree is left alone.
    let tree = read_json(&dir.path().join("docs.json"));
    assert_eq!(tree, project_json("Do the thing."));
}

#[test]
fn test_generate_then_inject_applies_translation() {
    let dir = setup("Do the thing.");

    docl10n(&dir)
        .args(["generate", "docs.json", "--lang", "fr"])
        .assert()
        .success();
    translate(&dir, "fr", "Do the thing.", "Faire la chose.");

    docl10n(&dir)
        .args(["inject", "docs.json", "--lang", "fr", "--output", "out.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 1 translation(s)"))
        .stdout(predicate::str::contains("No discrepancy found"));

    let tree = read_json(&dir.path().join("out.json"));
    assert_eq!(description(&tree), "Faire la chose.");
    assert!(tree["children"][0]["children"][0]["comment"]
        .get("blockTags")
        .is_none());
}

#[test]
fn test_inject_reports_stale_translation() {
    let dir = setup("Do the thing.");

    docl10n(&dir)
        .args(["generate", "docs.json", "--lang", "fr"])
        .assert()
        .success();
    translate(&dir, "fr", "Do the thing.", "Faire la chose.");
    write_json(&dir.path().join("docs.json"), &project_json("Do the other thing."));

    let output = docl10n(&dir)
        .args(["--format", "json", "inject", "docs.json", "--lang", "fr"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["applied"], 0);
    assert_eq!(report["warnings"].as_array().unwrap().len(), 1);
    assert_eq!(report["warnings"][0]["kind"], "stale");
    assert_eq!(report["warnings"][0]["current"], "Do the other thing.");

    let tree = read_json(&dir.path().join("docs.json"));
    assert_eq!(description(&tree), "Do the other thing.");
}

#[test]
fn test_inject_without_snapshot_fails() {
    let dir = setup("Do the thing.");

    docl10n(&dir)
        .args(["inject", "docs.json", "--lang", "ja"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("translation file not found"));

    assert_eq!(
        read_json(&dir.path().join("docs.json")),
        project_json("Do the thing.")
    );
}

#[test]
fn test_strip_rewrites_in_place() {
    let dir = setup("Do the thing.");

    docl10n(&dir)
        .args(["strip", "docs.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stripped"));

    let tree = read_json(&dir.path().join("docs.json"));
    assert_eq!(description(&tree), "Do the thing.");
    assert!(!dir.path().join("translations").exists());
}

#[test]
fn test_strip_keeps_untouched_fields_verbatim() {
    let dir = tempdir().unwrap();
    let raw = json!({
        "id": 0,
        "name": "demo",
        "variant": "container",
        "kind": 1,
        "children": [{ "id": 1, "kind": 2, "name": "x", "sources": [{ "line": 3 }] }]
    });
    write_json(&dir.path().join("docs.json"), &raw);

    docl10n(&dir)
        .args(["strip", "docs.json"])
        .assert()
        .success();

    assert_eq!(read_json(&dir.path().join("docs.json")), raw);
}

#[test]
fn test_init_writes_settings_file() {
    let dir = tempdir().unwrap();

    docl10n(&dir)
        .args(["init", "--lang", "fr"])
        .assert()
        .success()
        .stdout(predicate::str::contains("docl10n.toml"));

    let settings = std::fs::read_to_string(dir.path().join("docl10n.toml")).unwrap();
    assert!(settings.contains("l10n_code = \"fr\""));

    docl10n(&dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_run_uses_settings_and_mode_fallback() {
    let dir = setup("Do the thing.");
    std::fs::write(
        dir.path().join("docl10n.toml"),
        "l10n_code = \"de\"\ntranslation_mode = \"inject\"\n",
    )
    .unwrap();

    // An unknown mode behaves like generate.
    docl10n(&dir)
        .args(["run", "docs.json", "--mode", "publish"])
        .assert()
        .success();
    assert!(staging_path(&dir, "de").exists());

    translate(&dir, "de", "Workers", "Arbeiter");

    // Without --mode the settings file decides.
    docl10n(&dir)
        .args(["run", "docs.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 1 translation(s)"));

    let tree = read_json(&dir.path().join("docs.json"));
    assert_eq!(tree["groups"][0]["title"], "Arbeiter");
}

#[test]
fn test_status_json() {
    let dir = setup("Do the thing.");

    docl10n(&dir)
        .args(["generate", "docs.json", "--lang", "fr"])
        .assert()
        .success();
    translate(&dir, "fr", "Workers", "Ouvriers");

    let output = docl10n(&dir)
        .args(["status", "--lang", "fr", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["lang"], "fr");
    assert!(report["production"].is_null());
    assert_eq!(report["staging"]["total"], 2);
    assert_eq!(report["staging"]["translated"], 1);
}
