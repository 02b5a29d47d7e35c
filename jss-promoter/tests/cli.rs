use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn promoter() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("jss-promoter"))
}

#[test]
fn transform_strips_ids_and_credentials() {
    promoter()
        .arg("transform")
        .arg(fixture("fixtures/computer.xml"))
        .arg("--resource")
        .arg("computers")
        .assert()
        .success()
        .stdout(predicate::str::contains("<name>mbp-lab-07</name>"))
        .stdout(predicate::str::contains("<room>114</room>"))
        .stdout(predicate::str::contains("<id>42</id>").not())
        .stdout(predicate::str::contains("management_password_md5").not())
        .stdout(predicate::str::contains("<site>").not());
}

#[test]
fn transform_json_outputs_tree() {
    promoter()
        .arg("transform")
        .arg(fixture("fixtures/policy.xml"))
        .arg("--resource")
        .arg("policies")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"tag\": \"policy\""))
        .stdout(predicate::str::contains("\"children\""));
}

#[test]
fn transform_applies_site_manifests() {
    let dir = tempdir().expect("tempdir");
    let manifests = dir.path().join("site.toml");
    fs::write(
        &manifests,
        r#"
[manifest.computers.override]
"location/building" = "Main Office"
"location/phone" = "555-0199"
"#,
    )
    .expect("write manifests");

    promoter()
        .arg("transform")
        .arg(fixture("fixtures/computer.xml"))
        .arg("--resource")
        .arg("computers")
        .arg("--manifests")
        .arg(&manifests)
        .assert()
        .success()
        .stdout(predicate::str::contains("<building>Main Office</building>"))
        .stdout(predicate::str::contains("<phone>555-0199</phone>"))
        .stdout(predicate::str::contains("<id>42</id>").not());
}

#[test]
fn transform_rejects_invalid_manifests() {
    let dir = tempdir().expect("tempdir");
    let manifests = dir.path().join("broken.toml");
    fs::write(&manifests, "[manifest.computers]\nexclude = [\"general//id\"]\n")
        .expect("write manifests");

    promoter()
        .arg("transform")
        .arg(fixture("fixtures/computer.xml"))
        .arg("--resource")
        .arg("computers")
        .arg("--manifests")
        .arg(&manifests)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load manifests"));
}

#[test]
fn transform_rejects_unknown_resource() {
    promoter()
        .arg("transform")
        .arg(fixture("fixtures/computer.xml"))
        .arg("--resource")
        .arg("toasters")
        .assert()
        .failure()
        .stderr(predicate::str::contains("toasters"));
}

#[test]
fn resources_lists_migration_order() {
    let output = promoter()
        .arg("resources")
        .assert()
        .success()
        .stdout(predicate::str::contains("computer_groups"))
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).expect("utf8 output");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 26);
    assert!(lines[0].contains("buildings"));
    assert!(lines[0].ends_with("global only"));
    assert!(text.contains("/computergroups"));

    let scripts = text.find(" scripts ").expect("scripts row");
    let policies = text.find(" policies ").expect("policies row");
    assert!(scripts < policies);
}

#[test]
fn resources_json_marks_manifests() {
    let output = promoter()
        .arg("resources")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let rows: serde_json::Value = serde_json::from_slice(&output).expect("json output");
    let rows = rows.as_array().expect("array of rows");
    assert_eq!(rows.len(), 26);

    let computers = rows
        .iter()
        .find(|row| row["name"] == "computers")
        .expect("computers row");
    assert_eq!(computers["endpoint"], "computers");
    assert_eq!(computers["list_element"], "computer");
    assert_eq!(computers["manifest"], true);
}

#[test]
fn clean_requires_readable_config() {
    promoter()
        .arg("clean")
        .arg("--config")
        .arg("/nonexistent/promoter.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("promoter.toml"));
}
