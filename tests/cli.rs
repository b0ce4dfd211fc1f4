mod support;

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

use support::serve_once;

const BODY: &str = r#"{"$id":"1","$values":[
  {"$id":"2","id":1,"fileName":"f1.xlsx","bankName":"Bank A","accounts":{"$id":"3","$values":[
    {"id":1,"accountClass":"1","accountNumber":"10","openingActive":100,"openingPassive":0,"debit":0,"credit":0,"closingActive":100,"closingPassive":0}
  ]}},
  {"$id":"4","id":2,"fileName":"f2.xlsx","bankName":"Bank B","accounts":[]}
]}"#;

fn turnover(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("turnover").unwrap();
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    turnover(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("show"));
}

#[test]
fn test_list_files() {
    let home = tempfile::tempdir().unwrap();
    let endpoint = serve_once("200 OK", BODY);
    turnover(home.path())
        .args(["list", "--endpoint", endpoint.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Uploaded files (2)"))
        .stdout(predicate::str::contains("f1.xlsx"))
        .stdout(predicate::str::contains("Bank B"));
}

#[test]
fn test_server_error_degrades_to_empty_list() {
    let home = tempfile::tempdir().unwrap();
    let endpoint = serve_once("500 Internal Server Error", "");
    turnover(home.path())
        .args(["list", "--endpoint", endpoint.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No files loaded."))
        .stderr(predicate::str::contains("Error fetching files"));
}

#[test]
fn test_show_selected_file() {
    let home = tempfile::tempdir().unwrap();
    let endpoint = serve_once("200 OK", BODY);
    turnover(home.path())
        .args(["show", "--file", "1", "--endpoint", endpoint.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Название банка: Bank A"))
        .stdout(predicate::str::contains("\n 1\n"))
        .stdout(predicate::str::contains("100"))
        .stdout(predicate::str::contains("Bank B").not());
}

#[test]
fn test_export_selected_file() {
    let home = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let endpoint = serve_once("200 OK", BODY);
    turnover(home.path())
        .args(["export", "--file", "1", "--endpoint", endpoint.as_str(), "--output-dir"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 sheet(s))"));
    assert!(out.path().join("files_data.xlsx").exists());
}

#[test]
fn test_export_without_selection_writes_nothing() {
    let home = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let endpoint = serve_once("200 OK", BODY);
    turnover(home.path())
        .args(["export", "--endpoint", endpoint.as_str(), "--output-dir"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No files selected"));
    assert!(!out.path().join("files_data.xlsx").exists());
}

#[test]
fn test_config_set_then_show() {
    let home = tempfile::tempdir().unwrap();
    turnover(home.path())
        .args(["config", "set", "--endpoint", "http://files.test/api/files/files"])
        .assert()
        .success()
        .stdout(predicate::str::contains("settings.json"));
    turnover(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://files.test/api/files/files"));
}

#[test]
fn test_config_set_requires_a_field() {
    let home = tempfile::tempdir().unwrap();
    turnover(home.path())
        .args(["config", "set"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to change"));
}
