use assert_cmd::Command;
use predicates::prelude::*;

fn xshape() -> Command {
    match Command::cargo_bin("xshape") {
        Ok(cmd) => cmd,
        Err(err) => panic!("binary must build: {err}"),
    }
}

#[test]
fn emits_object_from_stdin() {
    xshape()
        .write_stdin("<address><street>Milchstrasse</street></address>")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"street\":\"Milchstrasse\""));
}

#[test]
fn emits_schema_from_stdin() {
    xshape()
        .args(["--emit", "schema"])
        .write_stdin("<r><image>a</image><image>b</image></r>")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"multiplicity\":\"many\""));
}

#[test]
fn reads_file_and_writes_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("doc.xml");
    let output = dir.path().join("out.json");
    std::fs::write(&input, "<a><b>c</b></a>")?;

    xshape()
        .arg(&input)
        .args(["--output"])
        .arg(&output)
        .assert()
        .success();

    let rendered = std::fs::read_to_string(&output)?;
    assert!(rendered.contains("\"b\":\"c\""));
    Ok(())
}

#[test]
fn malformed_document_fails() {
    xshape()
        .write_stdin("<a><b></a>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("mismatched closing tag"));
}

#[test]
fn empty_stdin_fails() {
    xshape().write_stdin("").assert().failure();
}
