use assert_cmd::Command;
use predicates::prelude::*;

fn fsfreeze() -> Command {
    Command::cargo_bin("fsfreeze").unwrap()
}

#[test]
fn shows_help() {
    fsfreeze()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--auto-unfreeze"));
}

#[test]
fn shows_version() {
    fsfreeze()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unfreeze_conflicts_with_auto_unfreeze() {
    let dir = tempfile::tempdir().unwrap();
    fsfreeze()
        .args(["-u", "-U", "2"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn freeze_conflicts_with_unfreeze() {
    let dir = tempfile::tempdir().unwrap();
    fsfreeze()
        .args(["-f", "-u"])
        .arg(dir.path())
        .assert()
        .failure();
}

#[test]
fn zero_timeout_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fsfreeze()
        .args(["-U", "0"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout cannot be zero"));
}

#[test]
fn malformed_timeout_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fsfreeze()
        .args(["--auto-unfreeze", "soon"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid timeout value"));
}

#[test]
fn mode_is_required() {
    let dir = tempfile::tempdir().unwrap();
    fsfreeze().arg(dir.path()).assert().failure();
}

#[test]
fn mountpoint_is_required() {
    fsfreeze().arg("-f").assert().failure();
}

#[test]
fn extra_arguments_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fsfreeze()
        .arg("-f")
        .arg(dir.path())
        .arg(dir.path())
        .assert()
        .failure();
}

#[test]
fn regular_file_is_not_a_directory() {
    let file = tempfile::NamedTempFile::new().unwrap();
    fsfreeze()
        .arg("-f")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}

#[test]
fn missing_mountpoint_fails() {
    let dir = tempfile::tempdir().unwrap();
    fsfreeze()
        .arg("-u")
        .arg(dir.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no such file or directory"));
}
