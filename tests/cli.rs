use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "compiled").unwrap();
}

fn setup_test_directory() -> TempDir {
    let dir = tempdir().unwrap();

    fs::write(dir.path().join(".jskillignore"), "node_modules/\nkeep.js # hand-written\n").unwrap();

    touch(dir.path(), "app.js");
    touch(dir.path(), "keep.js");
    touch(dir.path(), "README.md");
    touch(dir.path(), "lib/util.js");
    touch(dir.path(), "dist/out/bundle.js");
    touch(dir.path(), "node_modules/dep/index.js");

    dir
}

fn jskill(project: &Path, cache: &Path) -> Command {
    let mut cmd = Command::cargo_bin("jskill").unwrap();
    cmd.arg("-C")
        .arg(project)
        .env("JSKILL_CACHE_DIR", cache)
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_missing_ignore_file_fails() {
    let dir = tempdir().unwrap();
    let cache = tempdir().unwrap();
    touch(dir.path(), "app.js");

    jskill(dir.path(), cache.path())
        .arg("--yes")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ignore file not found"));

    assert!(dir.path().join("app.js").exists());
}

#[test]
fn test_no_ignore_does_not_need_ignore_file() {
    let dir = tempdir().unwrap();
    let cache = tempdir().unwrap();
    touch(dir.path(), "app.js");

    jskill(dir.path(), cache.path())
        .args(["--no-ignore", "--dry-run", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would remove: app.js"));
}

#[test]
fn test_init_creates_and_protects_ignore_file() {
    let dir = tempdir().unwrap();
    let cache = tempdir().unwrap();

    jskill(dir.path(), cache.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));
    assert!(dir.path().join(".jskillignore").exists());

    fs::write(dir.path().join(".jskillignore"), "custom/\n").unwrap();
    jskill(dir.path(), cache.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(
        fs::read_to_string(dir.path().join(".jskillignore")).unwrap(),
        "custom/\n"
    );

    jskill(dir.path(), cache.path())
        .args(["init", "--force"])
        .assert()
        .success();
    assert!(fs::read_to_string(dir.path().join(".jskillignore"))
        .unwrap()
        .contains("node_modules/"));
}

#[test]
fn test_dry_run_lists_tree_and_keeps_files() {
    let dir = setup_test_directory();
    let cache = tempdir().unwrap();

    jskill(dir.path(), cache.path())
        .args(["--dry-run", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bundle.js"))
        .stdout(predicate::str::contains("Would remove: app.js"))
        .stdout(predicate::str::contains("Would remove directory: dist/"))
        .stdout(predicate::str::contains("Dry run mode"))
        .stdout(predicate::str::contains("keep.js").not())
        .stdout(predicate::str::contains("node_modules").not());

    assert!(dir.path().join("app.js").exists());
    assert!(dir.path().join("dist/out/bundle.js").exists());
}

#[test]
fn test_yes_purges_files_and_emptied_directories() {
    let dir = setup_test_directory();
    let cache = tempdir().unwrap();

    jskill(dir.path(), cache.path())
        .arg("--yes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed directory: dist/"))
        .stdout(predicate::str::contains("Removed directory: lib/"))
        .stdout(predicate::str::contains("Removed 3 of 3 selected file(s)"))
        .stdout(predicate::str::contains("Total Size Removed"));

    assert!(!dir.path().join("app.js").exists());
    assert!(!dir.path().join("lib").exists());
    assert!(!dir.path().join("dist").exists());
    assert!(dir.path().join("keep.js").exists());
    assert!(dir.path().join("README.md").exists());
    assert!(dir.path().join("node_modules/dep/index.js").exists());
}

#[test]
fn test_all_flag_offers_every_extension() {
    let dir = tempdir().unwrap();
    let cache = tempdir().unwrap();
    fs::write(dir.path().join(".jskillignore"), "").unwrap();
    touch(dir.path(), "out.map");

    jskill(dir.path(), cache.path())
        .args(["--dry-run", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No compiled files found."));

    jskill(dir.path(), cache.path())
        .args(["--all", "--dry-run", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would remove: out.map"));
}

#[test]
fn test_cache_is_written_to_cache_dir() {
    let dir = setup_test_directory();
    let cache = tempdir().unwrap();

    jskill(dir.path(), cache.path())
        .args(["--dry-run", "--yes"])
        .assert()
        .success();

    let raw = fs::read_to_string(cache.path().join(".jskillignore")).unwrap();
    assert_eq!(raw, "node_modules/\nkeep.js # hand-written\n");
    assert!(cache.path().join(".jskillignore.json").exists());

    jskill(dir.path(), cache.path())
        .args(["--dry-run", "--yes", "--no-cache"])
        .assert()
        .success();
}
