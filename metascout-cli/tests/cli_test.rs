use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn create_tree(root: &Path) -> Result<()> {
    fs::create_dir_all(root.join("a"))?;
    fs::create_dir_all(root.join("b"))?;
    fs::write(root.join("a").join("x.py"), "0123456789")?;
    fs::write(root.join("a").join("y.txt"), "01234")?;
    fs::write(root.join("b").join("z.py"), "0123456")?;
    Ok(())
}

fn metascout(dir: &Path) -> Result<Command> {
    let mut cmd = Command::cargo_bin("metascout")?;
    // Keep user-level config files out of the test
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .env_remove("RUST_LOG");
    Ok(cmd)
}

#[test]
fn test_prints_count_then_paths() -> Result<()> {
    let dir = tempdir()?;
    let root = dir.path().join("tree");
    create_tree(&root)?;

    let output = metascout(dir.path())?
        .args(["--root", root.to_str().unwrap(), "--pattern", ".py"])
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("2"));
    let mut rest: Vec<&str> = lines.collect();
    rest.sort();
    assert_eq!(rest.len(), 2);
    assert!(rest[0].ends_with("x.py"));
    assert!(rest[1].ends_with("z.py"));

    // Default index location is relative to the working directory
    assert!(dir.path().join("index.bin").exists());
    Ok(())
}

#[test]
fn test_threshold_suppresses_paths() -> Result<()> {
    let dir = tempdir()?;
    let root = dir.path().join("tree");
    create_tree(&root)?;

    metascout(dir.path())?
        .args(["--root", root.to_str().unwrap(), "--pattern", ".py", "--threshold", "2"])
        .assert()
        .success()
        .stdout("2\n");
    Ok(())
}

#[test]
fn test_second_run_uses_persisted_index() -> Result<()> {
    let dir = tempdir()?;
    let root = dir.path().join("tree");
    create_tree(&root)?;
    let index = dir.path().join("idx").join("meta.bin");

    metascout(dir.path())?
        .args(["--root", root.to_str().unwrap(), "--index", index.to_str().unwrap()])
        .assert()
        .success();

    // Files added after indexing stay invisible until a reindex
    fs::write(root.join("late.py"), "")?;
    metascout(dir.path())?
        .args(["--root", root.to_str().unwrap(), "--index", index.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("2\n"));

    metascout(dir.path())?
        .args([
            "--root",
            root.to_str().unwrap(),
            "--index",
            index.to_str().unwrap(),
            "--reindex",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("3\n"));
    Ok(())
}

#[test]
fn test_no_matches() -> Result<()> {
    let dir = tempdir()?;
    let root = dir.path().join("tree");
    create_tree(&root)?;

    metascout(dir.path())?
        .args(["--root", root.to_str().unwrap(), "--pattern", "does-not-exist"])
        .assert()
        .success()
        .stdout("0\n");
    Ok(())
}

#[test]
fn test_missing_root_fails() -> Result<()> {
    let dir = tempdir()?;

    metascout(dir.path())?
        .args(["--root", dir.path().join("missing").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Root directory cannot be traversed"));
    Ok(())
}

#[test]
fn test_config_file_and_print_config() -> Result<()> {
    let dir = tempdir()?;
    let config = dir.path().join("scout.yaml");
    fs::write(&config, "fan_out: 5\npattern: \".rs\"\n")?;

    metascout(dir.path())?
        .args(["--config", config.to_str().unwrap(), "--print-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fan_out: 5"))
        .stdout(predicate::str::contains(".rs"));
    Ok(())
}
