use assert_cmd::prelude::*;
use predicates::prelude::*;
use sha1::{Digest, Sha1};
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn lector(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lector").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path());
    cmd
}

#[test]
fn test_dump_prints_tokens_with_pivot() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("fox.txt");
    fs::write(&file, "the quick\n\nbrown   fox").unwrap();

    lector(&home)
        .arg("--dump")
        .arg(&file)
        .assert()
        .success()
        .stdout("0\tthe\t1\n1\tquick\t2\n2\tbrown\t2\n3\tfox\t1\n");
}

#[test]
fn test_dump_missing_file_fails() {
    let home = TempDir::new().unwrap();
    lector(&home)
        .arg("-d")
        .arg(home.path().join("nope.txt"))
        .assert()
        .failure();
}

#[test]
fn test_history_on_empty_library() {
    let home = TempDir::new().unwrap();
    lector(&home)
        .arg("-r")
        .assert()
        .success()
        .stdout(predicate::str::contains("Library is empty"));
}

#[test]
fn test_delete_unknown_reading_fails() {
    let home = TempDir::new().unwrap();
    lector(&home)
        .args(["--delete", "0123456789abcdef"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No reading with id"));
}

#[test]
fn test_fetch_from_cache_then_history_and_delete() {
    let home = TempDir::new().unwrap();
    let path = "datos/libros/cuento.txt";
    let cache = home.path().join("lector").join("cache");
    fs::create_dir_all(&cache).unwrap();
    let digest = hex::encode(Sha1::digest(path.as_bytes()));
    fs::write(cache.join(format!("{}.txt", digest)), "Había una vez un cuento").unwrap();

    let output = lector(&home).args(["--fetch", path]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("cuento"));
    let id = stdout.split_whitespace().next().unwrap().to_string();

    // A second fetch reuses the same reading
    lector(&home)
        .args(["--fetch", path])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(id.clone()));

    lector(&home)
        .arg("--history")
        .assert()
        .success()
        .stdout(predicate::str::contains("cuento [libros]"))
        .stdout(predicate::str::contains(id.clone()));

    lector(&home)
        .args(["--delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted cuento"));

    lector(&home)
        .arg("-r")
        .assert()
        .success()
        .stdout(predicate::str::contains("Library is empty"));
}

#[test]
fn test_custom_config_file_is_accepted() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("custom.json");
    fs::write(&config, r#"{"Navigation": {"small_step": 10}}"#).unwrap();

    lector(&home)
        .arg("-c")
        .arg(&config)
        .arg("-r")
        .assert()
        .success();
}
