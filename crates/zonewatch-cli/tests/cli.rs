use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn zonewatch(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("zonewatch").unwrap();
    cmd.env("ZONEWATCH_CONFIG", config_dir.path().join("config.toml"))
        .env_remove("ZONEWATCH_API_TOKEN")
        .arg("--no-color");
    cmd
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    zonewatch(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("lookup"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn config_path_honours_override() {
    let dir = TempDir::new().unwrap();
    zonewatch(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_set_then_show_masks_token() {
    let dir = TempDir::new().unwrap();
    zonewatch(&dir)
        .args(["config", "set", "api_token", "abcdefghijklmnop"])
        .assert()
        .success();
    zonewatch(&dir)
        .args(["config", "set", "join_timeout_ms", "750"])
        .assert()
        .success();

    zonewatch(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abcd...mnop"))
        .stdout(predicate::str::contains("abcdefghijklmnop").not())
        .stdout(predicate::str::contains("750"));

    zonewatch(&dir)
        .args(["--output", "json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"api_token\": \"abcd...mnop\""));
}

#[test]
fn unknown_config_key_fails() {
    let dir = TempDir::new().unwrap();
    zonewatch(&dir)
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key: colour"));
}

#[test]
fn domains_requires_token() {
    let dir = TempDir::new().unwrap();
    zonewatch(&dir)
        .arg("domains")
        .assert()
        .failure()
        .stderr(predicate::str::contains("API token required"));
}
