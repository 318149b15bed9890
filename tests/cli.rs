use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn dialbook(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dialbook").unwrap();
    cmd.env("DIALBOOK_CONFIG_DIR", config_dir.path())
        .env_remove("DIALBOOK_BASE_URL")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_lists_both_resources() {
    let dir = TempDir::new().unwrap();
    dialbook(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("country").and(predicate::str::contains("prefix")));
}

#[test]
fn demo_country_list() {
    let dir = TempDir::new().unwrap();
    dialbook(&dir)
        .args(["--demo", "country", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Russia").and(predicate::str::contains("+49")));
}

#[test]
fn demo_prefix_list_shows_country_names() {
    let dir = TempDir::new().unwrap();
    dialbook(&dir)
        .args(["--demo", "prefix", "list"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("495")
                .and(predicate::str::contains("Russia"))
                .and(predicate::str::contains("United States")),
        );
}

#[test]
fn incomplete_create_fails_validation() {
    let dir = TempDir::new().unwrap();
    dialbook(&dir)
        .args(["--demo", "country", "create", "--code", "IT"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn create_reports_the_new_country() {
    let dir = TempDir::new().unwrap();
    dialbook(&dir)
        .args([
            "--demo",
            "country",
            "create",
            "--code",
            "IT",
            "--name",
            "Italy",
            "--phone-code",
            "+39",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created country IT"));
}

#[test]
fn update_of_unknown_country_fails() {
    let dir = TempDir::new().unwrap();
    dialbook(&dir)
        .args(["--demo", "country", "update", "ZZ", "--name", "Nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn prefix_search_by_code_narrows_the_list() {
    let dir = TempDir::new().unwrap();
    dialbook(&dir)
        .args(["--demo", "prefix", "search", "--code", "RU"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("812")
                .and(predicate::str::contains("212").not()),
        );
}

#[test]
fn delete_with_yes_skips_the_prompt() {
    let dir = TempDir::new().unwrap();
    dialbook(&dir)
        .args(["--demo", "country", "delete", "FR", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted country FR"));
}

#[test]
fn declined_delete_keeps_the_record() {
    let dir = TempDir::new().unwrap();
    dialbook(&dir)
        .args(["--demo", "prefix", "delete", "3"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Kept prefix 3"));
}

#[test]
fn config_round_trip() {
    let dir = TempDir::new().unwrap();
    dialbook(&dir)
        .args(["config", "base-url", "http://api.local:9000"])
        .assert()
        .success();

    dialbook(&dir)
        .args(["config", "base-url"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://api.local:9000"));
}

#[test]
fn config_works_even_with_a_bad_env_url() {
    let dir = TempDir::new().unwrap();
    dialbook(&dir)
        .env("DIALBOOK_BASE_URL", "not a url")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("submit-timeout"));
}

#[test]
fn unreachable_service_is_reported_not_fatal() {
    let dir = TempDir::new().unwrap();
    dialbook(&dir)
        .args(["--base-url", "http://127.0.0.1:1", "country", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Could not load countries"))
        .stdout(predicate::str::contains("unavailable"));
}

#[test]
fn bad_base_url_flag_is_rejected() {
    let dir = TempDir::new().unwrap();
    dialbook(&dir)
        .args(["--base-url", "nope", "country", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid base URL"));
}
