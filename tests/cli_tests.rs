use assert_cmd::Command;
use predicates::prelude::*;

/// A command with a minimal CI-shaped environment and no inherited
/// variables, so no test here ever reaches the network.
fn signet_cmd() -> Command {
    let mut cmd = Command::cargo_bin("signet").unwrap();
    cmd.env_clear()
        .env("RUST_LOG", "off")
        .env("GITHUB_REPOSITORY", "my-user/my-repo")
        .env("GITHUB_REF", "refs/heads/main");
    cmd
}

#[test]
fn missing_token_is_reported_as_a_run_failure() {
    signet_cmd()
        .arg("--files")
        .arg("a.txt")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "Input required and not supplied: GH_TOKEN",
        ));
}

#[test]
fn malformed_repository_override_is_reported_before_any_request() {
    signet_cmd()
        .env("GH_TOKEN", "test-token")
        .arg("--files")
        .arg("a.txt")
        .arg("--repository")
        .arg("not-a-repository")
        .assert()
        .failure()
        .stdout(predicate::str::contains("owner/name format"));
}

#[test]
fn unsupported_event_ref_is_a_configuration_error() {
    signet_cmd()
        .env("GH_TOKEN", "test-token")
        .env("GITHUB_REF", "refs/notes/commits")
        .arg("--files")
        .arg("a.txt")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Unsupported ref: refs/notes/commits"));
}

#[test]
fn missing_repository_context_is_a_configuration_error() {
    let mut cmd = Command::cargo_bin("signet").unwrap();
    cmd.env_clear()
        .env("RUST_LOG", "off")
        .env("GH_TOKEN", "test-token")
        .arg("--tag")
        .arg("v1.0.0")
        .assert()
        .failure()
        .stdout(predicate::str::contains("GITHUB_REPOSITORY is not set"));
}
