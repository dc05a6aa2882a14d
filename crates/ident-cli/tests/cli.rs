//! Tests that drive the `ident` binary.

use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;

const ENV_VARS: &[&str] = &[
    "OS_AUTH_URL",
    "OS_TOKEN",
    "OS_USERNAME",
    "OS_PASSWORD",
    "OS_USER_DOMAIN_NAME",
    "OS_PROJECT_NAME",
    "OS_PROJECT_DOMAIN_NAME",
    "IDENT_CONFIG",
    "RUST_LOG",
];

/// The binary with a clean environment and no reachable default config.
fn ident(config_home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ident").expect("binary built");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("HOME", config_home.path())
        .env("XDG_CONFIG_HOME", config_home.path());
    cmd
}

#[test]
fn help_lists_resources() {
    let home = tempfile::tempdir().expect("temp dir");
    ident(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sid").and(predicate::str::contains("sip")));
}

#[test]
fn enable_and_disable_conflict() {
    let home = tempfile::tempdir().expect("temp dir");
    ident(&home)
        .args(["sid", "create", "blue", "--enable", "--disable"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn malformed_property_is_argument_error() {
    let home = tempfile::tempdir().expect("temp dir");
    ident(&home)
        .args(["sip", "create", "web", "--property", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}

#[test]
fn missing_settings_reported() {
    let home = tempfile::tempdir().expect("temp dir");
    ident(&home)
        .args(["sid", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: configuration error"))
        .stderr(predicate::str::contains("--os-auth-url"));
}

#[test]
fn noop_set_needs_no_settings() {
    let home = tempfile::tempdir().expect("temp dir");
    ident(&home)
        .args(["sid", "set", "blue"])
        .assert()
        .success()
        .stdout("Sid not updated, no arguments present\n");

    ident(&home)
        .args(["sip", "set", "web"])
        .assert()
        .success()
        .stdout("Sip not updated, no arguments present\n");
}

#[test]
fn sid_list_against_service() {
    let home = tempfile::tempdir().expect("temp dir");
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v3/sids")
        .match_header("x-auth-token", "secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"sids": [
                {"id": "s1", "name": "blue", "description": "Blue team", "enabled": true,
                 "links": {"self": "http://x/v3/sids/s1"}},
                {"id": "s2", "name": "red", "description": null, "enabled": false}
            ]}"#,
        )
        .create();

    ident(&home)
        .args(["sid", "list", "--os-auth-url"])
        .arg(format!("{}/v3", server.url()))
        .args(["--os-token", "secret"])
        .assert()
        .success()
        .stdout(
            "+----+------+---------+-------------+\n\
             | ID | Name | Enabled | Description |\n\
             +----+------+---------+-------------+\n\
             | s1 | blue | True    | Blue team   |\n\
             | s2 | red  | False   | None        |\n\
             +----+------+---------+-------------+\n",
        );

    mock.assert();
}

#[test]
fn sip_show_by_name_from_config_file() {
    let home = tempfile::tempdir().expect("temp dir");
    let mut server = mockito::Server::new();
    let by_id = server
        .mock("GET", "/v3/sips/web")
        .with_status(404)
        .with_body(r#"{"error": {"code": 404, "title": "Not Found", "message": "no such sip"}}"#)
        .create();
    let by_name = server
        .mock("GET", "/v3/sips")
        .match_query(Matcher::UrlEncoded("name".into(), "web".into()))
        .with_status(200)
        .with_body(r#"{"sips": [{"id": "p1", "name": "web", "sid_id": "s1", "tier": "gold"}]}"#)
        .create();

    let config = home.path().join("ident.toml");
    std::fs::write(
        &config,
        format!(
            "auth_url = \"{}/v3\"\n\n[auth]\ntoken = \"from-file\"\n",
            server.url()
        ),
    )
    .expect("write config");

    ident(&home)
        .args(["sip", "show", "web", "-f", "json", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""tier": "gold""#))
        .stdout(predicate::str::contains(r#""sid_id": "s1""#));

    by_id.assert();
    by_name.assert();
}

#[test]
fn service_error_is_reported() {
    let home = tempfile::tempdir().expect("temp dir");
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/v3/sids")
        .with_status(409)
        .with_body(r#"{"error": {"code": 409, "title": "Conflict", "message": "Duplicate entry"}}"#)
        .create();

    ident(&home)
        .args(["sid", "create", "blue", "--os-token", "t", "--os-auth-url"])
        .arg(format!("{}/v3", server.url()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: identity service error (409): Duplicate entry"));
}
