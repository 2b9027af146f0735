//! Configuration resolution and graceful degradation
//!
//! Tests cover:
//! - Missing TOML file falls back to compiled defaults
//! - CLI argument beats MLIB_CONFIG
//! - POSTGRES_* / DATABASE_URL overrides
//! - Broken TOML is reported, not ignored
//!
//! Tests that touch process environment are marked #[serial].

use mlib_common::config::{
    load_config, resolve_config_path, ConfigSource, DatabaseConfig, Environment, CONFIG_PATH_ENV,
};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

fn write_temp_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Should create temp file");
    file.write_all(content.as_bytes()).expect("Should write config");
    file
}

#[test]
fn test_missing_file_uses_defaults() {
    let path = PathBuf::from(format!("/tmp/mlib-missing-{}.toml", std::process::id()));
    let (config, source) = load_config(Some(&path)).expect("Missing file must not fail");

    assert_eq!(source, ConfigSource::Defaults);
    assert_eq!(config.env, Environment::Local);
    assert_eq!(config.http_server.port, 8080);
    assert_eq!(config.database.port, 5432);
    assert!(config.logging.level.is_none());
}

#[test]
fn test_no_path_uses_defaults() {
    let (_, source) = load_config(None).unwrap();
    assert_eq!(source, ConfigSource::Defaults);
}

#[test]
fn test_full_file_is_parsed() {
    let file = write_temp_config(
        r#"
        env = "prod"

        [database]
        host = "db"
        port = 5433
        user = "library"
        name = "songs"
        attempts = 3
        retry_delay_ms = 250

        [http_server]
        port = 9090
        request_timeout_ms = 4000

        [song_info]
        protocol = "https"
        host = "info"
        port = 8443

        [logging]
        level = "warn"
        "#,
    );

    let (config, source) = load_config(Some(file.path())).unwrap();

    assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
    assert_eq!(config.env, Environment::Prod);
    assert_eq!(config.database.host, "db");
    assert_eq!(config.database.port, 5433);
    assert_eq!(config.database.attempts, 3);
    // Unset keys keep their defaults
    assert_eq!(config.database.max_connections, 10);
    assert_eq!(config.http_server.bind_addr(), "0.0.0.0:9090");
    assert_eq!(config.song_info.info_url(), "https://info:8443/info");
    assert_eq!(config.logging.level.as_deref(), Some("warn"));
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = write_temp_config("[http_server]\nport = 7000\n");
    let (config, _) = load_config(Some(file.path())).unwrap();

    assert_eq!(config.http_server.port, 7000);
    assert_eq!(config.http_server.request_timeout_ms, 10_000);
    assert_eq!(config.song_info.port, 8081);
}

#[test]
fn test_broken_file_is_error() {
    let file = write_temp_config("env = \"prod\"\n[database\nport = ");
    let err = load_config(Some(file.path())).unwrap_err();
    assert!(matches!(err, mlib_common::Error::Config(_)));
}

#[test]
fn test_unknown_env_is_error() {
    let file = write_temp_config("env = \"staging\"\n");
    assert!(load_config(Some(file.path())).is_err());
}

#[test]
#[serial]
fn test_cli_path_beats_env_var() {
    env::set_var(CONFIG_PATH_ENV, "/tmp/from-env.toml");

    let resolved = resolve_config_path(Some(Path::new("/tmp/from-cli.toml")));
    assert_eq!(resolved, Some(PathBuf::from("/tmp/from-cli.toml")));

    let resolved = resolve_config_path(None);
    assert_eq!(resolved, Some(PathBuf::from("/tmp/from-env.toml")));

    env::remove_var(CONFIG_PATH_ENV);
}

#[test]
#[serial]
fn test_postgres_env_overrides() {
    env::remove_var("DATABASE_URL");
    env::set_var("POSTGRES_HOST", "pg.internal");
    env::set_var("POSTGRES_PORT", "6000");
    env::set_var("POSTGRES_USER", "svc");
    env::set_var("POSTGRES_PASSWORD", "pw");
    env::set_var("POSTGRES_DB", "catalog");

    let mut config = DatabaseConfig::default();
    config.apply_env_overrides().unwrap();

    assert!(config.url.is_none());
    assert_eq!(config.host, "pg.internal");
    assert_eq!(config.port, 6000);
    assert_eq!(config.user, "svc");
    assert_eq!(config.password, "pw");
    assert_eq!(config.name, "catalog");

    let vars = [
        "POSTGRES_HOST",
        "POSTGRES_PORT",
        "POSTGRES_USER",
        "POSTGRES_PASSWORD",
        "POSTGRES_DB",
    ];
    for var in vars {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_invalid_postgres_port_is_error() {
    env::set_var("POSTGRES_PORT", "fifty");

    let mut config = DatabaseConfig::default();
    assert!(config.apply_env_overrides().is_err());

    env::remove_var("POSTGRES_PORT");
}

#[test]
#[serial]
fn test_database_url_override() {
    env::set_var("DATABASE_URL", "postgres://u:p@h:5432/db");

    let mut config = DatabaseConfig::default();
    config.apply_env_overrides().unwrap();
    assert_eq!(config.url.as_deref(), Some("postgres://u:p@h:5432/db"));

    env::remove_var("DATABASE_URL");
}
