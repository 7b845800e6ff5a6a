use dhadak_api::{
    AppConfig,
    config::{ConfigError, Env, LOCAL_JWT_SECRET},
};
use serial_test::serial;
use std::{env, panic};

const ALL_VARS: [&str; 6] = [
    "APP_ENV",
    "DATABASE_URL",
    "DB_NAME",
    "JWT_SECRET",
    "CORS_ORIGINS",
    "BIND_ADDR",
];

// --- Setup/Teardown Utilities ---

/// Runs `test` with exactly the given variables set (all others of ALL_VARS removed),
/// then restores the previous environment.
fn run_with_env<T, R>(vars: &[(&str, &str)], test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> =
        ALL_VARS.iter().map(|&var| (var, env::var(var).ok())).collect();

    unsafe {
        for var in ALL_VARS {
            env::remove_var(var);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
    }

    let result = panic::catch_unwind(test);

    unsafe {
        for (key, original_value) in originals {
            match original_value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_missing_database_url_aborts_startup() {
    let result = run_with_env(&[("DB_NAME", "dhadak")], || {
        panic::catch_unwind(AppConfig::load)
    });

    assert!(result.is_err(), "load() must panic without DATABASE_URL");
}

#[test]
#[serial]
fn test_missing_db_name_is_reported() {
    let result = run_with_env(&[("DATABASE_URL", "postgres://u:p@localhost:5432")], || {
        AppConfig::try_load()
    });

    assert_eq!(result.unwrap_err(), ConfigError::Missing("DB_NAME"));
}

#[test]
#[serial]
fn test_production_requires_jwt_secret() {
    let result = run_with_env(
        &[
            ("APP_ENV", "production"),
            ("DATABASE_URL", "postgres://u:p@db:5432"),
            ("DB_NAME", "dhadak"),
        ],
        AppConfig::try_load,
    );

    assert_eq!(result.unwrap_err(), ConfigError::Missing("JWT_SECRET"));
}

#[test]
#[serial]
fn test_local_defaults() {
    let config = run_with_env(
        &[
            ("DATABASE_URL", "postgres://u:p@localhost:5432"),
            ("DB_NAME", "dhadak"),
        ],
        AppConfig::load,
    );

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.jwt_secret, LOCAL_JWT_SECRET);
    assert_eq!(config.cors_origins, vec!["*".to_string()]);
    assert!(config.allows_any_origin());
    assert_eq!(config.bind_addr, "0.0.0.0:8001");
}

#[test]
#[serial]
fn test_production_reads_every_variable() {
    let config = run_with_env(
        &[
            ("APP_ENV", "production"),
            ("DATABASE_URL", "postgres://u:p@db:5432"),
            ("DB_NAME", "dhadak"),
            ("JWT_SECRET", "prod-secret"),
            ("CORS_ORIGINS", "https://dhadak.example,https://admin.dhadak.example"),
            ("BIND_ADDR", "0.0.0.0:9000"),
        ],
        AppConfig::load,
    );

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.database_url, "postgres://u:p@db:5432");
    assert_eq!(config.db_name, "dhadak");
    assert_eq!(config.jwt_secret, "prod-secret");
    assert_eq!(config.cors_origins.len(), 2);
    assert!(!config.allows_any_origin());
    assert_eq!(config.bind_addr, "0.0.0.0:9000");
}
