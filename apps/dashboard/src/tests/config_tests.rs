use std::collections::HashMap;

use super::*;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings_from(&dir.path().join("missing.toml"), env_from(&[]));
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.api_url, "https://randomuser.me/api/");
    assert_eq!(settings.batch_size, 3);
    assert_eq!(settings.min_loading_ms, 3000);
}

#[test]
fn file_values_accept_integers_and_strings() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dashboard.toml");
    fs::write(
        &path,
        r#"
api_url = "http://localhost:9000/api/"
database_url = "./profiles.db"
batch_size = 6
min_loading_ms = "1500"
"#,
    )
    .expect("write settings");

    let settings = load_settings_from(&path, env_from(&[]));
    assert_eq!(settings.api_url, "http://localhost:9000/api/");
    assert_eq!(settings.database_url, "./profiles.db");
    assert_eq!(settings.batch_size, 6);
    assert_eq!(settings.min_loading_ms, 1500);
}

#[test]
fn environment_overrides_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dashboard.toml");
    fs::write(&path, "batch_size = 6\napi_url = \"http://file/api/\"\n").expect("write settings");

    let settings = load_settings_from(
        &path,
        env_from(&[
            ("DASHBOARD_API_URL", "http://legacy/api/"),
            ("APP__API_URL", "http://env/api/"),
            ("APP__BATCH_SIZE", "9"),
            ("APP__MIN_LOADING_MS", "0"),
        ]),
    );
    assert_eq!(settings.api_url, "http://env/api/");
    assert_eq!(settings.batch_size, 9);
    assert_eq!(settings.min_loading_ms, 0);
}

#[test]
fn invalid_values_keep_previous_setting() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dashboard.toml");
    fs::write(&path, "batch_size = 0\n").expect("write settings");

    let settings = load_settings_from(
        &path,
        env_from(&[("APP__BATCH_SIZE", "many"), ("APP__MIN_LOADING_MS", "-1")]),
    );
    assert_eq!(settings.batch_size, DEFAULT_BATCH_SIZE);
    assert_eq!(settings.min_loading_ms, 3000);
}

#[test]
fn unparseable_file_is_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dashboard.toml");
    fs::write(&path, "this is = = not toml").expect("write settings");

    let settings = load_settings_from(&path, env_from(&[]));
    assert_eq!(settings, Settings::default());
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
    assert_eq!(
        normalize_database_url("sqlite:C:\\Users\\alice\\test.db"),
        "sqlite://C:/Users/alice/test.db"
    );
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(
        normalize_database_url("  "),
        Settings::default().database_url
    );
}
