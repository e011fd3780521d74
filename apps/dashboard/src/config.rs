use std::{collections::HashMap, fs, path::Path};

use client_core::{DEFAULT_API_URL, DEFAULT_BATCH_SIZE, DEFAULT_MIN_DISPLAY};
use serde::Deserialize;
use tracing::warn;

pub const SETTINGS_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub api_url: String,
    pub database_url: String,
    pub batch_size: usize,
    pub min_loading_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            database_url: "sqlite://./data/dashboard.db".into(),
            batch_size: DEFAULT_BATCH_SIZE,
            min_loading_ms: DEFAULT_MIN_DISPLAY.as_millis() as u64,
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file, then environment variables.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => apply_file_settings(&mut settings, &file_cfg),
            Err(err) => warn!(path = %path.display(), error = %err, "ignoring unreadable settings file"),
        }
    }

    for key in ["DASHBOARD_API_URL", "APP__API_URL"] {
        if let Some(v) = env(key) {
            settings.api_url = v;
        }
    }

    for key in ["DATABASE_URL", "APP__DATABASE_URL"] {
        if let Some(v) = env(key) {
            settings.database_url = v;
        }
    }

    if let Some(v) = env("APP__BATCH_SIZE") {
        match v.parse::<usize>() {
            Ok(parsed) if parsed > 0 => settings.batch_size = parsed,
            _ => warn!(value = %v, "ignoring invalid APP__BATCH_SIZE"),
        }
    }

    if let Some(v) = env("APP__MIN_LOADING_MS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.min_loading_ms = parsed,
            Err(_) => warn!(value = %v, "ignoring invalid APP__MIN_LOADING_MS"),
        }
    }

    settings
}

fn apply_file_settings(settings: &mut Settings, file_cfg: &HashMap<String, toml::Value>) {
    if let Some(v) = file_cfg.get("api_url").and_then(toml::Value::as_str) {
        settings.api_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("database_url").and_then(toml::Value::as_str) {
        settings.database_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("batch_size").and_then(value_as_u64) {
        if v > 0 {
            settings.batch_size = v as usize;
        }
    }
    if let Some(v) = file_cfg.get("min_loading_ms").and_then(value_as_u64) {
        settings.min_loading_ms = v;
    }
}

fn value_as_u64(value: &toml::Value) -> Option<u64> {
    match value {
        toml::Value::Integer(v) => u64::try_from(*v).ok(),
        toml::Value::String(v) => v.trim().parse().ok(),
        _ => None,
    }
}

pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:") || raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
