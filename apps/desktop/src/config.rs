use std::{collections::HashMap, fs, path::Path, time::Duration};

use presenter::TimeLimit;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "itinerary.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub authorization: String,
    pub lower_limit_ms: u64,
    pub upper_limit_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "https://21.objects.htmlacademy.pro/big-trip".into(),
            authorization: "Basic itinerary-dev".into(),
            lower_limit_ms: 350,
            upper_limit_ms: 1000,
            request_timeout_secs: 10,
        }
    }
}

impl Settings {
    pub fn time_limit(&self) -> TimeLimit {
        TimeLimit {
            lower: Duration::from_millis(self.lower_limit_ms),
            upper: Duration::from_millis(self.upper_limit_ms.max(self.lower_limit_ms)),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Command-line flags win over file and environment.
    pub fn apply_args(&mut self, server_url: Option<String>, authorization: Option<String>) {
        if let Some(v) = server_url {
            self.server_url = v;
        }
        if let Some(v) = authorization {
            self.authorization = v;
        }
    }
}

pub fn load_settings(path: &Path) -> Settings {
    let raw = fs::read_to_string(path).ok();
    load_settings_from(raw.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the optional TOML file, then environment overrides.
pub fn load_settings_from(raw: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = raw {
        match toml::from_str::<HashMap<String, toml::Value>>(raw) {
            Ok(file_cfg) => apply_file(&mut settings, &file_cfg),
            Err(err) => warn!("ignoring unreadable config file: {err}"),
        }
    }

    if let Some(v) = env("ITINERARY_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("ITINERARY_AUTHORIZATION") {
        settings.authorization = v;
    }
    if let Some(v) = env("APP__AUTHORIZATION") {
        settings.authorization = v;
    }

    if let Some(parsed) = env("APP__LOWER_LIMIT_MS").and_then(|v| v.parse().ok()) {
        settings.lower_limit_ms = parsed;
    }
    if let Some(parsed) = env("APP__UPPER_LIMIT_MS").and_then(|v| v.parse().ok()) {
        settings.upper_limit_ms = parsed;
    }
    if let Some(parsed) = env("APP__REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
        settings.request_timeout_secs = parsed;
    }

    settings
}

fn apply_file(settings: &mut Settings, file_cfg: &HashMap<String, toml::Value>) {
    if let Some(v) = file_cfg.get("server_url").and_then(toml::Value::as_str) {
        settings.server_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("authorization").and_then(toml::Value::as_str) {
        settings.authorization = v.to_string();
    }
    if let Some(v) = integer(file_cfg, "lower_limit_ms") {
        settings.lower_limit_ms = v;
    }
    if let Some(v) = integer(file_cfg, "upper_limit_ms") {
        settings.upper_limit_ms = v;
    }
    if let Some(v) = integer(file_cfg, "request_timeout_secs") {
        settings.request_timeout_secs = v;
    }
}

fn integer(file_cfg: &HashMap<String, toml::Value>, key: &str) -> Option<u64> {
    file_cfg
        .get(key)
        .and_then(toml::Value::as_integer)
        .and_then(|v| u64::try_from(v).ok())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
