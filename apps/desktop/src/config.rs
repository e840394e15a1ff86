use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub environment: String,
    pub log_tag: String,
    pub report_metrics: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            request_timeout_secs: 10,
            environment: "production".into(),
            log_tag: client_core::diagnostics::DEFAULT_LOG_TAG.into(),
            report_metrics: false,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// `debug` while developing, `warn` otherwise.
    pub fn default_log_filter(&self) -> &'static str {
        if self.environment.eq_ignore_ascii_case("development") {
            "debug"
        } else {
            "warn"
        }
    }

    pub fn set_server_url(&mut self, raw: &str) {
        self.server_url = normalize_server_url(raw);
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    request_timeout_secs: Option<u64>,
    environment: Option<String>,
    log_tag: Option<String>,
    report_metrics: Option<bool>,
}

pub fn load_settings(path: &Path) -> ClientSettings {
    let raw = fs::read_to_string(path).ok();
    settings_from_sources(raw.as_deref(), |key| std::env::var(key).ok())
}

/// Layers defaults, then the optional config file, then environment variables.
pub fn settings_from_sources(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Some(raw) = file_contents {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.server_url {
                    settings.set_server_url(&v);
                }
                if let Some(v) = file_cfg.request_timeout_secs {
                    settings.request_timeout_secs = v;
                }
                if let Some(v) = file_cfg.environment {
                    settings.environment = v;
                }
                if let Some(v) = file_cfg.log_tag {
                    settings.log_tag = v;
                }
                if let Some(v) = file_cfg.report_metrics {
                    settings.report_metrics = v;
                }
            }
            Err(err) => warn!("ignoring unreadable client config: {err}"),
        }
    }

    if let Some(v) = env("ROMAN_SERVER_URL") {
        settings.set_server_url(&v);
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.set_server_url(&v);
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    if let Some(v) = env("NODE_ENV") {
        settings.environment = v;
    }
    if let Some(v) = env("APP__ENVIRONMENT") {
        settings.environment = v;
    }

    if let Some(v) = env("APP__LOG_TAG") {
        settings.log_tag = v;
    }

    if let Some(v) = env("APP__REPORT_METRICS") {
        if let Ok(parsed) = v.parse::<bool>() {
            settings.report_metrics = parsed;
        }
    }

    settings
}

fn normalize_server_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_SERVER_URL.to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
