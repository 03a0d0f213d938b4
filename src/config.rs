//! Application Configuration
//!
//! Defaults can be overridden at build time through environment variables
//! (`DIAGLAB_API_BASE`, `DIAGLAB_LOG_LEVEL`) or from a JSON document.

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_login_timeout_secs")]
    pub login_timeout_secs: u64,
    #[serde(default = "default_upload_timeout_secs")]
    pub upload_timeout_secs: u64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u32,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_base() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_login_timeout_secs() -> u64 {
    10
}

fn default_upload_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> usize {
    10
}

fn default_search_debounce_ms() -> u32 {
    300
}

fn default_session_ttl_hours() -> i64 {
    24
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            login_timeout_secs: default_login_timeout_secs(),
            upload_timeout_secs: default_upload_timeout_secs(),
            page_size: default_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
            session_ttl_hours: default_session_ttl_hours(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Defaults plus compile-time overrides
    pub fn load() -> Self {
        let mut config = Self::default();
        if let Some(base) = option_env!("DIAGLAB_API_BASE") {
            config.api_base = base.to_string();
        }
        if let Some(level) = option_env!("DIAGLAB_LOG_LEVEL") {
            config.log_level = level.to_string();
        }
        config.normalized()
    }

    fn normalized(mut self) -> Self {
        self.api_base = self.api_base.trim_end_matches('/').to_string();
        if self.page_size == 0 {
            self.page_size = default_page_size();
        }
        self
    }

    /// Host serving uploaded images: the API base without its `/api` suffix
    pub fn media_base(&self) -> &str {
        let base = self.api_base.trim_end_matches('/');
        base.strip_suffix("/api").unwrap_or(base)
    }

    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.login_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.login_timeout(), Duration::from_secs(10));
        assert_eq!(config.upload_timeout(), Duration::from_secs(30));
        assert_eq!(config.page_size, 10);
        assert_eq!(config.media_base(), "http://localhost:5000");
    }

    #[test]
    fn test_partial_config_is_normalized() {
        let config: AppConfig = serde_json::from_str(r#"{"apiBase":"https://lab.example/api/","pageSize":0}"#).unwrap();
        let config = config.normalized();
        assert_eq!(config.api_base, "https://lab.example/api");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.login_timeout_secs, 10);
    }
}
