//! Client configuration.
//!
//! Layers, lowest first: built-in defaults, the `TASKBOARD_API_URL`
//! variable captured at build time, then whatever JSON the host page
//! supplies (see [`ClientConfig::merged_with_json`]).

use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_PROJECTS_PAGE_SIZE: u32 = 10;
pub const DEFAULT_TASKS_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    pub api_base_url: String,
    pub projects_page_size: u32,
    pub tasks_page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            projects_page_size: DEFAULT_PROJECTS_PAGE_SIZE,
            tasks_page_size: DEFAULT_TASKS_PAGE_SIZE,
        }
    }
}

/// Partial overlay; absent keys keep the lower layer's value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigOverlay {
    api_base_url: Option<String>,
    projects_page_size: Option<u32>,
    tasks_page_size: Option<u32>,
}

impl ClientConfig {
    /// Defaults plus the base URL baked in at compile time, if any.
    pub fn from_build_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = option_env!("TASKBOARD_API_URL").filter(|url| !url.is_empty()) {
            config.api_base_url = url.to_string();
        }
        config
    }

    /// Apply a JSON overlay on top of `self`.
    pub fn merged_with_json(mut self, json: &str) -> Result<Self, serde_json::Error> {
        let overlay: ConfigOverlay = serde_json::from_str(json)?;
        if let Some(url) = overlay.api_base_url {
            self.api_base_url = url;
        }
        if let Some(size) = overlay.projects_page_size.filter(|size| *size > 0) {
            self.projects_page_size = size;
        }
        if let Some(size) = overlay.tasks_page_size.filter(|size| *size > 0) {
            self.tasks_page_size = size;
        }
        Ok(self)
    }

    /// Base URL without a trailing slash, ready for `format!("{base}{path}")`.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), "http://localhost:8080/api");
        assert_eq!(config.projects_page_size, 10);
        assert_eq!(config.tasks_page_size, 20);
    }

    #[test]
    fn test_json_overlay_keeps_missing_keys() {
        let config = ClientConfig::default()
            .merged_with_json(r#"{"apiBaseUrl":"https://tasks.example.com/api/"}"#)
            .unwrap();
        assert_eq!(config.base_url(), "https://tasks.example.com/api");
        assert_eq!(config.tasks_page_size, 20);
    }

    #[test]
    fn test_json_overlay_ignores_zero_page_size() {
        let config = ClientConfig::default()
            .merged_with_json(r#"{"projectsPageSize":0,"tasksPageSize":50}"#)
            .unwrap();
        assert_eq!(config.projects_page_size, 10);
        assert_eq!(config.tasks_page_size, 50);
    }

    #[test]
    fn test_malformed_overlay_is_an_error() {
        assert!(ClientConfig::default().merged_with_json("{not json").is_err());
    }
}
