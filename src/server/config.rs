//! Server configuration types
//!
//! Contains all configuration structures for the GSurvWeb server.

use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub template: TemplateConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted upload in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_max_upload_bytes() -> usize {
    gsurv_data::loader::DEFAULT_MAX_UPLOAD_BYTES
}

/// Session lifetime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_max_idle_secs")]
    pub max_idle_secs: i64,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_idle_secs: default_max_idle_secs(),
            max_sessions: default_max_sessions(),
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

fn default_max_idle_secs() -> i64 {
    3600
}

fn default_max_sessions() -> usize {
    1000
}

fn default_cleanup_interval() -> u64 {
    300
}

/// Dataset cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}

fn default_max_entries() -> usize {
    32
}

/// Template download configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default = "default_template_file_name")]
    pub file_name: String,
    /// Workbook on disk to serve instead of the built-in template
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            file_name: default_template_file_name(),
            path: None,
        }
    }
}

fn default_template_file_name() -> String {
    "example_data_template.xlsx".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config: AppConfig = serde_json::from_str(r#"{"server": {"port": 9000}}"#).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.session.max_idle_secs, 3600);
        assert_eq!(config.cache.max_entries, 32);
        assert!(config.template.path.is_none());
    }
}
