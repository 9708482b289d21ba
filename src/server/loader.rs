//! Configuration loading
//!
//! Handles loading configuration from embedded defaults, files, and environment.

use super::config::AppConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use tracing::debug;

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Deployment profile selecting `config/{profile}.toml`
fn profile() -> String {
    std::env::var("GSURV_ENV").unwrap_or_else(|_| "development".to_string())
}

/// Load configuration.
///
/// Later layers win: built-in defaults, `config/local`, the
/// `config/{GSURV_ENV}` profile, then `GSURV_SECTION__KEY` variables
/// (for example `GSURV_SERVER__PORT=9000`).
pub fn load_config() -> Result<AppConfig> {
    let profile = profile();
    debug!(profile = %profile, "Loading configuration");

    Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        .add_source(File::with_name("config/local").required(false))
        .add_source(File::with_name(&format!("config/{profile}")).required(false))
        .add_source(
            Environment::with_prefix("GSURV")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_deserialize() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 8501);
        assert_eq!(config.server.max_upload_bytes, 200 * 1024 * 1024);
        assert_eq!(config.session.cleanup_interval_secs, 300);
        assert_eq!(config.template.file_name, "example_data_template.xlsx");
    }
}
