//! Example data template
//!
//! The workbook offered for download while no dataset is loaded. The
//! built-in copy is compiled into the binary; `template.path` replaces it
//! with a file read once at startup.

use anyhow::{Context, Result};
use axum::body::Bytes;
use std::path::Path;

use super::config::TemplateConfig;

/// Built-in example workbook
pub const EMBEDDED_TEMPLATE: &[u8] = include_bytes!("../../assets/example_data_template.xlsx");

/// Template workbook ready to serve
#[derive(Debug, Clone)]
pub struct TemplateAsset {
    pub file_name: String,
    pub bytes: Bytes,
}

impl TemplateAsset {
    /// Resolve the template from configuration
    pub fn load(config: &TemplateConfig) -> Result<Self> {
        let bytes = match &config.path {
            Some(path) => Bytes::from(
                std::fs::read(Path::new(path))
                    .with_context(|| format!("Failed to read template workbook {path}"))?,
            ),
            None => Bytes::from_static(EMBEDDED_TEMPLATE),
        };
        Ok(Self {
            file_name: config.file_name.clone(),
            bytes,
        })
    }
}
