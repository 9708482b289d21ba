//! Server module for GSurvWeb
//!
//! Contains the main server initialization and runtime logic.
//!
//! # Module Structure
//!
//! - `config`: Configuration structures for all server components
//! - `loader`: Configuration loading from files and environment
//! - `template`: The example workbook offered for download
//! - `background_tasks`: Session expiry sweep
//! - `shutdown`: Signal handling
//! - `init`: Main server initialization and run loop

mod background_tasks;
pub mod config;
mod init;
mod loader;
mod shutdown;
pub mod template;

// Re-export public API
pub use init::{build_router, run};
pub use template::TemplateAsset;
