//! GSurv Data - Dataset Ingestion
//!
//! This crate turns user-supplied workbooks into immutable, shareable
//! datasets:
//! - Source: uploaded file handles, file identities, developer-mode paths
//! - Dataset: sheets, tables, rows and cell values
//! - Parser: the workbook parser seam and its `.xlsx` implementation
//! - Cache: content-addressed memoization keyed by file identity
//! - Loader: the single entry point used by the orchestrator
//!
//! ## Usage
//!
//! ```ignore
//! use gsurv_data::{DataSource, DatasetLoader, UploadedFile};
//!
//! let loader = DatasetLoader::xlsx();
//! let upload = UploadedFile::new("cohort.xlsx", bytes);
//! let (dataset, success) = loader.load(Some(&DataSource::Upload(upload))).into_parts();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod parser;
pub mod source;

pub use cache::DatasetCache;
pub use dataset::{CellValue, DatasetSummary, ParsedDataset, Row, SheetSummary, Table};
pub use error::{Error, Result};
pub use loader::{DatasetLoader, LoadOutcome};
pub use parser::{WorkbookParser, XlsxParser};
pub use source::{DataSource, FileId, UploadedFile};
