//! Dataset loader
//!
//! The loader turns an optional [`DataSource`] into a [`LoadOutcome`].
//! Decode and read failures are caught here and become a `Failed` outcome
//! carrying a display message; they never propagate further.

use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::DatasetCache;
use crate::dataset::ParsedDataset;
use crate::error::{Error, Result};
use crate::parser::{WorkbookParser, XlsxParser};
use crate::source::{DataSource, FileId};

/// Default upload limit (200 MiB, the upload widget's limit)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// Result of a load attempt
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// No input was supplied yet
    Absent,
    /// The workbook was parsed (or found in the cache)
    Loaded {
        /// The dataset
        dataset: Arc<ParsedDataset>,
        /// Identity of the content it was parsed from
        file_id: FileId,
        /// Whether it was answered from the cache
        cached: bool,
    },
    /// The input could not be loaded
    Failed {
        /// Message for the user
        message: String,
    },
}

impl LoadOutcome {
    /// Whether a dataset is available
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    /// The dataset, if loaded
    #[must_use]
    pub fn dataset(&self) -> Option<&Arc<ParsedDataset>> {
        match self {
            Self::Loaded { dataset, .. } => Some(dataset),
            _ => None,
        }
    }

    /// Split into `(dataset, success)`.
    ///
    /// `success` is `true` only when a dataset is present.
    #[must_use]
    pub fn into_parts(self) -> (Option<Arc<ParsedDataset>>, bool) {
        match self {
            Self::Loaded { dataset, .. } => (Some(dataset), true),
            Self::Absent | Self::Failed { .. } => (None, false),
        }
    }
}

/// Loads workbooks through a parser and a content-addressed cache
pub struct DatasetLoader {
    parser: Arc<dyn WorkbookParser>,
    cache: DatasetCache,
    max_upload_bytes: usize,
}

impl DatasetLoader {
    /// Create a loader around a parser
    #[must_use]
    pub fn new(parser: Arc<dyn WorkbookParser>) -> Self {
        Self {
            parser,
            cache: DatasetCache::new(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Create a loader for `.xlsx` workbooks
    #[must_use]
    pub fn xlsx() -> Self {
        Self::new(Arc::new(XlsxParser))
    }

    /// Configure the maximum accepted content size
    #[must_use]
    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    /// Configure the number of cached datasets
    #[must_use]
    pub fn with_cache_capacity(mut self, max_entries: usize) -> Self {
        self.cache = DatasetCache::with_capacity(max_entries);
        self
    }

    /// The dataset cache
    #[must_use]
    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    /// Load a dataset from `source`.
    ///
    /// An absent source yields [`LoadOutcome::Absent`] without touching the
    /// cache.
    pub fn load(&self, source: Option<&DataSource>) -> LoadOutcome {
        let Some(source) = source else {
            debug!("No data source yet");
            return LoadOutcome::Absent;
        };

        match self.try_load(source) {
            Ok((dataset, file_id, cached)) => {
                info!(
                    source = %source.display_name(),
                    file_id = %file_id.short(),
                    sheets = dataset.len(),
                    cached,
                    "Dataset loaded"
                );
                LoadOutcome::Loaded {
                    dataset,
                    file_id,
                    cached,
                }
            }
            Err(e) => {
                warn!(source = %source.display_name(), error = %e, "Dataset load failed");
                LoadOutcome::Failed {
                    message: format!("Error loading {}: {}", source.display_name(), e),
                }
            }
        }
    }

    fn try_load(&self, source: &DataSource) -> Result<(Arc<ParsedDataset>, FileId, bool)> {
        let (content, file_id): (Cow<'_, [u8]>, FileId) = match source {
            DataSource::Upload(file) => (Cow::Borrowed(file.content()), file.id().clone()),
            DataSource::LocalPath(path) => {
                let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
                let id = FileId::of(&bytes);
                (Cow::Owned(bytes), id)
            }
        };

        if content.is_empty() {
            return Err(Error::EmptyContent);
        }
        if content.len() > self.max_upload_bytes {
            return Err(Error::TooLarge {
                size: content.len(),
                limit: self.max_upload_bytes,
            });
        }

        let (dataset, cached) = self
            .cache
            .get_or_parse(&file_id, || self.parser.parse(&content))?;
        Ok((dataset, file_id, cached))
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::xlsx()
    }
}
