//! Input sources
//!
//! An [`UploadedFile`] is the handle the upload widget hands over; its
//! [`FileId`] is the SHA-256 of the content, so two uploads of the same bytes
//! share one identity regardless of their file names.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Content identity of a file (lowercase hex SHA-256)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    /// Compute the identity of some content
    #[must_use]
    pub fn of(content: &[u8]) -> Self {
        let digest = Sha256::digest(content);
        Self(format!("{digest:x}"))
    }

    /// Full hex digest
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated digest for logs
    #[must_use]
    pub fn short(&self) -> &str {
        &self.0[..12.min(self.0.len())]
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user-supplied file held by the upload widget
#[derive(Clone)]
pub struct UploadedFile {
    name: String,
    content: Arc<[u8]>,
    id: FileId,
}

impl UploadedFile {
    /// Wrap uploaded content, computing its identity
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let content: Vec<u8> = content.into();
        let id = FileId::of(&content);
        Self {
            name: name.into(),
            content: content.into(),
            id,
        }
    }

    /// File name as reported by the client
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw content
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Content identity
    #[must_use]
    pub fn id(&self) -> &FileId {
        &self.id
    }

    /// Content length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the upload carried no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("len", &self.content.len())
            .field("id", &self.id.short())
            .finish()
    }
}

/// Where the loader reads a workbook from
#[derive(Debug, Clone)]
pub enum DataSource {
    /// A file submitted through the upload widget
    Upload(UploadedFile),
    /// A local path configured at startup in developer mode
    LocalPath(PathBuf),
}

impl DataSource {
    /// Human-readable name of the source
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Upload(file) => file.name().to_string(),
            Self::LocalPath(path) => path.display().to_string(),
        }
    }
}
