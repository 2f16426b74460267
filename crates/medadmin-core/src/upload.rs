//! Files attached to multipart submissions.
//!
//! Doctor photos and category icons are read from disk and validated locally
//! before any request is made, so an oversized or unsupported file never
//! reaches the backend.
//!
//! # Example
//!
//! ```ignore
//! use medadmin_core::upload::{FileUpload, UploadPolicy};
//!
//! let photo = FileUpload::from_path("./portrait.jpg", &UploadPolicy::images()).await?;
//! assert_eq!(photo.mime_type(), "image/jpeg");
//! ```

use std::fmt;
use std::path::Path;

use tokio::fs;

/// Default upload limit: 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Error type for file upload validation.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// File exceeds maximum allowed size.
    #[error("File exceeds maximum size of {max_bytes} bytes")]
    InvalidFileSize { max_bytes: usize },

    /// MIME type not allowed.
    #[error("MIME type '{}' not allowed. Allowed types: {}", .received, .allowed.join(", "))]
    InvalidMimeType {
        received: String,
        allowed: Vec<String>,
    },

    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file name is empty or has no usable extension.
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),
}

impl From<UploadError> for crate::ApiError {
    fn from(err: UploadError) -> Self {
        crate::ApiError::validation([err.to_string()])
    }
}

/// Size and type restrictions for an upload field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Maximum file size in bytes
    pub max_bytes: usize,
    /// Accepted MIME types
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::images()
    }
}

impl UploadPolicy {
    /// Raster images: png, jpeg, webp.
    pub fn images() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_mime_types: vec![
                "image/png".to_string(),
                "image/jpeg".to_string(),
                "image/webp".to_string(),
            ],
        }
    }

    /// Category icons additionally accept SVG.
    pub fn icons() -> Self {
        let mut policy = Self::images();
        policy.allowed_mime_types.push("image/svg+xml".to_string());
        policy
    }

    #[must_use]
    pub fn with_max_size(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn check(&self, mime_type: &str, len: usize) -> Result<(), UploadError> {
        if len > self.max_bytes {
            return Err(UploadError::InvalidFileSize {
                max_bytes: self.max_bytes,
            });
        }

        if !self.allowed_mime_types.iter().any(|m| m == mime_type) {
            return Err(UploadError::InvalidMimeType {
                received: mime_type.to_string(),
                allowed: self.allowed_mime_types.clone(),
            });
        }

        Ok(())
    }
}

/// MIME type for a file name, inferred from its extension.
pub fn mime_from_file_name(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "gif" => Some("image/gif"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

/// A validated file ready to be attached to a multipart form.
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl FileUpload {
    /// Reads and validates a file from disk.
    pub async fn from_path(
        path: impl AsRef<Path>,
        policy: &UploadPolicy,
    ) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| UploadError::InvalidFileName(path.display().to_string()))?
            .to_string();

        // Reject by metadata first so large files are never read into memory
        let metadata = fs::metadata(path).await?;
        if metadata.len() > policy.max_bytes as u64 {
            return Err(UploadError::InvalidFileSize {
                max_bytes: policy.max_bytes,
            });
        }

        let bytes = fs::read(path).await?;
        Self::from_bytes(file_name, bytes, policy)
    }

    /// Validates in-memory file content.
    pub fn from_bytes(
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        policy: &UploadPolicy,
    ) -> Result<Self, UploadError> {
        let file_name = file_name.into();
        if file_name.trim().is_empty() {
            return Err(UploadError::InvalidFileName(
                "file name must not be empty".to_string(),
            ));
        }

        let mime_type = mime_from_file_name(&file_name)
            .ok_or_else(|| UploadError::InvalidFileName(file_name.clone()))?;
        policy.check(mime_type, bytes.len())?;

        Ok(Self {
            file_name,
            mime_type: mime_type.to_string(),
            bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Splits into `(file_name, mime_type, bytes)`.
    pub fn into_parts(self) -> (String, String, Vec<u8>) {
        (self.file_name, self.mime_type, self.bytes)
    }
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
