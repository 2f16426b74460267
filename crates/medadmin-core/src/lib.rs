//! # medadmin Core
//!
//! Core types, errors, and utilities for the medadmin client.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: The API error taxonomy and HTTP status classification
//! - [`pagination`]: Page requests, filters, and page results
//! - [`serde`]: Lenient deserialization helpers for backend payloads
//! - [`upload`]: Local validation of files attached to multipart submissions
//!
//! # Example
//!
//! ```ignore
//! use medadmin_core::errors::ApiError;
//! use medadmin_core::pagination::{PageRequest, total_pages};
//!
//! let request = PageRequest::new(2, 10).with_filter("search", "cardio");
//! assert_eq!(total_pages(11, 10), 2);
//!
//! let error = ApiError::from_response(404, r#"{"message":"Doctor not found"}"#);
//! assert!(error.is_not_found());
//! ```

pub mod errors;
pub mod pagination;
pub mod serde;
pub mod upload;

// Re-export commonly used types at crate root
pub use errors::ApiError;
pub use pagination::{
    DEFAULT_PAGE_SIZE, Filters, PageCursor, PageEnvelope, PageRequest, PageResult, total_pages,
};
pub use upload::{FileUpload, UploadError, UploadPolicy};
