pub mod client;
pub mod multipart;

pub use client::{ApiClient, AuthScope, resource_path};
pub use multipart::{FilePart, MultipartPayload};
