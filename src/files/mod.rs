//! Boundary of the document file collaborator: upload validation, storage
//! hand-off and signed document responses. Storage itself lives behind the
//! [`ObjectStore`] and [`Presigner`] traits.

pub mod signed;
pub mod upload;

use serde::{Deserialize, Serialize};
use url::Url;

pub use signed::{build_signed_response, presigned_get_url, presigned_post_url, SignedResponse};
pub use upload::{store_upload, upload_document, validate_pdf_upload, ValidatedUpload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentDataType {
    S3Path,
    Bytes64,
    Bytes,
}

/// A stored document: either an object key or the encoded bytes inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentData {
    #[serde(rename = "type")]
    pub data_type: DocumentDataType,
    pub data: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageTransport {
    #[default]
    Database,
    S3,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresignedPost {
    pub key: String,
    pub url: Url,
}

pub trait ObjectStore {
    /// Stores `bytes` and returns the key they can be fetched by.
    fn put(&self, file_name: &str, bytes: &[u8]) -> anyhow::Result<String>;
}

pub trait Presigner {
    fn presign_get(&self, key: &str) -> anyhow::Result<Url>;
    fn presign_post(&self, file_name: &str, content_type: &str) -> anyhow::Result<PresignedPost>;
}
