use super::{DocumentData, DocumentDataType, PresignedPost, Presigner};
use crate::error::{AppError, AppErrorCode};
use anyhow::Context;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use url::Url;

/// Response for a signed document download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignedResponse {
    Url {
        #[serde(rename = "type")]
        data_type: DocumentDataType,
        url: Url,
    },
    Inline {
        #[serde(rename = "type")]
        data_type: DocumentDataType,
        data: String,
    },
}

impl SignedResponse {
    pub fn data_type(&self) -> DocumentDataType {
        match self {
            SignedResponse::Url { data_type, .. } | SignedResponse::Inline { data_type, .. } => {
                *data_type
            }
        }
    }

    /// Raw document bytes of an inline response. `None` for URL responses.
    pub fn decode_bytes(&self) -> Option<anyhow::Result<Vec<u8>>> {
        match self {
            SignedResponse::Url { .. } => None,
            SignedResponse::Inline {
                data_type: DocumentDataType::Bytes64,
                data,
            } => Some(STANDARD.decode(data).context("decode base64 document data")),
            SignedResponse::Inline { data, .. } => Some(Ok(data.as_bytes().to_vec())),
        }
    }
}

/// Presigned download URL for a stored object.
pub fn presigned_get_url(presigner: &dyn Presigner, key: &str) -> Result<Url, AppError> {
    presigner.presign_get(key).map_err(|e| {
        tracing::error!(key, "presign get url failed: {e:#}");
        AppError::new(AppErrorCode::UnknownError)
    })
}

/// Presigned upload target for a file the client will send straight to
/// object storage.
pub fn presigned_post_url(
    presigner: &dyn Presigner,
    file_name: &str,
    content_type: &str,
) -> Result<PresignedPost, AppError> {
    presigner.presign_post(file_name, content_type).map_err(|e| {
        tracing::error!(file = file_name, content_type, "presign post url failed: {e:#}");
        AppError::new(AppErrorCode::UnknownError)
    })
}

/// Object keys are exchanged for a presigned URL; inline data is passed
/// through.
pub fn build_signed_response(
    document: &DocumentData,
    presigner: &dyn Presigner,
) -> Result<SignedResponse, AppError> {
    match document.data_type {
        DocumentDataType::S3Path => Ok(SignedResponse::Url {
            data_type: document.data_type,
            url: presigned_get_url(presigner, &document.data)?,
        }),
        DocumentDataType::Bytes64 | DocumentDataType::Bytes => Ok(SignedResponse::Inline {
            data_type: document.data_type,
            data: document.data.clone(),
        }),
    }
}
