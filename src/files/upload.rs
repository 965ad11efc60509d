use super::{DocumentData, DocumentDataType, ObjectStore, StorageTransport};
use crate::error::{AppError, AppErrorCode};
use crate::settings::Settings;
use anyhow::Context;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// An uploaded PDF that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Checks an uploaded file before it is stored.
///
/// Rejects empty and oversized uploads, anything that does not parse as a
/// PDF, and encrypted documents. File names gain a `.pdf` extension when
/// they do not already end in lowercase `.pdf`.
pub fn validate_pdf_upload(
    file_name: &str,
    bytes: Vec<u8>,
    size_limit_mb: u64,
) -> Result<ValidatedUpload, AppError> {
    if bytes.is_empty() {
        return Err(AppError::with_message(
            AppErrorCode::InvalidRequest,
            "No file provided",
        ));
    }

    let limit = size_limit_mb.saturating_mul(BYTES_PER_MB);
    if bytes.len() as u64 > limit {
        tracing::warn!(file = file_name, size = bytes.len(), limit, "upload rejected: too large");
        return Err(AppError::with_message(
            AppErrorCode::LimitExceeded,
            "File too large",
        ));
    }

    let document = lopdf::Document::load_mem(&bytes).map_err(|e| {
        tracing::warn!(file = file_name, "PDF upload parse error: {e}");
        AppError::new(AppErrorCode::InvalidDocumentFile)
    })?;

    if document.trailer.get(b"Encrypt").is_ok() {
        tracing::warn!(file = file_name, "upload rejected: encrypted document");
        return Err(AppError::with_message(
            AppErrorCode::InvalidDocumentFile,
            "Encrypted documents are not supported",
        ));
    }

    let page_count = document.get_pages().len();
    let file_name = if file_name.ends_with(".pdf") {
        file_name.to_string()
    } else {
        format!("{file_name}.pdf")
    };

    Ok(ValidatedUpload {
        file_name,
        bytes,
        page_count,
    })
}

/// Hands a validated upload to the configured transport and returns the
/// record describing where it went.
pub fn store_upload(
    upload: &ValidatedUpload,
    transport: StorageTransport,
    store: &dyn ObjectStore,
) -> anyhow::Result<DocumentData> {
    match transport {
        StorageTransport::Database => Ok(DocumentData {
            data_type: DocumentDataType::Bytes64,
            data: STANDARD.encode(&upload.bytes),
        }),
        StorageTransport::S3 => {
            let key = store
                .put(&upload.file_name, &upload.bytes)
                .with_context(|| format!("store upload {}", upload.file_name))?;
            Ok(DocumentData {
                data_type: DocumentDataType::S3Path,
                data: key,
            })
        }
    }
}

/// Validates an upload against the configured size limit and stores it
/// through the configured transport.
pub fn upload_document(
    settings: &Settings,
    file_name: &str,
    bytes: Vec<u8>,
    store: &dyn ObjectStore,
) -> Result<DocumentData, AppError> {
    let upload = validate_pdf_upload(file_name, bytes, settings.upload_size_limit_mb)?;
    let data = store_upload(&upload, settings.storage_transport, store).map_err(|e| {
        tracing::error!(file = %upload.file_name, "storing upload failed: {e:#}");
        AppError::parse_error(e)
    })?;
    tracing::info!(
        file = %upload.file_name,
        pages = upload.page_count,
        transport = ?settings.storage_transport,
        "document uploaded"
    );
    Ok(data)
}
