use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppErrorCode {
    InvalidDocumentFile,
    InvalidRequest,
    LimitExceeded,
    NotFound,
    Unauthorized,
    UnknownError,
}

impl AppErrorCode {
    pub fn http_status(self) -> u16 {
        match self {
            AppErrorCode::InvalidDocumentFile
            | AppErrorCode::InvalidRequest
            | AppErrorCode::LimitExceeded => 400,
            AppErrorCode::Unauthorized => 401,
            AppErrorCode::NotFound => 404,
            AppErrorCode::UnknownError => 500,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppErrorCode::InvalidDocumentFile => "INVALID_DOCUMENT_FILE",
            AppErrorCode::InvalidRequest => "INVALID_REQUEST",
            AppErrorCode::LimitExceeded => "LIMIT_EXCEEDED",
            AppErrorCode::NotFound => "NOT_FOUND",
            AppErrorCode::Unauthorized => "UNAUTHORIZED",
            AppErrorCode::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl std::fmt::Display for AppErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by the file endpoints, carrying a stable code that maps to
/// an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}{}", message_suffix(.message))]
pub struct AppError {
    pub code: AppErrorCode,
    pub message: Option<String>,
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_ref()
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestErrorBody {
    pub code: AppErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestApiError {
    pub status: u16,
    pub body: RestErrorBody,
}

impl AppError {
    pub fn new(code: AppErrorCode) -> Self {
        Self {
            code,
            message: None,
        }
    }

    pub fn with_message(code: AppErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
        }
    }

    /// Recovers an `AppError` from an arbitrary failure; anything else is
    /// reported as an unknown error.
    pub fn parse_error(error: anyhow::Error) -> Self {
        match error.downcast::<AppError>() {
            Ok(app_error) => app_error,
            Err(other) => AppError::with_message(AppErrorCode::UnknownError, other.to_string()),
        }
    }

    pub fn to_rest_api_error(&self) -> RestApiError {
        RestApiError {
            status: self.code.http_status(),
            body: RestErrorBody {
                code: self.code,
                message: self
                    .message
                    .clone()
                    .unwrap_or_else(|| "An unknown error occurred".to_string()),
            },
        }
    }
}
