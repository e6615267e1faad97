use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::codes::ErrorCode;

/// Error body written for every failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error code for programmatic handling (e.g. "GLOBAL_300")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// HTTP status code, repeated from the status line
    pub status: u16,
    /// Request path that failed
    pub path: String,
    /// When the failure was handled
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create an error response stamped with the current time
    pub fn of(
        code: impl Into<String>,
        message: impl Into<String>,
        status: u16,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            status,
            path: path.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an error response using a code's default message and status
    pub fn from_code(code: ErrorCode, path: impl Into<String>) -> Self {
        Self::of(code.code(), code.message(), code.status_code(), path)
    }
}
