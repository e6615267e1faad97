use std::error::Error as StdError;
use thiserror::Error;

use super::codes::ErrorCode;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result alias for operations that fail with a classified domain error
pub type GlobalResult<T> = Result<T, GlobalException>;

/// Domain failure carrying an [`ErrorCode`].
///
/// Call sites express intent by choosing the code, not by choosing a type.
/// The message is the override when one was given and non-empty, otherwise
/// the code's default message.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct GlobalException {
    error_code: ErrorCode,
    message: String,
    #[source]
    cause: Option<BoxError>,
}

impl GlobalException {
    pub fn new(error_code: ErrorCode) -> Self {
        Self::build(error_code, None, None)
    }

    pub fn with_message(error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self::build(error_code, Some(message.into()), None)
    }

    pub fn with_cause(error_code: ErrorCode, cause: impl Into<BoxError>) -> Self {
        Self::build(error_code, None, Some(cause.into()))
    }

    pub fn with_message_and_cause(
        error_code: ErrorCode,
        message: impl Into<String>,
        cause: impl Into<BoxError>,
    ) -> Self {
        Self::build(error_code, Some(message.into()), Some(cause.into()))
    }

    fn build(error_code: ErrorCode, message: Option<String>, cause: Option<BoxError>) -> Self {
        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| error_code.message().to_string());

        Self {
            error_code,
            message,
            cause,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        self.error_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> u16 {
        self.error_code.status_code()
    }
}

impl From<ErrorCode> for GlobalException {
    fn from(error_code: ErrorCode) -> Self {
        Self::new(error_code)
    }
}
