use chrono::{DateTime, Utc};
use serde::Serialize;

/// Envelope for successful (and explicitly failed) responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Optional human-readable note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error code, only on error responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::build(true, Some(data), None, None)
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self::build(true, Some(data), Some(message.into()), None)
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>, data: T) -> Self {
        Self::build(false, Some(data), Some(message.into()), Some(code.into()))
    }

    fn build(
        success: bool,
        data: Option<T>,
        message: Option<String>,
        error_code: Option<String>,
    ) -> Self {
        Self {
            success,
            data,
            message,
            error_code,
            timestamp: Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn fail(message: impl Into<String>) -> Self {
        Self::build(false, None, Some(message.into()), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_with_data() {
        let response = ApiResponse::success("test data");

        assert!(response.success);
        assert_eq!(response.data, Some("test data"));
        assert!(response.message.is_none());
        assert!(response.error_code.is_none());
    }

    #[test]
    fn test_success_with_message() {
        let response = ApiResponse::success_with_message("test data", "processed");

        assert!(response.success);
        assert_eq!(response.data, Some("test data"));
        assert_eq!(response.message.as_deref(), Some("processed"));
    }

    #[test]
    fn test_fail() {
        let response = ApiResponse::fail("processing failed");

        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("processing failed"));
        assert!(response.data.is_none());
        assert!(response.error_code.is_none());
    }

    #[test]
    fn test_error_with_code_and_data() {
        let response = ApiResponse::error("GLOBAL_101", "invalid input", "email field");

        assert!(!response.success);
        assert_eq!(response.error_code.as_deref(), Some("GLOBAL_101"));
        assert_eq!(response.message.as_deref(), Some("invalid input"));
        assert_eq!(response.data, Some("email field"));
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let json = serde_json::to_value(ApiResponse::success(7)).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 7);
        assert!(json.get("message").is_none());
        assert!(json.get("errorCode").is_none());
        assert!(json["timestamp"].is_string());
    }
}
