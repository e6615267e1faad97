use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Error codes for structured API responses.
///
/// Codes are part of the public API contract: clients key on `code`, not on
/// the HTTP status. New variants may be added, existing codes and statuses
/// never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ErrorCode {
    /// Unexpected server-side failure
    #[serde(rename = "GLOBAL_001")]
    InternalServerError,

    /// A dependency is down or overloaded
    #[serde(rename = "GLOBAL_002")]
    ServiceUnavailable,

    /// Malformed request (unparseable body, wrong content type)
    #[serde(rename = "GLOBAL_100")]
    BadRequest,

    /// Well-formed request carrying an invalid value
    #[serde(rename = "GLOBAL_101")]
    InvalidInputValue,

    /// Negative page number
    #[serde(rename = "GLOBAL_102")]
    InvalidPageNumber,

    /// Page size of zero or less
    #[serde(rename = "GLOBAL_103")]
    InvalidPageSize,

    /// Negative total element count
    #[serde(rename = "GLOBAL_104")]
    InvalidTotalElements,

    /// Negative total page count
    #[serde(rename = "GLOBAL_105")]
    InvalidTotalPages,

    /// Page response built without page metadata
    #[serde(rename = "GLOBAL_106")]
    PageInfoNull,

    /// Route exists but does not accept the request method
    #[serde(rename = "GLOBAL_107")]
    MethodNotAllowed,

    /// Requested resource does not exist
    #[serde(rename = "GLOBAL_300")]
    ResourceNotFound,

    /// Resource already exists
    #[serde(rename = "GLOBAL_301")]
    DuplicateResource,
}

impl ErrorCode {
    /// Every member of the taxonomy, in declaration order.
    pub const ALL: [ErrorCode; 12] = [
        Self::InternalServerError,
        Self::ServiceUnavailable,
        Self::BadRequest,
        Self::InvalidInputValue,
        Self::InvalidPageNumber,
        Self::InvalidPageSize,
        Self::InvalidTotalElements,
        Self::InvalidTotalPages,
        Self::PageInfoNull,
        Self::MethodNotAllowed,
        Self::ResourceNotFound,
        Self::DuplicateResource,
    ];

    /// Stable machine-readable identifier
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InternalServerError => "GLOBAL_001",
            Self::ServiceUnavailable => "GLOBAL_002",
            Self::BadRequest => "GLOBAL_100",
            Self::InvalidInputValue => "GLOBAL_101",
            Self::InvalidPageNumber => "GLOBAL_102",
            Self::InvalidPageSize => "GLOBAL_103",
            Self::InvalidTotalElements => "GLOBAL_104",
            Self::InvalidTotalPages => "GLOBAL_105",
            Self::PageInfoNull => "GLOBAL_106",
            Self::MethodNotAllowed => "GLOBAL_107",
            Self::ResourceNotFound => "GLOBAL_300",
            Self::DuplicateResource => "GLOBAL_301",
        }
    }

    /// Default human-readable message
    pub const fn message(&self) -> &'static str {
        match self {
            Self::InternalServerError => "An internal server error occurred.",
            Self::ServiceUnavailable => "The service is temporarily unavailable.",
            Self::BadRequest => "The request could not be understood.",
            Self::InvalidInputValue => "Invalid input value.",
            Self::InvalidPageNumber => "Page number must be greater than or equal to 0.",
            Self::InvalidPageSize => "Page size must be greater than 0.",
            Self::InvalidTotalElements => "Total elements must be greater than or equal to 0.",
            Self::InvalidTotalPages => "Total pages must be greater than or equal to 0.",
            Self::PageInfoNull => "Page info must not be null.",
            Self::MethodNotAllowed => "The request method is not supported for this resource.",
            Self::ResourceNotFound => "The requested resource was not found.",
            Self::DuplicateResource => "The resource already exists.",
        }
    }

    /// Get HTTP status code for this error
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InternalServerError => 500,
            Self::ServiceUnavailable => 503,
            Self::BadRequest => 400,
            Self::InvalidInputValue => 400,
            Self::InvalidPageNumber => 400,
            Self::InvalidPageSize => 400,
            Self::InvalidTotalElements => 400,
            Self::InvalidTotalPages => 400,
            Self::PageInfoNull => 500,
            Self::MethodNotAllowed => 405,
            Self::ResourceNotFound => 404,
            Self::DuplicateResource => 409,
        }
    }

    /// Look up a member by its wire identifier.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.code() == code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
