//! Structured error handling for API responses

pub mod codes;
pub mod exception;
pub mod handler;
pub mod response;

pub use codes::ErrorCode;
pub use exception::{GlobalException, GlobalResult};
pub use handler::{classify, Failure, GlobalExceptionHandler, Severity};
pub use response::ErrorResponse;
