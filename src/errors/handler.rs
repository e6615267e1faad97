//! Global exception handler
//!
//! Every failure raised on the request path ends up here exactly once.
//! Handlers return [`Failure`]; its `IntoResponse` impl only parks the error
//! in the response extensions. [`global_exception_middleware`], installed by
//! [`install`], picks it up together with the request path, classifies it,
//! writes the JSON envelope and logs it.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{error, warn};
use validator::ValidationErrors;

use super::codes::ErrorCode;
use super::exception::GlobalException;
use super::response::ErrorResponse;
use crate::metrics::API_ERRORS_TOTAL;

/// A failure raised by a request handler, awaiting classification.
///
/// Anything convertible into `anyhow::Error` converts into `Failure`, so
/// handlers can use `?` on domain errors, validation errors and arbitrary
/// infrastructure errors alike.
#[derive(Debug)]
pub struct Failure(anyhow::Error);

impl<E> From<E> for Failure
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Response extension carrying a failure from the handler to the middleware
#[derive(Clone)]
struct RaisedFailure(Arc<anyhow::Error>);

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        // Placeholder: the middleware replaces it with the classified body.
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response
            .extensions_mut()
            .insert(RaisedFailure(Arc::new(self.0)));
        response
    }
}

/// Log severity for a handled failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warn,
    Error,
}

impl Severity {
    /// Severity depends only on the resolved status, never on how it was
    /// resolved.
    pub fn for_status(status: u16) -> Self {
        if status >= 500 {
            Self::Error
        } else {
            Self::Warn
        }
    }
}

/// Map a failure to its error response. First match wins:
/// domain exception, then validation failure, then everything else.
pub fn classify(failure: &anyhow::Error, path: &str) -> ErrorResponse {
    if let Some(exception) = failure.downcast_ref::<GlobalException>() {
        let code = exception.error_code();
        return ErrorResponse::of(code.code(), exception.message(), code.status_code(), path);
    }

    if let Some(errors) = failure.downcast_ref::<ValidationErrors>() {
        let code = ErrorCode::InvalidInputValue;
        let message =
            first_field_message(errors).unwrap_or_else(|| code.message().to_string());
        return ErrorResponse::of(code.code(), message, code.status_code(), path);
    }

    // Unclassified: the failure's own text stays in the logs.
    ErrorResponse::from_code(ErrorCode::InternalServerError, path)
}

/// Message of the first field error, if it has one.
///
/// `validator` keeps field errors in a hash map, so fields are visited in
/// name order to keep the choice stable; within a field the validator's own
/// order is kept.
fn first_field_message(errors: &ValidationErrors) -> Option<String> {
    let mut fields: Vec<(String, _)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| (field.to_string(), field_errors))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(_, field_errors)| field_errors.iter())
        .next()
        .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
}

type Serializer = fn(&ErrorResponse) -> serde_json::Result<Vec<u8>>;

/// Turns failures into written error responses.
#[derive(Clone, Copy)]
pub struct GlobalExceptionHandler {
    serialize: Serializer,
}

impl Default for GlobalExceptionHandler {
    fn default() -> Self {
        Self {
            serialize: |body| serde_json::to_vec(body),
        }
    }
}

impl GlobalExceptionHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different body serializer (tests use this to force failures)
    pub fn with_serializer(serialize: Serializer) -> Self {
        Self { serialize }
    }

    /// Classify, serialize and log a failure for the given request path.
    pub fn handle(&self, failure: &anyhow::Error, path: &str) -> Response {
        let error_response = classify(failure, path);
        let body = self.serialize_body(&error_response);

        let status = StatusCode::from_u16(error_response.status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, body).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        API_ERRORS_TOTAL
            .with_label_values(&[&error_response.code, &error_response.status.to_string()])
            .inc();
        log_failure(failure, &error_response);

        response
    }

    fn serialize_body(&self, error_response: &ErrorResponse) -> Vec<u8> {
        match (self.serialize)(error_response) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(
                    code = %error_response.code,
                    error = %e,
                    "Failed to serialize error response, sending empty body"
                );
                Vec::new()
            }
        }
    }
}

fn log_failure(failure: &anyhow::Error, error_response: &ErrorResponse) {
    match Severity::for_status(error_response.status) {
        Severity::Error => error!(
            code = %error_response.code,
            status = error_response.status,
            path = %error_response.path,
            error = ?failure,
            "Server error [{}]: {}",
            error_response.code,
            error_response.message
        ),
        Severity::Warn => warn!(
            code = %error_response.code,
            status = error_response.status,
            path = %error_response.path,
            "Client error [{}]: {}",
            error_response.code,
            error_response.message
        ),
    }
}

/// Middleware that renders any raised failure into the error envelope.
///
/// The router's own empty 405 for an unsupported method is rendered as
/// `MethodNotAllowed`, keeping its `Allow` header.
pub async fn global_exception_middleware(
    State(handler): State<GlobalExceptionHandler>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<RaisedFailure>() {
        Some(RaisedFailure(failure)) => handler.handle(&failure, &path),
        None if response.status() == StatusCode::METHOD_NOT_ALLOWED => {
            let failure = anyhow::Error::from(GlobalException::new(ErrorCode::MethodNotAllowed));
            let mut handled = handler.handle(&failure, &path);
            if let Some(allow) = response.headers().get(header::ALLOW) {
                handled.headers_mut().insert(header::ALLOW, allow.clone());
            }
            handled
        }
        None => response,
    }
}

/// Turn a handler panic into an unclassified failure
fn panic_as_failure(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    Failure(anyhow::anyhow!("handler panicked: {}", detail)).into_response()
}

/// Route every failure of `router` through `handler`, panics included.
pub fn install<S>(router: Router<S>, handler: GlobalExceptionHandler) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(panic_as_failure))
        .layer(middleware::from_fn_with_state(
            handler,
            global_exception_middleware,
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde_json::Value;
    use std::io::{self, Write};
    use std::sync::Mutex;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct TestRequest {
        #[validate(length(min = 1, message = "값은 필수입니다."))]
        value: String,
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn capture_logs<F: FnOnce()>(f: F) -> String {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        buffer.contents()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_severity_for_status() {
        assert_eq!(Severity::for_status(400), Severity::Warn);
        assert_eq!(Severity::for_status(404), Severity::Warn);
        assert_eq!(Severity::for_status(499), Severity::Warn);
        assert_eq!(Severity::for_status(500), Severity::Error);
        assert_eq!(Severity::for_status(503), Severity::Error);
    }

    #[test]
    fn test_classify_domain_failure_default_message() {
        let failure = anyhow::Error::from(GlobalException::new(ErrorCode::ResourceNotFound));
        let res = classify(&failure, "/test/global-exception");

        assert_eq!(res.code, "GLOBAL_300");
        assert_eq!(res.message, ErrorCode::ResourceNotFound.message());
        assert_eq!(res.status, 404);
        assert_eq!(res.path, "/test/global-exception");
    }

    #[test]
    fn test_classify_domain_failure_override_message() {
        let failure = anyhow::Error::from(GlobalException::with_message(
            ErrorCode::ResourceNotFound,
            "item 42 does not exist",
        ));
        let res = classify(&failure, "/items/42");

        assert_eq!(res.code, "GLOBAL_300");
        assert_eq!(res.message, "item 42 does not exist");
        assert_eq!(res.status, 404);
    }

    #[test]
    fn test_classify_domain_failure_with_context() {
        let failure = anyhow::Error::from(GlobalException::new(ErrorCode::DuplicateResource))
            .context("while creating item");
        let res = classify(&failure, "/items");

        assert_eq!(res.code, ErrorCode::DuplicateResource.code());
        assert_eq!(res.status, 409);
    }

    #[test]
    fn test_classify_validation_failure_uses_field_message() {
        let errors = TestRequest {
            value: String::new(),
        }
        .validate()
        .unwrap_err();
        let res = classify(&anyhow::Error::from(errors), "/test/validation");

        assert_eq!(res.code, ErrorCode::InvalidInputValue.code());
        assert_eq!(res.message, "값은 필수입니다.");
        assert_eq!(res.status, 400);
    }

    #[test]
    fn test_classify_validation_failure_without_message_uses_default() {
        let mut errors = ValidationErrors::new();
        errors.add("value", validator::ValidationError::new("required"));
        let res = classify(&anyhow::Error::from(errors), "/test/validation");

        assert_eq!(res.message, ErrorCode::InvalidInputValue.message());
        assert_eq!(res.status, 400);
    }

    #[test]
    fn test_classify_validation_first_error_without_message_uses_default() {
        let mut errors = ValidationErrors::new();
        errors.add("alpha", validator::ValidationError::new("required"));
        let mut too_long = validator::ValidationError::new("length");
        too_long.message = Some("beta too long".into());
        errors.add("beta", too_long);

        let res = classify(&anyhow::Error::from(errors), "/test/validation");

        assert_eq!(res.code, "GLOBAL_101");
        assert_eq!(res.message, ErrorCode::InvalidInputValue.message());
    }

    #[test]
    fn test_classify_validation_failure_empty_uses_default() {
        let errors = ValidationErrors::new();
        let res = classify(&anyhow::Error::from(errors), "/test/validation");

        assert_eq!(res.code, ErrorCode::InvalidInputValue.code());
        assert_eq!(res.message, ErrorCode::InvalidInputValue.message());
    }

    #[test]
    fn test_classify_validation_failure_first_field_in_name_order() {
        let mut errors = ValidationErrors::new();
        let mut zeta = validator::ValidationError::new("length");
        zeta.message = Some("zeta is too long".into());
        let mut alpha = validator::ValidationError::new("required");
        alpha.message = Some("alpha is required".into());
        errors.add("zeta", zeta);
        errors.add("alpha", alpha);

        let res = classify(&anyhow::Error::from(errors), "/");
        assert_eq!(res.message, "alpha is required");
    }

    #[test]
    fn test_classify_unclassified_hides_failure_text() {
        let failure = anyhow::anyhow!("Unexpected error: password=hunter2");
        let res = classify(&failure, "/test/runtime-exception");

        assert_eq!(res.code, "GLOBAL_001");
        assert_eq!(res.message, ErrorCode::InternalServerError.message());
        assert_eq!(res.status, 500);
        assert!(!res.message.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_handle_sets_status_and_content_type() {
        let handler = GlobalExceptionHandler::new();
        let failure = anyhow::Error::from(GlobalException::new(ErrorCode::ServiceUnavailable));
        let response = handler.handle(&failure, "/busy");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let json = body_json(response).await;
        assert_eq!(json["code"], "GLOBAL_002");
        assert_eq!(json["status"], 503);
        assert_eq!(json["path"], "/busy");
    }

    #[tokio::test]
    async fn test_handle_serialization_failure_sends_empty_body() {
        let handler = GlobalExceptionHandler::with_serializer(|_| {
            Err(serde_json::Error::custom("serializer exploded"))
        });
        let failure = anyhow::Error::from(GlobalException::new(ErrorCode::ResourceNotFound));
        let response = handler.handle(&failure, "/missing");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_server_error_logged_at_error_with_failure() {
        let handler = GlobalExceptionHandler::new();
        let failure = anyhow::anyhow!("Unexpected error");
        let logs = capture_logs(|| {
            handler.handle(&failure, "/test/runtime-exception");
        });

        assert!(logs.contains("ERROR"));
        assert!(logs.contains("GLOBAL_001"));
        assert!(logs.contains("Unexpected error"));
    }

    #[test]
    fn test_client_error_logged_at_warn_without_failure() {
        let handler = GlobalExceptionHandler::new();
        let failure = anyhow::Error::from(GlobalException::with_cause(
            ErrorCode::BadRequest,
            "inner detail",
        ));
        let logs = capture_logs(|| {
            handler.handle(&failure, "/bad");
        });

        assert!(logs.contains("WARN"));
        assert!(!logs.contains("ERROR"));
        assert!(logs.contains("GLOBAL_100"));
        assert!(!logs.contains("inner detail"));
    }

    #[test]
    fn test_failure_into_response_parks_error() {
        let failure: Failure = GlobalException::new(ErrorCode::BadRequest).into();
        let response = failure.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<RaisedFailure>().is_some());
    }

    #[test]
    fn test_panic_payloads() {
        let response = panic_as_failure(Box::new("boom"));
        let raised = response.extensions().get::<RaisedFailure>().unwrap();
        assert!(raised.0.to_string().contains("boom"));

        let response = panic_as_failure(Box::new(String::from("owned boom")));
        let raised = response.extensions().get::<RaisedFailure>().unwrap();
        assert!(raised.0.to_string().contains("owned boom"));
    }
}
