use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::{ErrorCode, Failure, GlobalException};

/// JSON body that has passed `validator` checks.
///
/// A body that cannot be parsed is a `BadRequest` domain failure carrying the
/// parser's explanation; a body that parses but breaks a constraint raises the
/// validator's own `ValidationErrors`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                GlobalException::with_message_and_cause(
                    ErrorCode::BadRequest,
                    rejection.body_text(),
                    rejection,
                )
            })?;

        value.validate()?;
        Ok(Self(value))
    }
}
