//! JSON body extractor answering malformed bodies with the error envelope

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use shared::error::{AppError, ErrorCode};

/// `Json<T>` whose rejection (bad syntax, wrong content type, unknown or
/// missing fields) becomes an [`AppError`] with code `InvalidRequest`
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected JSON body");
                Err(AppError::with_message(
                    ErrorCode::InvalidRequest,
                    rejection.body_text(),
                ))
            }
        }
    }
}
