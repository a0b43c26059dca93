//! Service-layer error type
//!
//! `ServiceError` bridges infrastructure errors (`StoreError`,
//! `StorageError`, `sqlx::Error`) and the API-layer `AppError`, so handlers
//! can use `?` without hand-written `map_err` + logging at every call site.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::db::StoreError;
use crate::storage::StorageError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// - `Db`: infrastructure failure (logged, mapped to a system error code)
/// - `App`: business-rule error (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => ServiceError::App(
                AppError::new(ErrorCode::RestaurantNotFound).with_detail("id", id),
            ),
            other => ServiceError::Db(other.into()),
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::InvalidLocator(url) => ServiceError::App(
                AppError::new(ErrorCode::InvalidFileLocator).with_detail("fileUrl", url),
            ),
            other => {
                tracing::error!(error = %other, "Object storage operation failed");
                ServiceError::App(AppError::new(ErrorCode::FileStorageFailed))
            }
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
