//! HTTP status for each error code

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    pub fn http_status(&self) -> StatusCode {
        use ErrorCode::*;

        match self {
            Success => StatusCode::OK,
            NotAuthenticated | TokenExpired | TokenInvalid => StatusCode::UNAUTHORIZED,
            RoleRequired | RestaurantNotOwned | MenuItemNotOwned | CategoryNotOwned
            | OrderNotOwned => StatusCode::FORBIDDEN,
            RestaurantNotFound | MenuItemNotFound | CategoryNotFound | OrderNotFound => {
                StatusCode::NOT_FOUND
            }
            InvalidStatusTransition | OrderStatusFinal => StatusCode::CONFLICT,
            FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            StorageNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            FileStorageFailed | DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
            // validation and business-rule failures
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
