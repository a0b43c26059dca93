//! Error codes, `AppError` and the API response envelope
//!
//! Code ranges: 0xxx general, 1xxx auth, 2xxx ownership, 3xxx restaurant,
//! 4xxx opening hours, 5xxx storage, 6xxx menu, 7xxx orders, 9xxx system.
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::DuplicateOpeningDay, "Day 3 appears twice")
//!     .with_detail("day", 3);
//! let body = ApiResponse::from(&err);
//! assert_eq!(body.code, 4002);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
