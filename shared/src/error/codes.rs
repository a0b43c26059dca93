//! Numeric error codes shared with the owner dashboard
//!
//! The leading digit names the domain (see [`super::ErrorCategory`]).
//! Codes are wire values: never renumber one once released.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares [`ErrorCode`] with its numeric value and default message,
/// plus the `u16` lookup, from one table.
macro_rules! error_codes {
    ($( $(#[$meta:meta])* $name:ident = $value:literal => $message:literal, )+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u16", try_from = "u16")]
        #[repr(u16)]
        pub enum ErrorCode {
            $( $(#[$meta])* $name = $value, )+
        }

        impl ErrorCode {
            /// Default client-facing message
            pub const fn message(&self) -> &'static str {
                match self {
                    $( Self::$name => $message, )+
                }
            }
        }

        impl TryFrom<u16> for ErrorCode {
            type Error = InvalidErrorCode;

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok(Self::$name), )+
                    _ => Err(InvalidErrorCode(value)),
                }
            }
        }
    };
}

error_codes! {
    // 0xxx general
    Success = 0 => "Operation completed successfully",
    InvalidRequest = 5 => "Invalid request",
    InvalidFormat = 6 => "Invalid format",
    RequiredField = 7 => "Required field is missing",
    ValueOutOfRange = 8 => "Value is out of range",

    // 1xxx authentication
    NotAuthenticated = 1001 => "User is not authenticated",
    TokenExpired = 1003 => "Authentication token has expired",
    TokenInvalid = 1004 => "Authentication token is invalid",

    // 2xxx ownership and roles
    RoleRequired = 2002 => "Specific role is required",
    RestaurantNotOwned = 2010 => "Not authorized to manage this restaurant",
    MenuItemNotOwned = 2011 => "Not authorized to manage this menu item",
    CategoryNotOwned = 2012 => "Not authorized to manage this category",
    OrderNotOwned = 2013 => "Not authorized to manage this order",

    // 3xxx restaurant lifecycle
    RestaurantNotFound = 3001 => "Restaurant not found",
    LegalDocsIncomplete = 3002 => "FSSAI License Number is required for verification",
    InvalidStatusTransition = 3003 => "Restaurant status cannot be changed",
    StatusNotEditable = 3004 => "Restaurant status is managed by verification",

    // 4xxx opening hours
    InvalidOpeningHours = 4001 => "Opening hours are invalid",
    DuplicateOpeningDay = 4002 => "Opening hours contain a duplicate day",
    InvalidTimeFormat = 4003 => "Time must use the HH:mm format",
    /// Close time is not after open time
    OvernightWindowUnsupported = 4004 => "Close time must be after open time",

    // 5xxx object storage
    StorageNotConfigured = 5001 => "File storage is not configured",
    NoFileProvided = 5002 => "No file uploaded",
    EmptyFile = 5003 => "Empty file provided",
    FileTooLarge = 5004 => "File too large",
    UnsupportedFileType = 5005 => "Invalid file type. Only images and PDFs are allowed",
    /// URL does not point into the configured bucket
    InvalidFileLocator = 5006 => "Invalid file URL",
    FileStorageFailed = 5007 => "File storage failed",

    // 6xxx menu catalog
    MenuItemNotFound = 6001 => "Menu item not found",
    CategoryNotFound = 6002 => "Category not found",
    /// Some restaurant ids are unknown or belong to another owner
    InvalidRestaurantAssignment = 6003 => "One or more restaurants are invalid or not owned by you",

    // 7xxx orders
    OrderNotFound = 7001 => "Order not found",
    /// Delivered and cancelled orders are final
    OrderStatusFinal = 7002 => "Order status can no longer be changed",

    // 9xxx system
    DatabaseError = 9002 => "Database error",
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// An unknown `u16` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
