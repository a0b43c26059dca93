//! Data models
//!
//! Shared between owner-cloud and the owner dashboard (via API).
//! Enums stored as TEXT decode through `TryFrom<String>` (`sqlx(try_from)`).
//! All IDs are `i64` snowflakes (see [`crate::util::snowflake_id`]).

pub mod category;
pub mod live;
pub mod menu;
pub mod opening_hours;
pub mod order;
pub mod restaurant;
pub mod review;

// Re-exports
pub use category::*;
pub use live::*;
pub use menu::*;
pub use opening_hours::*;
pub use order::*;
pub use restaurant::*;
pub use review::*;
