//! Review Model

use serde::{Deserialize, Serialize};

/// Customer review of one order; written by the customer service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub restaurant_id: i64,
    pub order_id: i64,
    /// 1..=5
    pub rating: i16,
    pub comment: String,
    pub created_at: i64,
    pub updated_at: i64,
}
