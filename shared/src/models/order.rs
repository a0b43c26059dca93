//! Order Model
//!
//! Orders are placed by customers through another service; owners only
//! read them and advance their status.

use serde::{Deserialize, Serialize};

/// Fulfilment status, stored as TEXT
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::OutForDelivery => "out-for-delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// No further change once delivered or cancelled
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct InvalidOrderStatus(pub String);

impl TryFrom<String> for OrderStatus {
    type Error = InvalidOrderStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        [
            Self::Pending,
            Self::Confirmed,
            Self::Preparing,
            Self::OutForDelivery,
            Self::Delivered,
            Self::Cancelled,
        ]
        .into_iter()
        .find(|s| s.as_str() == value)
        .ok_or(InvalidOrderStatus(value))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl TryFrom<String> for PaymentStatus {
    type Error = InvalidOrderStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            _ => Err(InvalidOrderStatus(value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CashOnDelivery,
    Online,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CashOnDelivery => "cash_on_delivery",
            Self::Online => "online",
        }
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = InvalidOrderStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "cash_on_delivery" => Ok(Self::CashOnDelivery),
            "online" => Ok(Self::Online),
            _ => Err(InvalidOrderStatus(value)),
        }
    }
}

/// Line snapshot taken when the order was placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub menu_item_id: i64,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub restaurant_id: i64,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub status: OrderStatus,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub payment_status: PaymentStatus,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub payment_method: PaymentMethod,
    pub delivery_address: String,
    pub transaction_id: Option<String>,
    pub order_date: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Body of `PUT /orders/{id}/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}
