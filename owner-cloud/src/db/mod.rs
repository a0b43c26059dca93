//! Database access layer
//!
//! [`RestaurantStore`] is the read/write contract shared by the owner API
//! and the schedule reconciler. [`CatalogStore`] holds the owner's menu
//! items and categories, [`OrderStore`] the orders and reviews placed by
//! customers. Each has a PostgreSQL backend and an in-memory one.

pub mod catalog;
pub mod memory;
pub mod orders;
pub mod restaurants;

pub use catalog::PgCatalogStore;
pub use memory::{MemoryCatalogStore, MemoryOrderStore, MemoryRestaurantStore};
pub use orders::PgOrderStore;
pub use restaurants::PgRestaurantStore;

use async_trait::async_trait;
use serde::Deserialize;
use shared::models::{
    Category, CategoryCreate, CategoryUpdate, MenuItem, MenuItemCreate, MenuItemUpdate,
    OpeningHours, Order, OrderStatus, Restaurant, RestaurantCreate, RestaurantStatus,
    RestaurantUpdate, Review,
};

/// Store error
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("restaurant {0} not found")]
    NotFound(i64),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The fields the reconciler reads for one restaurant
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ScheduleCandidate {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub status: RestaurantStatus,
    pub is_open: bool,
    pub is_manual_override: bool,
    /// Stored schedule, undecoded; see [`ScheduleCandidate::decode_hours`]
    pub opening_hours: serde_json::Value,
}

impl ScheduleCandidate {
    /// `status == active AND is_manual_override == false`
    pub fn is_eligible(&self) -> bool {
        self.status.is_schedulable() && !self.is_manual_override
    }

    pub fn decode_hours(&self) -> Result<Vec<OpeningHours>, serde_json::Error> {
        Vec::<OpeningHours>::deserialize(&self.opening_hours)
    }
}

impl From<&Restaurant> for ScheduleCandidate {
    fn from(r: &Restaurant) -> Self {
        Self {
            id: r.id,
            owner_id: r.owner_id,
            name: r.name.clone(),
            status: r.status,
            is_open: r.is_open,
            is_manual_override: r.is_manual_override,
            opening_hours: serde_json::to_value(&r.opening_hours)
                .unwrap_or(serde_json::Value::Null),
        }
    }
}

/// Result of a profile update
#[derive(Debug, Clone)]
pub struct UpdatedRestaurant {
    pub restaurant: Restaurant,
    /// `is_open` changed, which also engaged the manual override
    pub availability_changed: bool,
}

#[async_trait]
pub trait RestaurantStore: Send + Sync {
    /// Restaurants under automatic control (active, not overridden)
    async fn find_eligible(&self) -> StoreResult<Vec<ScheduleCandidate>>;

    /// Fresh read of one restaurant's scheduling fields, any status
    async fn get_candidate(&self, id: i64) -> StoreResult<Option<ScheduleCandidate>>;

    /// Guarded single-field write of `is_open`.
    ///
    /// Applies only while the row is still active, not overridden and holds
    /// the opposite value. Returns whether a row was written.
    async fn set_open(&self, id: i64, open: bool) -> StoreResult<bool>;

    /// Insert a new inactive restaurant
    async fn create(&self, owner_id: i64, data: RestaurantCreate) -> StoreResult<Restaurant>;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Restaurant>>;

    async fn list_by_owner(&self, owner_id: i64) -> StoreResult<Vec<Restaurant>>;

    /// Profile update; a differing `is_open` also sets `is_manual_override`
    async fn update(&self, id: i64, data: RestaurantUpdate)
    -> StoreResult<Option<UpdatedRestaurant>>;

    /// Clear the manual override, leaving `is_open` as it is
    async fn reset_override(&self, id: i64) -> StoreResult<Option<Restaurant>>;

    /// Lifecycle change; [`StoreError::NotFound`] when the row is gone
    async fn set_status(&self, id: i64, status: RestaurantStatus) -> StoreResult<Restaurant>;

    async fn delete(&self, id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn create_item(&self, owner_id: i64, data: MenuItemCreate) -> StoreResult<MenuItem>;

    async fn find_item(&self, id: i64) -> StoreResult<Option<MenuItem>>;

    async fn list_items_by_owner(&self, owner_id: i64) -> StoreResult<Vec<MenuItem>>;

    /// Active items linked to the restaurant
    async fn list_items_for_restaurant(&self, restaurant_id: i64) -> StoreResult<Vec<MenuItem>>;

    async fn update_item(&self, id: i64, data: MenuItemUpdate) -> StoreResult<Option<MenuItem>>;

    /// Replace the item's restaurant links
    async fn assign_item(&self, id: i64, restaurant_ids: &[i64]) -> StoreResult<Option<MenuItem>>;

    async fn delete_item(&self, id: i64) -> StoreResult<bool>;

    async fn create_category(&self, owner_id: i64, data: CategoryCreate) -> StoreResult<Category>;

    async fn find_category(&self, id: i64) -> StoreResult<Option<Category>>;

    async fn list_categories_by_owner(&self, owner_id: i64) -> StoreResult<Vec<Category>>;

    async fn update_category(
        &self,
        id: i64,
        data: CategoryUpdate,
    ) -> StoreResult<Option<Category>>;

    /// Children of a deleted category move to the top level
    async fn delete_category(&self, id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Newest first
    async fn list_orders_for_restaurants(&self, restaurant_ids: &[i64])
    -> StoreResult<Vec<Order>>;

    async fn find_order(&self, id: i64) -> StoreResult<Option<Order>>;

    /// Guarded status write: applies only while the stored status is not
    /// final. `None` when the order is gone or already final.
    async fn set_order_status(&self, id: i64, status: OrderStatus) -> StoreResult<Option<Order>>;

    /// Newest first
    async fn list_reviews_for_restaurants(
        &self,
        restaurant_ids: &[i64],
    ) -> StoreResult<Vec<Review>>;
}
