//! In-process stores
//!
//! Same semantics as the PostgreSQL stores; every operation runs under a
//! single `RwLock`, so each call is atomic per row.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use shared::models::{
    Category, CategoryCreate, CategoryUpdate, MenuItem, MenuItemCreate, MenuItemUpdate, Order,
    OrderStatus, Restaurant, RestaurantCreate, RestaurantStatus, RestaurantUpdate, Review,
};
use shared::util::{now_millis, snowflake_id};
use tokio::sync::RwLock;

use super::{
    CatalogStore, OrderStore, RestaurantStore, ScheduleCandidate, StoreError, StoreResult,
    UpdatedRestaurant,
};

#[derive(Default)]
pub struct MemoryRestaurantStore {
    rows: RwLock<BTreeMap<i64, Restaurant>>,
    /// Applied `set_open` writes
    open_writes: AtomicUsize,
}

impl MemoryRestaurantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a row as-is, bypassing payload validation
    pub async fn insert(&self, restaurant: Restaurant) {
        self.rows.write().await.insert(restaurant.id, restaurant);
    }

    /// Number of `set_open` calls that wrote a row
    pub fn open_writes(&self) -> usize {
        self.open_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RestaurantStore for MemoryRestaurantStore {
    async fn find_eligible(&self) -> StoreResult<Vec<ScheduleCandidate>> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|r| r.is_schedule_eligible())
            .map(ScheduleCandidate::from)
            .collect())
    }

    async fn get_candidate(&self, id: i64) -> StoreResult<Option<ScheduleCandidate>> {
        Ok(self.rows.read().await.get(&id).map(ScheduleCandidate::from))
    }

    async fn set_open(&self, id: i64, open: bool) -> StoreResult<bool> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&id) {
            Some(r) if r.is_schedule_eligible() && r.is_open != open => {
                r.is_open = open;
                self.open_writes.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn create(&self, owner_id: i64, data: RestaurantCreate) -> StoreResult<Restaurant> {
        let restaurant = Restaurant::new(snowflake_id(), owner_id, data, now_millis());
        self.rows
            .write()
            .await
            .insert(restaurant.id, restaurant.clone());
        Ok(restaurant)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Restaurant>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_id: i64) -> StoreResult<Vec<Restaurant>> {
        let rows = self.rows.read().await;
        let mut list: Vec<Restaurant> = rows
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn update(
        &self,
        id: i64,
        data: RestaurantUpdate,
    ) -> StoreResult<Option<UpdatedRestaurant>> {
        let mut rows = self.rows.write().await;
        let Some(restaurant) = rows.get_mut(&id) else {
            return Ok(None);
        };
        let availability_changed = restaurant.apply_update(data, now_millis());
        Ok(Some(UpdatedRestaurant {
            restaurant: restaurant.clone(),
            availability_changed,
        }))
    }

    async fn reset_override(&self, id: i64) -> StoreResult<Option<Restaurant>> {
        let mut rows = self.rows.write().await;
        Ok(rows.get_mut(&id).map(|r| {
            r.is_manual_override = false;
            r.updated_at = now_millis();
            r.clone()
        }))
    }

    async fn set_status(&self, id: i64, status: RestaurantStatus) -> StoreResult<Restaurant> {
        let mut rows = self.rows.write().await;
        let restaurant = rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        restaurant.status = status;
        restaurant.updated_at = now_millis();
        Ok(restaurant.clone())
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct MemoryCatalogStore {
    items: RwLock<BTreeMap<i64, MenuItem>>,
    categories: RwLock<BTreeMap<i64, Category>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(mut rows: Vec<T>, created_at: impl Fn(&T) -> i64) -> Vec<T> {
    rows.sort_by_key(|r| std::cmp::Reverse(created_at(r)));
    rows
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn create_item(&self, owner_id: i64, data: MenuItemCreate) -> StoreResult<MenuItem> {
        let item = MenuItem::new(snowflake_id(), owner_id, data, now_millis());
        self.items.write().await.insert(item.id, item.clone());
        Ok(item)
    }

    async fn find_item(&self, id: i64) -> StoreResult<Option<MenuItem>> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn list_items_by_owner(&self, owner_id: i64) -> StoreResult<Vec<MenuItem>> {
        let items = self.items.read().await;
        let list = items.values().filter(|i| i.owner_id == owner_id).cloned().collect();
        Ok(newest_first(list, |i| i.created_at))
    }

    async fn list_items_for_restaurant(&self, restaurant_id: i64) -> StoreResult<Vec<MenuItem>> {
        let items = self.items.read().await;
        let list = items
            .values()
            .filter(|i| i.is_served_at(restaurant_id))
            .cloned()
            .collect();
        Ok(newest_first(list, |i| i.created_at))
    }

    async fn update_item(&self, id: i64, data: MenuItemUpdate) -> StoreResult<Option<MenuItem>> {
        let mut items = self.items.write().await;
        Ok(items.get_mut(&id).map(|item| {
            item.apply_update(data, now_millis());
            item.clone()
        }))
    }

    async fn assign_item(&self, id: i64, restaurant_ids: &[i64]) -> StoreResult<Option<MenuItem>> {
        let mut items = self.items.write().await;
        Ok(items.get_mut(&id).map(|item| {
            item.restaurant_ids = restaurant_ids.to_vec();
            item.updated_at = now_millis();
            item.clone()
        }))
    }

    async fn delete_item(&self, id: i64) -> StoreResult<bool> {
        Ok(self.items.write().await.remove(&id).is_some())
    }

    async fn create_category(&self, owner_id: i64, data: CategoryCreate) -> StoreResult<Category> {
        let category = Category::new(snowflake_id(), owner_id, data, now_millis());
        self.categories
            .write()
            .await
            .insert(category.id, category.clone());
        Ok(category)
    }

    async fn find_category(&self, id: i64) -> StoreResult<Option<Category>> {
        Ok(self.categories.read().await.get(&id).cloned())
    }

    async fn list_categories_by_owner(&self, owner_id: i64) -> StoreResult<Vec<Category>> {
        let categories = self.categories.read().await;
        let list = categories
            .values()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect();
        Ok(newest_first(list, |c| c.created_at))
    }

    async fn update_category(
        &self,
        id: i64,
        data: CategoryUpdate,
    ) -> StoreResult<Option<Category>> {
        let mut categories = self.categories.write().await;
        Ok(categories.get_mut(&id).map(|category| {
            category.apply_update(data, now_millis());
            category.clone()
        }))
    }

    async fn delete_category(&self, id: i64) -> StoreResult<bool> {
        let mut categories = self.categories.write().await;
        if categories.remove(&id).is_none() {
            return Ok(false);
        }
        for child in categories.values_mut().filter(|c| c.parent_id == Some(id)) {
            child.parent_id = None;
        }
        Ok(true)
    }
}

#[derive(Default)]
pub struct MemoryOrderStore {
    orders: RwLock<BTreeMap<i64, Order>>,
    reviews: RwLock<BTreeMap<i64, Review>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders arrive from the customer service; seeded directly
    pub async fn insert_order(&self, order: Order) {
        self.orders.write().await.insert(order.id, order);
    }

    pub async fn insert_review(&self, review: Review) {
        self.reviews.write().await.insert(review.id, review);
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn list_orders_for_restaurants(
        &self,
        restaurant_ids: &[i64],
    ) -> StoreResult<Vec<Order>> {
        let orders = self.orders.read().await;
        let list = orders
            .values()
            .filter(|o| restaurant_ids.contains(&o.restaurant_id))
            .cloned()
            .collect();
        Ok(newest_first(list, |o| o.order_date))
    }

    async fn find_order(&self, id: i64) -> StoreResult<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn set_order_status(&self, id: i64, status: OrderStatus) -> StoreResult<Option<Order>> {
        let mut orders = self.orders.write().await;
        match orders.get_mut(&id) {
            Some(order) if !order.status.is_final() => {
                order.status = status;
                order.updated_at = now_millis();
                Ok(Some(order.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn list_reviews_for_restaurants(
        &self,
        restaurant_ids: &[i64],
    ) -> StoreResult<Vec<Review>> {
        let reviews = self.reviews.read().await;
        let list = reviews
            .values()
            .filter(|r| restaurant_ids.contains(&r.restaurant_id))
            .cloned()
            .collect();
        Ok(newest_first(list, |r| r.created_at))
    }
}
