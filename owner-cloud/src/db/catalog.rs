//! PostgreSQL menu item and category store

use async_trait::async_trait;
use shared::models::{
    Category, CategoryCreate, CategoryUpdate, MenuItem, MenuItemCreate, MenuItemUpdate,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::{PgPool, Postgres, Transaction};

use super::{CatalogStore, StoreResult};

#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn write_item(tx: &mut Transaction<'_, Postgres>, item: &MenuItem) -> StoreResult<()> {
        sqlx::query(
            "UPDATE menu_items SET
                name = $2, description = $3, price = $4, variants = $5, image = $6,
                category = $7, is_veg = $8, is_active = $9, ingredients = $10,
                restaurant_ids = $11, updated_at = $12
             WHERE id = $1",
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(serde_json::to_value(&item.variants)?)
        .bind(&item.image)
        .bind(&item.category)
        .bind(item.is_veg)
        .bind(item.is_active)
        .bind(&item.ingredients)
        .bind(&item.restaurant_ids)
        .bind(item.updated_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Row-locked read-modify-write of one menu item
    async fn modify_item(
        &self,
        id: i64,
        modify: impl FnOnce(&mut MenuItem) + Send,
    ) -> StoreResult<Option<MenuItem>> {
        let mut tx = self.pool.begin().await?;
        let current =
            sqlx::query_as::<_, MenuItem>("SELECT * FROM menu_items WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(mut item) = current else {
            return Ok(None);
        };
        modify(&mut item);
        Self::write_item(&mut tx, &item).await?;
        tx.commit().await?;
        Ok(Some(item))
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn create_item(&self, owner_id: i64, data: MenuItemCreate) -> StoreResult<MenuItem> {
        let item = MenuItem::new(snowflake_id(), owner_id, data, now_millis());
        sqlx::query(
            "INSERT INTO menu_items (
                id, owner_id, name, description, price, variants, image, category,
                is_veg, is_active, ingredients, restaurant_ids, created_at, updated_at
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(item.id)
        .bind(item.owner_id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(serde_json::to_value(&item.variants)?)
        .bind(&item.image)
        .bind(&item.category)
        .bind(item.is_veg)
        .bind(item.is_active)
        .bind(&item.ingredients)
        .bind(&item.restaurant_ids)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(item)
    }

    async fn find_item(&self, id: i64) -> StoreResult<Option<MenuItem>> {
        let row = sqlx::query_as::<_, MenuItem>("SELECT * FROM menu_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_items_by_owner(&self, owner_id: i64) -> StoreResult<Vec<MenuItem>> {
        let rows = sqlx::query_as::<_, MenuItem>(
            "SELECT * FROM menu_items WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_items_for_restaurant(&self, restaurant_id: i64) -> StoreResult<Vec<MenuItem>> {
        let rows = sqlx::query_as::<_, MenuItem>(
            "SELECT * FROM menu_items
             WHERE $1 = ANY(restaurant_ids) AND is_active = TRUE
             ORDER BY created_at DESC",
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update_item(&self, id: i64, data: MenuItemUpdate) -> StoreResult<Option<MenuItem>> {
        self.modify_item(id, |item| item.apply_update(data, now_millis()))
            .await
    }

    async fn assign_item(&self, id: i64, restaurant_ids: &[i64]) -> StoreResult<Option<MenuItem>> {
        let restaurant_ids = restaurant_ids.to_vec();
        self.modify_item(id, |item| {
            item.restaurant_ids = restaurant_ids;
            item.updated_at = now_millis();
        })
        .await
    }

    async fn delete_item(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_category(&self, owner_id: i64, data: CategoryCreate) -> StoreResult<Category> {
        let category = Category::new(snowflake_id(), owner_id, data, now_millis());
        sqlx::query(
            "INSERT INTO categories (id, owner_id, name, image, parent_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(category.id)
        .bind(category.owner_id)
        .bind(&category.name)
        .bind(&category.image)
        .bind(category.parent_id)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(category)
    }

    async fn find_category(&self, id: i64) -> StoreResult<Option<Category>> {
        let row = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_categories_by_owner(&self, owner_id: i64) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update_category(
        &self,
        id: i64,
        data: CategoryUpdate,
    ) -> StoreResult<Option<Category>> {
        let mut tx = self.pool.begin().await?;
        let current =
            sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(mut category) = current else {
            return Ok(None);
        };
        category.apply_update(data, now_millis());

        sqlx::query(
            "UPDATE categories SET name = $2, image = $3, parent_id = $4, updated_at = $5
             WHERE id = $1",
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.image)
        .bind(category.parent_id)
        .bind(category.updated_at)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(Some(category))
    }

    async fn delete_category(&self, id: i64) -> StoreResult<bool> {
        // parent_id is ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
