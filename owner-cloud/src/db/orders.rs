//! PostgreSQL order and review store (read side plus owner status updates)

use async_trait::async_trait;
use shared::models::{Order, OrderStatus, Review};
use shared::util::now_millis;
use sqlx::PgPool;

use super::{OrderStore, StoreResult};

#[derive(Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn list_orders_for_restaurants(
        &self,
        restaurant_ids: &[i64],
    ) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE restaurant_id = ANY($1) ORDER BY order_date DESC",
        )
        .bind(restaurant_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_order(&self, id: i64) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn set_order_status(&self, id: i64, status: OrderStatus) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, Order>(
            "UPDATE orders SET status = $2, updated_at = $3
             WHERE id = $1 AND status NOT IN ('delivered', 'cancelled')
             RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(now_millis())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_reviews_for_restaurants(
        &self,
        restaurant_ids: &[i64],
    ) -> StoreResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE restaurant_id = ANY($1) ORDER BY created_at DESC",
        )
        .bind(restaurant_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
