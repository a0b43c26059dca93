//! PostgreSQL restaurant store

use async_trait::async_trait;
use shared::models::{Restaurant, RestaurantCreate, RestaurantStatus, RestaurantUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use super::{
    RestaurantStore, ScheduleCandidate, StoreError, StoreResult, UpdatedRestaurant,
};

const CANDIDATE_COLUMNS: &str =
    "id, owner_id, name, status, is_open, is_manual_override, opening_hours";

#[derive(Clone)]
pub struct PgRestaurantStore {
    pool: PgPool,
}

impl PgRestaurantStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RestaurantStore for PgRestaurantStore {
    async fn find_eligible(&self) -> StoreResult<Vec<ScheduleCandidate>> {
        let rows = sqlx::query_as::<_, ScheduleCandidate>(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM restaurants
             WHERE status = 'active' AND is_manual_override = FALSE"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_candidate(&self, id: i64) -> StoreResult<Option<ScheduleCandidate>> {
        let row = sqlx::query_as::<_, ScheduleCandidate>(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM restaurants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn set_open(&self, id: i64, open: bool) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE restaurants SET is_open = $2
             WHERE id = $1
               AND status = 'active'
               AND is_manual_override = FALSE
               AND is_open <> $2",
        )
        .bind(id)
        .bind(open)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn create(&self, owner_id: i64, data: RestaurantCreate) -> StoreResult<Restaurant> {
        let r = Restaurant::new(snowflake_id(), owner_id, data, now_millis());
        sqlx::query(
            "INSERT INTO restaurants (
                id, owner_id, name, description, address, contact_number, email, image,
                legal_docs, status, verification_notes, rating, num_reviews,
                is_open, is_manual_override, opening_hours, created_at, updated_at
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)",
        )
        .bind(r.id)
        .bind(r.owner_id)
        .bind(&r.name)
        .bind(&r.description)
        .bind(serde_json::to_value(&r.address)?)
        .bind(&r.contact_number)
        .bind(&r.email)
        .bind(&r.image)
        .bind(serde_json::to_value(&r.legal_docs)?)
        .bind(r.status.as_str())
        .bind(&r.verification_notes)
        .bind(r.rating)
        .bind(r.num_reviews)
        .bind(r.is_open)
        .bind(r.is_manual_override)
        .bind(serde_json::to_value(&r.opening_hours)?)
        .bind(r.created_at)
        .bind(r.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(r)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Restaurant>> {
        let row = sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_by_owner(&self, owner_id: i64) -> StoreResult<Vec<Restaurant>> {
        let rows = sqlx::query_as::<_, Restaurant>(
            "SELECT * FROM restaurants WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update(
        &self,
        id: i64,
        data: RestaurantUpdate,
    ) -> StoreResult<Option<UpdatedRestaurant>> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Restaurant>(
            "SELECT * FROM restaurants WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(mut restaurant) = current else {
            return Ok(None);
        };

        let availability_changed = restaurant.apply_update(data, now_millis());

        sqlx::query(
            "UPDATE restaurants SET
                name = $2, description = $3, address = $4, contact_number = $5,
                email = $6, image = $7, legal_docs = $8, opening_hours = $9,
                is_open = $10, is_manual_override = $11, updated_at = $12
             WHERE id = $1",
        )
        .bind(restaurant.id)
        .bind(&restaurant.name)
        .bind(&restaurant.description)
        .bind(serde_json::to_value(&restaurant.address)?)
        .bind(&restaurant.contact_number)
        .bind(&restaurant.email)
        .bind(&restaurant.image)
        .bind(serde_json::to_value(&restaurant.legal_docs)?)
        .bind(serde_json::to_value(&restaurant.opening_hours)?)
        .bind(restaurant.is_open)
        .bind(restaurant.is_manual_override)
        .bind(restaurant.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(UpdatedRestaurant {
            restaurant,
            availability_changed,
        }))
    }

    async fn reset_override(&self, id: i64) -> StoreResult<Option<Restaurant>> {
        let row = sqlx::query_as::<_, Restaurant>(
            "UPDATE restaurants SET is_manual_override = FALSE, updated_at = $2
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(now_millis())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn set_status(&self, id: i64, status: RestaurantStatus) -> StoreResult<Restaurant> {
        sqlx::query_as::<_, Restaurant>(
            "UPDATE restaurants SET status = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(now_millis())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM restaurants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
