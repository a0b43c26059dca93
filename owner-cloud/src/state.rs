//! Application state for owner-cloud

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::{Config, StoreBackend};
use crate::db::{
    CatalogStore, MemoryCatalogStore, MemoryOrderStore, MemoryRestaurantStore, OrderStore,
    PgCatalogStore, PgOrderStore, PgRestaurantStore, RestaurantStore,
};
use crate::live::LiveHub;
use crate::storage::{ObjectStore, S3ObjectStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Persistence backends, all PostgreSQL or all in-memory
#[derive(Clone)]
pub struct Stores {
    pub restaurants: Arc<dyn RestaurantStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub orders: Arc<dyn OrderStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            restaurants: Arc::new(PgRestaurantStore::new(pool.clone())),
            catalog: Arc::new(PgCatalogStore::new(pool.clone())),
            orders: Arc::new(PgOrderStore::new(pool)),
        }
    }

    pub fn memory() -> Self {
        Self {
            restaurants: Arc::new(MemoryRestaurantStore::new()),
            catalog: Arc::new(MemoryCatalogStore::new()),
            orders: Arc::new(MemoryOrderStore::new()),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Restaurant persistence, also read by the scheduler
    pub store: Arc<dyn RestaurantStore>,
    /// Menu items and categories
    pub catalog: Arc<dyn CatalogStore>,
    /// Customer orders and reviews
    pub orders: Arc<dyn OrderStore>,
    /// Object storage; `None` when no bucket is configured
    pub storage: Option<Arc<dyn ObjectStore>>,
    /// Push fan-out to connected owner dashboards
    pub live: LiveHub,
    /// HS256 secret for owner tokens
    pub jwt_secret: String,
    /// Upload size limit in bytes
    pub max_file_size: usize,
}

impl AppState {
    /// Create a new AppState from configuration
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let stores = match config.store_backend {
            StoreBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .ok_or("DATABASE_URL must be set")?;
                let pool = PgPool::connect(url).await?;
                sqlx::migrate!("./migrations").run(&pool).await?;
                tracing::info!("PostgreSQL store ready");
                Stores::postgres(pool)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory stores, data is not persisted");
                Stores::memory()
            }
        };

        let storage: Option<Arc<dyn ObjectStore>> = match &config.s3_bucket {
            Some(bucket) => {
                let s3 = S3ObjectStore::connect(
                    bucket.clone(),
                    config.aws_region.clone(),
                    config.presigned_url_expiry,
                )
                .await;
                tracing::info!(bucket = %bucket, region = %config.aws_region, "Object storage ready");
                Some(Arc::new(s3))
            }
            None => {
                tracing::warn!("S3_BUCKET_NAME not set, file uploads are disabled");
                None
            }
        };

        Ok(Self::from_parts(
            stores,
            storage,
            config.jwt_secret.clone(),
            config.max_file_size,
        ))
    }

    /// Assemble state from already-built parts
    pub fn from_parts(
        stores: Stores,
        storage: Option<Arc<dyn ObjectStore>>,
        jwt_secret: String,
        max_file_size: usize,
    ) -> Self {
        Self {
            store: stores.restaurants,
            catalog: stores.catalog,
            orders: stores.orders,
            storage,
            live: LiveHub::new(),
            jwt_secret,
            max_file_size,
        }
    }
}
