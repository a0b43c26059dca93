#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use owner_cloud::db::{
    MemoryRestaurantStore, RestaurantStore, ScheduleCandidate, StoreError, StoreResult,
    UpdatedRestaurant,
};
use shared::models::{
    LegalDocs, OpeningHours, Restaurant, RestaurantCreate, RestaurantStatus, RestaurantUpdate,
};
use tokio::time::Instant;

pub const OWNER: i64 = 1001;

/// Same hours every day of the week
pub fn weekly(open: &str, close: &str) -> Vec<OpeningHours> {
    (0..7).map(|day| OpeningHours::open(day, open, close)).collect()
}

/// 2024-06-05 is a Wednesday (day 3)
pub fn wednesday(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 5)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

pub fn restaurant(id: i64, status: RestaurantStatus, is_open: bool) -> Restaurant {
    let mut r = Restaurant::new(
        id,
        OWNER,
        RestaurantCreate {
            name: format!("Restaurant {id}"),
            opening_hours: Some(weekly("09:00", "22:00")),
            legal_docs: Some(LegalDocs {
                fssai_license_number: Some("12345678901234".into()),
                ..Default::default()
            }),
            ..Default::default()
        },
        0,
    );
    r.status = status;
    r.is_open = is_open;
    r
}

fn unavailable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

/// Wraps the memory store with injectable faults, latency and call accounting
#[derive(Default)]
pub struct FaultyStore {
    pub inner: MemoryRestaurantStore,
    fail_fetch: AtomicBool,
    fail_writes: Mutex<HashSet<i64>>,
    /// Restaurants switched to manual override right after `find_eligible` returns
    override_after_fetch: Mutex<Vec<i64>>,
    fetch_delay: Mutex<Duration>,
    /// Stored `opening_hours` JSON served in place of the row's own hours
    raw_hours: Mutex<HashMap<i64, serde_json::Value>>,
    fetch_calls: AtomicUsize,
    fetch_started: Mutex<Vec<Instant>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_rows(rows: impl IntoIterator<Item = Restaurant>) -> Self {
        let store = Self::new();
        for r in rows {
            store.inner.insert(r).await;
        }
        store
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes_for(&self, id: i64) {
        self.fail_writes.lock().unwrap().insert(id);
    }

    pub fn override_after_fetch(&self, id: i64) {
        self.override_after_fetch.lock().unwrap().push(id);
    }

    pub fn store_raw_hours(&self, id: i64, hours: serde_json::Value) {
        self.raw_hours.lock().unwrap().insert(id, hours);
    }

    fn with_raw_hours(&self, mut candidate: ScheduleCandidate) -> ScheduleCandidate {
        if let Some(raw) = self.raw_hours.lock().unwrap().get(&candidate.id) {
            candidate.opening_hours = raw.clone();
        }
        candidate
    }

    pub fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = delay;
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_started(&self) -> Vec<Instant> {
        self.fetch_started.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RestaurantStore for FaultyStore {
    async fn find_eligible(&self) -> StoreResult<Vec<ScheduleCandidate>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.fetch_started.lock().unwrap().push(Instant::now());
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        let delay = *self.fetch_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        let candidates = self.inner.find_eligible().await?;

        let flipped: Vec<i64> = std::mem::take(&mut *self.override_after_fetch.lock().unwrap());
        for id in flipped {
            if let Some(mut row) = self.inner.find_by_id(id).await? {
                row.is_manual_override = true;
                self.inner.insert(row).await;
            }
        }
        Ok(candidates.into_iter().map(|c| self.with_raw_hours(c)).collect())
    }

    async fn get_candidate(&self, id: i64) -> StoreResult<Option<ScheduleCandidate>> {
        let candidate = self.inner.get_candidate(id).await?;
        Ok(candidate.map(|c| self.with_raw_hours(c)))
    }

    async fn set_open(&self, id: i64, open: bool) -> StoreResult<bool> {
        if self.fail_writes.lock().unwrap().contains(&id) {
            return Err(unavailable());
        }
        self.inner.set_open(id, open).await
    }

    async fn create(&self, owner_id: i64, data: RestaurantCreate) -> StoreResult<Restaurant> {
        self.inner.create(owner_id, data).await
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Restaurant>> {
        self.inner.find_by_id(id).await
    }

    async fn list_by_owner(&self, owner_id: i64) -> StoreResult<Vec<Restaurant>> {
        self.inner.list_by_owner(owner_id).await
    }

    async fn update(
        &self,
        id: i64,
        data: RestaurantUpdate,
    ) -> StoreResult<Option<UpdatedRestaurant>> {
        self.inner.update(id, data).await
    }

    async fn reset_override(&self, id: i64) -> StoreResult<Option<Restaurant>> {
        self.inner.reset_override(id).await
    }

    async fn set_status(&self, id: i64, status: RestaurantStatus) -> StoreResult<Restaurant> {
        self.inner.set_status(id, status).await
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        self.inner.delete(id).await
    }
}
