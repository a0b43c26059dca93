mod common;

use std::sync::Arc;

use common::{FaultyStore, restaurant, wednesday, weekly};
use owner_cloud::db::RestaurantStore;
use owner_cloud::schedule::{EntityOutcome, ReconcileError, Reconciler};
use serde_json::json;
use shared::models::{OpeningHours, RestaurantStatus, TransitionRule};

async fn is_open(store: &FaultyStore, id: i64) -> bool {
    store.inner.find_by_id(id).await.unwrap().unwrap().is_open
}

#[tokio::test]
async fn opens_inside_window_and_closes_outside() {
    let store = Arc::new(
        FaultyStore::with_rows([
            restaurant(1, RestaurantStatus::Active, false),
            restaurant(2, RestaurantStatus::Active, true),
        ])
        .await,
    );
    let reconciler = Reconciler::new(store.clone());

    let report = reconciler.tick(wednesday(10, 0)).await;
    assert_eq!(report.opened, 1);
    assert_eq!(report.unchanged, 1);
    assert_eq!(report.changed_ids, vec![1]);
    assert_eq!(report.transitions[0].rule, TransitionRule::ScheduleOpen);
    assert!(is_open(&store, 1).await);

    let report = reconciler.tick(wednesday(22, 0)).await;
    assert_eq!(report.closed, 2);
    assert_eq!(report.changed_ids, vec![1, 2]);
    assert!(report.transitions.iter().all(|t| t.rule == TransitionRule::ScheduleClose));
    assert!(!is_open(&store, 1).await);
    assert!(!is_open(&store, 2).await);
}

#[tokio::test]
async fn second_tick_at_same_instant_writes_nothing() {
    let store = Arc::new(
        FaultyStore::with_rows([
            restaurant(1, RestaurantStatus::Active, false),
            restaurant(2, RestaurantStatus::Active, false),
        ])
        .await,
    );
    let reconciler = Reconciler::new(store.clone());
    let now = wednesday(12, 30);

    let first = reconciler.tick(now).await;
    assert_eq!(first.opened, 2);
    assert_eq!(store.inner.open_writes(), 2);

    let second = reconciler.tick(now).await;
    assert!(second.changed_ids.is_empty());
    assert_eq!(second.unchanged, 2);
    assert_eq!(store.inner.open_writes(), 2);
}

#[tokio::test]
async fn manual_override_is_never_touched() {
    let mut overridden = restaurant(1, RestaurantStatus::Active, false);
    overridden.is_manual_override = true;
    let store = Arc::new(FaultyStore::with_rows([overridden]).await);
    let reconciler = Reconciler::new(store.clone());

    let report = reconciler.tick(wednesday(12, 0)).await;
    assert_eq!(report.processed(), 0);
    assert!(!is_open(&store, 1).await);
    assert_eq!(store.inner.open_writes(), 0);
}

#[tokio::test]
async fn open_override_stays_open_outside_hours() {
    let mut overridden = restaurant(1, RestaurantStatus::Active, true);
    overridden.is_manual_override = true;
    let store = Arc::new(FaultyStore::with_rows([overridden]).await);
    let reconciler = Reconciler::new(store.clone());

    // 23:00 is past closing; the owner's choice stands
    let report = reconciler.tick(wednesday(23, 0)).await;
    assert_eq!(report.processed(), 0);
    assert!(is_open(&store, 1).await);
    assert_eq!(store.inner.open_writes(), 0);

    assert!(matches!(
        reconciler.reconcile_one(1, wednesday(23, 0)).await,
        EntityOutcome::Skipped
    ));
    assert!(is_open(&store, 1).await);
}

#[tokio::test]
async fn non_active_restaurants_are_never_written() {
    let store = Arc::new(
        FaultyStore::with_rows([
            restaurant(1, RestaurantStatus::Inactive, false),
            restaurant(2, RestaurantStatus::Pending, false),
            restaurant(3, RestaurantStatus::Suspended, true),
            restaurant(4, RestaurantStatus::Rejected, false),
        ])
        .await,
    );
    let reconciler = Reconciler::new(store.clone());

    reconciler.tick(wednesday(12, 0)).await;
    reconciler.tick(wednesday(23, 0)).await;

    assert_eq!(store.inner.open_writes(), 0);
    assert!(is_open(&store, 3).await);
}

#[tokio::test]
async fn one_failing_restaurant_does_not_block_the_others() {
    let store = Arc::new(
        FaultyStore::with_rows([
            restaurant(1, RestaurantStatus::Active, false),
            restaurant(2, RestaurantStatus::Active, false),
            restaurant(3, RestaurantStatus::Active, false),
        ])
        .await,
    );
    store.fail_writes_for(2);
    let reconciler = Reconciler::new(store.clone());

    let report = reconciler.tick(wednesday(12, 0)).await;
    assert_eq!(report.opened, 2);
    assert_eq!(report.errored, 1);
    assert_eq!(report.changed_ids, vec![1, 3]);
    assert!(is_open(&store, 1).await);
    assert!(!is_open(&store, 2).await);
    assert!(is_open(&store, 3).await);
}

#[tokio::test]
async fn malformed_hours_are_reported_per_restaurant() {
    let mut broken = restaurant(1, RestaurantStatus::Active, false);
    broken.opening_hours = vec![OpeningHours::open(3, "9am", "22:00")];
    let store = Arc::new(
        FaultyStore::with_rows([broken, restaurant(2, RestaurantStatus::Active, false)]).await,
    );
    let reconciler = Reconciler::new(store.clone());

    let outcome = reconciler.reconcile_one(1, wednesday(12, 0)).await;
    assert!(matches!(
        outcome,
        EntityOutcome::Errored(ReconcileError::Evaluation { id: 1, .. })
    ));

    let report = reconciler.tick(wednesday(12, 0)).await;
    assert_eq!(report.errored, 1);
    assert_eq!(report.opened, 1);
    assert!(!is_open(&store, 1).await);
}

#[tokio::test]
async fn undecodable_hours_do_not_break_the_tick() {
    let store = Arc::new(
        FaultyStore::with_rows([
            restaurant(1, RestaurantStatus::Active, false),
            restaurant(2, RestaurantStatus::Active, false),
            restaurant(3, RestaurantStatus::Active, false),
        ])
        .await,
    );
    store.store_raw_hours(
        2,
        json!([{ "day": 3, "openTime": 900, "closeTime": "22:00", "isClosed": false }]),
    );
    let reconciler = Reconciler::new(store.clone());

    let report = reconciler.tick(wednesday(12, 0)).await;
    assert!(!report.fetch_failed);
    assert_eq!(report.opened, 2);
    assert_eq!(report.errored, 1);
    assert_eq!(report.changed_ids, vec![1, 3]);
    assert!(!is_open(&store, 2).await);

    assert!(matches!(
        reconciler.reconcile_one(2, wednesday(12, 0)).await,
        EntityOutcome::Errored(ReconcileError::Decode { id: 2, .. })
    ));
}

#[tokio::test]
async fn fetch_failure_ends_the_tick_without_writes() {
    let store = Arc::new(
        FaultyStore::with_rows([restaurant(1, RestaurantStatus::Active, false)]).await,
    );
    store.fail_fetch(true);
    let reconciler = Reconciler::new(store.clone());

    let report = reconciler.tick(wednesday(12, 0)).await;
    assert!(report.fetch_failed);
    assert_eq!(report.processed(), 0);
    assert_eq!(store.inner.open_writes(), 0);

    // The next tick recovers on its own
    store.fail_fetch(false);
    let report = reconciler.tick(wednesday(12, 0)).await;
    assert!(!report.fetch_failed);
    assert_eq!(report.opened, 1);
}

#[tokio::test]
async fn override_set_after_fetch_wins() {
    let store = Arc::new(
        FaultyStore::with_rows([
            restaurant(1, RestaurantStatus::Active, false),
            restaurant(2, RestaurantStatus::Active, false),
        ])
        .await,
    );
    store.override_after_fetch(1);
    let reconciler = Reconciler::new(store.clone());

    let report = reconciler.tick(wednesday(12, 0)).await;
    assert_eq!(report.skipped, 1);
    assert_eq!(report.opened, 1);
    assert_eq!(report.changed_ids, vec![2]);
    assert!(!is_open(&store, 1).await);
}

#[tokio::test]
async fn closed_day_closes_an_open_restaurant() {
    let mut r = restaurant(1, RestaurantStatus::Active, true);
    let mut hours = weekly("09:00", "22:00");
    hours[3] = OpeningHours::closed(3);
    r.opening_hours = hours;
    let store = Arc::new(FaultyStore::with_rows([r]).await);
    let reconciler = Reconciler::new(store.clone());

    let report = reconciler.tick(wednesday(12, 0)).await;
    assert_eq!(report.closed, 1);
    assert_eq!(report.transitions[0].rule, TransitionRule::ScheduledClosedDay);
    assert!(!is_open(&store, 1).await);
}

#[tokio::test]
async fn empty_schedule_keeps_restaurant_closed() {
    let mut r = restaurant(1, RestaurantStatus::Active, true);
    r.opening_hours.clear();
    let store = Arc::new(FaultyStore::with_rows([r]).await);
    let reconciler = Reconciler::new(store.clone());

    let report = reconciler.tick(wednesday(12, 0)).await;
    assert_eq!(report.closed, 1);
    assert!(!is_open(&store, 1).await);
}
