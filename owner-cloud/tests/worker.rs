mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{FaultyStore, OWNER, restaurant, wednesday};
use owner_cloud::db::RestaurantStore;
use owner_cloud::live::LiveHub;
use owner_cloud::schedule::{FixedClock, ScheduleWorker};
use shared::models::{LiveEvent, RestaurantStatus, TransitionRule};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

const PERIOD: Duration = Duration::from_secs(60);

fn spawn_worker(
    store: Arc<FaultyStore>,
    clock: Arc<FixedClock>,
    live: LiveHub,
) -> (CancellationToken, tokio::task::JoinHandle<()>) {
    let shutdown = CancellationToken::new();
    let worker = ScheduleWorker::new(store, clock, live, PERIOD, shutdown.clone());
    (shutdown, tokio::spawn(worker.run()))
}

fn offsets(store: &FaultyStore, origin: Instant) -> Vec<u64> {
    store
        .fetch_started()
        .into_iter()
        .map(|t| t.duration_since(origin).as_secs())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn ticks_once_per_period_starting_immediately() {
    let store = Arc::new(FaultyStore::new());
    let clock = Arc::new(FixedClock::new(wednesday(12, 0)));
    let origin = Instant::now();

    let (shutdown, handle) = spawn_worker(store.clone(), clock, LiveHub::new());
    tokio::time::sleep(Duration::from_secs(250)).await;
    shutdown.cancel();
    handle.await.unwrap();

    assert_eq!(offsets(&store, origin), vec![0, 60, 120, 180, 240]);
}

#[tokio::test(start_paused = true)]
async fn overrunning_tick_drops_missed_ticks_without_overlap() {
    let store = Arc::new(FaultyStore::new());
    store.set_fetch_delay(Duration::from_secs(150));
    let clock = Arc::new(FixedClock::new(wednesday(12, 0)));
    let origin = Instant::now();

    let (shutdown, handle) = spawn_worker(store.clone(), clock, LiveHub::new());
    tokio::time::sleep(Duration::from_secs(600)).await;
    shutdown.cancel();
    handle.await.unwrap();

    // 150s tick + 60s period after it finished
    assert_eq!(offsets(&store, origin), vec![0, 210, 420]);
    assert_eq!(store.max_in_flight(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancellation_lets_the_running_tick_finish() {
    let store = Arc::new(
        FaultyStore::with_rows([restaurant(1, RestaurantStatus::Active, false)]).await,
    );
    store.set_fetch_delay(Duration::from_secs(30));
    let clock = Arc::new(FixedClock::new(wednesday(12, 0)));

    let (shutdown, handle) = spawn_worker(store.clone(), clock, LiveHub::new());
    tokio::time::sleep(Duration::from_secs(10)).await;
    shutdown.cancel();
    handle.await.unwrap();

    assert_eq!(store.fetch_calls(), 1);
    assert!(store.inner.find_by_id(1).await.unwrap().unwrap().is_open);
}

#[tokio::test(start_paused = true)]
async fn follows_the_clock_and_publishes_transitions() {
    let store = Arc::new(
        FaultyStore::with_rows([restaurant(1, RestaurantStatus::Active, false)]).await,
    );
    let clock = Arc::new(FixedClock::new(wednesday(8, 59)));
    let live = LiveHub::new();
    let mut rx = live.subscribe(OWNER);

    let (shutdown, handle) = spawn_worker(store.clone(), clock.clone(), live);

    // 08:59, nothing to do
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(rx.try_recv().is_err());

    clock.set(wednesday(9, 0));
    let event = rx.recv().await.unwrap();
    match event {
        LiveEvent::AvailabilityChanged {
            restaurant_id,
            is_open,
            rule,
            ..
        } => {
            assert_eq!(restaurant_id, 1);
            assert!(is_open);
            assert_eq!(rule, Some(TransitionRule::ScheduleOpen));
        }
        other => panic!("unexpected event {other:?}"),
    }

    clock.set(wednesday(22, 0));
    let event = rx.recv().await.unwrap();
    assert!(matches!(
        event,
        LiveEvent::AvailabilityChanged {
            is_open: false,
            rule: Some(TransitionRule::ScheduleClose),
            ..
        }
    ));

    shutdown.cancel();
    handle.await.unwrap();
    assert!(!store.inner.find_by_id(1).await.unwrap().unwrap().is_open);
}
