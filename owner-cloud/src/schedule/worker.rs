//! Periodic schedule worker
//!
//! Registered as `TaskKind::Periodic`. Ticks never overlap: the next tick
//! is only armed after the current one has finished. When a tick runs
//! longer than the period, missed ticks are dropped and the next tick
//! fires one full period after the overrunning tick finished.
//!
//! Shutdown is observed between ticks only; a running tick completes.

use std::sync::Arc;
use std::time::Duration;

use shared::models::LiveEvent;
use shared::util::now_millis;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::clock::Clock;
use super::reconciler::{Reconciler, TickReport};
use crate::db::RestaurantStore;
use crate::live::LiveHub;

pub struct ScheduleWorker {
    reconciler: Reconciler<dyn RestaurantStore>,
    clock: Arc<dyn Clock>,
    live: LiveHub,
    period: Duration,
    shutdown: CancellationToken,
}

impl ScheduleWorker {
    pub fn new(
        store: Arc<dyn RestaurantStore>,
        clock: Arc<dyn Clock>,
        live: LiveHub,
        period: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            reconciler: Reconciler::new(store),
            clock,
            live,
            period,
            shutdown,
        }
    }

    /// Main loop: tick immediately, then once per period until shutdown
    pub async fn run(self) {
        tracing::info!(period_secs = self.period.as_secs(), "Schedule worker started");

        let mut next_tick = Instant::now();
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep_until(next_tick) => {}
            }

            let started = Instant::now();
            let report = self.reconciler.tick(self.clock.now()).await;
            self.publish(&report);

            let elapsed = started.elapsed();
            next_tick = if elapsed > self.period {
                let missed = (elapsed.as_millis() / self.period.as_millis().max(1)) as u64;
                tracing::warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    period_ms = self.period.as_millis() as u64,
                    missed,
                    "Schedule tick overran its period, dropping missed ticks"
                );
                Instant::now() + self.period
            } else {
                started + self.period
            };
        }

        tracing::info!("Schedule worker stopped");
    }

    fn publish(&self, report: &TickReport) {
        let at = now_millis();
        for t in &report.transitions {
            self.live.publish(
                t.owner_id,
                LiveEvent::AvailabilityChanged {
                    restaurant_id: t.restaurant_id,
                    name: t.name.clone(),
                    is_open: t.current,
                    rule: Some(t.rule),
                    at,
                },
            );
        }
    }
}
