//! Schedule reconciler
//!
//! Keeps `is_open` consistent with the weekly schedule for every
//! restaurant under automatic control. Stateless between ticks: every
//! decision is derived from the stored row and the `now` passed in.

use std::sync::Arc;

use chrono::NaiveDateTime;
use shared::models::TransitionRule;

use super::evaluate::{ScheduleError, evaluate};
use crate::db::{RestaurantStore, StoreError};

/// One applied availability change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub restaurant_id: i64,
    pub owner_id: i64,
    pub name: String,
    pub previous: bool,
    pub current: bool,
    pub rule: TransitionRule,
}

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("failed to read restaurant {id}: {source}")]
    Read {
        id: i64,
        #[source]
        source: StoreError,
    },
    #[error("undecodable opening hours for restaurant {id}: {source}")]
    Decode {
        id: i64,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid schedule for restaurant {id}: {source}")]
    Evaluation {
        id: i64,
        #[source]
        source: ScheduleError,
    },
    #[error("failed to persist restaurant {id}: {source}")]
    Write {
        id: i64,
        #[source]
        source: StoreError,
    },
}

/// Per-restaurant result of one tick
#[derive(Debug)]
pub enum EntityOutcome {
    Opened(Transition),
    Closed(Transition),
    Unchanged,
    /// No longer eligible when re-read, or the guarded write lost a race
    Skipped,
    Errored(ReconcileError),
}

/// Summary of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub opened: usize,
    pub closed: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub errored: usize,
    /// Restaurants whose `is_open` was written, in processing order
    pub changed_ids: Vec<i64>,
    pub transitions: Vec<Transition>,
    /// The eligible set could not be loaded; nothing was processed
    pub fetch_failed: bool,
}

impl TickReport {
    pub fn processed(&self) -> usize {
        self.opened + self.closed + self.unchanged + self.skipped + self.errored
    }

    fn record(&mut self, outcome: EntityOutcome) {
        match outcome {
            EntityOutcome::Opened(t) => {
                self.opened += 1;
                self.push_transition(t);
            }
            EntityOutcome::Closed(t) => {
                self.closed += 1;
                self.push_transition(t);
            }
            EntityOutcome::Unchanged => self.unchanged += 1,
            EntityOutcome::Skipped => self.skipped += 1,
            EntityOutcome::Errored(e) => {
                tracing::error!(error = %e, "Schedule reconciliation failed for restaurant");
                self.errored += 1;
            }
        }
    }

    fn push_transition(&mut self, t: Transition) {
        self.changed_ids.push(t.restaurant_id);
        self.transitions.push(t);
    }
}

pub struct Reconciler<S: RestaurantStore + ?Sized> {
    store: Arc<S>,
}

impl<S: RestaurantStore + ?Sized> Clone for Reconciler<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: RestaurantStore + ?Sized> Reconciler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Run one reconciliation pass at `now`.
    ///
    /// Never fails: a fetch failure ends the pass with `fetch_failed` set,
    /// and per-restaurant failures are counted in `errored`.
    pub async fn tick(&self, now: NaiveDateTime) -> TickReport {
        let mut report = TickReport::default();

        let candidates = match self.store.find_eligible().await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load eligible restaurants, skipping tick");
                report.fetch_failed = true;
                return report;
            }
        };

        for candidate in &candidates {
            let outcome = self.reconcile_one(candidate.id, now).await;
            report.record(outcome);
        }

        tracing::debug!(
            now = %now,
            eligible = candidates.len(),
            opened = report.opened,
            closed = report.closed,
            unchanged = report.unchanged,
            skipped = report.skipped,
            errored = report.errored,
            "Schedule tick complete"
        );

        report
    }

    /// Re-read, decide and write for a single restaurant
    pub async fn reconcile_one(&self, id: i64, now: NaiveDateTime) -> EntityOutcome {
        let candidate = match self.store.get_candidate(id).await {
            Ok(Some(c)) => c,
            Ok(None) => return EntityOutcome::Skipped,
            Err(source) => return EntityOutcome::Errored(ReconcileError::Read { id, source }),
        };

        if !candidate.is_eligible() {
            tracing::debug!(restaurant_id = id, "Restaurant left automatic control, skipping");
            return EntityOutcome::Skipped;
        }

        let hours = match candidate.decode_hours() {
            Ok(h) => h,
            Err(source) => return EntityOutcome::Errored(ReconcileError::Decode { id, source }),
        };

        let evaluation = match evaluate(&hours, candidate.is_open, now) {
            Ok(e) => e,
            Err(source) => {
                return EntityOutcome::Errored(ReconcileError::Evaluation { id, source });
            }
        };

        if !evaluation.changed {
            return EntityOutcome::Unchanged;
        }

        match self.store.set_open(id, evaluation.target_open).await {
            Ok(true) => {
                let transition = Transition {
                    restaurant_id: id,
                    owner_id: candidate.owner_id,
                    name: candidate.name,
                    previous: candidate.is_open,
                    current: evaluation.target_open,
                    rule: evaluation.rule,
                };
                tracing::info!(
                    restaurant_id = id,
                    name = %transition.name,
                    previous = transition.previous,
                    current = transition.current,
                    rule = %transition.rule,
                    "{} restaurant by schedule",
                    if transition.current { "Opened" } else { "Closed" }
                );
                if transition.current {
                    EntityOutcome::Opened(transition)
                } else {
                    EntityOutcome::Closed(transition)
                }
            }
            Ok(false) => {
                tracing::debug!(restaurant_id = id, "Guarded write not applied, skipping");
                EntityOutcome::Skipped
            }
            Err(source) => EntityOutcome::Errored(ReconcileError::Write { id, source }),
        }
    }
}
