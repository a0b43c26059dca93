//! Restaurant availability scheduling
//!
//! ```text
//! ScheduleWorker (periodic, one tick at a time)
//!       │ clock.now()
//!       ▼
//! Reconciler::tick(now)
//!   ├── store.find_eligible()            (active, not overridden)
//!   └── per restaurant: reconcile_one()
//!         ├── store.get_candidate(id)    (fresh re-read)
//!         ├── evaluate(hours, is_open, now)
//!         └── store.set_open(id, target) (guarded write)
//!       │ TickReport.transitions
//!       ▼
//! LiveHub → owner dashboards
//! ```

pub mod clock;
pub mod evaluate;
pub mod reconciler;
pub mod worker;

pub use clock::{Clock, FixedClock, SystemClock};
pub use evaluate::{Evaluation, ScheduleError, evaluate};
pub use reconciler::{EntityOutcome, ReconcileError, Reconciler, TickReport, Transition};
pub use worker::ScheduleWorker;
