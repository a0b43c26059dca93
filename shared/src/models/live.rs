//! Live push events
//!
//! Cloud → owner dashboard frames sent over the live WebSocket.

use serde::{Deserialize, Serialize};

use super::restaurant::Restaurant;

/// Schedule rule that produced an availability transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionRule {
    /// Inside today's window
    ScheduleOpen,
    /// Outside today's window
    ScheduleClose,
    /// No entry for today, or today is marked closed
    #[serde(rename = "schedule_closed_day")]
    ScheduledClosedDay,
}

impl TransitionRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScheduleOpen => "schedule_open",
            Self::ScheduleClose => "schedule_close",
            Self::ScheduledClosedDay => "schedule_closed_day",
        }
    }
}

impl std::fmt::Display for TransitionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event pushed to every connected client of one owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum LiveEvent {
    /// `is_open` flipped; `rule` is `None` for a direct owner toggle
    AvailabilityChanged {
        restaurant_id: i64,
        name: String,
        is_open: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rule: Option<TransitionRule>,
        /// Unix millis
        at: i64,
    },
    /// Profile changed through the owner API
    RestaurantUpdated { restaurant: Box<Restaurant> },
    /// Control handed back to the schedule
    OverrideReset { restaurant_id: i64 },
}

impl LiveEvent {
    pub fn restaurant_id(&self) -> i64 {
        match self {
            Self::AvailabilityChanged { restaurant_id, .. } => *restaurant_id,
            Self::RestaurantUpdated { restaurant } => restaurant.id,
            Self::OverrideReset { restaurant_id } => *restaurant_id,
        }
    }
}
