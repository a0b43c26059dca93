//! Pure open/closed decision for one weekly schedule

use chrono::{Datelike, NaiveDateTime, Timelike};
use shared::models::{OpeningHours, TransitionRule, entry_for_day, parse_clock_time};

/// Decision for one restaurant at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub target_open: bool,
    /// `target_open != currently_open`
    pub changed: bool,
    pub rule: TransitionRule,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("invalid {field} '{value}' for day {day}")]
    InvalidTime {
        day: u8,
        field: &'static str,
        value: String,
    },
}

/// Decide whether a restaurant should be open at `now` (local wall time).
///
/// Minute resolution: seconds are ignored. The window is
/// `open_time <= now < close_time`; a missing or closed entry for today
/// means closed. Only today's first matching entry is inspected.
pub fn evaluate(
    schedule: &[OpeningHours],
    currently_open: bool,
    now: NaiveDateTime,
) -> Result<Evaluation, ScheduleError> {
    let day = now.weekday().num_days_from_sunday() as u8;
    let minute = (now.hour() * 60 + now.minute()) as u16;

    let (target_open, rule) = match entry_for_day(schedule, day) {
        None => (false, TransitionRule::ScheduledClosedDay),
        Some(entry) if entry.is_closed => (false, TransitionRule::ScheduledClosedDay),
        Some(entry) => {
            let open = clock_minutes(day, "open_time", &entry.open_time)?;
            let close = clock_minutes(day, "close_time", &entry.close_time)?;
            if minute >= open && minute < close {
                (true, TransitionRule::ScheduleOpen)
            } else {
                (false, TransitionRule::ScheduleClose)
            }
        }
    };

    Ok(Evaluation {
        target_open,
        changed: target_open != currently_open,
        rule,
    })
}

fn clock_minutes(day: u8, field: &'static str, value: &str) -> Result<u16, ScheduleError> {
    parse_clock_time(value).ok_or_else(|| ScheduleError::InvalidTime {
        day,
        field,
        value: value.to_string(),
    })
}
