//! Opening Hours Model
//!
//! A weekly schedule is a list of at most seven [`OpeningHours`] entries,
//! one per weekday (0 = Sunday .. 6 = Saturday). Times are local wall
//! clock `HH:mm` strings in the business timezone.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ErrorCode};

/// Number of weekdays a schedule can hold
pub const DAYS_PER_WEEK: usize = 7;

/// One weekday window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OpeningHours {
    /// 0 = Sunday .. 6 = Saturday
    pub day: u8,
    #[serde(default = "default_open_time")]
    pub open_time: String,
    #[serde(default = "default_close_time")]
    pub close_time: String,
    #[serde(default)]
    pub is_closed: bool,
}

fn default_open_time() -> String {
    "09:00".to_string()
}

fn default_close_time() -> String {
    "22:00".to_string()
}

impl OpeningHours {
    /// Open window for `day` using `HH:mm` bounds
    pub fn open(day: u8, open_time: &str, close_time: &str) -> Self {
        Self {
            day,
            open_time: open_time.to_string(),
            close_time: close_time.to_string(),
            is_closed: false,
        }
    }

    /// Closed-all-day entry for `day`
    pub fn closed(day: u8) -> Self {
        Self {
            day,
            open_time: default_open_time(),
            close_time: default_close_time(),
            is_closed: true,
        }
    }
}

/// Parse a strict 24-hour `HH:mm` string into minutes since midnight.
///
/// Returns `None` for anything else (`9:00`, `24:00`, `12:60`, `12:00:00`).
pub fn parse_clock_time(value: &str) -> Option<u16> {
    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    let digit = |b: u8| b.is_ascii_digit().then(|| u16::from(b - b'0'));
    let hour = digit(bytes[0])? * 10 + digit(bytes[1])?;
    let minute = digit(bytes[3])? * 10 + digit(bytes[4])?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(hour * 60 + minute)
}

/// First entry for `day` in stored order
pub fn entry_for_day(schedule: &[OpeningHours], day: u8) -> Option<&OpeningHours> {
    schedule.iter().find(|entry| entry.day == day)
}

/// Validate a weekly schedule before it is persisted.
///
/// Rejects more than seven entries, days outside 0..=6, duplicate days,
/// malformed times and windows whose close time is not after the open
/// time (overnight windows are unsupported). Closed days only need a
/// valid day.
pub fn validate_opening_hours(schedule: &[OpeningHours]) -> AppResult<()> {
    if schedule.len() > DAYS_PER_WEEK {
        return Err(AppError::with_message(
            ErrorCode::InvalidOpeningHours,
            format!("At most {DAYS_PER_WEEK} opening hours entries are allowed"),
        )
        .with_detail("entries", schedule.len()));
    }

    let mut seen = [false; DAYS_PER_WEEK];
    for entry in schedule {
        let idx = usize::from(entry.day);
        if idx >= DAYS_PER_WEEK {
            return Err(AppError::with_message(
                ErrorCode::InvalidOpeningHours,
                format!("Day {} is out of range (0-6)", entry.day),
            )
            .with_detail("day", entry.day));
        }
        if seen[idx] {
            return Err(AppError::with_message(
                ErrorCode::DuplicateOpeningDay,
                format!("Day {} appears more than once", entry.day),
            )
            .with_detail("day", entry.day));
        }
        seen[idx] = true;

        if entry.is_closed {
            continue;
        }

        let open = parse_clock_time(&entry.open_time).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvalidTimeFormat,
                format!("Invalid open time '{}'", entry.open_time),
            )
            .with_detail("day", entry.day)
        })?;
        let close = parse_clock_time(&entry.close_time).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvalidTimeFormat,
                format!("Invalid close time '{}'", entry.close_time),
            )
            .with_detail("day", entry.day)
        })?;
        if close <= open {
            return Err(AppError::new(ErrorCode::OvernightWindowUnsupported)
                .with_detail("day", entry.day)
                .with_detail("openTime", entry.open_time.clone())
                .with_detail("closeTime", entry.close_time.clone()));
        }
    }

    Ok(())
}
