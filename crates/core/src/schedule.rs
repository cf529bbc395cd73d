//! Daily slot schedule and availability resolution.
//!
//! A day is divided into fixed-length slots between opening and closing
//! time (both inclusive), minus a lunch break. Availability for a date is
//! the schedule's slots with booked and blocked times removed.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::settings::{
    KEY_LUNCH_BREAK_END, KEY_LUNCH_BREAK_START, KEY_WORKING_HOURS_END, KEY_WORKING_HOURS_START,
};

/// Wire format for slot times (`"09:30"`).
pub const SLOT_TIME_FORMAT: &str = "%H:%M";

/// Default slot length in minutes.
pub const DEFAULT_SLOT_MINUTES: u32 = 30;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Opening hours for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    pub open: NaiveTime,
    /// Last bookable slot start (inclusive).
    pub close: NaiveTime,
    /// First minute of the lunch break (inclusive).
    pub lunch_start: NaiveTime,
    /// End of the lunch break (exclusive); a slot may start here.
    pub lunch_end: NaiveTime,
    pub slot_minutes: u32,
}

impl Default for DailySchedule {
    fn default() -> Self {
        Self {
            open: hm(9, 0),
            close: hm(18, 0),
            lunch_start: hm(12, 0),
            lunch_end: hm(14, 0),
            slot_minutes: DEFAULT_SLOT_MINUTES,
        }
    }
}

impl DailySchedule {
    /// Build a schedule from the `settings` key/value map.
    ///
    /// Missing or unparsable values fall back to the default for that field
    /// so a bad admin edit never takes the booking form down.
    pub fn from_settings(settings: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let read = |key: &str, fallback: NaiveTime| {
            settings
                .get(key)
                .and_then(|v| parse_slot_time(v).ok())
                .unwrap_or(fallback)
        };

        Self {
            open: read(KEY_WORKING_HOURS_START, defaults.open),
            close: read(KEY_WORKING_HOURS_END, defaults.close),
            lunch_start: read(KEY_LUNCH_BREAK_START, defaults.lunch_start),
            lunch_end: read(KEY_LUNCH_BREAK_END, defaults.lunch_end),
            slot_minutes: defaults.slot_minutes,
        }
    }

    /// Check that the hours describe a usable day.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.slot_minutes == 0 {
            return Err(CoreError::Validation(
                "Slot length must be greater than zero".to_string(),
            ));
        }
        if self.open >= self.close {
            return Err(CoreError::Validation(format!(
                "Opening time {} must be before closing time {}",
                format_slot_time(self.open),
                format_slot_time(self.close),
            )));
        }
        if self.lunch_start > self.lunch_end {
            return Err(CoreError::Validation(format!(
                "Lunch break start {} must not be after its end {}",
                format_slot_time(self.lunch_start),
                format_slot_time(self.lunch_end),
            )));
        }
        Ok(())
    }

    /// All bookable slot start times, in order.
    pub fn slots(&self) -> Vec<NaiveTime> {
        if self.slot_minutes == 0 {
            return Vec::new();
        }

        let open = minutes_of(self.open);
        let close = minutes_of(self.close);

        (open..=close)
            .step_by(self.slot_minutes as usize)
            .filter(|m| *m < MINUTES_PER_DAY)
            .filter_map(|m| NaiveTime::from_hms_opt(m / 60, m % 60, 0))
            .filter(|t| !self.in_lunch_break(*t))
            .collect()
    }

    /// Slots formatted as `"HH:MM"` strings.
    pub fn slot_labels(&self) -> Vec<String> {
        self.slots().into_iter().map(format_slot_time).collect()
    }

    /// Whether `time` is one of this schedule's slot start times.
    pub fn is_slot(&self, time: NaiveTime) -> bool {
        self.slots().contains(&time)
    }

    fn in_lunch_break(&self, time: NaiveTime) -> bool {
        self.lunch_start <= time && time < self.lunch_end
    }
}

/// Availability of every slot on a single date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub date: NaiveDate,
    pub available: Vec<String>,
    pub booked: Vec<String>,
    pub blocked: Vec<String>,
}

/// Subtract booked and blocked times from the schedule's slots.
///
/// `available` keeps schedule order. `booked` and `blocked` are echoed back
/// de-duplicated and sorted so clients can label unavailable slots.
pub fn resolve_availability(
    date: NaiveDate,
    schedule: &DailySchedule,
    booked: &[String],
    blocked: &[String],
) -> Availability {
    let booked: BTreeSet<String> = booked.iter().cloned().collect();
    let blocked: BTreeSet<String> = blocked.iter().cloned().collect();

    let available = schedule
        .slot_labels()
        .into_iter()
        .filter(|slot| !booked.contains(slot) && !blocked.contains(slot))
        .collect();

    Availability {
        date,
        available,
        booked: booked.into_iter().collect(),
        blocked: blocked.into_iter().collect(),
    }
}

/// Parse an `"HH:MM"` slot time.
pub fn parse_slot_time(value: &str) -> Result<NaiveTime, CoreError> {
    NaiveTime::parse_from_str(value.trim(), SLOT_TIME_FORMAT)
        .map_err(|_| CoreError::Validation(format!("Invalid time '{value}', expected HH:MM")))
}

/// Format a time as an `"HH:MM"` slot label.
pub fn format_slot_time(time: NaiveTime) -> String {
    time.format(SLOT_TIME_FORMAT).to_string()
}

/// Normalise a user-supplied time into its canonical `"HH:MM"` label.
pub fn canonical_slot_time(value: &str) -> Result<String, CoreError> {
    parse_slot_time(value).map(format_slot_time)
}

fn minutes_of(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}
