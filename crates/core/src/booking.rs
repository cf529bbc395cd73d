//! Booking request validation and status lifecycle.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::schedule::{canonical_slot_time, parse_slot_time, DailySchedule};

/// Label used in notifications when the customer has no barber preference.
pub const DEFAULT_BARBER_LABEL: &str = "No preference";

/// Label used in notifications when the customer left no notes.
pub const DEFAULT_NOTES_LABEL: &str = "None";

pub const MAX_FIELD_LEN: u64 = 200;
pub const MAX_NOTES_LEN: u64 = 1000;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a booking, stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Whether a booking in this status holds its slot.
    ///
    /// Only cancellation releases a slot for rebooking.
    pub fn occupies_slot(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown booking status '{s}'. Expected one of: pending, confirmed, completed, cancelled"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Booking request
// ---------------------------------------------------------------------------

/// A customer's booking request, as submitted by the public form or
/// replayed from the offline queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewBooking {
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 200, message = "phone is required"))]
    pub phone: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, max = 200, message = "service is required"))]
    pub service: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub barber: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl NewBooking {
    /// Trim every text field, drop blank optionals and canonicalise `time`.
    ///
    /// An unparsable time is left as-is so [`validate_booking_slot`] can
    /// report it.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.phone = self.phone.trim().to_string();
        self.email = self.email.trim().to_string();
        self.service = self.service.trim().to_string();
        self.barber = non_blank(self.barber);
        self.notes = non_blank(self.notes);
        if let Ok(time) = canonical_slot_time(&self.time) {
            self.time = time;
        }
        self
    }

    /// Normalise and validate the free-text fields.
    pub fn validated(self) -> Result<Self, CoreError> {
        let booking = self.normalized();
        booking.validate()?;
        Ok(booking)
    }

    pub fn barber_label(&self) -> &str {
        self.barber.as_deref().unwrap_or(DEFAULT_BARBER_LABEL)
    }

    pub fn notes_label(&self) -> &str {
        self.notes.as_deref().unwrap_or(DEFAULT_NOTES_LABEL)
    }
}

/// Check that `date`/`time` name a bookable slot.
///
/// The date must not be before `today` and the time must be one of the
/// schedule's slots. Returns the canonical `"HH:MM"` label.
pub fn validate_booking_slot(
    date: NaiveDate,
    time: &str,
    schedule: &DailySchedule,
    today: NaiveDate,
) -> Result<String, CoreError> {
    if date < today {
        return Err(CoreError::Validation(format!(
            "Date {date} is in the past"
        )));
    }

    let parsed = parse_slot_time(time)?;
    if !schedule.is_slot(parsed) {
        return Err(CoreError::Validation(format!(
            "Time {time} is outside the booking schedule"
        )));
    }

    canonical_slot_time(time)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn request() -> NewBooking {
        NewBooking {
            name: "  Carlos Souza ".to_string(),
            phone: "(71) 98888-7777".to_string(),
            email: "carlos@example.com".to_string(),
            service: "haircut".to_string(),
            barber: Some("   ".to_string()),
            date: NaiveDate::from_ymd_opt(2030, 1, 15).unwrap(),
            time: "09:30".to_string(),
            notes: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, 10).unwrap()
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in BookingStatus::ALL {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_matches!("Pendente".parse::<BookingStatus>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn only_cancelled_releases_slot() {
        assert!(BookingStatus::Pending.occupies_slot());
        assert!(BookingStatus::Confirmed.occupies_slot());
        assert!(BookingStatus::Completed.occupies_slot());
        assert!(!BookingStatus::Cancelled.occupies_slot());
    }

    #[test]
    fn normalized_trims_and_drops_blank_optionals() {
        let booking = request().normalized();
        assert_eq!(booking.name, "Carlos Souza");
        assert_eq!(booking.barber, None);
        assert_eq!(booking.barber_label(), DEFAULT_BARBER_LABEL);
        assert_eq!(booking.notes_label(), DEFAULT_NOTES_LABEL);
    }

    #[test]
    fn validated_accepts_complete_request() {
        assert!(request().validated().is_ok());
    }

    #[test]
    fn validated_rejects_blank_name() {
        let booking = NewBooking {
            name: "   ".to_string(),
            ..request()
        };
        assert_matches!(booking.validated(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn validated_rejects_bad_email() {
        let booking = NewBooking {
            email: "not-an-email".to_string(),
            ..request()
        };
        assert_matches!(booking.validated(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn validated_rejects_long_notes() {
        let booking = NewBooking {
            notes: Some("x".repeat(1001)),
            ..request()
        };
        assert_matches!(booking.validated(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn slot_check_accepts_schedule_time() {
        let schedule = DailySchedule::default();
        let date = NaiveDate::from_ymd_opt(2030, 1, 15).unwrap();
        assert_eq!(
            validate_booking_slot(date, "14:00", &schedule, today()).unwrap(),
            "14:00"
        );
    }

    #[test]
    fn slot_check_accepts_today() {
        let schedule = DailySchedule::default();
        assert!(validate_booking_slot(today(), "09:00", &schedule, today()).is_ok());
    }

    #[test]
    fn slot_check_rejects_past_date() {
        let schedule = DailySchedule::default();
        let date = NaiveDate::from_ymd_opt(2030, 1, 9).unwrap();
        assert_matches!(
            validate_booking_slot(date, "09:00", &schedule, today()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn slot_check_rejects_lunch_and_off_grid() {
        let schedule = DailySchedule::default();
        let date = NaiveDate::from_ymd_opt(2030, 1, 15).unwrap();
        assert!(validate_booking_slot(date, "12:30", &schedule, today()).is_err());
        assert!(validate_booking_slot(date, "09:10", &schedule, today()).is_err());
        assert!(validate_booking_slot(date, "later", &schedule, today()).is_err());
    }
}
