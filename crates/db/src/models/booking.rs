//! Booking model and DTOs.

use barber_core::booking::{BookingStatus, NewBooking};
use barber_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Booking {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub service: String,
    pub barber: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a booking. Built from a validated [`NewBooking`].
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub service: String,
    pub barber: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub notes: Option<String>,
}

impl From<NewBooking> for CreateBooking {
    fn from(b: NewBooking) -> Self {
        Self {
            name: b.name,
            phone: b.phone,
            email: b.email,
            service: b.service,
            barber: b.barber,
            date: b.date,
            time: b.time,
            notes: b.notes,
        }
    }
}

/// Optional filters for listing bookings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFilter {
    pub date: Option<NaiveDate>,
    pub status: Option<BookingStatus>,
}

/// DTO for an admin status change. `notes` is only written when present.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBookingStatus {
    pub status: BookingStatus,
    pub notes: Option<String>,
}
