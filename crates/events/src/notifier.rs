//! New-booking notification for the shop owner.
//!
//! The owner is told about each new booking through a form-to-email
//! webhook. Whether anything is sent is controlled by the
//! `email_notifications` setting and by whether a webhook URL is
//! configured at all.

use std::collections::BTreeMap;
use std::sync::Arc;

use barber_core::booking::{DEFAULT_BARBER_LABEL, DEFAULT_NOTES_LABEL};
use barber_core::settings::{
    notifications_enabled, DEFAULT_BUSINESS_NAME, KEY_BUSINESS_NAME, KEY_OWNER_EMAIL,
    KEY_OWNER_NAME, NOTIFICATION_KEYS,
};
use barber_core::types::DbId;
use barber_db::models::booking::Booking;
use barber_db::repositories::SettingRepo;
use barber_db::DbPool;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use tokio::task::JoinHandle;

use crate::delivery::webhook::{WebhookDelivery, WebhookError};

/// The booking details included in an owner notification.
#[derive(Debug, Clone, Serialize)]
pub struct BookingNotice {
    pub booking_id: DbId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub service: String,
    pub barber: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub notes: Option<String>,
}

impl From<&Booking> for BookingNotice {
    fn from(b: &Booking) -> Self {
        Self {
            booking_id: b.id,
            name: b.name.clone(),
            phone: b.phone.clone(),
            email: b.email.clone(),
            service: b.service.clone(),
            barber: b.barber.clone(),
            date: b.date,
            time: b.time.clone(),
            notes: b.notes.clone(),
        }
    }
}

/// What happened to a notification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    Delivered,
    /// `email_notifications` is not `true`.
    Disabled,
    /// No webhook URL is configured.
    NoEndpoint,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Failed to load notification settings: {0}")]
    Settings(#[from] sqlx::Error),

    #[error(transparent)]
    Webhook(#[from] WebhookError),
}

/// Sends owner notifications for new bookings.
pub struct BookingNotifier {
    webhook_url: Option<String>,
    delivery: WebhookDelivery,
}

impl BookingNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self::with_delivery(webhook_url, WebhookDelivery::new())
    }

    pub fn with_delivery(webhook_url: Option<String>, delivery: WebhookDelivery) -> Self {
        Self {
            webhook_url,
            delivery,
        }
    }

    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url.as_deref()
    }

    /// Send the notification for one booking, honouring the settings.
    pub async fn notify(
        &self,
        pool: &DbPool,
        notice: &BookingNotice,
    ) -> Result<NotifyOutcome, NotifyError> {
        let Some(url) = self.webhook_url.as_deref() else {
            tracing::debug!(booking_id = notice.booking_id, "No webhook configured, skipping");
            return Ok(NotifyOutcome::NoEndpoint);
        };

        let settings = SettingRepo::get_many(pool, &NOTIFICATION_KEYS).await?;
        if !notifications_enabled(&settings) {
            tracing::info!(booking_id = notice.booking_id, "Booking notifications disabled");
            return Ok(NotifyOutcome::Disabled);
        }

        let payload = build_payload(notice, &settings);
        self.delivery.deliver(url, &payload).await?;

        tracing::info!(booking_id = notice.booking_id, "Booking notification delivered");
        Ok(NotifyOutcome::Delivered)
    }

    /// Run [`notify`](Self::notify) on a background task.
    ///
    /// Failures are logged; the booking itself has already been stored.
    pub fn spawn_notify(self: &Arc<Self>, pool: DbPool, notice: BookingNotice) -> JoinHandle<()> {
        let notifier = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&pool, &notice).await {
                tracing::error!(
                    booking_id = notice.booking_id,
                    error = %e,
                    "Failed to send booking notification"
                );
            }
        })
    }
}

/// Build the webhook body for a booking.
///
/// Field names follow the form-to-email convention: `_replyto` and
/// `_subject` steer the generated email.
pub fn build_payload(notice: &BookingNotice, settings: &BTreeMap<String, String>) -> serde_json::Value {
    let business = settings
        .get(KEY_BUSINESS_NAME)
        .map(String::as_str)
        .unwrap_or(DEFAULT_BUSINESS_NAME);
    let barber = notice.barber.as_deref().unwrap_or(DEFAULT_BARBER_LABEL);
    let notes = notice.notes.as_deref().unwrap_or(DEFAULT_NOTES_LABEL);

    let message = format!(
        "New booking received!\n\n\
         Customer: {name}\n\
         Phone: {phone}\n\
         Email: {email}\n\
         Service: {service}\n\
         Barber: {barber}\n\
         Date: {date}\n\
         Time: {time}\n\
         Notes: {notes}\n\n\
         Status: awaiting confirmation",
        name = notice.name,
        phone = notice.phone,
        email = notice.email,
        service = notice.service,
        date = notice.date,
        time = notice.time,
    );

    json!({
        "_replyto": notice.email,
        "_subject": format!("New booking - {business}"),
        "booking_id": notice.booking_id,
        "name": notice.name,
        "phone": notice.phone,
        "email": notice.email,
        "service": notice.service,
        "barber": barber,
        "date": notice.date,
        "time": notice.time,
        "notes": notes,
        "owner_email": settings.get(KEY_OWNER_EMAIL),
        "owner_name": settings.get(KEY_OWNER_NAME),
        "message": message,
    })
}

#[cfg(test)]
mod tests {
    use sqlx::postgres::PgPoolOptions;

    use super::*;

    fn notice() -> BookingNotice {
        BookingNotice {
            booking_id: 7,
            name: "Ana Lima".to_string(),
            phone: "(71) 91234-5678".to_string(),
            email: "ana@example.com".to_string(),
            service: "beard".to_string(),
            barber: None,
            date: NaiveDate::from_ymd_opt(2031, 2, 3).unwrap(),
            time: "15:30".to_string(),
            notes: None,
        }
    }

    fn settings() -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert(KEY_BUSINESS_NAME.to_string(), "Navalha".to_string());
        map.insert(KEY_OWNER_EMAIL.to_string(), "owner@navalha.test".to_string());
        map
    }

    #[test]
    fn payload_fills_placeholders() {
        let payload = build_payload(&notice(), &settings());

        assert_eq!(payload["_replyto"], "ana@example.com");
        assert_eq!(payload["_subject"], "New booking - Navalha");
        assert_eq!(payload["barber"], DEFAULT_BARBER_LABEL);
        assert_eq!(payload["notes"], DEFAULT_NOTES_LABEL);
        assert_eq!(payload["date"], "2031-02-03");
        assert_eq!(payload["owner_email"], "owner@navalha.test");
        assert!(payload["owner_name"].is_null());

        let message = payload["message"].as_str().unwrap();
        assert!(message.contains("Customer: Ana Lima"));
        assert!(message.contains("Time: 15:30"));
    }

    #[test]
    fn payload_uses_default_business_name() {
        let payload = build_payload(&notice(), &BTreeMap::new());
        assert_eq!(
            payload["_subject"],
            format!("New booking - {DEFAULT_BUSINESS_NAME}")
        );
    }

    #[tokio::test]
    async fn notify_without_endpoint_skips_database() {
        // Lazy pool: never connects, so the test proves no query ran.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let notifier = BookingNotifier::new(None);

        let outcome = notifier.notify(&pool, &notice()).await.unwrap();
        assert_eq!(outcome, NotifyOutcome::NoEndpoint);
    }
}
