//! Owner notifications end to end: settings from the database, payload
//! delivered to a local webhook stand-in.

mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use barber_core::booking::{NewBooking, DEFAULT_BARBER_LABEL};
use barber_core::settings::{KEY_BUSINESS_NAME, KEY_EMAIL_NOTIFICATIONS};
use barber_db::models::booking::{Booking, CreateBooking};
use barber_db::repositories::{BookingRepo, SettingRepo};
use barber_events::{BookingNotice, BookingNotifier, NotifyOutcome, WebhookDelivery};
use chrono::NaiveDate;
use common::spawn_hook;
use sqlx::PgPool;

async fn stored_booking(pool: &PgPool) -> Booking {
    let input = NewBooking {
        name: "Ana Lima".to_string(),
        phone: "(71) 91234-5678".to_string(),
        email: "ana@example.com".to_string(),
        service: "beard".to_string(),
        barber: None,
        date: NaiveDate::from_ymd_opt(2099, 6, 15).unwrap(),
        time: "10:30".to_string(),
        notes: Some("First visit".to_string()),
    };
    BookingRepo::create(pool, &CreateBooking::from(input))
        .await
        .unwrap()
}

async fn set(pool: &PgPool, key: &str, value: &str) {
    let values = BTreeMap::from([(key.to_string(), value.to_string())]);
    SettingRepo::upsert_many(pool, &values).await.unwrap();
}

fn notifier_for(url: String) -> BookingNotifier {
    BookingNotifier::with_delivery(Some(url), WebhookDelivery::with_retry_delays(Vec::new()))
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delivers_booking_details_to_webhook(pool: PgPool) {
    set(&pool, KEY_BUSINESS_NAME, "Navalha").await;
    let booking = stored_booking(&pool).await;
    let (url, hook) = spawn_hook(&[]).await;

    let outcome = notifier_for(url)
        .notify(&pool, &BookingNotice::from(&booking))
        .await
        .unwrap();

    assert_eq!(outcome, NotifyOutcome::Delivered);
    let received = hook.received();
    assert_eq!(received.len(), 1);

    let body = &received[0];
    assert_eq!(body["_subject"], "New booking - Navalha");
    assert_eq!(body["_replyto"], "ana@example.com");
    assert_eq!(body["booking_id"], booking.id);
    assert_eq!(body["name"], "Ana Lima");
    assert_eq!(body["date"], "2099-06-15");
    assert_eq!(body["time"], "10:30");
    assert_eq!(body["barber"], DEFAULT_BARBER_LABEL);
    assert_eq!(body["notes"], "First visit");
    // Seeded owner settings travel with the notification.
    assert_eq!(body["owner_email"], "owner@example.com");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn disabled_notifications_post_nothing(pool: PgPool) {
    set(&pool, KEY_EMAIL_NOTIFICATIONS, "false").await;
    let booking = stored_booking(&pool).await;
    let (url, hook) = spawn_hook(&[]).await;

    let outcome = notifier_for(url)
        .notify(&pool, &BookingNotice::from(&booking))
        .await
        .unwrap();

    assert_eq!(outcome, NotifyOutcome::Disabled);
    assert!(hook.received().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn failed_delivery_is_reported(pool: PgPool) {
    let booking = stored_booking(&pool).await;
    let (url, hook) = spawn_hook(&[502]).await;

    let result = notifier_for(url)
        .notify(&pool, &BookingNotice::from(&booking))
        .await;

    assert!(result.is_err());
    assert_eq!(hook.received().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn spawned_notification_runs_in_background(pool: PgPool) {
    let booking = stored_booking(&pool).await;
    let (url, hook) = spawn_hook(&[]).await;
    let notifier = Arc::new(notifier_for(url));

    notifier
        .spawn_notify(pool.clone(), BookingNotice::from(&booking))
        .await
        .unwrap();

    assert_eq!(hook.received().len(), 1);
}
