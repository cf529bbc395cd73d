//! Submission with offline fallback, and replay of the offline queue.

use std::time::Duration;

use barber_core::booking::NewBooking;
use barber_core::schedule::{resolve_availability, Availability, DailySchedule};
use chrono::NaiveDate;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::api::{ApiClient, BookingRecord, ClientError};
use crate::queue::{OfflineQueue, QueuedBooking};

#[derive(Debug)]
pub enum SubmitOutcome {
    /// The API stored the booking.
    Submitted(BookingRecord),
    /// The API was unreachable; the booking waits in the queue.
    Queued(Uuid),
}

/// A queued booking the API refused during sync. It is dropped from the
/// queue since resending it cannot succeed.
#[derive(Debug, Clone)]
pub struct RejectedEntry {
    pub entry: QueuedBooking,
    pub status: u16,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub synced: Vec<BookingRecord>,
    pub rejected: Vec<RejectedEntry>,
    /// Entries still queued after this pass.
    pub remaining: usize,
}

/// Send a booking, falling back to the queue when the API is unreachable.
///
/// The booking is validated locally first. A 4xx or 5xx answer is returned
/// as an error and nothing is queued.
pub async fn submit(
    client: &ApiClient,
    queue: &mut OfflineQueue,
    booking: NewBooking,
) -> Result<SubmitOutcome, ClientError> {
    let booking = booking.validated()?;

    match client.create_booking(&booking).await {
        Ok(created) => Ok(SubmitOutcome::Submitted(created)),
        Err(ClientError::Unreachable(reason)) => {
            let local_id = queue.push(booking)?;
            tracing::warn!(
                %local_id,
                reason = %reason,
                pending = queue.len(),
                "API unreachable, booking queued offline",
            );
            Ok(SubmitOutcome::Queued(local_id))
        }
        Err(e) => Err(e),
    }
}

/// Replay queued bookings, oldest first.
///
/// The queue file is re-read first so entries queued by other processes are
/// included. Accepted and rejected entries leave the queue. Entries that hit
/// a server error stay. The pass stops at the first unreachable attempt.
pub async fn sync(client: &ApiClient, queue: &mut OfflineQueue) -> Result<SyncReport, ClientError> {
    queue.reload()?;
    let mut report = SyncReport::default();
    let pending: Vec<QueuedBooking> = queue.entries().to_vec();

    for entry in pending {
        match client.create_booking(&entry.booking).await {
            Ok(booking) => {
                queue.remove(entry.local_id)?;
                tracing::info!(
                    local_id = %entry.local_id,
                    booking_id = booking.id,
                    "Offline booking synced",
                );
                report.synced.push(booking);
            }
            Err(ClientError::Rejected { status, message }) => {
                queue.remove(entry.local_id)?;
                tracing::warn!(
                    local_id = %entry.local_id,
                    status,
                    message = %message,
                    "Offline booking rejected by API",
                );
                report.rejected.push(RejectedEntry {
                    entry,
                    status,
                    message,
                });
            }
            Err(ClientError::Unreachable(reason)) => {
                tracing::warn!(reason = %reason, "API unreachable, stopping sync");
                break;
            }
            Err(e) => {
                tracing::warn!(
                    local_id = %entry.local_id,
                    error = %e,
                    "Offline booking kept queued",
                );
            }
        }
    }

    report.remaining = queue.len();
    Ok(report)
}

/// Slots for `date` as far as the client can tell without the API:
/// the schedule minus bookings still sitting in the queue.
pub fn offline_availability(
    date: NaiveDate,
    schedule: &DailySchedule,
    queue: &OfflineQueue,
) -> Availability {
    let queued: Vec<String> = queue
        .entries()
        .iter()
        .filter(|e| e.booking.date == date)
        .map(|e| e.booking.time.clone())
        .collect();

    resolve_availability(date, schedule, &queued, &[])
}

/// Flush the queue whenever the API is healthy, until `cancel` fires.
///
/// The queue file is re-read on every tick, so bookings queued after the
/// loop started are picked up.
pub async fn run_sync_loop(
    client: &ApiClient,
    queue: &mut OfflineQueue,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(pending = queue.len(), "Sync loop cancelled");
                break;
            }
            _ = ticker.tick() => {
                if let Err(e) = queue.reload() {
                    tracing::error!(
                        error = %e,
                        path = %queue.path().display(),
                        "Failed to read offline queue",
                    );
                    continue;
                }
                if queue.is_empty() {
                    continue;
                }

                if let Err(e) = client.health().await {
                    tracing::debug!(error = %e, pending = queue.len(), "API not available yet");
                    continue;
                }

                match sync(client, queue).await {
                    Ok(report) => tracing::info!(
                        synced = report.synced.len(),
                        rejected = report.rejected.len(),
                        remaining = report.remaining,
                        "Sync pass complete",
                    ),
                    Err(e) => tracing::error!(error = %e, "Sync pass failed"),
                }
            }
        }
    }
}
