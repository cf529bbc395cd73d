//! Offline-first client for the booking API.
//!
//! Bookings that cannot reach the server are kept in a local
//! [`OfflineQueue`] and replayed by [`sync`] once the API answers again.

pub mod api;
pub mod queue;
pub mod sync;

pub use api::{ApiClient, BookingRecord, ClientError};
pub use queue::{OfflineQueue, QueueError, QueuedBooking};
pub use sync::{
    offline_availability, run_sync_loop, submit, sync, RejectedEntry, SubmitOutcome, SyncReport,
};
