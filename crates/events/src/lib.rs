//! Outbound notifications for the booking service.
//!
//! - [`delivery::webhook`] -- JSON POST with exponential-backoff retry.
//! - [`notifier`] -- composes the owner notification for a new booking
//!   and hands it to the webhook.

pub mod delivery;
pub mod notifier;

pub use delivery::webhook::{WebhookDelivery, WebhookError};
pub use notifier::{BookingNotice, BookingNotifier, NotifyError, NotifyOutcome};
