//! Owner-notification webhook.
//!
//! Each attempt is one JSON POST. A failed attempt waits out the next backoff
//! step and tries again, so `n` steps mean `n + 1` attempts. When every
//! attempt fails the caller gets the error of the last one.

use std::time::Duration;

use serde::Serialize;

/// Waits between attempts.
const BACKOFF: [Duration; 3] = [
    Duration::from_secs(1),
    Duration::from_secs(2),
    Duration::from_secs(4),
];

/// Deadline for a single attempt.
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// Connection, DNS or timeout failure.
    #[error("webhook unreachable: {0}")]
    Request(#[from] reqwest::Error),

    #[error("webhook answered HTTP {0}")]
    HttpStatus(u16),
}

#[derive(Debug, Clone)]
pub struct WebhookDelivery {
    client: reqwest::Client,
    backoff: Vec<Duration>,
}

impl WebhookDelivery {
    /// Three retries, 1 s, 2 s and 4 s apart.
    pub fn new() -> Self {
        Self::with_retry_delays(BACKOFF.to_vec())
    }

    /// Custom backoff steps. An empty list makes a single attempt.
    pub fn with_retry_delays(backoff: Vec<Duration>) -> Self {
        Self {
            client: reqwest::Client::new(),
            backoff,
        }
    }

    pub fn attempts(&self) -> usize {
        self.backoff.len() + 1
    }

    /// POST `payload` to `url` until an attempt gets a 2xx answer.
    pub async fn deliver<T>(&self, url: &str, payload: &T) -> Result<(), WebhookError>
    where
        T: Serialize + ?Sized,
    {
        let mut waits = self.backoff.iter();
        let mut attempt = 1;

        loop {
            let err = match self.post_once(url, payload).await {
                Ok(()) => return Ok(()),
                Err(err) => err,
            };

            let Some(wait) = waits.next() else {
                tracing::error!(url, attempts = attempt, error = %err, "Webhook delivery gave up");
                return Err(err);
            };

            tracing::warn!(
                url,
                attempt,
                retry_in_ms = wait.as_millis() as u64,
                error = %err,
                "Webhook attempt failed",
            );
            tokio::time::sleep(*wait).await;
            attempt += 1;
        }
    }

    async fn post_once<T>(&self, url: &str, payload: &T) -> Result<(), WebhookError>
    where
        T: Serialize + ?Sized,
    {
        let status = self
            .client
            .post(url)
            .timeout(ATTEMPT_TIMEOUT)
            .json(payload)
            .send()
            .await?
            .status();

        if status.is_success() {
            Ok(())
        } else {
            Err(WebhookError::HttpStatus(status.as_u16()))
        }
    }
}

impl Default for WebhookDelivery {
    fn default() -> Self {
        Self::new()
    }
}
