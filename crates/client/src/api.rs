//! Thin HTTP client over the public booking endpoints.

use std::time::Duration;

use barber_core::booking::{BookingStatus, NewBooking};
use barber_core::error::CoreError;
use barber_core::schedule::Availability;
use barber_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::queue::QueueError;

/// Timeout for a single API request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The API could not be reached (connection refused, DNS, timeout).
    #[error("API unreachable: {0}")]
    Unreachable(String),

    /// The API refused the request (4xx).
    #[error("Rejected with HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The API failed or answered with something unusable.
    #[error("Server error: {0}")]
    Server(String),

    /// The booking failed local validation and was never sent.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            ClientError::Unreachable(err.to_string())
        } else {
            ClientError::Server(err.to_string())
        }
    }
}

/// A stored booking as `POST /api/v1/bookings` returns it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookingRecord {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub service: String,
    pub barber: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: Timestamp,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct HealthBody {
    status: String,
}

/// Client for one API base URL, e.g. `http://localhost:3000`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Call `GET /health`. A degraded server counts as a server error.
    pub async fn health(&self) -> Result<(), ClientError> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::Server(format!(
                "Health check returned HTTP {}",
                response.status()
            )));
        }

        let body: HealthBody = response.json().await?;
        if body.status != "ok" {
            return Err(ClientError::Server(format!("API is {}", body.status)));
        }
        Ok(())
    }

    pub async fn available_times(&self, date: NaiveDate) -> Result<Availability, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/v1/available-times", self.base_url))
            .query(&[("date", date.to_string())])
            .send()
            .await?;
        read_data(response).await
    }

    pub async fn create_booking(
        &self,
        booking: &NewBooking,
    ) -> Result<BookingRecord, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/v1/bookings", self.base_url))
            .json(booking)
            .send()
            .await?;
        read_data(response).await
    }
}

/// Unwrap a `{ "data": ... }` body, or classify the failure.
async fn read_data<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        let envelope: DataEnvelope<T> = response.json().await?;
        return Ok(envelope.data);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    };

    Err(classify_status(status, message))
}

fn classify_status(status: StatusCode, message: String) -> ClientError {
    if status.is_client_error() && status != StatusCode::REQUEST_TIMEOUT {
        ClientError::Rejected {
            status: status.as_u16(),
            message,
        }
    } else {
        ClientError::Server(format!("HTTP {status}: {message}"))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn conflict_is_a_rejection() {
        let err = classify_status(StatusCode::CONFLICT, "Time slot is already booked".into());
        assert_matches!(err, ClientError::Rejected { status: 409, .. });
    }

    #[test]
    fn request_timeout_is_retryable() {
        let err = classify_status(StatusCode::REQUEST_TIMEOUT, "Request Timeout".into());
        assert_matches!(err, ClientError::Server(_));
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = ApiClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        let client = ApiClient::new("http://127.0.0.1:1").unwrap();
        assert_matches!(client.health().await, Err(ClientError::Unreachable(_)));
    }
}
