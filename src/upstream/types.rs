//! Request bodies, the outbound search payload and upstream errors.

use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SearchDefaults;

/// Body of `POST /api/search`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SearchQuery {
    pub origin: String,
    pub destination: String,
    pub depart_date: String,
    pub return_date: String,
}

/// Body of `POST /api/redirect`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RedirectQuery {
    pub search_id: String,
    pub terms_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Passengers {
    pub adults: u8,
    pub children: u8,
    pub infants: u8,
}

impl Passengers {
    pub const SINGLE_ADULT: Passengers = Passengers {
        adults: 1,
        children: 0,
        infants: 0,
    };
}

/// One leg of the trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub origin: String,
    pub destination: String,
    pub date: String,
}

/// JSON body of the upstream search initiation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPayload {
    pub marker: String,
    pub host: String,
    pub user_ip: String,
    pub locale: String,
    pub trip_class: String,
    pub currency: String,
    pub passengers: Passengers,
    pub segments: Vec<Segment>,
}

impl SearchPayload {
    /// Round trip for one adult: origin → destination on the departure date,
    /// then back on the return date.
    pub fn round_trip(
        query: &SearchQuery,
        marker: &str,
        host: &str,
        user_ip: &str,
        defaults: &SearchDefaults,
    ) -> Self {
        Self {
            marker: marker.to_string(),
            host: host.to_string(),
            user_ip: user_ip.to_string(),
            locale: defaults.locale.clone(),
            trip_class: defaults.trip_class.clone(),
            currency: defaults.currency.clone(),
            passengers: Passengers::SINGLE_ADULT,
            segments: vec![
                Segment {
                    origin: query.origin.clone(),
                    destination: query.destination.clone(),
                    date: query.depart_date.clone(),
                },
                Segment {
                    origin: query.destination.clone(),
                    destination: query.origin.clone(),
                    date: query.return_date.clone(),
                },
            ],
        }
    }
}

/// Upstream response body, checked to be well-formed JSON but otherwise untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamJson(pub Bytes);

impl UpstreamJson {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

/// Errors from a single upstream call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Base URL cannot carry path segments.
    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),

    /// HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    /// No response was received (DNS, connect, reset).
    #[error("Upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// No response within the configured timeout.
    #[error("Upstream request timed out after {0} seconds")]
    Timeout(u64),

    /// Upstream answered with a 4xx/5xx status. `body` is `None` when the
    /// body could not be read.
    #[error("Upstream returned {status}")]
    Status {
        status: reqwest::StatusCode,
        body: Option<String>,
    },

    /// Upstream answered 2xx with a body that is not JSON.
    #[error("Upstream returned invalid JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

impl UpstreamError {
    /// Body of the upstream response, if one was received.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            UpstreamError::Status { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Timeout(_))
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
