//! Response construction.
//!
//! # Responsibilities
//! - Return upstream JSON to the client byte-for-byte
//! - Map upstream failures to the `{error, details}` body
//! - Apply the configured status policy to error bodies
//!
//! # Design Decisions
//! - Default policy answers 200 so existing frontends keep reading the body
//! - `bad_gateway` policy answers 502, or 504 when the provider timed out

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::ErrorStatusPolicy;
use crate::upstream::{UpstreamError, UpstreamJson};

/// Placeholder `details` when the provider never answered.
pub const NO_RESPONSE: &str = "No response";

/// Error body returned in place of upstream data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Whether the error body carries `details`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Details {
    Include,
    Omit,
}

impl ErrorBody {
    pub fn from_upstream(err: &UpstreamError, details: Details) -> Self {
        let details = match details {
            Details::Include => Some(
                err.response_body()
                    .map(str::to_string)
                    .unwrap_or_else(|| NO_RESPONSE.to_string()),
            ),
            Details::Omit => None,
        };
        Self {
            error: error_chain(err),
            details,
        }
    }
}

/// Status code for an upstream failure under `policy`.
pub fn failure_status(err: &UpstreamError, policy: ErrorStatusPolicy) -> StatusCode {
    match policy {
        ErrorStatusPolicy::Ok => StatusCode::OK,
        ErrorStatusPolicy::BadGateway if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
        ErrorStatusPolicy::BadGateway => StatusCode::BAD_GATEWAY,
    }
}

/// Full error response for an upstream failure.
pub fn upstream_failure(
    err: &UpstreamError,
    details: Details,
    policy: ErrorStatusPolicy,
) -> Response {
    (
        failure_status(err, policy),
        Json(ErrorBody::from_upstream(err, details)),
    )
        .into_response()
}

impl IntoResponse for UpstreamJson {
    fn into_response(self) -> Response {
        (
            [(header::CONTENT_TYPE, "application/json")],
            self.into_bytes(),
        )
            .into_response()
    }
}

/// `err` followed by its sources, joined with ": ".
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error() -> UpstreamError {
        UpstreamError::Status {
            status: reqwest::StatusCode::UNAUTHORIZED,
            body: Some("{\"message\":\"invalid marker\"}".into()),
        }
    }

    #[test]
    fn test_details_carry_upstream_body() {
        let body = ErrorBody::from_upstream(&status_error(), Details::Include);
        assert_eq!(body.error, "Upstream returned 401 Unauthorized");
        assert_eq!(body.details.as_deref(), Some("{\"message\":\"invalid marker\"}"));
    }

    #[test]
    fn test_details_placeholder_without_response() {
        let body = ErrorBody::from_upstream(&UpstreamError::Timeout(30), Details::Include);
        assert_eq!(body.details.as_deref(), Some(NO_RESPONSE));
    }

    #[test]
    fn test_details_placeholder_when_status_body_unreadable() {
        let err = UpstreamError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: None,
        };
        let body = ErrorBody::from_upstream(&err, Details::Include);
        assert_eq!(body.details.as_deref(), Some(NO_RESPONSE));
    }

    #[test]
    fn test_details_omitted_from_json() {
        let body = ErrorBody::from_upstream(&status_error(), Details::Omit);
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, serde_json::json!({"error": "Upstream returned 401 Unauthorized"}));
    }

    #[test]
    fn test_status_policy() {
        let err = status_error();
        assert_eq!(failure_status(&err, ErrorStatusPolicy::Ok), StatusCode::OK);
        assert_eq!(failure_status(&err, ErrorStatusPolicy::BadGateway), StatusCode::BAD_GATEWAY);
        assert_eq!(
            failure_status(&UpstreamError::Timeout(5), ErrorStatusPolicy::BadGateway),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            failure_status(&UpstreamError::Timeout(5), ErrorStatusPolicy::Ok),
            StatusCode::OK
        );
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let json_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = UpstreamError::Decode(json_err);
        let message = error_chain(&err);
        assert!(message.starts_with("Upstream returned invalid JSON: "));
        assert_eq!(message.matches("expected value").count(), 1);
    }
}
