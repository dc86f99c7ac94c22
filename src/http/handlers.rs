//! API handlers.
//!
//! Each proxy handler is one stateless request → upstream call → response
//! mapping. Upstream failures never escape as faults; they become error bodies.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::http::request;
use crate::http::response::{upstream_failure, Details};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::{RedirectQuery, SearchPayload, SearchQuery, UpstreamJson, UpstreamResult};

pub const GREETING: &str = "Salom, Travelpayouts saytiga xush kelibsiz!";

#[derive(Debug, Serialize)]
pub struct Greeting {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /`
pub async fn root() -> Json<Greeting> {
    Json(Greeting { message: GREETING })
}

/// `GET /health`
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /api/search`
pub async fn search_flights(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(query): Json<SearchQuery>,
) -> Response {
    let start = Instant::now();
    let request_id = request::request_id(&headers);
    let user_ip = request::client_ip(&headers, peer, state.trust_forwarded_for).to_string();
    let host = request::host(&headers);

    tracing::debug!(
        request_id = %request_id,
        origin = %query.origin,
        destination = %query.destination,
        depart_date = %query.depart_date,
        return_date = %query.return_date,
        user_ip = %user_ip,
        "Starting flight search"
    );

    let payload = SearchPayload::round_trip(
        &query,
        state.upstream.marker(),
        host,
        &user_ip,
        &state.search,
    );
    let result = state.upstream.start_search(&payload).await;
    finish(&state, "search", request_id, Details::Include, start, result)
}

/// `GET /api/results/{search_id}`
pub async fn search_results(
    State(state): State<AppState>,
    Path(search_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();
    let request_id = request::request_id(&headers);

    tracing::debug!(request_id = %request_id, search_id = %search_id, "Polling search results");

    let result = state.upstream.search_results(&search_id).await;
    finish(&state, "results", request_id, Details::Omit, start, result)
}

/// `POST /api/redirect`
pub async fn redirect_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(query): Json<RedirectQuery>,
) -> Response {
    let start = Instant::now();
    let request_id = request::request_id(&headers);

    tracing::debug!(
        request_id = %request_id,
        search_id = %query.search_id,
        terms_url = %query.terms_url,
        "Resolving booking redirect"
    );

    let result = state.upstream.click(&query).await;
    finish(&state, "redirect", request_id, Details::Omit, start, result)
}

fn finish(
    state: &AppState,
    endpoint: &'static str,
    request_id: &str,
    details: Details,
    start: Instant,
    result: UpstreamResult<UpstreamJson>,
) -> Response {
    match result {
        Ok(body) => {
            metrics::record_request(endpoint, "ok", start);
            body.into_response()
        }
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                endpoint = endpoint,
                error = %e,
                "Upstream call failed"
            );
            metrics::record_request(endpoint, "upstream_error", start);
            upstream_failure(&e, details, state.error_status)
        }
    }
}
