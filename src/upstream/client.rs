//! Flight-data provider HTTP client.
//!
//! # Responsibilities
//! - Build the three provider URLs from the configured base
//! - Attach marker and token without ever exposing them to callers' clients
//! - Classify failures (transport, timeout, status, decode)
//! - Record upstream call metrics

use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder};
use serde::de::IgnoredAny;
use url::Url;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::upstream::types::{
    RedirectQuery, SearchPayload, UpstreamError, UpstreamJson, UpstreamResult,
};

/// Header carrying the provider access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Access-Token";

/// Client for the provider's flight search API.
#[derive(Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: Url,
    marker: String,
    token: Option<String>,
    timeout: Duration,
}

impl UpstreamClient {
    /// Create a client from validated configuration.
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| UpstreamError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(config.base_url.clone()));
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("flight-proxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(UpstreamError::Client)?;

        Ok(Self {
            http,
            base_url,
            marker: config.marker.clone(),
            token: config.token.clone(),
            timeout,
        })
    }

    /// Partner marker, needed when building search payloads.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// `{base}/flight_search`
    pub fn search_url(&self) -> UpstreamResult<Url> {
        self.endpoint(&["flight_search"])
    }

    /// `{base}/flight_search_results?uuid={search_id}`
    pub fn results_url(&self, search_id: &str) -> UpstreamResult<Url> {
        let mut url = self.endpoint(&["flight_search_results"])?;
        url.query_pairs_mut().append_pair("uuid", search_id);
        Ok(url)
    }

    /// `{base}/flight_searches/{search_id}/clicks/{terms_url}.json?marker={marker}`
    ///
    /// Each value becomes exactly one path segment; `/` in input is percent-encoded.
    pub fn redirect_url(&self, query: &RedirectQuery) -> UpstreamResult<Url> {
        let terms = format!("{}.json", query.terms_url);
        let mut url = self.endpoint(&[
            "flight_searches",
            query.search_id.as_str(),
            "clicks",
            terms.as_str(),
        ])?;
        url.query_pairs_mut().append_pair("marker", &self.marker);
        Ok(url)
    }

    /// Start an asynchronous search. The response carries the search id.
    pub async fn start_search(&self, payload: &SearchPayload) -> UpstreamResult<UpstreamJson> {
        let url = self.search_url()?;
        self.send("start_search", self.http.post(url).json(payload)).await
    }

    /// Poll the results of a running search.
    pub async fn search_results(&self, search_id: &str) -> UpstreamResult<UpstreamJson> {
        let url = self.results_url(search_id)?;
        self.send("search_results", self.http.get(url)).await
    }

    /// Resolve a booking click into the agency redirect.
    pub async fn click(&self, query: &RedirectQuery) -> UpstreamResult<UpstreamJson> {
        let url = self.redirect_url(query)?;
        self.send("click", self.http.get(url)).await
    }

    fn endpoint(&self, segments: &[&str]) -> UpstreamResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> UpstreamResult<UpstreamJson> {
        let start = Instant::now();
        let request = match &self.token {
            Some(token) => request.header(ACCESS_TOKEN_HEADER, token),
            None => request,
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_upstream_call(operation, "error", start);
                return Err(self.transport_error(e));
            }
        };

        let status = response.status();
        metrics::record_upstream_call(operation, status.as_str(), start);

        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.ok();
            return Err(UpstreamError::Status { status, body });
        }

        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_slice::<IgnoredAny>(&bytes).map_err(UpstreamError::Decode)?;

        Ok(UpstreamJson(bytes))
    }

    /// The URL carries the marker, so it is dropped before the error can surface.
    fn transport_error(&self, e: reqwest::Error) -> UpstreamError {
        if e.is_timeout() {
            UpstreamError::Timeout(self.timeout.as_secs())
        } else {
            UpstreamError::Transport(e.without_url())
        }
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_secs", &self.timeout.as_secs())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
