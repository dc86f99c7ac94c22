//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the flight proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, client address handling).
    pub listener: ListenerConfig,

    /// Flight-data provider connection and credentials.
    pub upstream: UpstreamConfig,

    /// Fixed parameters of every forwarded search.
    pub search: SearchDefaults,

    /// Browser origins allowed to call the API.
    pub cors: CorsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Take the client IP from `X-Forwarded-For` instead of the socket peer.
    /// Only enable behind a reverse proxy that overwrites the header.
    pub trust_forwarded_for: bool,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            trust_forwarded_for: false,
        }
    }
}

/// Upstream provider configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Provider API root, e.g. "https://api.travelpayouts.com/v1".
    pub base_url: String,

    /// Partner marker, attached to searches and click-throughs.
    pub marker: String,

    /// Access token, sent as `X-Access-Token` when present.
    pub token: Option<String>,

    /// Total time allowed for a single upstream call in seconds.
    pub timeout_secs: u64,

    /// HTTP status used when an upstream call fails.
    pub error_status: ErrorStatusPolicy,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.travelpayouts.com/v1".to_string(),
            marker: String::new(),
            token: None,
            timeout_secs: 30,
            error_status: ErrorStatusPolicy::Ok,
        }
    }
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("marker", &redact(!self.marker.is_empty()))
            .field("token", &redact(self.token.is_some()))
            .field("timeout_secs", &self.timeout_secs)
            .field("error_status", &self.error_status)
            .finish()
    }
}

fn redact(present: bool) -> &'static str {
    if present { "<redacted>" } else { "<unset>" }
}

/// How a failed upstream call is reported to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStatusPolicy {
    /// Always 200; clients detect failure from the `error` key.
    #[default]
    Ok,
    /// 502 Bad Gateway (504 on upstream timeout).
    BadGateway,
}

/// Parameters shared by every forwarded search.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchDefaults {
    pub locale: String,
    pub currency: String,
    /// "Y" economy, "C" business.
    pub trip_class: String,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            locale: "uz".to_string(),
            currency: "UZS".to_string(),
            trip_class: "Y".to_string(),
        }
    }
}

/// CORS allow-list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to make credentialed requests.
    pub allowed_origins: Vec<String>,

    /// Deployed frontend origin, appended to `allowed_origins`.
    pub frontend_url: Option<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3000".to_string()],
            frontend_url: None,
        }
    }
}

impl CorsConfig {
    /// All configured origins, trailing slashes trimmed, duplicates removed.
    pub fn origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = Vec::new();
        for origin in self.allowed_origins.iter().chain(self.frontend_url.iter()) {
            let origin = origin.trim().trim_end_matches('/').to_string();
            if !origin.is_empty() && !origins.contains(&origin) {
                origins.push(origin);
            }
        }
        origins
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
