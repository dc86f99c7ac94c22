//! Flight-data provider integration.
//!
//! # Data Flow
//! ```text
//! handler input (SearchQuery / search id / RedirectQuery)
//!     → types.rs (SearchPayload built from query + config)
//!     → client.rs (URL, credentials, single HTTP call)
//!     → UpstreamJson | UpstreamError
//! ```
//!
//! # Design Decisions
//! - One pooled reqwest client, built once at startup
//! - No retries; every failure is returned to the handler
//! - Response bodies are validated as JSON but never re-encoded

pub mod client;
pub mod types;

pub use client::{UpstreamClient, ACCESS_TOKEN_HEADER};
pub use types::{
    Passengers, RedirectQuery, SearchPayload, SearchQuery, Segment, UpstreamError, UpstreamJson,
    UpstreamResult,
};
