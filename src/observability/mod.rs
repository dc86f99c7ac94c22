//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handlers and upstream client produce:
//!     → logging.rs (structured log events, request-scoped spans)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty / compact / JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line via the HTTP trace span
//! - Credentials are never logged

pub mod logging;
pub mod metrics;
