//! Flight search proxy library.
//!
//! Forwards flight searches from a browser frontend to the Travelpayouts
//! flight API, keeping the partner marker and access token server-side.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
