//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! - `HttpClient` using `reqwest` with rustls
//!
//! Logging needs no desktop adapter: the `tracing-subscriber` fmt layer set
//! up by `core-runtime` already writes to stdout.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use std::sync::Arc;
//!
//! let http = Arc::new(ReqwestHttpClient::new()?);
//! let config = RetrieverConfig::builder().http_client(http).build()?;
//! ```

mod http;

pub use http::ReqwestHttpClient;
