//! # Host Bridge Traits
//!
//! Capabilities the metadata retriever needs from its host, expressed as
//! traits so each platform can plug in its own implementation.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Fetches media behind non-`file` URIs
//!   so the decoder can read them from memory
//! - [`LoggerSink`](time::LoggerSink) - Mirrors structured logs into the host
//!   logging pipeline (Logcat, os_log, console)
//!
//! ## Implementations
//!
//! | Platform | Implementation Crate |
//! |----------|---------------------|
//! | Desktop  | `bridge-desktop`    |
//! | Mobile   | injected by the embedding app |
//!
//! ## Error Handling
//!
//! All bridge traits report failures through [`BridgeError`](error::BridgeError).
//! Implementations should convert platform errors into it and keep the
//! message actionable (include the URL or status code).
//!
//! ## Thread Safety
//!
//! Bridge traits require `Send + Sync`: the retriever calls them from
//! background tasks and blocking decoder threads.

pub mod error;
pub mod http;
pub mod time;

pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use time::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
