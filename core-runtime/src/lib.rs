//! # Core Runtime Module
//!
//! Runtime infrastructure shared by the retriever crates:
//! - Logging and tracing setup
//! - Retriever configuration with fail-fast validation
//!
//! Other crates only emit `tracing` events; installing the subscriber and
//! deciding where events end up is the host's call through [`logging`].

pub mod config;
pub mod error;
pub mod logging;

pub use config::{RetrieverConfig, RetrieverConfigBuilder};
pub use error::{Error, Result};
