//! Core service façade and bootstrap helpers.
//!
//! This crate exposes the `MetadataRetriever` method to the host: calls come
//! in as [`MethodCall`]s, each one is processed on its own task, and the
//! single [`MethodResponse`] is delivered through a [`Reply`] callback on the
//! dedicated response thread.
//!
//! Desktop hosts typically enable the `desktop-shims` feature so network
//! sources are fetched with the reqwest-backed client from `bridge-desktop`.
//!
//! ```ignore
//! use core_service::{MetadataService, MethodCall};
//! use core_runtime::config::RetrieverConfig;
//!
//! let service = MetadataService::start(RetrieverConfig::builder().build()?)?;
//! let response = service
//!     .call(
//!         MethodCall::new("MetadataRetriever")
//!             .argument("uri", "file:///music/song.mp3")
//!             .argument("coverDirectory", "/data/covers"),
//!     )
//!     .await;
//! ```

pub mod channel;
pub mod dispatcher;
pub mod error;
pub mod request;
pub mod retriever;

pub use channel::{MethodCall, MethodResponse, Reply};
pub use dispatcher::{ResponseDispatcher, ResponseSender, RESPONSE_THREAD_NAME};
pub use error::{Result, ServiceError};
pub use request::RetrieveRequest;
pub use retriever::{MetadataRetriever, METHOD_NAME};

pub use core_metadata::MetadataRecord;
pub use core_runtime::config::RetrieverConfig;
pub use core_runtime::logging::{init_logging, LoggingConfig};

use tracing::info;

/// Primary façade exposed to host applications: the response thread plus a
/// handler bound to it.
pub struct MetadataService {
    dispatcher: ResponseDispatcher,
    retriever: MetadataRetriever,
}

impl MetadataService {
    /// Starts the response thread and builds the handler from `config`.
    ///
    /// Must be called from within a Tokio runtime; requests are spawned on
    /// that runtime.
    pub fn start(config: RetrieverConfig) -> Result<Self> {
        let dispatcher = ResponseDispatcher::start()?;
        let retriever = MetadataRetriever::new(&config, dispatcher.sender())?;

        info!(
            network_sources = config.http_client.is_some(),
            artwork_extension = %config.artwork_extension,
            "Metadata service started"
        );

        Ok(Self {
            dispatcher,
            retriever,
        })
    }

    /// Starts the service with the default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::start(RetrieverConfig::builder().build()?)
    }

    /// Handler for registering with the host's method channel.
    pub fn retriever(&self) -> &MetadataRetriever {
        &self.retriever
    }

    pub fn on_method_call(&self, call: MethodCall, reply: Reply) {
        self.retriever.on_method_call(call, reply);
    }

    pub async fn call(&self, call: MethodCall) -> MethodResponse {
        self.retriever.call(call).await
    }

    /// Stops accepting calls and waits until every queued response has been
    /// delivered. Requests still running keep the response thread alive
    /// until they finish.
    pub fn shutdown(self) {
        let Self {
            dispatcher,
            retriever,
        } = self;
        drop(retriever);
        dispatcher.shutdown();
    }
}
