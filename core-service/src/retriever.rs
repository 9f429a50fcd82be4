//! The `MetadataRetriever` method handler.
//!
//! Each call runs as its own task:
//!
//! 1. open the source and read its raw tags (blocking pool)
//! 2. normalize into a [`MetadataRecord`]
//! 3. respond now, unless the caller asked to wait for the artwork
//! 4. make sure the artwork file exists in the cover directory
//! 5. respond, if not done already
//!
//! A source that cannot be opened is answered with a record holding only its
//! URI. Artwork failures are logged and never change the response.

use core_async::runtime::Handle;
use core_async::task;
use core_metadata::{
    normalize, source::fallback_track_name, ArtworkCache, CacheOutcome, LoftyExtractor,
    MediaDecoder, MetadataRecord, Result as MetadataResult, SourceHandle, TagReader,
};
use core_runtime::config::RetrieverConfig;
use std::sync::Arc;
use tracing::{debug, error, info_span, warn, Instrument};

use crate::channel::{MethodCall, MethodResponse, Reply};
use crate::dispatcher::ResponseSender;
use crate::error::{Result, ServiceError};
use crate::request::RetrieveRequest;

/// Name of the only method this handler implements.
pub const METHOD_NAME: &str = "MetadataRetriever";

pub const INVALID_ARGUMENTS: &str = "invalid-arguments";
pub const SERIALIZATION_FAILED: &str = "serialization-failed";

/// Handles metadata calls. Cheap to clone; clones share the reader, cache
/// and response thread.
#[derive(Clone)]
pub struct MetadataRetriever {
    reader: TagReader,
    cache: Arc<ArtworkCache>,
    responses: ResponseSender,
    runtime: Handle,
}

impl MetadataRetriever {
    /// Builds a handler backed by [`LoftyExtractor`].
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::CapabilityMissing`] when called outside a
    /// Tokio runtime.
    pub fn new(config: &RetrieverConfig, responses: ResponseSender) -> Result<Self> {
        let extractor = match &config.http_client {
            Some(client) => LoftyExtractor::with_http_client(client.clone(), config.remote_timeout),
            None => LoftyExtractor::new(),
        };

        Self::with_decoder(
            Arc::new(extractor),
            ArtworkCache::from_config(config),
            responses,
        )
    }

    /// Builds a handler around an arbitrary decoder.
    pub fn with_decoder(
        decoder: Arc<dyn MediaDecoder>,
        cache: ArtworkCache,
        responses: ResponseSender,
    ) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| ServiceError::CapabilityMissing {
            capability: "AsyncRuntime".to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            reader: TagReader::new(decoder),
            cache: Arc::new(cache),
            responses,
            runtime,
        })
    }

    /// Entry point for host calls. Returns immediately; `reply` is invoked
    /// exactly once on the response thread.
    pub fn on_method_call(&self, call: MethodCall, reply: Reply) {
        if call.method != METHOD_NAME {
            debug!(method = %call.method, "Method not implemented");
            self.respond(reply, MethodResponse::NotImplemented);
            return;
        }

        let request = match RetrieveRequest::from_call(&call) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Rejected metadata call");
                self.respond(reply, MethodResponse::error(INVALID_ARGUMENTS, e.to_string()));
                return;
            }
        };

        let span = info_span!(
            "metadata_request",
            uri = %request.uri,
            wait = request.wait_until_artwork_saved
        );
        let this = self.clone();
        self.runtime
            .spawn(async move { this.process(request, reply).await }.instrument(span));
    }

    /// Awaitable variant of [`on_method_call`](Self::on_method_call).
    pub async fn call(&self, call: MethodCall) -> MethodResponse {
        let (tx, rx) = core_async::sync::oneshot::channel();
        self.on_method_call(
            call,
            Box::new(move |response| {
                let _ = tx.send(response);
            }),
        );

        rx.await.unwrap_or_else(|_| {
            MethodResponse::error("no-response", "Response thread dropped the reply")
        })
    }

    async fn process(self, request: RetrieveRequest, reply: Reply) {
        let fallback = MetadataRecord::fallback(request.uri.as_str());
        let mut reply = PendingReply::new(
            reply,
            Self::to_response(&fallback),
            self.responses.clone(),
        );

        let Some((handle, record)) = self.read_record(&request.uri).await else {
            reply.complete();
            return;
        };

        reply.update(Self::to_response(&record));
        if !request.wait_until_artwork_saved {
            reply.complete();
        }

        let outcome = self
            .cache
            .ensure_saved_with(&record, &request.cover_directory, || {
                handle.read_embedded_image()
            })
            .await;
        handle.close();

        match &outcome {
            CacheOutcome::Saved {
                path,
                already_existed,
            } => debug!(path = %path.display(), already_existed, "Artwork ready"),
            CacheOutcome::NotApplicable => debug!("No artwork to cache"),
            CacheOutcome::Failed { reason } => warn!(%reason, "Artwork not cached"),
        }

        reply.complete();
    }

    /// Opens the source and builds its record. `None` means the fallback
    /// path.
    async fn read_record(&self, uri: &str) -> Option<(SourceHandle, MetadataRecord)> {
        let reader = self.reader.clone();
        let source_uri = uri.to_string();

        let opened = task::spawn_blocking(move || -> MetadataResult<_> {
            let handle = reader.open(&source_uri)?;
            let tags = handle.read_tags();
            Ok((handle, tags))
        })
        .await;

        let (handle, tags) = match opened {
            Ok(Ok(opened)) => opened,
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to open source");
                return None;
            }
            Err(e) => {
                error!(error = %e, "Tag reading task failed");
                return None;
            }
        };

        let mut record = normalize(&tags).with_source_uri(uri);
        if record.track_name.is_none() {
            let name = fallback_track_name(uri);
            record.track_name = (!name.is_empty()).then_some(name);
        }
        debug!(?record, "Extracted metadata");

        Some((handle, record))
    }

    fn to_response(record: &MetadataRecord) -> MethodResponse {
        match serde_json::to_value(record) {
            Ok(value) => MethodResponse::Success(value),
            Err(e) => MethodResponse::error(SERIALIZATION_FAILED, e.to_string()),
        }
    }

    fn respond(&self, reply: Reply, response: MethodResponse) {
        if let Err(e) = self.responses.deliver(reply, response) {
            error!(error = %e, "Response could not be delivered");
        }
    }
}

/// A reply that has not been sent yet, paired with the best response known
/// so far.
///
/// If the request task unwinds before completing, dropping the guard sends
/// that response.
struct PendingReply {
    reply: Option<Reply>,
    response: MethodResponse,
    responses: ResponseSender,
}

impl PendingReply {
    fn new(reply: Reply, response: MethodResponse, responses: ResponseSender) -> Self {
        Self {
            reply: Some(reply),
            response,
            responses,
        }
    }

    fn update(&mut self, response: MethodResponse) {
        self.response = response;
    }

    /// Sends the current response. Later calls are no-ops.
    fn complete(&mut self) {
        if let Some(reply) = self.reply.take() {
            if let Err(e) = self.responses.deliver(reply, self.response.clone()) {
                error!(error = %e, "Response could not be delivered");
            }
        }
    }
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        if self.reply.is_some() {
            warn!("Request ended before responding; sending last known result");
            self.complete();
        }
    }
}
