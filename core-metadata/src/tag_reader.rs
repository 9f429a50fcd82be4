//! Opening sources and reading their tags.

use bytes::Bytes;
use std::fs::File;
use std::sync::Arc;
use core_runtime::logging::strip_path;
use tracing::debug;

use crate::decoder::{DecodedMedia, MediaDecoder, MediaSource};
use crate::error::{MetadataError, Result};
use crate::source::SourceLocation;
use crate::tags::RawTagSet;

/// Opens sources through a [`MediaDecoder`].
///
/// All methods block; callers on an async runtime should run them through
/// `spawn_blocking`.
#[derive(Clone)]
pub struct TagReader {
    decoder: Arc<dyn MediaDecoder>,
}

impl TagReader {
    pub fn new(decoder: Arc<dyn MediaDecoder>) -> Self {
        Self { decoder }
    }

    /// Opens `uri`.
    ///
    /// `file://` URIs are resolved to a path and opened here; the decoder
    /// reads from that descriptor. Any other URI is passed to the decoder
    /// as is.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::SourceOpen`] when the local file cannot be
    /// opened, or whatever the decoder reports for unreadable content.
    pub fn open(&self, uri: &str) -> Result<SourceHandle> {
        match SourceLocation::parse(uri) {
            SourceLocation::Local(path) => {
                let file = File::open(&path).map_err(|e| MetadataError::SourceOpen {
                    uri: uri.to_string(),
                    reason: e.to_string(),
                })?;
                let media = self.decoder.open(MediaSource::File {
                    file: &file,
                    path: &path,
                })?;
                debug!(
                    file = strip_path(&path.to_string_lossy()),
                    "Opened local source"
                );
                Ok(SourceHandle::new(uri, media, Some(file)))
            }
            SourceLocation::Remote(uri) => {
                let media = self.decoder.open(MediaSource::Remote { uri: &uri })?;
                debug!(%uri, "Opened remote source");
                Ok(SourceHandle::new(&uri, media, None))
            }
        }
    }
}

/// An open source.
///
/// Dropping the handle (or calling [`close`](Self::close)) releases the
/// decoder and the file descriptor exactly once.
pub struct SourceHandle {
    uri: String,
    media: Option<Box<dyn DecodedMedia>>,
    file: Option<File>,
}

impl SourceHandle {
    fn new(uri: &str, media: Box<dyn DecodedMedia>, file: Option<File>) -> Self {
        Self {
            uri: uri.to_string(),
            media: Some(media),
            file,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Queries the decoder for every known key.
    pub fn read_tags(&self) -> RawTagSet {
        match &self.media {
            Some(media) => RawTagSet::from_lookup(|key| media.extract(key)),
            None => RawTagSet::new(),
        }
    }

    /// Embedded picture bytes, or `None` when the source has none.
    pub fn read_embedded_image(&self) -> Option<Bytes> {
        self.media
            .as_ref()
            .and_then(|media| media.embedded_picture())
            .filter(|bytes| !bytes.is_empty())
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut media) = self.media.take() {
            media.release();
            debug!(uri = %self.uri, "Released decoder");
        }
        self.file.take();
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceHandle")
            .field("uri", &self.uri)
            .field("open", &self.media.is_some())
            .field("local", &self.file.is_some())
            .finish()
    }
}
