//! Decoder abstraction.
//!
//! A [`MediaDecoder`] turns an opened source into a [`DecodedMedia`] that can
//! answer per-key tag queries and hand out the embedded picture. The
//! production implementation is [`LoftyExtractor`](crate::extractor::LoftyExtractor);
//! tests substitute their own.

use bytes::Bytes;
use std::fs::File;
use std::path::Path;

use crate::error::Result;
use crate::tags::TagKey;

/// An opened source as seen by a decoder.
#[derive(Debug, Clone, Copy)]
pub enum MediaSource<'a> {
    /// Local file, opened by the caller, plus the path it was opened from
    File { file: &'a File, path: &'a Path },
    /// Opaque URI the decoder must fetch itself
    Remote { uri: &'a str },
}

impl MediaSource<'_> {
    pub fn describe(&self) -> String {
        match self {
            MediaSource::File { path, .. } => path.display().to_string(),
            MediaSource::Remote { uri } => (*uri).to_string(),
        }
    }
}

/// Opens sources for reading. Calls may block.
pub trait MediaDecoder: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when the source cannot be read or is not a
    /// recognizable media container.
    fn open(&self, source: MediaSource<'_>) -> Result<Box<dyn DecodedMedia>>;
}

/// A decoded source.
#[cfg_attr(test, mockall::automock)]
pub trait DecodedMedia: Send + Sync {
    /// Value for `key`, or `None` when the source has no such value.
    fn extract(&self, key: TagKey) -> Option<String>;

    /// Bytes of the embedded picture, produced on demand.
    fn embedded_picture(&self) -> Option<Bytes>;

    /// Releases decoder resources. Called exactly once by the owning handle.
    fn release(&mut self);
}
