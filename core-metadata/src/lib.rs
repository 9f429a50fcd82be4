//! # Metadata Module
//!
//! Reads descriptive tags and embedded cover art from audio sources and
//! caches the artwork on disk.
//!
//! ## Overview
//!
//! - [`tag_reader`]: opens a source URI (local `file://` paths through a file
//!   descriptor, anything else opaquely) and exposes raw tags and the
//!   embedded picture through a [`MediaDecoder`](decoder::MediaDecoder)
//! - [`extractor`]: the `lofty`-backed decoder
//! - [`normalizer`]: turns a [`RawTagSet`] into a canonical [`MetadataRecord`]
//!   (track/total splitting, year-from-date fallback)
//! - [`artwork`]: deterministic artwork file names and write-once persistence

pub mod artwork;
pub mod decoder;
pub mod error;
pub mod extractor;
pub mod normalizer;
pub mod record;
pub mod source;
pub mod tag_reader;
pub mod tags;

pub use artwork::{ArtworkCache, ArtworkCacheKey, CacheOutcome};
pub use decoder::{DecodedMedia, MediaDecoder, MediaSource};
pub use error::{MetadataError, Result};
pub use extractor::LoftyExtractor;
pub use normalizer::normalize;
pub use record::MetadataRecord;
pub use tag_reader::{SourceHandle, TagReader};
pub use tags::{RawTagSet, TagKey};
