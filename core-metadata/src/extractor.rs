//! Audio Tag Extraction
//!
//! [`LoftyExtractor`] implements [`MediaDecoder`] on top of the `lofty` crate.
//! It supports ID3v1/ID3v2, Vorbis Comments, MP4 ilst, APE and RIFF INFO tags.
//!
//! ## Overview
//!
//! - Local files are parsed straight from the descriptor opened by the caller
//! - Other URIs are downloaded through the configured [`HttpClient`] and
//!   parsed from memory
//! - Tag lookups consult the primary tag first, then any other tag in the file
//! - The front cover is preferred over other embedded pictures
//!
//! ## Usage
//!
//! ```ignore
//! use core_metadata::extractor::LoftyExtractor;
//! use core_metadata::tag_reader::TagReader;
//! use std::sync::Arc;
//!
//! let reader = TagReader::new(Arc::new(LoftyExtractor::new()));
//! let handle = reader.open("file:///music/song.mp3")?;
//! let tags = handle.read_tags();
//! ```

use bridge_traits::http::{HttpClient, HttpRequest};
use bytes::Bytes;
use core_async::runtime::Handle;
use lofty::config::ParseOptions;
use lofty::file::{AudioFile, FileType, TaggedFile, TaggedFileExt};
use lofty::picture::PictureType;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};
use std::io::{BufReader, Cursor, Read, Seek};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::decoder::{DecodedMedia, MediaDecoder, MediaSource};
use crate::error::{MetadataError, Result};
use crate::tags::TagKey;

/// `lofty`-backed decoder.
pub struct LoftyExtractor {
    parse_options: ParseOptions,
    http_client: Option<Arc<dyn HttpClient>>,
    remote_timeout: Option<Duration>,
}

impl LoftyExtractor {
    /// Decoder for local files only.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::new(),
            http_client: None,
            remote_timeout: None,
        }
    }

    /// Decoder that fetches non-`file` sources through `client`.
    pub fn with_http_client(client: Arc<dyn HttpClient>, timeout: Duration) -> Self {
        Self {
            http_client: Some(client),
            remote_timeout: Some(timeout),
            ..Self::new()
        }
    }

    pub fn with_options(mut self, parse_options: ParseOptions) -> Self {
        self.parse_options = parse_options;
        self
    }

    fn parse<R: Read + Seek>(&self, reader: R, origin: &str) -> Result<LoftyMedia> {
        let tagged_file = Probe::new(reader)
            .options(self.parse_options)
            .guess_file_type()
            .map_err(|e| MetadataError::Decode(format!("Failed to probe {}: {}", origin, e)))?
            .read()
            .map_err(|e| MetadataError::Decode(format!("Failed to parse {}: {}", origin, e)))?;

        debug!(
            file_type = ?tagged_file.file_type(),
            tags = tagged_file.tags().len(),
            "Parsed media source"
        );

        Ok(LoftyMedia {
            tagged_file: Some(tagged_file),
        })
    }

    /// Downloads a remote source into memory.
    ///
    /// Runs on a blocking thread, so the async client is driven through the
    /// ambient runtime handle.
    fn fetch(&self, uri: &str) -> Result<Bytes> {
        let client = self.http_client.as_ref().ok_or_else(|| {
            MetadataError::UnsupportedSource(format!("No HTTP client configured for {}", uri))
        })?;

        let handle = Handle::try_current().map_err(|e| {
            MetadataError::UnsupportedSource(format!("No async runtime to fetch {}: {}", uri, e))
        })?;

        let mut request = HttpRequest::get(uri);
        if let Some(timeout) = self.remote_timeout {
            request = request.timeout(timeout);
        }

        let response = handle.block_on(client.execute(request))?;
        let body = response.into_success_body(uri)?;
        debug!(bytes = body.len(), "Fetched remote source");
        Ok(body)
    }

    /// Convert lofty FileType to MIME type string
    fn file_type_to_mime_type(file_type: FileType) -> Option<&'static str> {
        let mime = match file_type {
            FileType::Aac => "audio/aac",
            FileType::Aiff => "audio/aiff",
            FileType::Ape => "audio/ape",
            FileType::Flac => "audio/flac",
            FileType::Mpeg => "audio/mpeg",
            FileType::Mp4 => "audio/mp4",
            FileType::Mpc => "audio/musepack",
            FileType::Opus => "audio/opus",
            FileType::Vorbis => "audio/vorbis",
            FileType::Speex => "audio/speex",
            FileType::Wav => "audio/wav",
            FileType::WavPack => "audio/wavpack",
            _ => return None,
        };
        Some(mime)
    }
}

impl Default for LoftyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaDecoder for LoftyExtractor {
    fn open(&self, source: MediaSource<'_>) -> Result<Box<dyn DecodedMedia>> {
        let media = match source {
            MediaSource::File { file, path } => {
                let origin = path.display().to_string();
                self.parse(BufReader::new(file), &origin)?
            }
            MediaSource::Remote { uri } => {
                let body = self.fetch(uri)?;
                self.parse(Cursor::new(body), uri)?
            }
        };
        Ok(Box::new(media))
    }
}

/// A parsed file. Tag values and pictures are read from the in-memory
/// [`TaggedFile`] on request.
struct LoftyMedia {
    tagged_file: Option<TaggedFile>,
}

impl LoftyMedia {
    /// Tags in lookup order: primary first, then the rest as stored.
    fn tags_in_order(file: &TaggedFile) -> impl Iterator<Item = &Tag> {
        let primary = file.primary_tag();
        let primary_type = primary.map(|tag| tag.tag_type());
        primary.into_iter().chain(
            file.tags()
                .iter()
                .filter(move |tag| Some(tag.tag_type()) != primary_type),
        )
    }

    fn text(file: &TaggedFile, keys: &[ItemKey]) -> Option<String> {
        keys.iter().find_map(|key| {
            Self::tags_in_order(file)
                .find_map(|tag| tag.get_string(key))
                .map(str::to_string)
        })
    }

    fn item_keys(key: TagKey) -> Vec<ItemKey> {
        match key {
            TagKey::Title => vec![ItemKey::TrackTitle],
            TagKey::Artist => vec![ItemKey::TrackArtist],
            TagKey::Album => vec![ItemKey::AlbumTitle],
            TagKey::AlbumArtist => vec![ItemKey::AlbumArtist],
            TagKey::TrackNumber => vec![ItemKey::TrackNumber],
            TagKey::TotalTracks => vec![ItemKey::TrackTotal],
            TagKey::Year => vec![ItemKey::Year],
            TagKey::Date => vec![ItemKey::RecordingDate],
            TagKey::Genre => vec![ItemKey::Genre],
            TagKey::Author => vec![ItemKey::Composer],
            TagKey::Writer => vec![ItemKey::Writer, ItemKey::Lyricist],
            TagKey::DiscNumber => vec![ItemKey::DiscNumber],
            TagKey::MimeType | TagKey::Duration | TagKey::Bitrate => Vec::new(),
        }
    }
}

impl DecodedMedia for LoftyMedia {
    fn extract(&self, key: TagKey) -> Option<String> {
        let file = self.tagged_file.as_ref()?;
        let properties = file.properties();

        match key {
            TagKey::MimeType => {
                LoftyExtractor::file_type_to_mime_type(file.file_type()).map(str::to_string)
            }
            TagKey::Duration => {
                let millis = properties.duration().as_millis();
                (millis > 0).then(|| millis.to_string())
            }
            TagKey::Bitrate => properties
                .audio_bitrate()
                .or_else(|| properties.overall_bitrate())
                .filter(|kbps| *kbps > 0)
                .map(|kbps| (u64::from(kbps) * 1000).to_string()),
            _ => Self::text(file, &Self::item_keys(key)),
        }
    }

    fn embedded_picture(&self) -> Option<Bytes> {
        let file = self.tagged_file.as_ref()?;

        let mut fallback = None;
        for tag in Self::tags_in_order(file) {
            for picture in tag.pictures() {
                if picture.data().is_empty() {
                    continue;
                }
                if picture.pic_type() == PictureType::CoverFront {
                    return Some(Bytes::copy_from_slice(picture.data()));
                }
                if fallback.is_none() {
                    fallback = Some(picture);
                }
            }
        }

        fallback.map(|picture| Bytes::copy_from_slice(picture.data()))
    }

    fn release(&mut self) {
        if self.tagged_file.take().is_none() {
            warn!("Decoded media released twice");
        }
    }
}
