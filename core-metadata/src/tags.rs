//! Raw tag vocabulary shared by decoders and the normalizer.

use std::collections::HashMap;

/// Keys a decoder is asked for when reading a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKey {
    Title,
    Artist,
    Album,
    AlbumArtist,
    /// May be `"N"` or `"N/M"`
    TrackNumber,
    TotalTracks,
    Year,
    /// Free-form date, usually ISO-8601
    Date,
    Genre,
    Author,
    Writer,
    DiscNumber,
    MimeType,
    /// Milliseconds
    Duration,
    /// Bits per second
    Bitrate,
}

impl TagKey {
    pub const ALL: [TagKey; 15] = [
        TagKey::Title,
        TagKey::Artist,
        TagKey::Album,
        TagKey::AlbumArtist,
        TagKey::TrackNumber,
        TagKey::TotalTracks,
        TagKey::Year,
        TagKey::Date,
        TagKey::Genre,
        TagKey::Author,
        TagKey::Writer,
        TagKey::DiscNumber,
        TagKey::MimeType,
        TagKey::Duration,
        TagKey::Bitrate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagKey::Title => "title",
            TagKey::Artist => "artist",
            TagKey::Album => "album",
            TagKey::AlbumArtist => "albumArtist",
            TagKey::TrackNumber => "trackNumber",
            TagKey::TotalTracks => "totalTracks",
            TagKey::Year => "year",
            TagKey::Date => "date",
            TagKey::Genre => "genre",
            TagKey::Author => "author",
            TagKey::Writer => "writer",
            TagKey::DiscNumber => "discNumber",
            TagKey::MimeType => "mimeType",
            TagKey::Duration => "duration",
            TagKey::Bitrate => "bitrate",
        }
    }
}

impl std::fmt::Display for TagKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw string values as reported by a decoder, before normalization.
///
/// Keys the decoder had no value for are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTagSet {
    values: HashMap<TagKey, String>,
}

impl RawTagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set by asking `lookup` for every known key.
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(TagKey) -> Option<String>,
    {
        TagKey::ALL
            .iter()
            .filter_map(|&key| lookup(key).map(|value| (key, value)))
            .collect()
    }

    pub fn with(mut self, key: TagKey, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    pub fn get(&self, key: TagKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: TagKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(TagKey, String)> for RawTagSet {
    fn from_iter<I: IntoIterator<Item = (TagKey, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
