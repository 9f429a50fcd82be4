//! Raw tags to [`MetadataRecord`].
//!
//! Values are copied after trimming; empty values become absent. Two fields
//! are derived:
//!
//! - `trackNumber` / `albumLength`: a raw track number of the form `"N/M"`
//!   yields `N` as the track number and, when no total-tracks tag exists,
//!   `M` as the album length.
//! - `year`: when no year tag exists, the leading component of the date tag
//!   (split on `.`, `-` or `/`).

use crate::record::MetadataRecord;
use crate::tags::{RawTagSet, TagKey};

/// Builds a record from raw tags. `source_uri` is left empty for the caller
/// to fill in.
pub fn normalize(tags: &RawTagSet) -> MetadataRecord {
    let (track_number, album_length) = track_position(tags);

    MetadataRecord {
        source_uri: String::new(),
        track_name: field(tags, TagKey::Title),
        track_artist_names: field(tags, TagKey::Artist),
        album_name: field(tags, TagKey::Album),
        album_artist_name: field(tags, TagKey::AlbumArtist),
        track_number,
        album_length,
        year: year(tags),
        genre: field(tags, TagKey::Genre),
        author: field(tags, TagKey::Author),
        writer: field(tags, TagKey::Writer),
        disc_number: field(tags, TagKey::DiscNumber),
        mime_type: field(tags, TagKey::MimeType),
        duration: field(tags, TagKey::Duration),
        bitrate: field(tags, TagKey::Bitrate),
    }
}

fn field(tags: &RawTagSet, key: TagKey) -> Option<String> {
    tags.get(key).and_then(clean)
}

fn clean(value: &str) -> Option<String> {
    let trimmed = value.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn track_position(tags: &RawTagSet) -> (Option<String>, Option<String>) {
    let total = field(tags, TagKey::TotalTracks);

    let Some(raw) = tags.get(TagKey::TrackNumber) else {
        return (None, total);
    };

    let mut segments = raw.trim_end_matches('/').split('/');
    let number = segments.next().and_then(clean);
    let from_track = segments.last().and_then(clean);

    (number, total.or(from_track))
}

fn year(tags: &RawTagSet) -> Option<String> {
    field(tags, TagKey::Year).or_else(|| {
        tags.get(TagKey::Date)
            .and_then(|date| date.trim().split(['.', '-', '/']).next())
            .and_then(clean)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copies_and_trims() {
        let tags = RawTagSet::new()
            .with(TagKey::Title, "  Song  ")
            .with(TagKey::Artist, "Artist")
            .with(TagKey::Genre, "   ")
            .with(TagKey::Writer, "Writer\0");

        let record = normalize(&tags);
        assert_eq!(record.track_name.as_deref(), Some("Song"));
        assert_eq!(record.track_artist_names.as_deref(), Some("Artist"));
        assert_eq!(record.genre, None);
        assert_eq!(record.writer.as_deref(), Some("Writer"));
        assert_eq!(record.album_name, None);
        assert!(record.source_uri.is_empty());
    }

    #[test]
    fn test_track_with_total_fills_album_length() {
        let record = normalize(&RawTagSet::new().with(TagKey::TrackNumber, "4/12"));
        assert_eq!(record.track_number.as_deref(), Some("4"));
        assert_eq!(record.album_length.as_deref(), Some("12"));
    }

    #[test]
    fn test_total_tracks_tag_wins() {
        let tags = RawTagSet::new()
            .with(TagKey::TrackNumber, "4/12")
            .with(TagKey::TotalTracks, "10");
        let record = normalize(&tags);
        assert_eq!(record.track_number.as_deref(), Some("4"));
        assert_eq!(record.album_length.as_deref(), Some("10"));
    }

    #[test]
    fn test_plain_track_number() {
        let record = normalize(&RawTagSet::new().with(TagKey::TrackNumber, "7"));
        assert_eq!(record.track_number.as_deref(), Some("7"));
        assert_eq!(record.album_length, None);
    }

    #[test]
    fn test_malformed_track_numbers() {
        let record = normalize(&RawTagSet::new().with(TagKey::TrackNumber, "4/"));
        assert_eq!(record.track_number.as_deref(), Some("4"));
        assert_eq!(record.album_length, None);

        let record = normalize(&RawTagSet::new().with(TagKey::TrackNumber, "/9"));
        assert_eq!(record.track_number, None);
        assert_eq!(record.album_length.as_deref(), Some("9"));

        let record = normalize(&RawTagSet::new().with(TagKey::TrackNumber, "1/2/3"));
        assert_eq!(record.track_number.as_deref(), Some("1"));
        assert_eq!(record.album_length.as_deref(), Some("3"));
    }

    #[test]
    fn test_trailing_separators_are_ignored() {
        let record = normalize(&RawTagSet::new().with(TagKey::TrackNumber, "4/20/"));
        assert_eq!(record.track_number.as_deref(), Some("4"));
        assert_eq!(record.album_length.as_deref(), Some("20"));

        let record = normalize(&RawTagSet::new().with(TagKey::TrackNumber, "4//"));
        assert_eq!(record.track_number.as_deref(), Some("4"));
        assert_eq!(record.album_length, None);
    }

    #[test]
    fn test_year_from_date() {
        let record = normalize(&RawTagSet::new().with(TagKey::Date, "2001-05-01"));
        assert_eq!(record.year.as_deref(), Some("2001"));

        let record = normalize(&RawTagSet::new().with(TagKey::Date, "1999.12.31"));
        assert_eq!(record.year.as_deref(), Some("1999"));

        let record = normalize(&RawTagSet::new().with(TagKey::Date, "1987/03/02"));
        assert_eq!(record.year.as_deref(), Some("1987"));
    }

    #[test]
    fn test_year_tag_wins_over_date() {
        let tags = RawTagSet::new()
            .with(TagKey::Year, " 2010 ")
            .with(TagKey::Date, "2001-05-01");
        assert_eq!(normalize(&tags).year.as_deref(), Some("2010"));
    }

    #[test]
    fn test_no_year_or_date() {
        assert_eq!(normalize(&RawTagSet::new()).year, None);
        assert_eq!(normalize(&RawTagSet::new().with(TagKey::Date, "")).year, None);
    }

    #[test]
    fn test_empty_tags_give_empty_record() {
        let record = normalize(&RawTagSet::new());
        assert_eq!(record, MetadataRecord::default());
    }
}
