//! Integration tests for tag extraction
//!
//! Fixtures are generated on the fly: a short silent PCM WAV file, optionally
//! carrying an ID3v2 tag written with `lofty`.

use bytes::Bytes;
use core_metadata::{
    normalize, ArtworkCache, CacheOutcome, LoftyExtractor, MetadataError, TagKey, TagReader,
};
use lofty::config::WriteOptions;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::tag::{Accessor, ItemKey, Tag, TagExt, TagType};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const COVER: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-a-png";
const SAMPLE_RATE: u32 = 8000;

/// One second of 16-bit mono silence.
fn silent_wav() -> Vec<u8> {
    let channels: u16 = 1;
    let bits: u16 = 16;
    let block_align = channels * bits / 8;
    let byte_rate = SAMPLE_RATE * u32::from(block_align);
    let data_len = SAMPLE_RATE * u32::from(block_align);

    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&bits.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.resize(out.len() + data_len as usize, 0);
    out
}

fn write_tagged_wav(path: &Path) {
    std::fs::write(path, silent_wav()).unwrap();

    let mut tag = Tag::new(TagType::Id3v2);
    tag.set_title("Blue in Green".to_string());
    tag.set_artist("Miles Davis".to_string());
    tag.set_album("Kind of Blue".to_string());
    tag.insert_text(ItemKey::AlbumArtist, "Miles Davis".to_string());
    tag.insert_text(ItemKey::TrackNumber, "3".to_string());
    tag.insert_text(ItemKey::TrackTotal, "5".to_string());
    tag.insert_text(ItemKey::RecordingDate, "1959-03-02".to_string());
    tag.insert_text(ItemKey::Genre, "Jazz".to_string());
    tag.insert_text(ItemKey::Composer, "Bill Evans".to_string());
    tag.push_picture(Picture::new_unchecked(
        PictureType::CoverFront,
        Some(MimeType::Png),
        None,
        COVER.to_vec(),
    ));
    tag.save_to_path(path, WriteOptions::default()).unwrap();
}

fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

fn reader() -> TagReader {
    TagReader::new(Arc::new(LoftyExtractor::new()))
}

#[test]
fn test_missing_file() {
    let result = reader().open("file:///nonexistent/dir/track.mp3");
    assert!(matches!(result, Err(MetadataError::SourceOpen { .. })));
}

#[test]
fn test_corrupted_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.mp3");
    std::fs::write(&path, b"This is not a valid audio file").unwrap();

    let result = reader().open(&file_uri(&path));
    assert!(result.is_err(), "Should fail for corrupted file");
}

#[test]
fn test_untagged_wav_reports_stream_properties() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("silence.wav");
    std::fs::write(&path, silent_wav()).unwrap();

    let handle = reader().open(&file_uri(&path)).unwrap();
    let tags = handle.read_tags();

    assert_eq!(tags.get(TagKey::Title), None);
    assert_eq!(tags.get(TagKey::MimeType), Some("audio/wav"));
    assert_eq!(tags.get(TagKey::Duration), Some("1000"));
    assert_eq!(tags.get(TagKey::Bitrate), Some("128000"));
    assert_eq!(handle.read_embedded_image(), None);
}

#[test]
fn test_tagged_wav() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("track.wav");
    write_tagged_wav(&path);

    let uri = file_uri(&path);
    let handle = reader().open(&uri).unwrap();
    let record = normalize(&handle.read_tags()).with_source_uri(uri.clone());

    assert_eq!(record.source_uri, uri);
    assert_eq!(record.track_name.as_deref(), Some("Blue in Green"));
    assert_eq!(record.track_artist_names.as_deref(), Some("Miles Davis"));
    assert_eq!(record.album_name.as_deref(), Some("Kind of Blue"));
    assert_eq!(record.album_artist_name.as_deref(), Some("Miles Davis"));
    assert_eq!(record.track_number.as_deref(), Some("3"));
    assert_eq!(record.album_length.as_deref(), Some("5"));
    assert_eq!(record.year.as_deref(), Some("1959"));
    assert_eq!(record.genre.as_deref(), Some("Jazz"));
    assert_eq!(record.author.as_deref(), Some("Bill Evans"));
    assert_eq!(record.writer, None);
    assert_eq!(record.mime_type.as_deref(), Some("audio/wav"));
    assert_eq!(record.duration.as_deref(), Some("1000"));

    assert_eq!(handle.read_embedded_image(), Some(Bytes::from_static(COVER)));
    handle.close();
}

#[tokio::test]
async fn test_embedded_artwork_is_cached() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("track.wav");
    write_tagged_wav(&path);
    let covers: PathBuf = dir.path().join("covers");

    let uri = file_uri(&path);
    let handle = reader().open(&uri).unwrap();
    let record = normalize(&handle.read_tags()).with_source_uri(uri);

    let cache = ArtworkCache::new("png", "Unknown Album", "Unknown Artist");
    let outcome = cache
        .ensure_saved_with(&record, &covers.to_string_lossy(), || {
            handle.read_embedded_image()
        })
        .await;

    let expected = covers.join("BlueinGreenKindofBlueMilesDavis.png");
    assert_eq!(
        outcome,
        CacheOutcome::Saved {
            path: expected.clone(),
            already_existed: false
        }
    );
    assert_eq!(std::fs::read(expected).unwrap(), COVER);
}
