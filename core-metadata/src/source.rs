//! Source URI handling.
//!
//! Only the `file` scheme is interpreted locally. Every other URI is handed to
//! the decoder untouched.

use std::borrow::Cow;
use std::path::PathBuf;

const FILE_SCHEME: &str = "file://";

/// Where the bytes of a source come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// A local file, already percent-decoded
    Local(PathBuf),
    /// Anything else, passed through verbatim
    Remote(String),
}

impl SourceLocation {
    pub fn parse(uri: &str) -> Self {
        if is_local(uri) {
            SourceLocation::Local(local_path(uri))
        } else {
            SourceLocation::Remote(uri.to_string())
        }
    }
}

/// Returns `true` when the URI uses the `file` scheme (case-insensitive).
pub fn is_local(uri: &str) -> bool {
    uri.len() >= FILE_SCHEME.len()
        && uri.as_bytes()[..FILE_SCHEME.len()].eq_ignore_ascii_case(FILE_SCHEME.as_bytes())
}

/// Resolves the filesystem path of a `file://` URI.
///
/// The authority (`localhost` or empty), query and fragment are dropped and
/// the remainder is percent-decoded.
pub fn local_path(uri: &str) -> PathBuf {
    let rest = uri.get(FILE_SCHEME.len()..).unwrap_or_default();
    let rest = rest.split(['?', '#']).next().unwrap_or_default();

    let path = match rest.find('/') {
        Some(0) | None => rest,
        Some(index) => &rest[index..],
    };

    PathBuf::from(percent_decode(path).into_owned())
}

/// Name used for a track that carries no title tag: the last path segment of
/// its URI, percent-decoded for `file` URIs.
pub fn fallback_track_name(uri: &str) -> String {
    let trimmed = uri.trim_end_matches('/');
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);

    if is_local(uri) {
        percent_decode(segment).into_owned()
    } else {
        segment.to_string()
    }
}

fn percent_decode(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_detection_is_case_insensitive() {
        assert!(is_local("file:///music/a.mp3"));
        assert!(is_local("FILE:///music/a.mp3"));
        assert!(is_local("File://localhost/music/a.mp3"));
        assert!(!is_local("https://example.com/a.mp3"));
        assert!(!is_local("content://media/external/audio/1"));
        assert!(!is_local("file:"));
        assert!(!is_local(""));
    }

    #[test]
    fn test_local_path_decoding() {
        assert_eq!(
            local_path("file:///music/My%20Song.mp3"),
            PathBuf::from("/music/My Song.mp3")
        );
        assert_eq!(
            local_path("file://localhost/music/a.flac"),
            PathBuf::from("/music/a.flac")
        );
        assert_eq!(
            local_path("file:///music/a.mp3?version=2#t=10"),
            PathBuf::from("/music/a.mp3")
        );
        assert_eq!(
            local_path("file:///music/caf%C3%A9.ogg"),
            PathBuf::from("/music/café.ogg")
        );
    }

    #[test]
    fn test_invalid_percent_sequence_kept_verbatim() {
        assert_eq!(local_path("file:///a/%FF.mp3"), PathBuf::from("/a/%FF.mp3"));
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            SourceLocation::parse("file:///x/y.mp3"),
            SourceLocation::Local(PathBuf::from("/x/y.mp3"))
        );
        assert_eq!(
            SourceLocation::parse("https://host/y.mp3"),
            SourceLocation::Remote("https://host/y.mp3".to_string())
        );
    }

    #[test]
    fn test_fallback_track_name() {
        assert_eq!(fallback_track_name("file:///m/My%20Song.mp3"), "My Song.mp3");
        assert_eq!(fallback_track_name("file:///m/album/"), "album");
        assert_eq!(
            fallback_track_name("https://host/a%20b.mp3"),
            "a%20b.mp3"
        );
        assert_eq!(fallback_track_name("track.mp3"), "track.mp3");
    }
}
