//! Artwork Cache - Deterministic, Write-Once Cover Art Files
//!
//! Cover art extracted from a source is stored as a single file in a
//! caller-chosen directory. The file name is derived from the track's
//! metadata, so callers can locate the image without asking again:
//!
//! ```text
//! <cache_dir>/<trackName><albumName><albumArtistName>.<extension>
//! ```
//!
//! with `\ / : * ? " < > |` and spaces removed. Missing names are
//! replaced by the last URI segment (track) or the configured placeholders
//! (album, album artist).
//!
//! ## Writes
//!
//! An existing file is never touched. New images are written to a unique
//! temporary file in the same directory and then published under the final
//! name, so concurrent writers of the same key never expose a partial file.
//!
//! ## Usage
//!
//! ```ignore
//! use core_metadata::artwork::ArtworkCache;
//!
//! let cache = ArtworkCache::from_config(&config);
//! let outcome = cache
//!     .ensure_saved_with(&record, "/data/covers", || handle.read_embedded_image())
//!     .await;
//! ```

use bytes::Bytes;
use core_async::fs;
use core_runtime::config::RetrieverConfig;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{MetadataError, Result};
use crate::record::MetadataRecord;
use crate::source::fallback_track_name;

const FORBIDDEN_KEY_CHARS: [char; 10] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|', ' '];

/// Sanitized base name of a cached artwork file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtworkCacheKey(String);

impl ArtworkCacheKey {
    /// Drops every forbidden character of `raw`.
    pub fn sanitize(raw: &str) -> Self {
        Self(
            raw.chars()
                .filter(|c| !FORBIDDEN_KEY_CHARS.contains(c))
                .collect(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.0, extension)
    }
}

impl std::fmt::Display for ArtworkCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of [`ArtworkCache::ensure_saved`]. Failures are reported, never
/// raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOutcome {
    /// The artwork file exists at `path`
    Saved { path: PathBuf, already_existed: bool },
    /// The source has no embedded picture
    NotApplicable,
    /// The file could not be checked or written
    Failed { reason: String },
}

/// Builds cache keys and persists artwork files.
#[derive(Debug, Clone)]
pub struct ArtworkCache {
    extension: String,
    unknown_album: String,
    unknown_artist: String,
}

impl ArtworkCache {
    pub fn new(
        extension: impl Into<String>,
        unknown_album: impl Into<String>,
        unknown_artist: impl Into<String>,
    ) -> Self {
        Self {
            extension: extension.into(),
            unknown_album: unknown_album.into(),
            unknown_artist: unknown_artist.into(),
        }
    }

    pub fn from_config(config: &RetrieverConfig) -> Self {
        Self::new(
            config.artwork_extension.clone(),
            config.unknown_album.clone(),
            config.unknown_artist.clone(),
        )
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Cache key for `record`. Pure: the same record always gives the same key.
    pub fn cache_key(&self, record: &MetadataRecord) -> ArtworkCacheKey {
        let track = record
            .track_name
            .clone()
            .unwrap_or_else(|| fallback_track_name(&record.source_uri));
        let album = record.album_name.as_deref().unwrap_or(&self.unknown_album);
        let album_artist = record
            .album_artist_name
            .as_deref()
            .unwrap_or(&self.unknown_artist);

        ArtworkCacheKey::sanitize(&format!("{}{}{}", track, album, album_artist))
    }

    /// Full path of the artwork file for `record` under `cache_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::ArtworkWrite`] when `cache_dir` is empty.
    pub fn artwork_path(&self, record: &MetadataRecord, cache_dir: &str) -> Result<PathBuf> {
        let dir = match cache_dir.trim_end_matches(['/', std::path::MAIN_SEPARATOR]) {
            "" if cache_dir.is_empty() => {
                return Err(MetadataError::ArtworkWrite(
                    "Cache directory is empty".to_string(),
                ))
            }
            "" => cache_dir,
            trimmed => trimmed,
        };

        let file_name = self.cache_key(record).file_name(&self.extension);
        Ok(Path::new(dir).join(file_name))
    }

    /// Writes `image` for `record` unless the artwork file already exists.
    pub async fn ensure_saved(
        &self,
        record: &MetadataRecord,
        cache_dir: &str,
        image: Option<Bytes>,
    ) -> CacheOutcome {
        self.ensure_saved_with(record, cache_dir, move || image).await
    }

    /// Like [`ensure_saved`](Self::ensure_saved), but only calls
    /// `load_image` when the file is missing.
    pub async fn ensure_saved_with<F>(
        &self,
        record: &MetadataRecord,
        cache_dir: &str,
        load_image: F,
    ) -> CacheOutcome
    where
        F: FnOnce() -> Option<Bytes>,
    {
        let path = match self.artwork_path(record, cache_dir) {
            Ok(path) => path,
            Err(e) => return CacheOutcome::Failed { reason: e.to_string() },
        };

        match fs::try_exists(&path).await {
            Ok(true) => {
                debug!(path = %path.display(), "Artwork already cached");
                return CacheOutcome::Saved {
                    path,
                    already_existed: true,
                };
            }
            Ok(false) => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to check artwork file");
                return CacheOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        }

        let image = match load_image() {
            Some(image) if !image.is_empty() => image,
            _ => {
                debug!("No embedded artwork");
                return CacheOutcome::NotApplicable;
            }
        };

        match Self::publish(&path, &image).await {
            Ok(created) => {
                if created {
                    info!(path = %path.display(), bytes = image.len(), "Saved artwork");
                }
                CacheOutcome::Saved {
                    path,
                    already_existed: !created,
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to save artwork");
                CacheOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Writes `image` to a temporary sibling of `path` and links it into
    /// place. Returns `false` when another writer published first.
    async fn publish(path: &Path, image: &[u8]) -> Result<bool> {
        let dir = path
            .parent()
            .ok_or_else(|| MetadataError::ArtworkWrite("Artwork path has no parent".to_string()))?;
        fs::create_dir_all(dir).await?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp = dir.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

        if let Err(e) = fs::write(&temp, image).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }

        let published = match fs::hard_link(&temp, path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            // Filesystems without hard links: last complete writer wins.
            Err(_) => fs::rename(&temp, path).await.map(|()| true),
        };

        if let Err(e) = fs::remove_file(&temp).await {
            if e.kind() != ErrorKind::NotFound {
                debug!(path = %temp.display(), error = %e, "Failed to remove temporary artwork file");
            }
        }

        Ok(published?)
    }
}
