//! # Retriever Configuration
//!
//! `RetrieverConfig` holds the settings and bridge handles the metadata
//! retriever needs. It is constructed through [`RetrieverConfigBuilder`],
//! which validates everything up front so a misconfiguration surfaces at
//! startup instead of on the first request.
//!
//! ## Settings
//!
//! - `unknown_album` / `unknown_artist` - placeholders used when building
//!   artwork cache keys for tracks without album or album-artist tags
//! - `artwork_extension` - extension of cached artwork files
//! - `remote_timeout` - timeout for fetching non-`file` sources
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `HttpClient` - fetches network sources (desktop default: reqwest)
//!
//! Without an `HttpClient` only `file://` sources can be decoded; network
//! sources then take the fallback path.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::RetrieverConfig;
//!
//! let config = RetrieverConfig::builder()
//!     .artwork_extension("jpg")
//!     .unknown_artist("Various")
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::HttpClient;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_UNKNOWN_ALBUM: &str = "Unknown Album";
pub const DEFAULT_UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const DEFAULT_ARTWORK_EXTENSION: &str = "png";
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_REMOTE_TIMEOUT: Duration = Duration::from_secs(600);

/// Configuration for the metadata retriever.
#[derive(Clone)]
pub struct RetrieverConfig {
    /// Album name used in cache keys when the album tag is missing
    pub unknown_album: String,

    /// Album artist used in cache keys when the album-artist tag is missing
    pub unknown_artist: String,

    /// Extension of cached artwork files, without the dot
    pub artwork_extension: String,

    /// Timeout applied when fetching network sources
    pub remote_timeout: Duration,

    /// HTTP client for network sources (optional with desktop default)
    pub http_client: Option<Arc<dyn HttpClient>>,
}

impl std::fmt::Debug for RetrieverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrieverConfig")
            .field("unknown_album", &self.unknown_album)
            .field("unknown_artist", &self.unknown_artist)
            .field("artwork_extension", &self.artwork_extension)
            .field("remote_timeout", &self.remote_timeout)
            .field(
                "http_client",
                &self.http_client.as_ref().map(|_| "HttpClient { ... }"),
            )
            .finish()
    }
}

impl RetrieverConfig {
    pub fn builder() -> RetrieverConfigBuilder {
        RetrieverConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// This checks:
    /// - Placeholders are non-empty
    /// - The artwork extension is non-empty ASCII alphanumeric
    /// - The remote timeout is positive and at most ten minutes
    pub fn validate(&self) -> Result<()> {
        if self.unknown_album.trim().is_empty() {
            return Err(Error::Config(
                "Unknown album placeholder cannot be empty".to_string(),
            ));
        }

        if self.unknown_artist.trim().is_empty() {
            return Err(Error::Config(
                "Unknown artist placeholder cannot be empty".to_string(),
            ));
        }

        if self.artwork_extension.is_empty()
            || !self
                .artwork_extension
                .chars()
                .all(|c| c.is_ascii_alphanumeric())
        {
            return Err(Error::Config(format!(
                "Artwork extension must be ASCII alphanumeric without a leading dot, got '{}'",
                self.artwork_extension
            )));
        }

        if self.remote_timeout.is_zero() {
            return Err(Error::Config(
                "Remote timeout must be greater than zero".to_string(),
            ));
        }

        if self.remote_timeout > MAX_REMOTE_TIMEOUT {
            return Err(Error::Config(
                "Remote timeout exceeds maximum of 10 minutes".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            unknown_album: DEFAULT_UNKNOWN_ALBUM.to_string(),
            unknown_artist: DEFAULT_UNKNOWN_ARTIST.to_string(),
            artwork_extension: DEFAULT_ARTWORK_EXTENSION.to_string(),
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
            http_client: None,
        }
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Option<Arc<dyn HttpClient>>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_timeout(timeout).map_err(|e| Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: e.to_string(),
    })?;
    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(Some(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Option<Arc<dyn HttpClient>>> {
    tracing::debug!("No HttpClient configured; network sources will use the fallback response");
    Ok(None)
}

/// Builder for [`RetrieverConfig`].
#[derive(Default)]
pub struct RetrieverConfigBuilder {
    unknown_album: Option<String>,
    unknown_artist: Option<String>,
    artwork_extension: Option<String>,
    remote_timeout: Option<Duration>,
    http_client: Option<Arc<dyn HttpClient>>,
    skip_default_http_client: bool,
}

impl RetrieverConfigBuilder {
    pub fn unknown_album(mut self, name: impl Into<String>) -> Self {
        self.unknown_album = Some(name.into());
        self
    }

    pub fn unknown_artist(mut self, name: impl Into<String>) -> Self {
        self.unknown_artist = Some(name.into());
        self
    }

    /// Sets the artwork file extension. A leading dot is stripped.
    pub fn artwork_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.artwork_extension = Some(extension.trim_start_matches('.').to_string());
        self
    }

    pub fn remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = Some(timeout);
        self
    }

    /// Injects the HTTP client used for network sources.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Only decode local files, even when a desktop default is available.
    pub fn local_sources_only(mut self) -> Self {
        self.http_client = None;
        self.skip_default_http_client = true;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when a setting is invalid, or
    /// `Error::CapabilityMissing` when the default HTTP client cannot be
    /// constructed.
    pub fn build(self) -> Result<RetrieverConfig> {
        let defaults = RetrieverConfig::default();
        let remote_timeout = self.remote_timeout.unwrap_or(defaults.remote_timeout);

        let http_client = match self.http_client {
            Some(client) => Some(client),
            None if self.skip_default_http_client => None,
            None => provide_default_http_client(remote_timeout)?,
        };

        let config = RetrieverConfig {
            unknown_album: self.unknown_album.unwrap_or(defaults.unknown_album),
            unknown_artist: self.unknown_artist.unwrap_or(defaults.unknown_artist),
            artwork_extension: self
                .artwork_extension
                .unwrap_or(defaults.artwork_extension),
            remote_timeout,
            http_client,
        };

        config.validate()?;
        Ok(config)
    }
}
