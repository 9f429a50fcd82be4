use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to open source {uri}: {reason}")]
    SourceOpen { uri: String, reason: String },

    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    #[error("Failed to decode source: {0}")]
    Decode(String),

    #[error("Artwork write failed: {0}")]
    ArtworkWrite(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::error::BridgeError),
}

pub type Result<T> = std::result::Result<T, MetadataError>;
