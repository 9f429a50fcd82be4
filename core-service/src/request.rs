//! Arguments of a metadata call.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::channel::MethodCall;
use crate::error::{Result, ServiceError};

/// A validated metadata request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrieveRequest {
    /// Source identifier; `file://` for local files
    pub uri: String,
    /// Local directory that receives the artwork file
    pub cover_directory: String,
    /// Defer the response until the artwork attempt finishes
    pub wait_until_artwork_saved: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArguments {
    #[serde(alias = "sourceUri")]
    uri: Option<String>,
    #[serde(alias = "cacheDirectory")]
    cover_directory: Option<String>,
    #[serde(alias = "waitUntilArtworkSaved")]
    wait_until_album_art_is_saved: Option<bool>,
}

/// Host argument names and the older names accepted in their place.
const ARGUMENT_ALIASES: [(&str, &str); 3] = [
    ("uri", "sourceUri"),
    ("coverDirectory", "cacheDirectory"),
    ("waitUntilAlbumArtIsSaved", "waitUntilArtworkSaved"),
];

/// Drops every alias whose host name is also present, so the host name wins.
fn without_shadowed_aliases(arguments: &Map<String, Value>) -> Map<String, Value> {
    let mut arguments = arguments.clone();
    for (name, alias) in ARGUMENT_ALIASES {
        if arguments.contains_key(name) {
            arguments.remove(alias);
        }
    }
    arguments
}

impl RetrieveRequest {
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidArguments`] when `uri` or
    /// `coverDirectory` is missing or an argument has the wrong type. When an
    /// argument arrives under both its host name and its alias, the host name
    /// is used.
    pub fn from_call(call: &MethodCall) -> Result<Self> {
        let arguments = without_shadowed_aliases(&call.arguments);
        let raw: RawArguments = serde_json::from_value(Value::Object(arguments))
            .map_err(|e| ServiceError::InvalidArguments(e.to_string()))?;

        let uri = raw
            .uri
            .ok_or_else(|| ServiceError::InvalidArguments("missing `uri`".to_string()))?;
        let cover_directory = raw.cover_directory.ok_or_else(|| {
            ServiceError::InvalidArguments("missing `coverDirectory`".to_string())
        })?;

        Ok(Self {
            uri,
            cover_directory,
            wait_until_artwork_saved: raw.wait_until_album_art_is_saved.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_host_argument_names() {
        let call = MethodCall::new("MetadataRetriever")
            .argument("uri", "file:///a.mp3")
            .argument("coverDirectory", "/covers")
            .argument("waitUntilAlbumArtIsSaved", true);

        let request = RetrieveRequest::from_call(&call).unwrap();
        assert_eq!(request.uri, "file:///a.mp3");
        assert_eq!(request.cover_directory, "/covers");
        assert!(request.wait_until_artwork_saved);
    }

    #[test]
    fn test_alias_argument_names() {
        let call = MethodCall::new("MetadataRetriever")
            .argument("sourceUri", "file:///a.mp3")
            .argument("cacheDirectory", "/covers")
            .argument("waitUntilArtworkSaved", true);

        let request = RetrieveRequest::from_call(&call).unwrap();
        assert_eq!(request.uri, "file:///a.mp3");
        assert_eq!(request.cover_directory, "/covers");
        assert!(request.wait_until_artwork_saved);
    }

    #[test]
    fn test_host_name_wins_over_alias() {
        let call = MethodCall::new("MetadataRetriever")
            .argument("uri", "file:///host.mp3")
            .argument("sourceUri", "file:///alias.mp3")
            .argument("coverDirectory", "/host")
            .argument("cacheDirectory", "/alias")
            .argument("waitUntilAlbumArtIsSaved", false)
            .argument("waitUntilArtworkSaved", true);

        let request = RetrieveRequest::from_call(&call).unwrap();
        assert_eq!(request.uri, "file:///host.mp3");
        assert_eq!(request.cover_directory, "/host");
        assert!(!request.wait_until_artwork_saved);
    }

    #[test]
    fn test_aliases_mix_with_host_names() {
        let call = MethodCall::new("MetadataRetriever")
            .argument("sourceUri", "file:///a.mp3")
            .argument("coverDirectory", "/covers")
            .argument("cacheDirectory", "/ignored");

        let request = RetrieveRequest::from_call(&call).unwrap();
        assert_eq!(request.uri, "file:///a.mp3");
        assert_eq!(request.cover_directory, "/covers");
    }

    #[test]
    fn test_wait_flag_defaults_to_false() {
        let call = MethodCall::new("MetadataRetriever")
            .argument("uri", "file:///a.mp3")
            .argument("coverDirectory", "/covers");
        assert!(!RetrieveRequest::from_call(&call).unwrap().wait_until_artwork_saved);

        let call = call.argument("waitUntilAlbumArtIsSaved", Value::Null);
        assert!(!RetrieveRequest::from_call(&call).unwrap().wait_until_artwork_saved);
    }

    #[test]
    fn test_missing_arguments() {
        let call = MethodCall::new("MetadataRetriever").argument("coverDirectory", "/covers");
        assert!(matches!(
            RetrieveRequest::from_call(&call),
            Err(ServiceError::InvalidArguments(_))
        ));

        let call = MethodCall::new("MetadataRetriever").argument("uri", "file:///a.mp3");
        assert!(matches!(
            RetrieveRequest::from_call(&call),
            Err(ServiceError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_wrong_argument_type() {
        let call = MethodCall::new("MetadataRetriever")
            .argument("uri", 42)
            .argument("coverDirectory", "/covers");
        assert!(matches!(
            RetrieveRequest::from_call(&call),
            Err(ServiceError::InvalidArguments(_))
        ));
    }
}
