//! The link preview payload.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::constants::{INVALID_URL, NO_LINK_INFO_FOUND};

/// Pre-encoded `noLinkInfoFound`, used if serialization ever fails.
const ENCODED_NO_LINK_INFO_FOUND: &[u8] = br#"{"status":404,"message":"No link info found"}"#;

/// Preview payload for a single URL.
///
/// Every outcome of a resolution, including upstream failures, is expressed
/// as one of these. `status` mirrors an HTTP status code but is carried in the
/// body; empty fields are omitted from the JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPreview {
    /// Status of the resolution (upstream status on success)
    pub status: u16,
    /// Human readable reason, set on failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// HTML snippet shown to the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    /// Canonical link (the final URL after redirects)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl LinkPreview {
    /// A successful preview.
    pub fn new(status: u16, tooltip: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            status,
            message: None,
            tooltip: Some(tooltip.into()),
            link: Some(link.into()),
        }
    }

    /// A failure carrying only a status and a message.
    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Sentinel for "nothing useful could be found at this URL".
    pub fn no_link_info_found() -> Self {
        Self::failure(404, NO_LINK_INFO_FOUND)
    }

    /// Sentinel for input that was rejected before any fetch.
    pub fn invalid_url() -> Self {
        Self::failure(500, INVALID_URL)
    }

    /// Returns true for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Serializes the payload to JSON bytes.
    ///
    /// Never fails: should serialization break, the `noLinkInfoFound` payload
    /// is returned instead.
    pub fn encode(&self) -> Bytes {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .unwrap_or_else(|_| Bytes::from_static(ENCODED_NO_LINK_INFO_FOUND))
    }

    /// Parses a payload previously produced by [`encode`](Self::encode).
    pub fn decode(bytes: &[u8]) -> crate::Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_omits_empty_fields() {
        let json = String::from_utf8(LinkPreview::no_link_info_found().encode().to_vec()).unwrap();
        assert_eq!(json, r#"{"status":404,"message":"No link info found"}"#);
    }

    #[test]
    fn test_fallback_matches_sentinel() {
        let fallback = LinkPreview::decode(ENCODED_NO_LINK_INFO_FOUND).unwrap();
        assert_eq!(fallback, LinkPreview::no_link_info_found());
    }

    #[test]
    fn test_invalid_url_sentinel() {
        let preview = LinkPreview::invalid_url();
        assert_eq!(preview.status, 500);
        assert_eq!(preview.message.as_deref(), Some("Invalid URL"));
        assert!(!preview.is_success());
    }

    #[test]
    fn test_success_payload() {
        let preview = LinkPreview::new(200, "<b>X</b>", "https://example.com/");
        assert!(preview.is_success());
        let decoded = LinkPreview::decode(&preview.encode()).unwrap();
        assert_eq!(decoded, preview);
        assert!(decoded.message.is_none());
    }
}
