//! Validated link targets.

use std::fmt;

use url::Url;

use crate::constants::CACHE_KEY_PREFIX;
use crate::error::{LinkpeekError, Result};

/// A URL accepted for resolution.
///
/// Only absolute `http` and `https` URLs are accepted. The URL is kept in its
/// normalized serialization so equivalent spellings share one cache entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TargetUrl(Url);

impl TargetUrl {
    /// Parses and validates a raw, already unescaped URL.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let url = Url::parse(raw).map_err(|e| LinkpeekError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(LinkpeekError::UnsupportedScheme(other.to_string())),
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(LinkpeekError::InvalidUrl {
                url: raw.to_string(),
                reason: "missing host".into(),
            });
        }

        Ok(Self(url))
    }

    /// The normalized URL string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The namespaced key this URL is cached and coalesced under.
    pub fn cache_key(&self) -> String {
        format!("{}{}", CACHE_KEY_PREFIX, self.0)
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
