//! Constants shared between the resolver, the fetcher, and the API.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE
// ═══════════════════════════════════════════════════════════════════════════════

/// Namespace prefix for link preview cache keys.
pub const CACHE_KEY_PREFIX: &str = "url:";

/// How long a resolved preview (successful or not) stays cached.
pub const DEFAULT_PREVIEW_TTL: Duration = Duration::from_secs(10 * 60);

/// How often expired entries are compacted out of the cache.
pub const DEFAULT_COMPACTION_INTERVAL: Duration = Duration::from_secs(5 * 60);

// ═══════════════════════════════════════════════════════════════════════════════
// OUTBOUND REQUESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Sent with every page fetch so sites answer in English regardless of where
/// the server is located.
pub const ACCEPT_LANGUAGE: &str = "en-US, en;q=0.9, *;q=0.5";

/// Default user agent for page fetches.
pub const DEFAULT_USER_AGENT: &str = concat!("linkpeek/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout for page fetches.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest response body read from an upstream page.
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Maximum number of redirects followed per fetch.
pub const MAX_REDIRECTS: usize = 10;

// ═══════════════════════════════════════════════════════════════════════════════
// PAYLOAD MESSAGES
// ═══════════════════════════════════════════════════════════════════════════════

/// Message of the "nothing useful found" sentinel.
pub const NO_LINK_INFO_FOUND: &str = "No link info found";

/// Message of the rejected-input sentinel.
pub const INVALID_URL: &str = "Invalid URL";
