//! DTOs for API responses.

use serde::Serialize;

/// Response for the health check.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok"
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
    /// Keys with a fetch in flight
    pub in_flight: usize,
    /// Entries held by the preview cache (including expired, unswept ones)
    pub cached_entries: usize,
}
