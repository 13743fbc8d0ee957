//! Errors surfaced by the coalescer.

use thiserror::Error;

/// Failure to obtain a value from a coalesced fetch.
///
/// Fetch functions encode their own failures into the value they return, so
/// this only happens when a fetch task dies without producing anything: the
/// fetch panicked, or the runtime shut down underneath it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoalesceError {
    /// The in-flight fetch for this key ended without a result.
    #[error("Fetch for '{key}' was abandoned before producing a result")]
    FetchAbandoned { key: String },
}
