//! TTL cache and request coalescing for linkpeek.
//!
//! [`TtlCache`] is a key/value store with per-entry expiration.
//! [`Coalescer`] sits on top of it and guarantees that concurrent callers
//! asking for the same uncached key share a single fetch.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;
mod coalescer;
mod error;

pub use cache::{CacheConfig, CacheStats, TtlCache};
pub use coalescer::Coalescer;
pub use error::CoalesceError;
