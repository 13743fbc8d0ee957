//! # linkpeek Core
//!
//! Core types, errors, and traits shared by every linkpeek crate.
//!
//! - **Types**: the [`LinkPreview`] payload, its sentinels, and the buffered
//!   [`FetchedPage`] handed to extraction strategies
//! - **Errors**: [`LinkpeekError`] and the crate-wide [`Result`] alias
//! - **Traits**: [`UrlManager`], the site-specific extraction strategy
//! - **Constants**: cache key namespace, default TTL, request headers
//!
//! ## Example
//!
//! ```rust
//! use linkpeek_core::{LinkPreview, TargetUrl};
//!
//! let target = TargetUrl::parse("https://example.com/page").unwrap();
//! assert_eq!(target.cache_key(), "url:https://example.com/page");
//!
//! let payload = LinkPreview::no_link_info_found().encode();
//! assert!(payload.starts_with(b"{\"status\":404"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod format;
pub mod traits;
pub mod types;

pub use constants::*;
pub use error::{LinkpeekError, Result};
pub use traits::*;
pub use types::*;
