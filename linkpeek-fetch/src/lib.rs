//! # linkpeek Fetch
//!
//! Turns a URL into a serialized [`LinkPreview`](linkpeek_core::LinkPreview).
//!
//! [`LinkFetcher::fetch`] is the function handed to the coalescer: it performs
//! the upstream request, runs the [`UrlManager`](linkpeek_core::UrlManager)
//! chain, falls back to `<title>` extraction, and folds every failure into the
//! payload so it never returns an error.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod extract;
mod fetcher;
mod managers;

pub use config::FetchConfig;
pub use extract::{default_preview, page_title, render_tooltip};
pub use fetcher::LinkFetcher;
pub use managers::MediaManager;
