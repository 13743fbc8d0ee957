//! Domain types for linkpeek.
//!
//! - [`LinkPreview`]: the JSON payload returned to clients and cached
//! - [`FetchedPage`]: a buffered upstream response handed to extractors
//! - [`TargetUrl`]: a validated, normalized URL and its cache key

mod page;
mod preview;
mod target;

pub use page::*;
pub use preview::*;
pub use target::*;
