//! Built-in [`UrlManager`] strategies.

use htmlescape::encode_minimal;

use linkpeek_core::format::insert_commas;
use linkpeek_core::traits::UrlManager;
use linkpeek_core::types::{FetchedPage, LinkPreview};

const MEDIA_PREFIXES: [&str; 3] = ["image/", "video/", "audio/"];

/// Describes direct links to images, video, and audio.
///
/// Such responses have no `<title>`, so the tooltip shows the media type and
/// size instead.
#[derive(Clone, Copy, Debug, Default)]
pub struct MediaManager;

impl UrlManager for MediaManager {
    fn name(&self) -> &str {
        "media"
    }

    fn matches(&self, page: &FetchedPage) -> bool {
        page.mime_type()
            .is_some_and(|mime| MEDIA_PREFIXES.iter().any(|p| mime.starts_with(p)))
    }

    fn extract(&self, page: &FetchedPage) -> LinkPreview {
        let mime = page.mime_type().unwrap_or_default();
        let size = page
            .content_length
            .map(|len| {
                format!(
                    "<br><b>Size:</b> {} bytes",
                    insert_commas(&len.to_string(), 3)
                )
            })
            .unwrap_or_default();

        let tooltip = format!(
            "<div style=\"text-align: left;\"><b>Media:</b> {}{}<hr><b>URL:</b> {}</div>",
            encode_minimal(&mime),
            size,
            encode_minimal(&page.final_url)
        );
        LinkPreview::new(page.status, tooltip, page.final_url.clone())
    }
}
