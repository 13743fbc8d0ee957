//! Default preview extraction from HTML pages.

use htmlescape::encode_minimal;
use scraper::{Html, Selector};

use linkpeek_core::types::{FetchedPage, LinkPreview};

/// Returns the trimmed text of the first `<title>` element, if non-empty.
pub fn page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    let title = document
        .select(&selector)
        .next()?
        .text()
        .collect::<String>();

    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Renders the tooltip HTML for a page title and URL.
///
/// Both are HTML-escaped; the title section is left out when there is none.
pub fn render_tooltip(title: Option<&str>, url: &str) -> String {
    let title = title
        .map(|t| format!("<b>{}</b><hr>", encode_minimal(t)))
        .unwrap_or_default();
    format!(
        "<div style=\"text-align: left;\">{}<b>URL:</b> {}</div>",
        title,
        encode_minimal(url)
    )
}

/// Builds the preview used when no [`UrlManager`](linkpeek_core::UrlManager) matched.
pub fn default_preview(page: &FetchedPage) -> LinkPreview {
    let title = if page.is_html() {
        page_title(&page.text())
    } else {
        None
    };

    LinkPreview::new(
        page.status,
        render_tooltip(title.as_deref(), &page.final_url),
        page.final_url.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn page(content_type: &str, body: &'static str) -> FetchedPage {
        FetchedPage {
            final_url: "https://example.com/post?a=1&b=2".into(),
            status: 200,
            content_type: Some(content_type.into()),
            content_length: None,
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[test]
    fn test_page_title() {
        let html = "<html><head><title>  Hello World \n</title></head><body></body></html>";
        assert_eq!(page_title(html).as_deref(), Some("Hello World"));
    }

    #[test]
    fn test_page_title_takes_first() {
        let html = "<title>First</title><svg><title>Second</title></svg>";
        assert_eq!(page_title(html).as_deref(), Some("First"));
    }

    #[test]
    fn test_page_title_missing_or_blank() {
        assert!(page_title("<html><body>no title</body></html>").is_none());
        assert!(page_title("<title>   </title>").is_none());
    }

    #[test]
    fn test_render_tooltip_escapes() {
        let tooltip = render_tooltip(Some("<script>x</script>"), "https://e.com/?a=1&b=2");
        assert_eq!(
            tooltip,
            "<div style=\"text-align: left;\"><b>&lt;script&gt;x&lt;/script&gt;</b><hr>\
             <b>URL:</b> https://e.com/?a=1&amp;b=2</div>"
        );
    }

    #[test]
    fn test_render_tooltip_without_title() {
        assert_eq!(
            render_tooltip(None, "https://e.com/"),
            "<div style=\"text-align: left;\"><b>URL:</b> https://e.com/</div>"
        );
    }

    #[test]
    fn test_default_preview() {
        let preview = default_preview(&page("text/html; charset=utf-8", "<title>Post</title>"));
        assert_eq!(preview.status, 200);
        assert_eq!(preview.link.as_deref(), Some("https://example.com/post?a=1&b=2"));
        let tooltip = preview.tooltip.unwrap();
        assert!(tooltip.contains("<b>Post</b><hr>"));
        assert!(tooltip.contains("a=1&amp;b=2"));
    }

    #[test]
    fn test_default_preview_skips_title_for_non_html() {
        let preview = default_preview(&page("text/plain", "<title>Not HTML</title>"));
        assert!(!preview.tooltip.unwrap().contains("Not HTML"));
    }
}
