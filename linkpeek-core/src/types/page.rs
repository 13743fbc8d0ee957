//! Buffered upstream responses.

use bytes::Bytes;

/// An upstream page, fully read, as seen by extraction strategies.
#[derive(Clone, Debug)]
pub struct FetchedPage {
    /// URL the page was finally served from, after redirects
    pub final_url: String,
    /// Upstream HTTP status
    pub status: u16,
    /// Value of the `Content-Type` header, if any
    pub content_type: Option<String>,
    /// Value of the `Content-Length` header, if any
    pub content_length: Option<u64>,
    /// Response body (possibly truncated to the configured limit)
    pub body: Bytes,
}

impl FetchedPage {
    /// Returns the media type without parameters, lowercased.
    ///
    /// `text/html; charset=utf-8` becomes `text/html`.
    pub fn mime_type(&self) -> Option<String> {
        self.content_type.as_deref().map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }

    /// Returns true when the page declares an HTML content type, or none at all.
    pub fn is_html(&self) -> bool {
        match self.mime_type() {
            Some(mime) => mime == "text/html" || mime == "application/xhtml+xml",
            None => true,
        }
    }

    /// The body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(content_type: Option<&str>) -> FetchedPage {
        FetchedPage {
            final_url: "https://example.com/".into(),
            status: 200,
            content_type: content_type.map(str::to_string),
            content_length: None,
            body: Bytes::from_static(b"<title>hi</title>"),
        }
    }

    #[test]
    fn test_mime_type_strips_parameters() {
        assert_eq!(
            page(Some("Text/HTML; charset=UTF-8")).mime_type().as_deref(),
            Some("text/html")
        );
    }

    #[test]
    fn test_is_html() {
        assert!(page(Some("text/html")).is_html());
        assert!(page(None).is_html());
        assert!(!page(Some("image/png")).is_html());
    }

    #[test]
    fn test_text() {
        assert_eq!(page(None).text(), "<title>hi</title>");
    }
}
