//! Common traits for linkpeek.

use crate::types::{FetchedPage, LinkPreview};

// ═══════════════════════════════════════════════════════════════════════════════
// EXTRACTION STRATEGY
// ═══════════════════════════════════════════════════════════════════════════════

/// A site-specific extraction strategy.
///
/// Managers are tried in priority order against every successful fetch; the
/// first one whose [`matches`](Self::matches) returns true produces the
/// payload. When none match, the default `<title>` extraction is used.
///
/// Implementations run inside the fetch, once per coalesced request, and must
/// not fail: problems are expressed as a failure-shaped [`LinkPreview`].
pub trait UrlManager: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Returns true if this manager wants to handle the page.
    fn matches(&self, page: &FetchedPage) -> bool;

    /// Builds the preview for a page this manager matched.
    fn extract(&self, page: &FetchedPage) -> LinkPreview;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    struct HostManager(&'static str);

    impl UrlManager for HostManager {
        fn name(&self) -> &str {
            "host"
        }

        fn matches(&self, page: &FetchedPage) -> bool {
            page.final_url.contains(self.0)
        }

        fn extract(&self, page: &FetchedPage) -> LinkPreview {
            LinkPreview::new(page.status, self.0, page.final_url.clone())
        }
    }

    #[test]
    fn test_manager_is_object_safe() {
        let managers: Vec<Box<dyn UrlManager>> = vec![
            Box::new(HostManager("a.example")),
            Box::new(HostManager("b.example")),
        ];
        let page = FetchedPage {
            final_url: "https://b.example/".into(),
            status: 200,
            content_type: None,
            content_length: None,
            body: Bytes::new(),
        };

        let hit = managers.iter().find(|m| m.matches(&page)).unwrap();
        assert_eq!(hit.extract(&page).tooltip.as_deref(), Some("b.example"));
    }
}
