//! Upstream fetching.
//!
//! One shared `reqwest::Client` serves every fetch. Every outcome, including
//! transport errors and non-2xx statuses, becomes a [`LinkPreview`].

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use reqwest::header::{ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::redirect::Policy;
use tracing::{debug, instrument, warn};

use linkpeek_core::constants;
use linkpeek_core::error::{LinkpeekError, Result};
use linkpeek_core::traits::UrlManager;
use linkpeek_core::types::{FetchedPage, LinkPreview, TargetUrl};

use crate::config::FetchConfig;
use crate::extract::default_preview;
use crate::managers::MediaManager;

/// Fragments of resolver error messages that mean "this host does not exist".
const DNS_FAILURE_MARKERS: [&str; 4] = [
    "dns error",
    "failed to lookup address",
    "no such host",
    "name or service not known",
];

/// Fetches pages and builds their previews.
pub struct LinkFetcher {
    config: FetchConfig,
    http_client: reqwest::Client,
    managers: Vec<Arc<dyn UrlManager>>,
}

impl std::fmt::Debug for LinkFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let managers: Vec<&str> = self.managers.iter().map(|m| m.name()).collect();
        f.debug_struct("LinkFetcher")
            .field("config", &self.config)
            .field("managers", &managers)
            .finish()
    }
}

impl LinkFetcher {
    /// Creates a fetcher with no extraction strategies.
    pub fn with_config(config: FetchConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .redirect(Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| LinkpeekError::HttpError(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
            managers: Vec::new(),
        })
    }

    /// Creates a fetcher with the built-in strategies registered.
    pub fn with_default_managers(config: FetchConfig) -> Result<Self> {
        Ok(Self::with_config(config)?.with_manager(MediaManager))
    }

    /// Appends a strategy. Strategies are tried in registration order.
    pub fn with_manager(mut self, manager: impl UrlManager + 'static) -> Self {
        self.managers.push(Arc::new(manager));
        self
    }

    /// The fetcher configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetches `target` and returns the serialized preview.
    ///
    /// Never fails; see [`fetch_preview`](Self::fetch_preview).
    pub async fn fetch(&self, target: &TargetUrl) -> Bytes {
        self.fetch_preview(target).await.encode()
    }

    /// Fetches `target` and builds its preview.
    ///
    /// - DNS failures and non-2xx statuses give the `noLinkInfoFound` payload
    /// - other transport errors give a 500 payload naming the error
    /// - otherwise the first matching strategy, or the page title, is used
    #[instrument(skip(self, target), fields(url = %target))]
    pub async fn fetch_preview(&self, target: &TargetUrl) -> LinkPreview {
        let response = match self
            .http_client
            .get(target.as_str())
            .header(ACCEPT_LANGUAGE, constants::ACCEPT_LANGUAGE)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if is_dns_failure(&e) => {
                debug!(error = %e, "Host does not resolve");
                return LinkPreview::no_link_info_found();
            }
            Err(e) => {
                warn!(error = %e, "Upstream request failed");
                return LinkPreview::failure(500, format!("client.Get {}", e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "Upstream returned non-success status");
            return LinkPreview::no_link_info_found();
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_length = response.content_length();

        let body = match read_body(response, self.config.max_body_bytes).await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Failed to read upstream body");
                return LinkPreview::failure(500, format!("html parser error {}", e));
            }
        };

        let page = FetchedPage {
            final_url,
            status: status.as_u16(),
            content_type,
            content_length,
            body,
        };

        if let Some(manager) = self.managers.iter().find(|m| m.matches(&page)) {
            debug!(manager = manager.name(), "Using custom URL manager");
            return manager.extract(&page);
        }

        default_preview(&page)
    }
}

/// Reads at most `limit` bytes of the body; the rest is discarded.
async fn read_body(mut response: reqwest::Response, limit: usize) -> reqwest::Result<Bytes> {
    let mut body = BytesMut::new();
    while let Some(chunk) = response.chunk().await? {
        let room = limit - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}

fn is_dns_failure(err: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        let message = e.to_string().to_ascii_lowercase();
        if DNS_FAILURE_MARKERS.iter().any(|m| message.contains(m)) {
            return true;
        }
        source = e.source();
    }
    false
}
