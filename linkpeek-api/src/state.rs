//! App state: coalescer, fetcher, config.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use linkpeek_cache::{CacheConfig, Coalescer};
use linkpeek_core::error::{LinkpeekError, Result};
use linkpeek_fetch::{FetchConfig, LinkFetcher};

/// Server configuration.
#[derive(Clone, Debug, Default)]
pub struct ApiConfig {
    /// Preview cache settings
    pub cache: CacheConfig,
    /// Upstream fetch settings
    pub fetch: FetchConfig,
}

impl ApiConfig {
    /// Reads overrides from the environment (and `.env`, if present).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        if let Some(ttl) = env_var("LINKPEEK_CACHE_TTL_SECONDS")? {
            config.cache.default_ttl_seconds = ttl;
        }
        if let Some(interval) = env_var::<u64>("LINKPEEK_COMPACTION_INTERVAL_SECONDS")? {
            config.cache.compaction_interval_seconds = (interval > 0).then_some(interval);
        }
        if let Some(timeout) = env_var("LINKPEEK_FETCH_TIMEOUT_SECONDS")? {
            config.fetch = config.fetch.with_timeout(Duration::from_secs(timeout));
        }
        if let Some(limit) = env_var("LINKPEEK_MAX_BODY_BYTES")? {
            config.fetch = config.fetch.with_max_body_bytes(limit);
        }
        if let Ok(user_agent) = std::env::var("LINKPEEK_USER_AGENT") {
            config.fetch = config.fetch.with_user_agent(user_agent);
        }
        Ok(config)
    }
}

fn env_var<T: FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| LinkpeekError::ConfigError(format!("{}={:?}: {}", name, raw, e))),
        Err(_) => Ok(None),
    }
}

/// Shared application state.
pub struct AppState {
    /// Configuration the state was built from
    pub config: ApiConfig,
    /// Coalesced, cached preview payloads keyed by `url:<target>`
    pub coalescer: Coalescer<Bytes>,
    /// Upstream fetcher shared by all fetch tasks
    pub fetcher: Arc<LinkFetcher>,
}

impl AppState {
    /// Builds the state, including the shared HTTP client.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let fetcher = LinkFetcher::with_default_managers(config.fetch.clone())?;

        Ok(Self {
            coalescer: Coalescer::new(config.cache.clone()),
            fetcher: Arc::new(fetcher),
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_parsing() {
        std::env::set_var("LINKPEEK_TEST_NUMBER", " 42 ");
        std::env::set_var("LINKPEEK_TEST_GARBAGE", "forty-two");

        assert_eq!(env_var::<u64>("LINKPEEK_TEST_NUMBER").unwrap(), Some(42));
        assert_eq!(env_var::<u64>("LINKPEEK_TEST_UNSET").unwrap(), None);
        assert!(matches!(
            env_var::<u64>("LINKPEEK_TEST_GARBAGE"),
            Err(LinkpeekError::ConfigError(_))
        ));
    }

    #[test]
    fn test_from_env_applies_overrides() {
        std::env::set_var("LINKPEEK_CACHE_TTL_SECONDS", "30");
        std::env::set_var("LINKPEEK_COMPACTION_INTERVAL_SECONDS", "0");
        std::env::set_var("LINKPEEK_FETCH_TIMEOUT_SECONDS", "0");
        std::env::set_var("LINKPEEK_MAX_BODY_BYTES", "4096");
        std::env::set_var("LINKPEEK_USER_AGENT", "env-agent");

        let config = ApiConfig::from_env().unwrap();
        assert_eq!(config.cache.default_ttl(), Duration::from_secs(30));
        assert_eq!(config.cache.compaction_interval(), None);
        // Timeouts are at least one second.
        assert_eq!(config.fetch.timeout(), Duration::from_secs(1));
        assert_eq!(config.fetch.max_body_bytes, 4096);
        assert_eq!(config.fetch.user_agent, "env-agent");
    }

    #[test]
    fn test_state_uses_config() {
        let mut config = ApiConfig::default();
        config.fetch.user_agent = "custom-agent".into();
        let state = AppState::new(config).unwrap();
        assert_eq!(state.fetcher.config().user_agent, "custom-agent");
        assert_eq!(state.coalescer.in_flight(), 0);
    }
}
