//! Request coalescing on top of [`TtlCache`].
//!
//! For every key there is at most one fetch in flight. Callers that miss the
//! cache register a one-shot waiter; the caller whose registration creates the
//! waiter list spawns the fetch. When the fetch finishes, its value is written
//! to the cache and the waiter list is drained and broadcast, in one critical
//! section, so a later caller either joins the list or finds the cached value.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, trace, warn};

use crate::cache::{CacheConfig, TtlCache};
use crate::error::CoalesceError;

type Waiters<V> = HashMap<String, Vec<oneshot::Sender<V>>>;

struct Shared<V> {
    cache: TtlCache<V>,
    /// A key is present exactly while a fetch for it is in flight.
    waiters: Mutex<Waiters<V>>,
}

impl<V: Clone> Shared<V> {
    /// Caches `value` and hands it to every waiter registered for `key`.
    fn complete(&self, key: &str, ttl: Duration, value: V) {
        let waiters = {
            let mut waiters = self.waiters.lock();
            self.cache.set(key, value.clone(), ttl);
            waiters.remove(key).unwrap_or_default()
        };

        let total = waiters.len();
        let mut delivered = 0;
        for waiter in waiters {
            // A dropped receiver means the caller gave up waiting.
            if waiter.send(value.clone()).is_ok() {
                delivered += 1;
            }
        }
        debug!(key, total, delivered, "Broadcast fetch result");
    }

    /// Drops the waiter list of a fetch that ended without a value.
    fn abandon(&self, key: &str) {
        let waiters = self.waiters.lock().remove(key).unwrap_or_default();
        warn!(key, waiters = waiters.len(), "Fetch ended without a result");
    }
}

/// Ownership of the single in-flight fetch for a key.
///
/// If the fetch task is dropped before [`finish`](Self::finish) runs (the
/// fetch panicked, or the runtime is shutting down), the waiter list is
/// removed so waiters are released and the next caller can fetch again.
struct InFlight<V: Clone> {
    shared: Arc<Shared<V>>,
    key: String,
    finished: bool,
}

impl<V: Clone> InFlight<V> {
    fn finish(mut self, ttl: Duration, value: V) {
        self.finished = true;
        self.shared.complete(&self.key, ttl, value);
    }
}

impl<V: Clone> Drop for InFlight<V> {
    fn drop(&mut self) {
        if !self.finished {
            self.shared.abandon(&self.key);
        }
    }
}

/// Deduplicates concurrent fetches of the same key and caches their results.
///
/// Cloning is cheap and yields a handle to the same state.
///
/// # Example
///
/// ```rust
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use std::time::Duration;
/// use linkpeek_cache::Coalescer;
///
/// let coalescer: Coalescer<String> = Coalescer::new(Default::default());
/// let value = coalescer
///     .resolve("url:a", Duration::from_secs(60), || async { "fetched".to_string() })
///     .await
///     .unwrap();
/// assert_eq!(value, "fetched");
///
/// // Served from the cache, the fetch is not invoked.
/// let cached = coalescer
///     .resolve("url:a", Duration::from_secs(60), || async { "refetched".to_string() })
///     .await
///     .unwrap();
/// assert_eq!(cached, "fetched");
/// # }
/// ```
pub struct Coalescer<V> {
    shared: Arc<Shared<V>>,
}

impl<V> Clone for Coalescer<V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<V> std::fmt::Debug for Coalescer<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let in_flight = self
            .shared
            .waiters
            .try_lock()
            .map(|w| w.len())
            .unwrap_or_default();
        f.debug_struct("Coalescer")
            .field("in_flight", &in_flight)
            .finish()
    }
}

impl<V> Coalescer<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a coalescer over a fresh cache.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_cache(TtlCache::with_config(config))
    }

    /// Creates a coalescer over an existing cache.
    pub fn with_cache(cache: TtlCache<V>) -> Self {
        Self {
            shared: Arc::new(Shared {
                cache,
                waiters: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// The underlying cache.
    pub fn cache(&self) -> &TtlCache<V> {
        &self.shared.cache
    }

    /// Number of keys with a fetch currently in flight.
    pub fn in_flight(&self) -> usize {
        self.shared.waiters.lock().len()
    }

    /// Returns the cached value for `key`, or waits for the single shared fetch.
    ///
    /// On a cache miss, the first caller for `key` spawns `fetch` on the tokio
    /// runtime; everyone arriving until it completes waits for the same value.
    /// The value is cached for `ttl` whatever it represents, so failures must
    /// be encoded into `V` by `fetch` itself.
    ///
    /// Dropping the returned future abandons only this caller's wait: a fetch
    /// it started keeps running and still serves the other waiters and the
    /// cache.
    ///
    /// # Errors
    ///
    /// [`CoalesceError::FetchAbandoned`] if the fetch task ended without a
    /// value, which only happens when `fetch` panics or the runtime shuts
    /// down.
    #[instrument(skip(self, fetch), level = "debug")]
    pub async fn resolve<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<V, CoalesceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V> + Send + 'static,
    {
        if let Some(value) = self.shared.cache.get(key) {
            trace!("Cache hit");
            return Ok(value);
        }

        let (tx, rx) = oneshot::channel();
        let is_first = {
            let mut waiters = self.shared.waiters.lock();
            // Completion writes the cache under this lock, so a value cached
            // since the fast path is visible here.
            if let Some(value) = self.shared.cache.get(key) {
                trace!("Cache hit after lock");
                return Ok(value);
            }
            let list = waiters.entry(key.to_string()).or_default();
            list.push(tx);
            list.len() == 1
        };

        if is_first {
            debug!("Cache miss, starting fetch");
            // Armed before `fetch` runs, so a panic while building the
            // future still releases the waiter list.
            let flight = InFlight {
                shared: Arc::clone(&self.shared),
                key: key.to_string(),
                finished: false,
            };
            let fut = fetch();
            Self::spawn_fetch(flight, ttl, fut);
        } else {
            debug!("Cache miss, joining in-flight fetch");
        }

        rx.await.map_err(|_| CoalesceError::FetchAbandoned {
            key: key.to_string(),
        })
    }

    fn spawn_fetch<Fut>(flight: InFlight<V>, ttl: Duration, fut: Fut)
    where
        Fut: Future<Output = V> + Send + 'static,
    {
        tokio::spawn(async move {
            let value = fut.await;
            flight.finish(ttl, value);
        });
    }

    /// Periodically sweeps expired entries out of the cache.
    ///
    /// The task holds only a weak reference and stops once every handle to
    /// this coalescer is dropped. A zero period disables compaction and the
    /// returned task finishes immediately.
    pub fn spawn_compaction(&self, every: Duration) -> JoinHandle<()> {
        if every.is_zero() {
            debug!("Compaction disabled");
            return tokio::spawn(async {});
        }

        let shared: Weak<Shared<V>> = Arc::downgrade(&self.shared);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(shared) = shared.upgrade() else {
                    trace!("Coalescer dropped, stopping compaction");
                    break;
                };
                let removed = shared.cache.cleanup_expired();
                if removed > 0 {
                    debug!(removed, "Compacted expired cache entries");
                }
            }
        })
    }
}
