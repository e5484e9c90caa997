use crate::config::CacheConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub enum CacheError {
    Poisoned(String),
    EmptyKey,
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::Poisoned(msg) => write!(f, "cache state poisoned: {}", msg),
            CacheError::EmptyKey => write!(f, "cache keys must not be empty"),
        }
    }
}

impl std::error::Error for CacheError {}

/// Shared interface of the response cache and the query cache.
pub trait CacheStore<T>: Send + Sync
where
    T: Clone + Send + Sync,
{
    /// Fresh value for `key`. Expired entries are dropped on the way.
    fn get(&self, key: &str) -> Option<T>;
    fn insert(&self, key: String, value: T) -> Result<(), CacheError>;
    /// Stores `value` with its own freshness window instead of the cache default.
    fn insert_with_ttl(&self, key: String, value: T, ttl: Duration) -> Result<(), CacheError>;
    fn remove(&self, key: &str) -> Option<T>;
    fn clear(&self);
    fn len(&self) -> usize;
    fn hit_rate(&self) -> f64;
    fn purge_expired(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
    pub purges: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    value: T,
    stored_at: Instant,
    read_at: Instant,
    ttl: Duration,
}

impl<T> Slot<T> {
    fn expired(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) > self.ttl
    }
}

struct State<T> {
    slots: HashMap<String, Slot<T>>,
    stats: CacheStats,
}

impl<T> State<T> {
    // Oldest read goes first, ties go to the oldest write
    fn evict_one(&mut self) -> Option<String> {
        let victim = self
            .slots
            .iter()
            .min_by_key(|(_, slot)| (slot.read_at, slot.stored_at))
            .map(|(key, _)| key.clone())?;
        self.slots.remove(&victim);
        self.stats.evictions += 1;
        Some(victim)
    }
}

/// Bounded in-process cache with per-entry expiry.
///
/// Entries and counters live behind one mutex, so a lookup and its stats
/// update happen together. A poisoned lock degrades to a miss.
#[derive(Clone)]
pub struct MemoryCache<T> {
    state: Arc<Mutex<State<T>>>,
    capacity: usize,
    default_ttl: Duration,
}

impl<T> MemoryCache<T>
where
    T: Clone + Send + Sync,
{
    pub fn new(config: CacheConfig) -> Self {
        tracing::info!(
            "memory cache ready (capacity {}, default ttl {}s)",
            config.max_size,
            config.expiration
        );

        Self {
            state: Arc::new(Mutex::new(State {
                slots: HashMap::new(),
                stats: CacheStats::default(),
            })),
            capacity: config.max_size.max(1) as usize,
            default_ttl: Duration::from_secs(config.expiration as u64),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(CacheConfig::default())
    }

    fn lock(&self) -> Result<MutexGuard<'_, State<T>>, CacheError> {
        self.state.lock().map_err(|e| {
            tracing::error!("cache mutex poisoned: {}", e);
            CacheError::Poisoned(e.to_string())
        })
    }

    pub fn stats(&self) -> Option<CacheStats> {
        self.lock().ok().map(|state| state.stats.clone())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lock()
            .map(|state| state.slots.contains_key(key))
            .unwrap_or(false)
    }

    /// Keys currently held, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .lock()
            .map(|state| state.slots.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

impl<T> Default for MemoryCache<T>
where
    T: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<T> CacheStore<T> for MemoryCache<T>
where
    T: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<T> {
        if key.is_empty() {
            return None;
        }
        let mut guard = self.lock().ok()?;
        let state = &mut *guard;
        let now = Instant::now();

        match state.slots.get(key).map(|slot| slot.expired(now)) {
            None => {
                state.stats.misses += 1;
                None
            }
            Some(true) => {
                tracing::debug!("cache entry {} expired", key);
                state.slots.remove(key);
                state.stats.misses += 1;
                None
            }
            Some(false) => {
                let slot = state.slots.get_mut(key)?;
                slot.read_at = now;
                state.stats.hits += 1;
                Some(slot.value.clone())
            }
        }
    }

    fn insert(&self, key: String, value: T) -> Result<(), CacheError> {
        self.insert_with_ttl(key, value, self.default_ttl)
    }

    fn insert_with_ttl(&self, key: String, value: T, ttl: Duration) -> Result<(), CacheError> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }
        let mut state = self.lock()?;

        if !state.slots.contains_key(&key) && state.slots.len() >= self.capacity {
            if let Some(evicted) = state.evict_one() {
                tracing::debug!("cache full, evicted {}", evicted);
            }
        }

        let now = Instant::now();
        state.slots.insert(
            key,
            Slot {
                value,
                stored_at: now,
                read_at: now,
                ttl,
            },
        );
        state.stats.inserts += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> Option<T> {
        let mut state = self.lock().ok()?;
        state.slots.remove(key).map(|slot| slot.value)
    }

    fn clear(&self) {
        if let Ok(mut state) = self.lock() {
            tracing::debug!("clearing {} cache entries", state.slots.len());
            state.slots.clear();
            state.stats = CacheStats::default();
        }
    }

    fn len(&self) -> usize {
        self.lock().map(|state| state.slots.len()).unwrap_or(0)
    }

    fn hit_rate(&self) -> f64 {
        self.stats().map(|stats| stats.hit_rate()).unwrap_or(0.0)
    }

    fn purge_expired(&self) -> usize {
        let Ok(mut state) = self.lock() else {
            return 0;
        };
        let now = Instant::now();
        let before = state.slots.len();
        state.slots.retain(|_, slot| !slot.expired(now));
        let purged = before - state.slots.len();

        if purged > 0 {
            state.stats.purges += 1;
            tracing::debug!("purged {} expired cache entries", purged);
        }
        purged
    }
}

/// Purges expired entries from `cache` every `every` until the task is dropped.
pub async fn run_cleanup_task<T>(cache: Arc<dyn CacheStore<T>>, every: Duration)
where
    T: Clone + Send + Sync,
{
    let mut ticker = tokio::time::interval(every);
    loop {
        ticker.tick().await;
        cache.purge_expired();
    }
}
