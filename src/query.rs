use crate::cache::CacheStore;
use crate::error::AppError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const MINUTE: u64 = 60;

/// Identity of a catalog query. Equal keys share one cached result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Detail(String),
    ListPage { limit: u32, offset: u64 },
    Region(String),
    Species(String),
    EvolutionChain(String),
    Type(String),
}

impl QueryKey {
    /// How long a cached result stays usable before it is refetched.
    pub fn stale_time(&self) -> Duration {
        let minutes = match self {
            QueryKey::Detail(_) | QueryKey::ListPage { .. } => 5,
            QueryKey::Region(_) | QueryKey::Species(_) | QueryKey::Type(_) => 10,
            QueryKey::EvolutionChain(_) => 60,
        };
        Duration::from_secs(minutes * MINUTE)
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryKey::Detail(name) => write!(f, "pokemon:detail:{}", name),
            QueryKey::ListPage { limit, offset } => {
                write!(f, "pokemon-list:{}:{}", limit, offset)
            }
            QueryKey::Region(region) => write!(f, "pokedex:{}", region),
            QueryKey::Species(url) => write!(f, "species:{}", url),
            QueryKey::EvolutionChain(url) => write!(f, "evolution-chain:{}", url),
            QueryKey::Type(name) => write!(f, "type:{}", name),
        }
    }
}

/// Typed results of earlier catalog queries, stored as JSON.
#[derive(Clone)]
pub struct QueryCache {
    store: Arc<dyn CacheStore<serde_json::Value>>,
}

impl QueryCache {
    pub fn new(store: Arc<dyn CacheStore<serde_json::Value>>) -> Self {
        Self { store }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let value = self.store.get(&key.to_string())?;
        match serde_json::from_value(value) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!("Discarding unreadable cached result for {}: {}", key, e);
                self.store.remove(&key.to_string());
                None
            }
        }
    }

    pub fn put<T: Serialize>(&self, key: &QueryKey, result: &T) -> Result<(), AppError> {
        let value = serde_json::to_value(result)?;
        self.store
            .insert_with_ttl(key.to_string(), value, key.stale_time())?;
        Ok(())
    }

    /// Returns the fresh cached result for `key` or runs `fetch` and stores its output.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        if let Some(result) = self.get(&key) {
            return Ok(result);
        }

        let result = fetch().await?;
        if let Err(e) = self.put(&key, &result) {
            tracing::warn!("Failed to cache query {}: {}", key, e);
        }
        Ok(result)
    }

    pub fn invalidate(&self, key: &QueryKey) -> bool {
        self.store.remove(&key.to_string()).is_some()
    }

    pub fn invalidate_all(&self) {
        self.store.clear();
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
