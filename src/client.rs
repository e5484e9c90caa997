use crate::cache::CacheStore;
use crate::config::PokemonConfig;
use crate::error::{AppError, FetchError};
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

pub const BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_REVALIDATE: Duration = Duration::from_secs(60 * 30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Serve from the response cache while the entry is fresh.
    #[default]
    ForceCache,
    /// Always go to the network and do not store the response.
    NoStore,
}

/// Per-call overrides. Unset fields fall back to the client defaults.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub method: Option<Method>,
    /// Replaces the default `Content-Type: application/json` header entirely.
    /// Requests carrying their own headers bypass the response cache.
    pub headers: Option<HeaderMap>,
    pub cache: Option<CacheMode>,
    pub revalidate: Option<Duration>,
    pub timeout: Option<Duration>,
}

pub type ResponseCache = Arc<dyn CacheStore<serde_json::Value>>;

/// Thin JSON-over-HTTP wrapper around the PokeAPI.
///
/// Relative endpoints are resolved against `base_url`, absolute ones (anything
/// starting with `http`) are used as-is. Dropping the returned future cancels
/// the request.
#[derive(Clone)]
pub struct PokeApiClient {
    http: reqwest::Client,
    base_url: String,
    revalidate: Duration,
    timeout: Option<Duration>,
    responses: Option<ResponseCache>,
}

impl PokeApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            revalidate: DEFAULT_REVALIDATE,
            timeout: None,
            responses: None,
        }
    }

    pub fn from_config(config: &PokemonConfig) -> Self {
        let mut client = Self::new(config.api_url.clone());
        client.revalidate = config.revalidate();
        client.timeout = config.timeout();
        client
    }

    pub fn with_response_cache(mut self, cache: ResponseCache) -> Self {
        self.responses = Some(cache);
        self
    }

    pub fn build_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http") {
            endpoint.to_string()
        } else if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, AppError> {
        self.fetch_with(endpoint, FetchOptions::default()).await
    }

    pub async fn fetch_with<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: FetchOptions,
    ) -> Result<T, AppError> {
        let url = self.build_url(endpoint);
        let method = options.method.unwrap_or(Method::GET);
        // Keyed by URL only, so custom headers bypass it
        let cache = match options.cache.unwrap_or_default() {
            CacheMode::ForceCache if method == Method::GET && options.headers.is_none() => {
                self.responses.as_ref()
            }
            _ => None,
        };

        if let Some(value) = cache.and_then(|cache| cache.get(&url)) {
            tracing::debug!("Serving {} from response cache", url);
            return decode(&url, value);
        }

        tracing::debug!("Fetching {} {}", method, url);
        let mut request = self.http.request(method, &url);
        request = match options.headers {
            Some(headers) => request.headers(headers),
            None => request.header(CONTENT_TYPE, "application/json"),
        };
        if let Some(timeout) = options.timeout.or(self.timeout) {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Failed to make HTTP request to {}: {}", url, e);
            AppError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let error = FetchError {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            };
            tracing::error!("{}", error);
            return Err(error.into());
        }

        let value = response.json::<serde_json::Value>().await.map_err(|e| {
            tracing::error!("Failed to parse JSON response from {}: {}", url, e);
            AppError::ParseError(format!("JSON parsing failed for {}: {}", url, e))
        })?;

        if let Some(cache) = cache {
            let ttl = options.revalidate.unwrap_or(self.revalidate);
            if let Err(e) = cache.insert_with_ttl(url.clone(), value.clone(), ttl) {
                tracing::warn!("Failed to cache response for {}: {}", url, e);
            }
        }

        decode(&url, value)
    }
}

fn decode<T: DeserializeOwned>(url: &str, value: serde_json::Value) -> Result<T, AppError> {
    serde_json::from_value(value).map_err(|e| {
        tracing::error!("Unexpected response shape from {}: {}", url, e);
        AppError::ParseError(format!("Unexpected response shape from {}: {}", url, e))
    })
}
