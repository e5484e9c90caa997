use crate::client::PokeApiClient;
use crate::error::AppError;
use crate::pokemon::{
    EvolutionChain, NamedAPIResource, PokedexEntry, PokedexResponse, PokemonData,
    PokemonListResponse, SpeciesInfo, TypeResponse,
};
use crate::query::{QueryCache, QueryKey};
use crate::validation::{validate_entry_name, validate_pagination};
use futures_util::future::try_join_all;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;

/// Limit requested when the caller wants "everything"; clamped to the API maximum.
pub const ALL_ENTRIES_LIMIT: i64 = 100_000;

/// Domain-level access to the catalog: input hygiene, typed results, query caching.
#[derive(Clone)]
pub struct PokemonCatalog {
    client: PokeApiClient,
    queries: Option<QueryCache>,
}

impl PokemonCatalog {
    pub fn new(client: PokeApiClient) -> Self {
        Self {
            client,
            queries: None,
        }
    }

    pub fn with_query_cache(mut self, queries: QueryCache) -> Self {
        self.queries = Some(queries);
        self
    }

    pub fn queries(&self) -> Option<&QueryCache> {
        self.queries.as_ref()
    }

    async fn cached<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        match &self.queries {
            Some(queries) => queries.get_or_fetch(key, fetch).await,
            None => fetch().await,
        }
    }

    /// One page of the national listing. Out-of-range arguments are clamped.
    pub async fn fetch_listing(&self, limit: i64, offset: i64) -> Result<Vec<NamedAPIResource>, AppError> {
        let page = validate_pagination(limit, offset);
        let key = QueryKey::ListPage {
            limit: page.limit,
            offset: page.offset,
        };

        self.cached(key, || async move {
            let endpoint = format!("/pokemon?limit={}&offset={}", page.limit, page.offset);
            let response: PokemonListResponse = self.client.fetch(&endpoint).await?;
            tracing::debug!(
                "Listed {} of {} entries at offset {}",
                response.results.len(),
                response.count,
                page.offset
            );
            Ok(response.results)
        })
        .await
    }

    pub async fn fetch_all_names(&self) -> Result<Vec<String>, AppError> {
        let listing = self.fetch_listing(ALL_ENTRIES_LIMIT, 0).await?;
        Ok(listing.into_iter().map(|entry| entry.name).collect())
    }

    /// Fails without touching the network when `name` is not a valid slug.
    pub async fn fetch_entry(&self, name: &str) -> Result<PokemonData, AppError> {
        let name = validate_entry_name(name)?;
        self.fetch_validated_entry(name).await
    }

    async fn fetch_validated_entry(&self, name: String) -> Result<PokemonData, AppError> {
        self.cached(QueryKey::Detail(name.clone()), || async move {
            let pokemon: PokemonData = self.client.fetch(&format!("/pokemon/{}", name)).await?;
            pokemon.validate()?;
            tracing::debug!("Fetched {} (ID: {})", pokemon.name, pokemon.id);
            Ok(pokemon)
        })
        .await
    }

    /// Fetches every name concurrently. Results follow the input order and
    /// the first failure fails the whole batch.
    pub async fn fetch_entry_batch<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<PokemonData>, AppError> {
        let names = names
            .iter()
            .map(|name| validate_entry_name(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Fetching batch of {} entries", names.len());
        try_join_all(names.into_iter().map(|name| self.fetch_validated_entry(name))).await
    }

    pub async fn fetch_region_entries(&self, region: &str) -> Result<Vec<PokedexEntry>, AppError> {
        self.cached(QueryKey::Region(region.to_string()), || async move {
            let response: PokedexResponse = self.client.fetch(&format!("/pokedex/{}", region)).await?;
            Ok(response.pokemon_entries)
        })
        .await
    }

    /// Passthrough for absolute URLs handed out by earlier responses.
    pub async fn fetch_by_url<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        self.client.fetch(url).await
    }

    pub async fn fetch_species(&self, url: &str) -> Result<SpeciesInfo, AppError> {
        self.cached(QueryKey::Species(url.to_string()), || self.fetch_by_url(url))
            .await
    }

    pub async fn fetch_evolution_chain(&self, url: &str) -> Result<EvolutionChain, AppError> {
        self.cached(QueryKey::EvolutionChain(url.to_string()), || self.fetch_by_url(url))
            .await
    }

    pub async fn fetch_by_type(&self, type_name: &str) -> Result<Vec<String>, AppError> {
        self.cached(QueryKey::Type(type_name.to_string()), || async move {
            let response: TypeResponse = self.client.fetch(&format!("/type/{}", type_name)).await?;
            Ok(response
                .pokemon
                .into_iter()
                .map(|entry| entry.pokemon.name)
                .collect())
        })
        .await
    }

    /// Entry record followed by its species record.
    pub async fn fetch_species_for(&self, name: &str) -> Result<SpeciesInfo, AppError> {
        let pokemon = self.fetch_entry(name).await?;
        self.fetch_species(&pokemon.species.url).await
    }

    /// Walks entry → species → evolution chain. `None` when the species has no chain.
    pub async fn fetch_evolution_for(&self, name: &str) -> Result<Option<EvolutionChain>, AppError> {
        let species = self.fetch_species_for(name).await?;
        match species.evolution_chain {
            Some(chain) => Ok(Some(self.fetch_evolution_chain(&chain.url).await?)),
            None => {
                tracing::debug!("{} has no evolution chain", species.name);
                Ok(None)
            }
        }
    }
}
