use crate::catalog::{ALL_ENTRIES_LIMIT, PokemonCatalog};
use crate::error::AppError;
use crate::evolution::{EvolutionView, evolution_view};
use crate::favorites::{Favorites, FavoritesStore};
use crate::formatters::{EntryView, entry_view};
use crate::pokemon::{NamedAPIResource, PokedexEntry, PokemonData, TypeName};
use crate::search::{SortOption, SortOrder, filter_by_types, search_names, sort_entries};
use crate::species::{FALLBACK_LANGUAGE, SpeciesSummary};
use crate::validation::validate_entry_name;
use axum::{
    Json, Router, debug_handler,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct AppState {
    pub catalog: PokemonCatalog,
    pub favorites: Mutex<Favorites<Box<dyn FavoritesStore>>>,
}

impl AppState {
    pub fn new(catalog: PokemonCatalog, favorites: Favorites<Box<dyn FavoritesStore>>) -> Self {
        Self {
            catalog,
            favorites: Mutex::new(favorites),
        }
    }

    fn favorites(&self) -> Result<MutexGuard<'_, Favorites<Box<dyn FavoritesStore>>>, AppError> {
        self.favorites
            .lock()
            .map_err(|e| AppError::StorageError(format!("Favorites lock poisoned: {}", e)))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Fetch(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            AppError::Fetch(_) | AppError::NetworkError(_) | AppError::ParseError(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::ConfigError(_) | AppError::CacheError(_) | AppError::StorageError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/pokemon", get(list_handler))
        .route("/pokemon/{name}", get(entry_handler))
        .route("/pokemon/{name}/species", get(species_handler))
        .route("/pokemon/{name}/evolution", get(evolution_handler))
        .route("/batch", get(batch_handler))
        .route("/names", get(names_handler))
        .route("/pokedex/{region}", get(region_handler))
        .route("/type/{type_name}", get(type_handler))
        .route("/favorites", get(favorites_handler))
        .route(
            "/favorites/{name}",
            put(add_favorite_handler).delete(remove_favorite_handler),
        )
        .route("/favorites/{name}/toggle", post(toggle_favorite_handler))
        .with_state(state)
}

#[derive(Deserialize)]
pub struct ListParams {
    limit: Option<i64>,
    offset: Option<i64>,
}

#[debug_handler]
async fn list_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<NamedAPIResource>>, AppError> {
    let listing = state
        .catalog
        .fetch_listing(
            params.limit.unwrap_or(ALL_ENTRIES_LIMIT),
            params.offset.unwrap_or(0),
        )
        .await?;
    Ok(Json(listing))
}

#[debug_handler]
async fn entry_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<EntryView>, AppError> {
    let pokemon = state.catalog.fetch_entry(&name).await?;
    Ok(Json(entry_view(pokemon)))
}

#[derive(Deserialize)]
pub struct SpeciesParams {
    lang: Option<String>,
}

#[debug_handler]
async fn species_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<SpeciesParams>,
) -> Result<Json<SpeciesSummary>, AppError> {
    let species = state.catalog.fetch_species_for(&name).await?;
    let language = params.lang.as_deref().unwrap_or(FALLBACK_LANGUAGE);
    Ok(Json(species.summary(language)))
}

#[debug_handler]
async fn evolution_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let response = match state.catalog.fetch_evolution_for(&name).await? {
        Some(chain) => Json::<EvolutionView>(evolution_view(&chain)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: format!("{} has no evolution chain", name),
            }),
        )
            .into_response(),
    };
    Ok(response)
}

#[derive(Deserialize)]
pub struct BatchParams {
    names: String,
    types: Option<String>,
    #[serde(default)]
    sort: SortOption,
    #[serde(default)]
    order: SortOrder,
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|part| !part.is_empty())
}

/// Details for a comma-separated list of names, optionally filtered and sorted.
#[debug_handler]
async fn batch_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BatchParams>,
) -> Result<Json<Vec<PokemonData>>, AppError> {
    let names: Vec<&str> = split_list(&params.names).collect();
    let types = match params.types.as_deref() {
        Some(raw) => split_list(raw)
            .map(str::parse::<TypeName>)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let entries = state.catalog.fetch_entry_batch(names.as_slice()).await?;
    let mut selected = filter_by_types(&entries, &types);
    sort_entries(&mut selected, params.sort, params.order);
    Ok(Json(selected.into_iter().cloned().collect()))
}

#[derive(Deserialize)]
pub struct NamesParams {
    #[serde(default)]
    q: String,
}

#[debug_handler]
async fn names_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NamesParams>,
) -> Result<Json<Vec<String>>, AppError> {
    let names = state.catalog.fetch_all_names().await?;
    Ok(Json(search_names(&names, &params.q)))
}

#[debug_handler]
async fn region_handler(
    State(state): State<Arc<AppState>>,
    Path(region): Path<String>,
) -> Result<Json<Vec<PokedexEntry>>, AppError> {
    Ok(Json(state.catalog.fetch_region_entries(&region).await?))
}

#[debug_handler]
async fn type_handler(
    State(state): State<Arc<AppState>>,
    Path(type_name): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.catalog.fetch_by_type(&type_name).await?))
}

#[derive(Serialize)]
pub struct FavoriteStatus {
    name: String,
    favorite: bool,
}

/// Runs a favorites operation on the blocking pool, since saving touches the filesystem.
async fn with_favorites<R, F>(state: Arc<AppState>, op: F) -> Result<R, AppError>
where
    F: FnOnce(&mut Favorites<Box<dyn FavoritesStore>>) -> Result<R, AppError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut favorites = state.favorites()?;
        op(&mut favorites)
    })
    .await
    .map_err(|e| AppError::StorageError(format!("Favorites task failed: {}", e)))?
}

#[debug_handler]
async fn favorites_handler(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.favorites()?.list()))
}

#[debug_handler]
async fn add_favorite_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<FavoriteStatus>, AppError> {
    let name = validate_entry_name(&name)?;
    let key = name.clone();
    with_favorites(state, move |favorites| favorites.add(&key)).await?;
    Ok(Json(FavoriteStatus { name, favorite: true }))
}

#[debug_handler]
async fn remove_favorite_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<FavoriteStatus>, AppError> {
    let name = validate_entry_name(&name)?;
    let key = name.clone();
    with_favorites(state, move |favorites| favorites.remove(&key)).await?;
    Ok(Json(FavoriteStatus { name, favorite: false }))
}

#[debug_handler]
async fn toggle_favorite_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<FavoriteStatus>, AppError> {
    let name = validate_entry_name(&name)?;
    let key = name.clone();
    let favorite = with_favorites(state, move |favorites| favorites.toggle(&key)).await?;
    Ok(Json(FavoriteStatus { name, favorite }))
}
