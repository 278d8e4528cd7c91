use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::PokeApi;
use crate::config::Config;
use crate::detail::{DetailView, GalleryCard};
use crate::error::CatalogError;
use crate::loader::load_batch;
use crate::projector::TypeFilter;
use crate::state::{CatalogState, Summary};

pub struct AppState<A> {
    catalog: Mutex<CatalogState>,
    api: A,
    language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadOutcome {
    pub added: usize,
    pub skipped: bool,
    pub summary: Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavoriteToggle {
    pub id: u32,
    pub favorite: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct FamilyQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default, rename = "type")]
    pub type_filter: String,
}

impl<A: PokeApi> AppState<A> {
    pub fn new(api: A, config: &Config) -> Self {
        Self {
            catalog: Mutex::new(CatalogState::new(config.pokeapi.page_size)),
            api,
            language: config.pokeapi.language.clone(),
        }
    }

    fn catalog(&self) -> Result<MutexGuard<'_, CatalogState>, CatalogError> {
        self.catalog.lock().map_err(|e| {
            tracing::error!("Failed to acquire catalog lock: {}", e);
            CatalogError::State(e.to_string())
        })
    }

    pub fn summary(&self) -> Result<Summary, CatalogError> {
        Ok(self.catalog()?.summary())
    }

    /// Loads the next page, or the first one again when `reset` is set.
    ///
    /// A request made while another load is running is dropped.
    pub async fn load_next_page(&self, reset: bool) -> Result<LoadOutcome, CatalogError> {
        let request = {
            let mut catalog = self.catalog()?;
            if reset && !catalog.is_loading() {
                tracing::info!("Reloading catalog from the first page");
                catalog.reset();
            }
            catalog.begin_load()
        };

        let Some(request) = request else {
            return Ok(LoadOutcome {
                added: 0,
                skipped: true,
                summary: self.summary()?,
            });
        };

        let result = load_batch(&self.api, request).await;

        let mut catalog = self.catalog()?;
        let added = catalog.finish_load(result);
        Ok(LoadOutcome {
            added,
            skipped: false,
            summary: catalog.summary(),
        })
    }

    pub fn gallery(&self, query: &str, filter: &TypeFilter) -> Result<Vec<GalleryCard>, CatalogError> {
        let catalog = self.catalog()?;
        Ok(catalog
            .visible(query, filter)
            .into_iter()
            .map(|family| GalleryCard::from_family(family, |id| catalog.is_favorite(id)))
            .collect())
    }

    pub async fn detail(&self, id: u32) -> Result<DetailView, CatalogError> {
        let (creature, family, favorite) = {
            let catalog = self.catalog()?;
            let (creature, family) = catalog.find_creature(id).ok_or(CatalogError::NotLoaded(id))?;
            (creature.clone(), family.clone(), catalog.is_favorite(id))
        };

        let flavor_text = match creature.species_url.as_deref() {
            Some(url) => match self.api.fetch_species(url).await {
                Ok(species) => species.flavor_text(&self.language),
                Err(e) => {
                    tracing::warn!("No flavor text for {} (#{}): {}", creature.name, id, e);
                    None
                }
            },
            None => None,
        };

        Ok(DetailView::from_creature(&creature, Some(&family), favorite, flavor_text))
    }

    pub fn toggle_favorite(&self, id: u32) -> Result<FavoriteToggle, CatalogError> {
        let mut catalog = self.catalog()?;
        if catalog.find_creature(id).is_none() {
            return Err(CatalogError::NotLoaded(id));
        }
        let favorite = catalog.toggle_favorite(id);
        tracing::debug!("Pokémon #{} favorite: {}", id, favorite);
        Ok(FavoriteToggle { id, favorite })
    }

    pub fn favorites(&self) -> Result<Vec<u32>, CatalogError> {
        Ok(self.catalog()?.favorites().iter().copied().collect())
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::NotLoaded(_) => StatusCode::NOT_FOUND,
            CatalogError::Network(_) | CatalogError::Status { .. } | CatalogError::Parse(_) => {
                StatusCode::BAD_GATEWAY
            }
            CatalogError::Config(_) | CatalogError::State(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub fn router<A: PokeApi + 'static>(state: Arc<AppState<A>>) -> Router {
    Router::new()
        .route("/families", get(list_families::<A>))
        .route("/families/load-more", post(load_more::<A>))
        .route("/reload", post(reload::<A>))
        .route("/pokemon/{id}", get(get_pokemon::<A>))
        .route("/favorites", get(list_favorites::<A>))
        .route("/favorites/{id}", post(toggle_favorite::<A>))
        .route("/summary", get(get_summary::<A>))
        .with_state(state)
}

fn load_response(outcome: LoadOutcome) -> (StatusCode, Json<LoadOutcome>) {
    let status = if outcome.skipped {
        StatusCode::ACCEPTED
    } else if outcome.summary.error.is_some() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    (status, Json(outcome))
}

async fn list_families<A: PokeApi + 'static>(
    State(app_state): State<Arc<AppState<A>>>,
    Query(query): Query<FamilyQuery>,
) -> Result<Json<Vec<GalleryCard>>, CatalogError> {
    let filter: TypeFilter = query.type_filter.parse().unwrap_or_default();
    Ok(Json(app_state.gallery(&query.q, &filter)?))
}

async fn load_more<A: PokeApi + 'static>(
    State(app_state): State<Arc<AppState<A>>>,
) -> Result<(StatusCode, Json<LoadOutcome>), CatalogError> {
    Ok(load_response(app_state.load_next_page(false).await?))
}

async fn reload<A: PokeApi + 'static>(
    State(app_state): State<Arc<AppState<A>>>,
) -> Result<(StatusCode, Json<LoadOutcome>), CatalogError> {
    Ok(load_response(app_state.load_next_page(true).await?))
}

async fn get_pokemon<A: PokeApi + 'static>(
    State(app_state): State<Arc<AppState<A>>>,
    Path(id): Path<u32>,
) -> Result<Json<DetailView>, CatalogError> {
    Ok(Json(app_state.detail(id).await?))
}

async fn list_favorites<A: PokeApi + 'static>(
    State(app_state): State<Arc<AppState<A>>>,
) -> Result<Json<Vec<u32>>, CatalogError> {
    Ok(Json(app_state.favorites()?))
}

async fn toggle_favorite<A: PokeApi + 'static>(
    State(app_state): State<Arc<AppState<A>>>,
    Path(id): Path<u32>,
) -> Result<Json<FavoriteToggle>, CatalogError> {
    Ok(Json(app_state.toggle_favorite(id)?))
}

async fn get_summary<A: PokeApi + 'static>(
    State(app_state): State<Arc<AppState<A>>>,
) -> Result<Json<Summary>, CatalogError> {
    Ok(Json(app_state.summary()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::fake::{FakeApi, link};
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    const BULBASAUR_CHAIN: &str = "https://pokeapi.co/api/v2/evolution-chain/1/";
    const CHARMANDER_CHAIN: &str = "https://pokeapi.co/api/v2/evolution-chain/2/";

    fn fake_api() -> FakeApi {
        FakeApi::default()
            .with_page(0, &["bulbasaur", "ivysaur"], true)
            .with_page(2, &["charmander", "charmeleon"], false)
            .with_pokemon(1, "bulbasaur", &["grass", "poison"])
            .with_pokemon(2, "ivysaur", &["grass", "poison"])
            .with_pokemon(4, "charmander", &["fire"])
            .with_pokemon(5, "charmeleon", &["fire"])
            .with_species(1, "bulbasaur", Some(BULBASAUR_CHAIN))
            .with_species(2, "ivysaur", Some(BULBASAUR_CHAIN))
            .with_species(4, "charmander", Some(CHARMANDER_CHAIN))
            .with_species(5, "charmeleon", Some(CHARMANDER_CHAIN))
            .with_chain(
                BULBASAUR_CHAIN,
                link("bulbasaur", None, vec![link("ivysaur", Some(16), vec![])]),
            )
            .with_chain(
                CHARMANDER_CHAIN,
                link("charmander", None, vec![link("charmeleon", Some(16), vec![])]),
            )
    }

    fn app_state(api: FakeApi) -> Arc<AppState<FakeApi>> {
        let mut config = Config::default();
        config.pokeapi.page_size = 2;
        Arc::new(AppState::new(api, &config))
    }

    async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_pages_collapse_into_families() {
        let state = app_state(fake_api());

        let (status, body) = send(router(state.clone()), "POST", "/families/load-more").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["added"], 1);

        let (_, body) = send(router(state.clone()), "POST", "/families/load-more").await;
        assert_eq!(body["added"], 1);
        assert_eq!(body["summary"]["has_more"], false);

        let (status, body) = send(router(state.clone()), "POST", "/families/load-more").await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["skipped"], true);

        let (_, body) = send(router(state), "GET", "/families").await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|card| card["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["bulbasaur", "charmander"]);
    }

    #[tokio::test]
    async fn test_gallery_filters_by_query_type_and_favorites() {
        let state = app_state(fake_api());
        state.load_next_page(false).await.unwrap();
        state.load_next_page(false).await.unwrap();

        let (_, body) = send(router(state.clone()), "GET", "/families?type=fire").await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "charmander");

        let (_, body) = send(router(state.clone()), "GET", "/families?q=ivy").await;
        assert_eq!(body[0]["name"], "bulbasaur");

        let (status, body) = send(router(state.clone()), "POST", "/favorites/5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["favorite"], true);

        let (_, body) = send(router(state.clone()), "GET", "/families?type=favorites").await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["favorite"], true);

        let (_, body) = send(router(state), "GET", "/favorites").await;
        assert_eq!(body, json!([5]));
    }

    #[tokio::test]
    async fn test_failed_list_surfaces_retryable_error() {
        let state = app_state(fake_api().failing("page:0"));

        let (status, body) = send(router(state.clone()), "POST", "/families/load-more").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["summary"]["error"].is_string());

        let (_, body) = send(router(state), "GET", "/summary").await;
        assert_eq!(body["loading"], false);
        assert_eq!(body["families"], 0);
    }

    #[tokio::test]
    async fn test_detail_for_loaded_and_unknown_pokemon() {
        let state = app_state(fake_api());
        state.load_next_page(false).await.unwrap();

        let (status, body) = send(router(state.clone()), "GET", "/pokemon/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["number"], "#002");
        assert_eq!(body["evolution"][1]["condition"], "Level 16");

        let (status, _) = send(router(state.clone()), "GET", "/pokemon/150").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(router(state), "POST", "/favorites/150").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reload_starts_over_from_first_page() {
        let state = app_state(fake_api());
        state.load_next_page(false).await.unwrap();
        state.load_next_page(false).await.unwrap();

        let (status, body) = send(router(state), "POST", "/reload").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["added"], 1);
        assert_eq!(body["summary"]["families"], 1);
        assert_eq!(body["summary"]["has_more"], true);
    }
}
