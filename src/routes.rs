use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    routing::get,
};
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    AppState,
    error::{AppError, AppResult},
    feed::{self, HomeFeed, SavedTitle},
    links::ImageSize,
    models::{
        CastMember, CatalogDetails, CatalogItem, ContentKind, Credits, CrewMember,
        DiscoverFilters, EpisodeSummary, Genre, Page, SortKey, Video, WatchlistEntry, trailer,
    },
    watchlist::Outcome,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/home", get(home))
        .route("/api/search", get(search))
        .route("/api/image", get(image))
        .route("/api/play/{kind}/{id}", get(play))
        .route("/api/watchlist", get(watchlist).post(watchlist_add).delete(watchlist_clear))
        .route("/api/watchlist/items", get(watchlist_items))
        .route("/api/watchlist/{id}", get(watchlist_contains).delete(watchlist_remove))
        .route("/api/catalog/{kind}/trending", get(trending))
        .route("/api/catalog/{kind}/popular", get(popular))
        .route("/api/catalog/{kind}/discover", get(discover))
        .route("/api/catalog/{kind}/genres", get(genres))
        .route("/api/catalog/{kind}/{id}", get(details))
        .route("/api/catalog/{kind}/{id}/credits", get(credits))
        .route("/api/catalog/{kind}/{id}/similar", get(similar))
        .route("/api/catalog/{kind}/{id}/videos", get(videos))
        .route("/api/catalog/{kind}/{id}/season/{season}", get(season))
        .with_state(state)
}

fn parse_kind(raw: &str) -> AppResult<ContentKind> {
    ContentKind::from_path(raw)
        .ok_or_else(|| AppError::bad_request(format!("unknown content kind `{raw}`")))
}

/// Empty query values mean "not set".
fn parse_optional<T: std::str::FromStr>(name: &str, raw: Option<&str>) -> AppResult<Option<T>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => {
            s.parse().map(Some).map_err(|_| AppError::bad_request(format!("invalid {name} `{s}`")))
        },
        None => Ok(None),
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn home(State(state): State<Arc<AppState>>) -> AppResult<Json<HomeFeed>> {
    let mut rng = StdRng::from_os_rng();
    Ok(Json(feed::home_feed(&state.tmdb, &mut rng).await?))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> AppResult<Json<Vec<CatalogItem>>> {
    let term = q.q.unwrap_or_default();
    Ok(Json(state.tmdb.search(&term).await?))
}

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    path: Option<String>,
    size: Option<String>,
}

pub async fn image(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ImageQuery>,
) -> AppResult<Json<Value>> {
    let size = match q.size.as_deref() {
        Some(token) => ImageSize::from_token(token)
            .ok_or_else(|| AppError::bad_request(format!("unknown image size `{token}`")))?,
        None => ImageSize::default(),
    };
    Ok(Json(json!({ "url": state.links.resolve_image_url(q.path.as_deref(), size) })))
}

#[derive(Debug, Deserialize)]
pub struct PlayQuery {
    season: Option<u32>,
    episode: Option<u32>,
}

pub async fn play(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, i64)>,
    Query(q): Query<PlayQuery>,
) -> AppResult<Json<Value>> {
    let kind = parse_kind(&kind)?;
    Ok(Json(json!({ "url": state.links.resolve_playback_url(id, kind, q.season, q.episode) })))
}

pub async fn trending(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> AppResult<Json<Vec<CatalogItem>>> {
    Ok(Json(state.tmdb.trending(parse_kind(&kind)?).await?))
}

pub async fn popular(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> AppResult<Json<Vec<CatalogItem>>> {
    Ok(Json(state.tmdb.popular(parse_kind(&kind)?).await?))
}

#[derive(Debug, Deserialize)]
pub struct DiscoverQuery {
    genre: Option<String>,
    year: Option<String>,
    sort: Option<String>,
    page: Option<String>,
}

impl DiscoverQuery {
    fn into_filters(self) -> AppResult<DiscoverFilters> {
        let sort = match self.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => SortKey::from_tmdb_param(raw)
                .ok_or_else(|| AppError::bad_request(format!("unknown sort `{raw}`")))?,
            None => SortKey::default(),
        };
        Ok(DiscoverFilters {
            genre_id: parse_optional("genre", self.genre.as_deref())?,
            year: parse_optional("year", self.year.as_deref())?,
            sort,
            page: parse_optional("page", self.page.as_deref())?.unwrap_or(1),
        })
    }
}

pub async fn discover(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Query(q): Query<DiscoverQuery>,
) -> AppResult<Json<Page<CatalogItem>>> {
    let kind = parse_kind(&kind)?;
    let filters = q.into_filters()?;
    Ok(Json(state.tmdb.discover(kind, &filters).await?))
}

pub async fn genres(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> AppResult<Json<Vec<Genre>>> {
    Ok(Json(state.tmdb.genres(parse_kind(&kind)?).await?))
}

#[derive(Debug, Serialize)]
pub struct DetailsView {
    #[serde(flatten)]
    details: CatalogDetails,
    in_watchlist: bool,
}

pub async fn details(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, i64)>,
) -> AppResult<Json<DetailsView>> {
    let details = state.tmdb.details(id, parse_kind(&kind)?).await?;
    let in_watchlist = state.watchlist.lock().await.contains(id);
    Ok(Json(DetailsView { details, in_watchlist }))
}

const TOP_CAST: usize = 10;
const KEY_CREW: usize = 5;

#[derive(Debug, Serialize)]
pub struct CreditsView {
    top_cast: Vec<CastMember>,
    key_crew: Vec<CrewMember>,
    #[serde(flatten)]
    credits: Credits,
}

pub async fn credits(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, i64)>,
) -> AppResult<Json<CreditsView>> {
    let credits = state.tmdb.credits(id, parse_kind(&kind)?).await?;
    let top_cast = credits.top_cast(TOP_CAST).to_vec();
    let key_crew = credits.key_crew(KEY_CREW).into_iter().cloned().collect();
    Ok(Json(CreditsView { top_cast, key_crew, credits }))
}

pub async fn similar(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, i64)>,
) -> AppResult<Json<Vec<CatalogItem>>> {
    Ok(Json(state.tmdb.similar(id, parse_kind(&kind)?).await?))
}

#[derive(Debug, Serialize)]
pub struct VideosView {
    trailer: Option<Video>,
    results: Vec<Video>,
}

pub async fn videos(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, i64)>,
) -> AppResult<Json<VideosView>> {
    let results = state.tmdb.videos(id, parse_kind(&kind)?).await?;
    Ok(Json(VideosView { trailer: trailer(&results).cloned(), results }))
}

pub async fn season(
    State(state): State<Arc<AppState>>,
    Path((kind, id, season)): Path<(String, i64, u32)>,
) -> AppResult<Json<Vec<EpisodeSummary>>> {
    if parse_kind(&kind)? != ContentKind::Series {
        return Err(AppError::bad_request("seasons are only available for series"));
    }
    Ok(Json(state.tmdb.season_details(id, season).await?))
}

pub async fn watchlist(State(state): State<Arc<AppState>>) -> Json<Vec<WatchlistEntry>> {
    Json(state.watchlist.lock().await.entries().to_vec())
}

pub async fn watchlist_items(State(state): State<Arc<AppState>>) -> Json<Vec<SavedTitle>> {
    let entries = state.watchlist.lock().await.entries().to_vec();
    Json(feed::hydrate_watchlist(&state.tmdb, entries, state.max_concurrent).await)
}

#[derive(Debug, Deserialize)]
pub struct AddRequest {
    id: i64,
    #[serde(rename = "type")]
    kind: ContentKind,
}

#[derive(Debug, Serialize)]
pub struct MutationView {
    #[serde(flatten)]
    outcome: Outcome,
    size: usize,
}

pub async fn watchlist_add(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AddRequest>, JsonRejection>,
) -> AppResult<Json<MutationView>> {
    let Json(req) = body?;
    let mut store = state.watchlist.lock().await;
    let outcome = store.add(req.id, req.kind).await;
    Ok(Json(MutationView { outcome, size: store.len() }))
}

pub async fn watchlist_contains(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Json<Value> {
    let store = state.watchlist.lock().await;
    Json(json!({ "id": id, "in_watchlist": store.contains(id), "entry": store.get(id) }))
}

pub async fn watchlist_remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Json<MutationView> {
    let mut store = state.watchlist.lock().await;
    let outcome = store.remove(id).await;
    Json(MutationView { outcome, size: store.len() })
}

#[derive(Debug, Deserialize)]
pub struct ClearQuery {
    #[serde(default)]
    confirm: bool,
}

pub async fn watchlist_clear(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ClearQuery>,
) -> AppResult<Json<MutationView>> {
    if !q.confirm {
        return Err(AppError::bad_request("clearing the watchlist requires confirm=true"));
    }
    let mut store = state.watchlist.lock().await;
    let outcome = store.clear().await;
    Ok(Json(MutationView { outcome, size: store.len() }))
}
