use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    error::CatalogError,
    fixtures,
    models::{
        CastMember, CatalogDetails, CatalogItem, ContentKind, Credits, CrewMember, DiscoverFilters,
        EpisodeSummary, Genre, KindDetails, MAX_PAGES, Page, SeasonSummary, Video, parse_date,
        round_rating,
    },
};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Typed façade over the TMDB v3 API. With an empty API key every call is
/// answered from the built-in offline catalog instead.
pub struct TmdbClient {
    client: wreq::Client,
    api_key: String,
    base_url: String,
    language: String,
    limiter: Option<Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>>,
}

impl TmdbClient {
    pub fn new(
        client: wreq::Client,
        api_key: String,
        base_url: String,
        language: String,
        rps: Option<u32>,
    ) -> Self {
        if api_key.trim().is_empty() {
            tracing::warn!("Using offline catalog - no TMDB_API_KEY provided");
        }

        let limiter = rps
            .and_then(NonZeroU32::new)
            .map(|rps| Arc::new(RateLimiter::direct(Quota::per_second(rps))));
        Self { client, api_key, base_url, language, limiter }
    }

    pub fn is_offline(&self) -> bool {
        self.api_key.trim().is_empty()
    }

    pub async fn trending(&self, kind: ContentKind) -> CatalogResult<Vec<CatalogItem>> {
        if self.is_offline() {
            return Ok(fixtures::items(kind));
        }
        let page = self.page_of(kind, &format!("/trending/{}/week", kind.as_path()), &[]).await?;
        Ok(page.results)
    }

    pub async fn popular(&self, kind: ContentKind) -> CatalogResult<Vec<CatalogItem>> {
        if self.is_offline() {
            return Ok(fixtures::popular(kind));
        }
        let page = self.page_of(kind, &format!("/{}/popular", kind.as_path()), &[]).await?;
        Ok(page.results)
    }

    pub async fn details(&self, id: i64, kind: ContentKind) -> CatalogResult<CatalogDetails> {
        if self.is_offline() {
            return fixtures::details(id, kind).ok_or(CatalogError::NotFound { kind, id });
        }
        let path = format!("/{}/{}", kind.as_path(), id);
        match kind {
            ContentKind::Movie => Ok(self.get::<MovieDetailsRecord>(&path, &[]).await?.into()),
            ContentKind::Series => Ok(self.get::<SeriesDetailsRecord>(&path, &[]).await?.into()),
        }
    }

    pub async fn credits(&self, id: i64, kind: ContentKind) -> CatalogResult<Credits> {
        if self.is_offline() {
            return Ok(Credits::default());
        }
        let path = format!("/{}/{}/credits", kind.as_path(), id);
        Ok(self.get::<CreditsRecord>(&path, &[]).await?.into())
    }

    pub async fn similar(&self, id: i64, kind: ContentKind) -> CatalogResult<Vec<CatalogItem>> {
        if self.is_offline() {
            return fixtures::similar(id, kind).ok_or(CatalogError::NotFound { kind, id });
        }
        let page = self.page_of(kind, &format!("/{}/{}/similar", kind.as_path(), id), &[]).await?;
        Ok(page.results)
    }

    pub async fn season_details(
        &self,
        series_id: i64,
        season: u32,
    ) -> CatalogResult<Vec<EpisodeSummary>> {
        if self.is_offline() {
            return Ok(Vec::new());
        }
        let path = format!("/tv/{}/season/{}", series_id, season);
        let resp: SeasonRecord = self.get(&path, &[]).await?;
        Ok(resp.episodes.into_iter().map(EpisodeSummary::from).collect())
    }

    /// Multi-search restricted to movies and series. Blank terms never reach the network.
    pub async fn search(&self, term: &str) -> CatalogResult<Vec<CatalogItem>> {
        let term = term.trim();
        if term.is_empty() {
            debug!("skipping search for blank term");
            return Ok(Vec::new());
        }
        if self.is_offline() {
            return Ok(fixtures::search(term));
        }

        let resp: ListResponse<MultiRecord> =
            self.get("/search/multi", &[("query", term.to_string())]).await?;
        let total = resp.results.len();
        let items: Vec<CatalogItem> = resp
            .results
            .into_iter()
            .filter_map(|r| match r {
                MultiRecord::Movie(m) => Some(m.into_item()),
                MultiRecord::Series(s) => Some(s.into_item()),
                MultiRecord::Other => None,
            })
            .collect();
        debug!(term, total, kept = items.len(), "search completed");
        Ok(items)
    }

    pub async fn discover(
        &self,
        kind: ContentKind,
        filters: &DiscoverFilters,
    ) -> CatalogResult<Page<CatalogItem>> {
        if self.is_offline() {
            return Ok(fixtures::discover(kind, filters));
        }

        let mut params = vec![
            ("page", filters.page().min(MAX_PAGES).to_string()),
            ("sort_by", filters.sort.as_tmdb_param(kind).to_string()),
        ];
        if let Some(genre_id) = filters.genre_id {
            params.push(("with_genres", genre_id.to_string()));
        }
        if let Some(year) = filters.year {
            let key = match kind {
                ContentKind::Movie => "primary_release_year",
                ContentKind::Series => "first_air_date_year",
            };
            params.push((key, year.to_string()));
        }

        self.page_of(kind, &format!("/discover/{}", kind.as_path()), &params).await
    }

    pub async fn genres(&self, kind: ContentKind) -> CatalogResult<Vec<Genre>> {
        if self.is_offline() {
            return Ok(fixtures::genres(kind));
        }
        let resp: GenresResponse =
            self.get(&format!("/genre/{}/list", kind.as_path()), &[]).await?;
        Ok(resp.genres)
    }

    pub async fn videos(&self, id: i64, kind: ContentKind) -> CatalogResult<Vec<Video>> {
        if self.is_offline() {
            return Ok(Vec::new());
        }
        let path = format!("/{}/{}/videos", kind.as_path(), id);
        let resp: ListResponse<VideoRecord> = self.get(&path, &[]).await?;
        Ok(resp.results.into_iter().map(Video::from).collect())
    }

    async fn page_of(
        &self,
        kind: ContentKind,
        path: &str,
        params: &[(&str, String)],
    ) -> CatalogResult<Page<CatalogItem>> {
        match kind {
            ContentKind::Movie => {
                Ok(self.get::<ListResponse<MovieRecord>>(path, params).await?.into_page())
            },
            ContentKind::Series => {
                Ok(self.get::<ListResponse<SeriesRecord>>(path, params).await?.into_page())
            },
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> CatalogResult<T> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        debug!(path, "tmdb request");

        let resp = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())])
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp)
    }
}

trait Record: DeserializeOwned {
    fn into_item(self) -> CatalogItem;
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u32,
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

impl<R: Record> ListResponse<R> {
    fn into_page(self) -> Page<CatalogItem> {
        Page {
            page: self.page.max(1),
            total_pages: self.total_pages.min(MAX_PAGES),
            total_results: self.total_results,
            results: self.results.into_iter().map(Record::into_item).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MovieRecord {
    id: i64,
    #[serde(default)]
    title: String,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    release_date: Option<String>,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    popularity: f64,
    #[serde(default)]
    genre_ids: Vec<i64>,
}

impl Record for MovieRecord {
    fn into_item(self) -> CatalogItem {
        CatalogItem {
            id: self.id,
            kind: ContentKind::Movie,
            primary_date: parse_date(self.release_date.as_deref()),
            title: self.title,
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            rating: round_rating(self.vote_average),
            popularity: self.popularity,
            genre_ids: self.genre_ids,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeriesRecord {
    id: i64,
    #[serde(default)]
    name: String,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    first_air_date: Option<String>,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    popularity: f64,
    #[serde(default)]
    genre_ids: Vec<i64>,
}

impl Record for SeriesRecord {
    fn into_item(self) -> CatalogItem {
        CatalogItem {
            id: self.id,
            kind: ContentKind::Series,
            primary_date: parse_date(self.first_air_date.as_deref()),
            title: self.name,
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            rating: round_rating(self.vote_average),
            popularity: self.popularity,
            genre_ids: self.genre_ids,
        }
    }
}

/// `/search/multi` rows, discriminated by `media_type`.
#[derive(Debug, Deserialize)]
#[serde(tag = "media_type")]
enum MultiRecord {
    #[serde(rename = "movie")]
    Movie(MovieRecord),
    #[serde(rename = "tv")]
    Series(SeriesRecord),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct MovieDetailsRecord {
    #[serde(flatten)]
    base: MovieRecord,
    tagline: Option<String>,
    #[serde(default)]
    genres: Vec<Genre>,
    status: Option<String>,
    homepage: Option<String>,
    runtime: Option<u32>,
}

impl From<MovieDetailsRecord> for CatalogDetails {
    fn from(rec: MovieDetailsRecord) -> Self {
        let mut item = rec.base.into_item();
        item.genre_ids = rec.genres.iter().map(|g| g.id).collect();
        CatalogDetails {
            item,
            tagline: non_empty(rec.tagline),
            genres: rec.genres,
            status: non_empty(rec.status),
            homepage: non_empty(rec.homepage),
            extra: KindDetails::Movie { runtime: rec.runtime.filter(|&m| m > 0) },
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeriesDetailsRecord {
    #[serde(flatten)]
    base: SeriesRecord,
    tagline: Option<String>,
    #[serde(default)]
    genres: Vec<Genre>,
    status: Option<String>,
    homepage: Option<String>,
    number_of_seasons: Option<u32>,
    number_of_episodes: Option<u32>,
    #[serde(default)]
    episode_run_time: Vec<u32>,
    #[serde(default)]
    seasons: Vec<SeasonSummaryRecord>,
}

impl From<SeriesDetailsRecord> for CatalogDetails {
    fn from(rec: SeriesDetailsRecord) -> Self {
        let mut item = rec.base.into_item();
        item.genre_ids = rec.genres.iter().map(|g| g.id).collect();

        let episode_runtime = (!rec.episode_run_time.is_empty()).then(|| {
            let total: u32 = rec.episode_run_time.iter().sum();
            (f64::from(total) / rec.episode_run_time.len() as f64).round() as u32
        });

        // Season 0 holds specials.
        let seasons = rec
            .seasons
            .into_iter()
            .filter(|s| s.season_number > 0)
            .map(|s| SeasonSummary {
                season_number: s.season_number,
                name: s.name,
                episode_count: s.episode_count,
                air_date: parse_date(s.air_date.as_deref()),
                poster_path: s.poster_path,
            })
            .collect();

        CatalogDetails {
            item,
            tagline: non_empty(rec.tagline),
            genres: rec.genres,
            status: non_empty(rec.status),
            homepage: non_empty(rec.homepage),
            extra: KindDetails::Series {
                number_of_seasons: rec.number_of_seasons.unwrap_or_default(),
                number_of_episodes: rec.number_of_episodes.unwrap_or_default(),
                episode_runtime,
                seasons,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeasonSummaryRecord {
    season_number: u32,
    #[serde(default)]
    name: String,
    #[serde(default)]
    episode_count: u32,
    air_date: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeasonRecord {
    #[serde(default)]
    episodes: Vec<EpisodeRecord>,
}

#[derive(Debug, Deserialize)]
struct EpisodeRecord {
    episode_number: u32,
    #[serde(default)]
    name: String,
    overview: Option<String>,
    still_path: Option<String>,
    air_date: Option<String>,
    runtime: Option<u32>,
    #[serde(default)]
    vote_average: f64,
}

impl From<EpisodeRecord> for EpisodeSummary {
    fn from(rec: EpisodeRecord) -> Self {
        EpisodeSummary {
            episode_number: rec.episode_number,
            name: rec.name,
            overview: rec.overview.unwrap_or_default(),
            still_path: rec.still_path,
            air_date: parse_date(rec.air_date.as_deref()),
            runtime: rec.runtime,
            rating: round_rating(rec.vote_average),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreditsRecord {
    #[serde(default)]
    cast: Vec<CastRecord>,
    #[serde(default)]
    crew: Vec<CrewRecord>,
}

#[derive(Debug, Deserialize)]
struct CastRecord {
    id: i64,
    name: String,
    character: Option<String>,
    profile_path: Option<String>,
    #[serde(default)]
    order: u32,
}

#[derive(Debug, Deserialize)]
struct CrewRecord {
    id: i64,
    name: String,
    #[serde(default)]
    job: String,
    #[serde(default)]
    department: String,
    profile_path: Option<String>,
}

impl From<CreditsRecord> for Credits {
    fn from(rec: CreditsRecord) -> Self {
        let mut cast: Vec<CastMember> = rec
            .cast
            .into_iter()
            .map(|c| CastMember {
                id: c.id,
                name: c.name,
                character: c.character.unwrap_or_default(),
                profile_path: c.profile_path,
                order: c.order,
            })
            .collect();
        cast.sort_by_key(|c| c.order);

        let crew = rec
            .crew
            .into_iter()
            .map(|c| CrewMember {
                id: c.id,
                name: c.name,
                job: c.job,
                department: c.department,
                profile_path: c.profile_path,
            })
            .collect();

        Credits { cast, crew }
    }
}

#[derive(Debug, Deserialize)]
struct GenresResponse {
    #[serde(default)]
    genres: Vec<Genre>,
}

#[derive(Debug, Deserialize)]
struct VideoRecord {
    key: String,
    site: String,
    #[serde(rename = "type")]
    type_: String,
    #[serde(default)]
    name: String,
}

impl From<VideoRecord> for Video {
    fn from(rec: VideoRecord) -> Self {
        Video { key: rec.key, site: rec.site, kind: rec.type_, name: rec.name }
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.and_then(|s| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    })
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use axum::{
        Json, Router,
        extract::Query,
        http::{StatusCode, Uri},
        response::IntoResponse,
    };
    use serde_json::{Value, json};

    use super::*;
    use crate::models::SortKey;

    #[derive(Debug)]
    struct Call {
        path: String,
        query: HashMap<String, String>,
    }

    /// Stand-in for the metadata service: answers fixed JSON by path and records every request.
    struct FakeTmdb {
        base_url: String,
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl FakeTmdb {
        async fn start(responses: Vec<(&str, Value)>) -> Self {
            let responses: Arc<HashMap<String, Value>> =
                Arc::new(responses.into_iter().map(|(p, v)| (p.to_string(), v)).collect());
            let calls = Arc::new(Mutex::new(Vec::new()));

            let recorded = calls.clone();
            let app = Router::new().fallback(
                move |uri: Uri, Query(query): Query<HashMap<String, String>>| {
                    let responses = responses.clone();
                    let recorded = recorded.clone();
                    async move {
                        recorded.lock().unwrap().push(Call { path: uri.path().to_string(), query });
                        match responses.get(uri.path()) {
                            Some(body) => Json(body.clone()).into_response(),
                            None => (
                                StatusCode::NOT_FOUND,
                                Json(json!({ "status_message": "not found" })),
                            )
                                .into_response(),
                        }
                    }
                },
            );

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            Self { base_url: format!("http://{addr}"), calls }
        }

        fn client(&self) -> TmdbClient {
            TmdbClient::new(
                wreq::Client::new(),
                "test-key".to_string(),
                self.base_url.clone(),
                "pt-BR".to_string(),
                None,
            )
        }

        fn calls(&self) -> Vec<(String, HashMap<String, String>)> {
            self.calls.lock().unwrap().iter().map(|c| (c.path.clone(), c.query.clone())).collect()
        }
    }

    fn offline() -> TmdbClient {
        TmdbClient::new(
            wreq::Client::new(),
            String::new(),
            "http://127.0.0.1:9".to_string(),
            "pt-BR".to_string(),
            None,
        )
    }

    #[tokio::test]
    async fn trending_movies_are_normalized() {
        let fake = FakeTmdb::start(vec![(
            "/trending/movie/week",
            json!({
                "page": 1,
                "results": [{
                    "id": 27205,
                    "title": "Inception",
                    "overview": "Dreams.",
                    "poster_path": "/p.jpg",
                    "backdrop_path": null,
                    "release_date": "2010-07-15",
                    "vote_average": 8.368,
                    "popularity": 90.5,
                    "genre_ids": [28, 878]
                }]
            }),
        )])
        .await;

        let items = fake.client().trending(ContentKind::Movie).await.unwrap();

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.kind, ContentKind::Movie);
        assert_eq!(item.title, "Inception");
        assert_eq!(item.primary_date, Some(jiff::civil::date(2010, 7, 15)));
        assert_eq!(item.rating, 8.4);
        assert_eq!(item.genre_ids, vec![28, 878]);

        let calls = fake.calls();
        assert_eq!(calls[0].1["api_key"], "test-key");
        assert_eq!(calls[0].1["language"], "pt-BR");
    }

    #[tokio::test]
    async fn series_names_and_air_dates_map_to_unified_fields() {
        let fake = FakeTmdb::start(vec![(
            "/tv/popular",
            json!({
                "results": [{
                    "id": 1399,
                    "name": "Game of Thrones",
                    "overview": null,
                    "first_air_date": "2011-04-17",
                    "vote_average": 8.4,
                    "genre_ids": [18]
                }, {
                    "id": 2,
                    "name": "Unaired",
                    "first_air_date": ""
                }]
            }),
        )])
        .await;

        let items = fake.client().popular(ContentKind::Series).await.unwrap();

        assert_eq!(items[0].kind, ContentKind::Series);
        assert_eq!(items[0].title, "Game of Thrones");
        assert_eq!(items[0].primary_date, Some(jiff::civil::date(2011, 4, 17)));
        assert_eq!(items[0].overview, "");
        assert_eq!(items[1].primary_date, None);
    }

    #[tokio::test]
    async fn search_drops_people_and_tags_kinds() {
        let fake = FakeTmdb::start(vec![(
            "/search/multi",
            json!({
                "results": [
                    { "media_type": "movie", "id": 1, "title": "Alien", "release_date": "1979-05-25" },
                    { "media_type": "person", "id": 2, "name": "Sigourney Weaver" },
                    { "media_type": "tv", "id": 3, "name": "Alien: Earth", "first_air_date": "2025-08-12" }
                ]
            }),
        )])
        .await;

        let items = fake.client().search("  alien ").await.unwrap();

        let summary: Vec<_> = items.iter().map(|i| (i.id, i.kind)).collect();
        assert_eq!(summary, vec![(1, ContentKind::Movie), (3, ContentKind::Series)]);
        assert_eq!(fake.calls()[0].1["query"], "alien");
    }

    #[tokio::test]
    async fn blank_search_makes_no_request() {
        let fake = FakeTmdb::start(Vec::new()).await;
        let client = fake.client();

        assert!(client.search("").await.unwrap().is_empty());
        assert!(client.search(" \t ").await.unwrap().is_empty());
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn discover_builds_parameters_and_caps_pages() {
        let fake = FakeTmdb::start(vec![
            (
                "/discover/movie",
                json!({ "page": 3, "total_pages": 41_000, "total_results": 820_000, "results": [] }),
            ),
            ("/discover/tv", json!({ "page": 1, "total_pages": 2, "results": [] })),
        ])
        .await;
        let client = fake.client();

        let filters = DiscoverFilters {
            genre_id: Some(28),
            year: Some(2010),
            sort: SortKey::RatingDesc,
            page: 3,
        };
        let page = client.discover(ContentKind::Movie, &filters).await.unwrap();
        assert_eq!(page.page, 3);
        assert_eq!(page.total_pages, MAX_PAGES);

        let filters =
            DiscoverFilters { year: Some(2016), sort: SortKey::ReleaseDateAsc, ..Default::default() };
        let page = client.discover(ContentKind::Series, &filters).await.unwrap();
        assert_eq!(page.total_pages, 2);

        let calls = fake.calls();
        let movie = &calls[0].1;
        assert_eq!(movie["sort_by"], "vote_average.desc");
        assert_eq!(movie["with_genres"], "28");
        assert_eq!(movie["primary_release_year"], "2010");
        assert_eq!(movie["page"], "3");

        let tv = &calls[1].1;
        assert_eq!(tv["sort_by"], "first_air_date.asc");
        assert_eq!(tv["first_air_date_year"], "2016");
        assert_eq!(tv["page"], "1");
        assert!(!tv.contains_key("with_genres"));
    }

    #[tokio::test]
    async fn discover_never_requests_past_the_page_cap() {
        let fake = FakeTmdb::start(vec![(
            "/discover/movie",
            json!({ "page": 500, "total_pages": 900, "total_results": 18_000, "results": [] }),
        )])
        .await;

        let filters = DiscoverFilters { page: 900, ..Default::default() };
        let page = fake.client().discover(ContentKind::Movie, &filters).await.unwrap();

        assert_eq!(page.total_pages, MAX_PAGES);
        assert_eq!(fake.calls()[0].1["page"], "500");
    }

    #[tokio::test]
    async fn movie_details_carry_runtime_and_genres() {
        let fake = FakeTmdb::start(vec![(
            "/movie/550",
            json!({
                "id": 550,
                "title": "Fight Club",
                "release_date": "1999-10-15",
                "vote_average": 8.4,
                "genres": [{ "id": 18, "name": "Drama" }],
                "runtime": 139,
                "tagline": "",
                "status": "Released"
            }),
        )])
        .await;

        let details = fake.client().details(550, ContentKind::Movie).await.unwrap();

        assert_eq!(details.item.title, "Fight Club");
        assert_eq!(details.item.genre_ids, vec![18]);
        assert_eq!(details.tagline, None);
        assert_eq!(details.status.as_deref(), Some("Released"));
        assert_eq!(details.extra, KindDetails::Movie { runtime: Some(139) });
    }

    #[tokio::test]
    async fn series_details_skip_specials_and_average_runtime() {
        let fake = FakeTmdb::start(vec![(
            "/tv/1399",
            json!({
                "id": 1399,
                "name": "Game of Thrones",
                "first_air_date": "2011-04-17",
                "number_of_seasons": 8,
                "number_of_episodes": 73,
                "episode_run_time": [50, 60, 61],
                "seasons": [
                    { "season_number": 0, "name": "Specials", "episode_count": 14 },
                    { "season_number": 1, "name": "Season 1", "episode_count": 10, "air_date": "2011-04-17" }
                ]
            }),
        )])
        .await;

        let details = fake.client().details(1399, ContentKind::Series).await.unwrap();

        let KindDetails::Series { number_of_seasons, number_of_episodes, episode_runtime, seasons } =
            details.extra
        else {
            panic!("expected series details");
        };
        assert_eq!(number_of_seasons, 8);
        assert_eq!(number_of_episodes, 73);
        assert_eq!(episode_runtime, Some(57));
        assert_eq!(seasons.len(), 1);
        assert_eq!(seasons[0].season_number, 1);
    }

    #[tokio::test]
    async fn credits_are_ordered_by_billing() {
        let fake = FakeTmdb::start(vec![(
            "/tv/1/credits",
            json!({
                "cast": [
                    { "id": 2, "name": "B", "character": "Second", "order": 1 },
                    { "id": 1, "name": "A", "character": null, "order": 0 }
                ],
                "crew": [{ "id": 9, "name": "C", "job": "Director", "department": "Directing" }]
            }),
        )])
        .await;

        let credits = fake.client().credits(1, ContentKind::Series).await.unwrap();

        assert_eq!(credits.cast[0].name, "A");
        assert_eq!(credits.cast[0].character, "");
        assert_eq!(credits.key_crew(5).len(), 1);
    }

    #[tokio::test]
    async fn season_without_episodes_is_empty() {
        let fake = FakeTmdb::start(vec![
            (
                "/tv/5/season/1",
                json!({ "episodes": [{
                    "episode_number": 1,
                    "name": "Pilot",
                    "air_date": "2020-01-01",
                    "vote_average": 7.25
                }] }),
            ),
            ("/tv/5/season/2", json!({ "name": "Season 2" })),
        ])
        .await;
        let client = fake.client();

        let first = client.season_details(5, 1).await.unwrap();
        assert_eq!(first[0].name, "Pilot");
        assert_eq!(first[0].rating, 7.3);
        assert!(client.season_details(5, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn videos_expose_first_trailer() {
        let fake = FakeTmdb::start(vec![(
            "/movie/7/videos",
            json!({ "results": [
                { "key": "a", "site": "Vimeo", "type": "Trailer", "name": "Vimeo cut" },
                { "key": "b", "site": "YouTube", "type": "Teaser", "name": "Teaser" },
                { "key": "c", "site": "YouTube", "type": "Trailer", "name": "Official Trailer" }
            ] }),
        )])
        .await;

        let videos = fake.client().videos(7, ContentKind::Movie).await.unwrap();
        assert_eq!(crate::models::trailer(&videos).map(|v| v.key.as_str()), Some("c"));
    }

    #[tokio::test]
    async fn http_failures_surface_as_remote_errors() {
        let fake = FakeTmdb::start(Vec::new()).await;

        let err = fake.client().details(404, ContentKind::Movie).await.unwrap_err();
        assert!(matches!(err, CatalogError::Remote(_)));
    }

    #[tokio::test]
    async fn offline_discover_sorts_by_rating_descending() {
        let filters = DiscoverFilters { sort: SortKey::RatingDesc, ..Default::default() };
        let page = offline().discover(ContentKind::Movie, &filters).await.unwrap();

        let ratings: Vec<f64> = page.results.iter().map(|i| i.rating).collect();
        assert!(!ratings.is_empty());
        assert!(ratings.windows(2).all(|w| w[0] >= w[1]), "not descending: {ratings:?}");
        assert_eq!(page.results[0].title, "The Shawshank Redemption");
    }

    #[tokio::test]
    async fn offline_client_answers_from_fixtures() {
        let client = offline();

        let genres = client.genres(ContentKind::Movie).await.unwrap();
        assert!(genres.iter().any(|g| g.name == "Science Fiction"));

        let hits = client.search("breaking").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].kind, ContentKind::Series);

        let err = client.details(999, ContentKind::Movie).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { id: 999, .. }));
    }
}
