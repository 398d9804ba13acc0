use std::fmt;

use jiff::{Timestamp, civil::Date};
use serde::{Deserialize, Serialize};

/// Upper bound on `total_pages` handed to callers, whatever the remote reports.
pub const MAX_PAGES: u32 = 500;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
}

impl ContentKind {
    pub fn as_path(self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Series => "tv",
        }
    }

    pub fn from_path(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(ContentKind::Movie),
            "tv" => Some(ContentKind::Series),
            _ => None,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

/// One saved title. Field names follow the persisted JSON layout.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    #[serde(rename = "addedAt")]
    pub added_at: Timestamp,
}

/// Unified view of a movie or series as returned by list endpoints.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CatalogItem {
    pub id: i64,
    pub kind: ContentKind,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub primary_date: Option<Date>,
    pub rating: f64,
    pub popularity: f64,
    pub genre_ids: Vec<i64>,
}

impl CatalogItem {
    pub fn year(&self) -> Option<i16> {
        self.primary_date.map(|d| d.year())
    }
}

/// Rounds a 0-10 vote average to one decimal.
pub fn round_rating(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Parses a remote date, where the service sends `""` for unknown dates.
pub fn parse_date(raw: Option<&str>) -> Option<Date> {
    raw.map(str::trim).filter(|s| !s.is_empty()).and_then(|s| s.parse().ok())
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CatalogDetails {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub tagline: Option<String>,
    pub genres: Vec<Genre>,
    pub status: Option<String>,
    pub homepage: Option<String>,
    pub extra: KindDetails,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KindDetails {
    Movie {
        runtime: Option<u32>,
    },
    Series {
        number_of_seasons: u32,
        number_of_episodes: u32,
        episode_runtime: Option<u32>,
        seasons: Vec<SeasonSummary>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SeasonSummary {
    pub season_number: u32,
    pub name: String,
    pub episode_count: u32,
    pub air_date: Option<Date>,
    pub poster_path: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub episode_number: u32,
    pub name: String,
    pub overview: String,
    pub still_path: Option<String>,
    pub air_date: Option<Date>,
    pub runtime: Option<u32>,
    pub rating: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Credits {
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
}

const KEY_CREW_JOBS: [&str; 3] = ["Director", "Producer", "Screenplay"];

impl Credits {
    pub fn top_cast(&self, n: usize) -> &[CastMember] {
        &self.cast[..n.min(self.cast.len())]
    }

    pub fn key_crew(&self, n: usize) -> Vec<&CrewMember> {
        self.crew.iter().filter(|c| KEY_CREW_JOBS.contains(&c.job.as_str())).take(n).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CastMember {
    pub id: i64,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
    pub order: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CrewMember {
    pub id: i64,
    pub name: String,
    pub job: String,
    pub department: String,
    pub profile_path: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Video {
    pub key: String,
    pub site: String,
    pub kind: String,
    pub name: String,
}

/// First YouTube trailer in the list, if any.
pub fn trailer(videos: &[Video]) -> Option<&Video> {
    videos.iter().find(|v| v.site == "YouTube" && v.kind == "Trailer")
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub results: Vec<T>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortKey {
    PopularityAsc,
    #[default]
    PopularityDesc,
    RatingAsc,
    RatingDesc,
    ReleaseDateAsc,
    ReleaseDateDesc,
}

impl SortKey {
    pub fn as_tmdb_param(self, kind: ContentKind) -> &'static str {
        match (self, kind) {
            (SortKey::PopularityAsc, _) => "popularity.asc",
            (SortKey::PopularityDesc, _) => "popularity.desc",
            (SortKey::RatingAsc, _) => "vote_average.asc",
            (SortKey::RatingDesc, _) => "vote_average.desc",
            (SortKey::ReleaseDateAsc, ContentKind::Movie) => "primary_release_date.asc",
            (SortKey::ReleaseDateDesc, ContentKind::Movie) => "primary_release_date.desc",
            (SortKey::ReleaseDateAsc, ContentKind::Series) => "first_air_date.asc",
            (SortKey::ReleaseDateDesc, ContentKind::Series) => "first_air_date.desc",
        }
    }

    pub fn from_tmdb_param(s: &str) -> Option<Self> {
        match s {
            "popularity.asc" => Some(SortKey::PopularityAsc),
            "popularity.desc" => Some(SortKey::PopularityDesc),
            "vote_average.asc" => Some(SortKey::RatingAsc),
            "vote_average.desc" => Some(SortKey::RatingDesc),
            "primary_release_date.asc" | "first_air_date.asc" | "release_date.asc" => {
                Some(SortKey::ReleaseDateAsc)
            },
            "primary_release_date.desc" | "first_air_date.desc" | "release_date.desc" => {
                Some(SortKey::ReleaseDateDesc)
            },
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DiscoverFilters {
    pub genre_id: Option<i64>,
    pub year: Option<i16>,
    pub sort: SortKey,
    pub page: u32,
}

impl DiscoverFilters {
    /// 1-based page, with 0 read as the first page.
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }
}
