use futures::{StreamExt, stream};
use jiff::Timestamp;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    models::{CatalogDetails, CatalogItem, ContentKind, WatchlistEntry},
    tmdb::{CatalogResult, TmdbClient},
};

/// Chance that the featured slot goes to a movie rather than a series.
pub const FEATURED_MOVIE_SHARE: f64 = 0.7;
/// The featured item is drawn from the head of the chosen list only.
pub const FEATURED_WINDOW: usize = 5;

#[derive(Clone, Debug, Serialize)]
pub struct HomeFeed {
    pub featured: Option<CatalogItem>,
    pub trending_movies: Vec<CatalogItem>,
    pub trending_series: Vec<CatalogItem>,
    pub popular_movies: Vec<CatalogItem>,
    pub popular_series: Vec<CatalogItem>,
}

pub async fn home_feed<R: Rng + Send>(tmdb: &TmdbClient, rng: &mut R) -> CatalogResult<HomeFeed> {
    let (trending_movies, trending_series, popular_movies, popular_series) = futures::try_join!(
        tmdb.trending(ContentKind::Movie),
        tmdb.trending(ContentKind::Series),
        tmdb.popular(ContentKind::Movie),
        tmdb.popular(ContentKind::Series)
    )?;

    let featured = pick_featured(rng, &trending_movies, &trending_series).cloned();
    debug!(featured = ?featured.as_ref().map(|f| f.id), "home feed assembled");

    Ok(HomeFeed { featured, trending_movies, trending_series, popular_movies, popular_series })
}

pub fn pick_featured<'a, R: Rng + ?Sized>(
    rng: &mut R,
    movies: &'a [CatalogItem],
    series: &'a [CatalogItem],
) -> Option<&'a CatalogItem> {
    let (preferred, fallback) =
        if rng.random_bool(FEATURED_MOVIE_SHARE) { (movies, series) } else { (series, movies) };
    let pool = if preferred.is_empty() { fallback } else { preferred };
    if pool.is_empty() {
        return None;
    }
    pool.get(rng.random_range(0..pool.len().min(FEATURED_WINDOW)))
}

#[derive(Clone, Debug, Serialize)]
pub struct SavedTitle {
    pub added_at: Timestamp,
    #[serde(flatten)]
    pub details: CatalogDetails,
}

/// Fetches details for every watchlist entry, keeping watchlist order.
/// Entries whose lookup fails are skipped.
pub async fn hydrate_watchlist(
    tmdb: &TmdbClient,
    entries: Vec<WatchlistEntry>,
    max_concurrent: usize,
) -> Vec<SavedTitle> {
    let titles: Vec<Option<SavedTitle>> = stream::iter(entries)
        .map(|entry| async move {
            match tmdb.details(entry.id, entry.kind).await {
                Ok(details) => Some(SavedTitle { added_at: entry.added_at, details }),
                Err(err) => {
                    warn!(
                        id = entry.id,
                        kind = %entry.kind,
                        error = %err,
                        "failed to load watchlist title"
                    );
                    None
                },
            }
        })
        .buffered(max_concurrent.max(1))
        .collect()
        .await;

    titles.into_iter().flatten().collect()
}
