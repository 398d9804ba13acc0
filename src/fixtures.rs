//! Offline catalog served when no TMDB API key is configured.

use std::cmp::Ordering;

use jiff::civil::date;

use crate::models::{
    CatalogDetails, CatalogItem, ContentKind, DiscoverFilters, Genre, KindDetails, MAX_PAGES,
    Page, SortKey,
};

const PAGE_SIZE: usize = 20;

const GENRES: [(i64, &str); 18] = [
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

const SERIES_GENRES: [(i64, &str); 6] = [
    (10759, "Action & Adventure"),
    (35, "Comedy"),
    (80, "Crime"),
    (18, "Drama"),
    (9648, "Mystery"),
    (10765, "Sci-Fi & Fantasy"),
];

pub fn genres(kind: ContentKind) -> Vec<Genre> {
    let table: &[(i64, &str)] = match kind {
        ContentKind::Movie => &GENRES,
        ContentKind::Series => &SERIES_GENRES,
    };
    table.iter().map(|&(id, name)| Genre { id, name: name.to_string() }).collect()
}

pub fn items(kind: ContentKind) -> Vec<CatalogItem> {
    match kind {
        ContentKind::Movie => movies(),
        ContentKind::Series => series(),
    }
}

pub fn find(id: i64, kind: ContentKind) -> Option<CatalogItem> {
    items(kind).into_iter().find(|i| i.id == id)
}

pub fn popular(kind: ContentKind) -> Vec<CatalogItem> {
    let mut items = items(kind);
    sort_items(&mut items, SortKey::PopularityDesc);
    items
}

pub fn details(id: i64, kind: ContentKind) -> Option<CatalogDetails> {
    let item = find(id, kind)?;
    let known = genres(kind);
    let genres = item
        .genre_ids
        .iter()
        .filter_map(|gid| known.iter().find(|g| g.id == *gid).cloned())
        .collect();
    let extra = match kind {
        ContentKind::Movie => KindDetails::Movie { runtime: None },
        ContentKind::Series => KindDetails::Series {
            number_of_seasons: 0,
            number_of_episodes: 0,
            episode_runtime: None,
            seasons: Vec::new(),
        },
    };
    Some(CatalogDetails { item, tagline: None, genres, status: None, homepage: None, extra })
}

/// Titles of the same kind sharing at least one genre, most popular first.
pub fn similar(id: i64, kind: ContentKind) -> Option<Vec<CatalogItem>> {
    let target = find(id, kind)?;
    let mut out: Vec<CatalogItem> = items(kind)
        .into_iter()
        .filter(|i| i.id != id && i.genre_ids.iter().any(|g| target.genre_ids.contains(g)))
        .collect();
    sort_items(&mut out, SortKey::PopularityDesc);
    Some(out)
}

pub fn search(term: &str) -> Vec<CatalogItem> {
    let needle = term.to_lowercase();
    let mut out: Vec<CatalogItem> = movies()
        .into_iter()
        .chain(series())
        .filter(|i| i.title.to_lowercase().contains(&needle))
        .collect();
    sort_items(&mut out, SortKey::PopularityDesc);
    out
}

pub fn discover(kind: ContentKind, filters: &DiscoverFilters) -> Page<CatalogItem> {
    let mut matched: Vec<CatalogItem> = items(kind)
        .into_iter()
        .filter(|i| filters.genre_id.is_none_or(|g| i.genre_ids.contains(&g)))
        .filter(|i| filters.year.is_none_or(|y| i.year() == Some(y)))
        .collect();
    sort_items(&mut matched, filters.sort);

    let total_results = matched.len();
    let total_pages = total_results.div_ceil(PAGE_SIZE) as u32;
    let page = filters.page();
    let results =
        matched.into_iter().skip((page as usize - 1) * PAGE_SIZE).take(PAGE_SIZE).collect();

    Page {
        page,
        total_pages: total_pages.min(MAX_PAGES),
        total_results: total_results as u32,
        results,
    }
}

fn sort_items(items: &mut [CatalogItem], sort: SortKey) {
    let cmp = |a: &CatalogItem, b: &CatalogItem| -> Ordering {
        match sort {
            SortKey::PopularityAsc => a.popularity.total_cmp(&b.popularity),
            SortKey::PopularityDesc => b.popularity.total_cmp(&a.popularity),
            SortKey::RatingAsc => a.rating.total_cmp(&b.rating),
            SortKey::RatingDesc => b.rating.total_cmp(&a.rating),
            SortKey::ReleaseDateAsc => a.primary_date.cmp(&b.primary_date),
            SortKey::ReleaseDateDesc => b.primary_date.cmp(&a.primary_date),
        }
    };
    items.sort_by(cmp);
}

#[allow(clippy::too_many_arguments)]
fn item(
    id: i64,
    kind: ContentKind,
    title: &str,
    overview: &str,
    primary_date: jiff::civil::Date,
    rating: f64,
    popularity: f64,
    genre_ids: &[i64],
) -> CatalogItem {
    CatalogItem {
        id,
        kind,
        title: title.to_string(),
        overview: overview.to_string(),
        poster_path: None,
        backdrop_path: None,
        primary_date: Some(primary_date),
        rating,
        popularity,
        genre_ids: genre_ids.to_vec(),
    }
}

fn movies() -> Vec<CatalogItem> {
    let movie = ContentKind::Movie;
    vec![
        item(
            1,
            movie,
            "Interstellar",
            "When Earth becomes uninhabitable, a farmer and ex-NASA pilot leads a team of \
             researchers through a wormhole to find a new planet for humans.",
            date(2014, 11, 7),
            8.6,
            140.2,
            &[878, 12, 18],
        ),
        item(
            2,
            movie,
            "The Dark Knight",
            "Batman faces the Joker, a criminal mastermind who plunges Gotham into anarchy.",
            date(2008, 7, 18),
            9.0,
            120.5,
            &[28, 80, 18],
        ),
        item(
            3,
            movie,
            "Inception",
            "A thief who steals corporate secrets through dream-sharing technology is asked \
             to plant an idea instead.",
            date(2010, 7, 16),
            8.8,
            98.1,
            &[28, 878, 12],
        ),
        item(
            4,
            movie,
            "Pulp Fiction",
            "Two mob hitmen, a boxer, a gangster and his wife, and a pair of diner bandits \
             cross paths in four tales of violence and redemption.",
            date(1994, 10, 14),
            8.9,
            75.3,
            &[53, 80],
        ),
        item(
            5,
            movie,
            "The Shawshank Redemption",
            "Two imprisoned men bond over a number of years, finding solace and eventual \
             redemption through acts of common decency.",
            date(1994, 9, 23),
            9.3,
            88.7,
            &[18, 80],
        ),
        item(
            6,
            movie,
            "The Godfather",
            "The aging patriarch of a crime dynasty hands control of his empire to his \
             reluctant son.",
            date(1972, 3, 24),
            9.2,
            81.4,
            &[18, 80],
        ),
    ]
}

fn series() -> Vec<CatalogItem> {
    let tv = ContentKind::Series;
    vec![
        item(
            101,
            tv,
            "Breaking Bad",
            "A chemistry teacher diagnosed with cancer turns to making methamphetamine to \
             secure his family's future.",
            date(2008, 1, 20),
            9.5,
            210.9,
            &[18, 80],
        ),
        item(
            102,
            tv,
            "Stranger Things",
            "When a young boy disappears, his mother, a police chief and his friends confront \
             terrifying forces to get him back.",
            date(2016, 7, 15),
            8.7,
            190.4,
            &[18, 9648, 10765],
        ),
        item(
            103,
            tv,
            "Game of Thrones",
            "Noble families fight for control of Westeros while an ancient enemy returns.",
            date(2011, 4, 17),
            9.3,
            230.0,
            &[10765, 18, 10759],
        ),
        item(
            104,
            tv,
            "The Crown",
            "The political rivalries and romance of Queen Elizabeth II's reign.",
            date(2016, 11, 4),
            8.6,
            64.8,
            &[18],
        ),
        item(
            105,
            tv,
            "The Mandalorian",
            "After the fall of the Empire, a lone gunfighter crosses the galaxy with his \
             foundling.",
            date(2019, 11, 12),
            8.5,
            110.6,
            &[10765, 10759, 18],
        ),
        item(
            106,
            tv,
            "Succession",
            "The Roy family controls a media empire, until their father steps down.",
            date(2018, 6, 3),
            8.8,
            70.2,
            &[18, 35],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_filters_by_genre_and_year() {
        let filters = DiscoverFilters { genre_id: Some(80), year: Some(1994), ..Default::default() };
        let page = discover(ContentKind::Movie, &filters);

        let mut ids: Vec<i64> = page.results.iter().map(|i| i.id).collect();
        ids.sort();
        assert_eq!(ids, vec![4, 5]);
        assert_eq!(page.total_results, 2);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn discover_sorts_by_release_date() {
        let filters = DiscoverFilters { sort: SortKey::ReleaseDateAsc, ..Default::default() };
        let page = discover(ContentKind::Series, &filters);
        let dates: Vec<_> = page.results.iter().map(|i| i.primary_date).collect();
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn discover_past_last_page_is_empty() {
        let filters = DiscoverFilters { page: 2, ..Default::default() };
        let page = discover(ContentKind::Movie, &filters);
        assert_eq!(page.page, 2);
        assert!(page.results.is_empty());
    }

    #[test]
    fn similar_shares_a_genre_and_excludes_self() {
        let found = similar(1, ContentKind::Movie).unwrap();
        assert!(found.iter().all(|i| i.id != 1));
        assert!(found.iter().any(|i| i.id == 3));
        assert!(similar(1, ContentKind::Series).is_none());
    }

    #[test]
    fn details_resolve_genre_names() {
        let details = details(104, ContentKind::Series).unwrap();
        assert_eq!(details.genres, vec![Genre { id: 18, name: "Drama".to_string() }]);
    }
}
