mod config;
mod db;
mod entities;
mod error;
mod feed;
mod fixtures;
mod links;
mod models;
mod routes;
mod storage;
mod tmdb;
mod watchlist;

use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config, links::LinkBuilder, storage::DbSlots, tmdb::TmdbClient,
    watchlist::WatchlistStore,
};

pub struct AppState {
    pub tmdb: Arc<TmdbClient>,
    pub links: LinkBuilder,
    pub watchlist: Mutex<WatchlistStore<DbSlots>>,
    pub max_concurrent: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,marquee=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let http = wreq::Client::builder().timeout(Duration::from_secs(30)).build()?;

    let db = db::connect_and_migrate(&config.database_url).await?;
    let watchlist = WatchlistStore::load(DbSlots::new(db)).await;

    let tmdb = TmdbClient::new(
        http,
        config.tmdb_api_key.clone(),
        config.tmdb_base_url.clone(),
        config.tmdb_language.clone(),
        config.tmdb_rps,
    );

    let state = Arc::new(AppState {
        tmdb: Arc::new(tmdb),
        links: LinkBuilder::new(&config.image_base_url, &config.player_base_url),
        watchlist: Mutex::new(watchlist),
        max_concurrent: config.max_concurrent,
    });

    let app = routes::router(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
