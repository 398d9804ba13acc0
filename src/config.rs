use std::net::SocketAddr;

use anyhow::Context;

use crate::links::{DEFAULT_IMAGE_BASE_URL, DEFAULT_PLAYER_BASE_URL};

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub tmdb_language: String,
    pub tmdb_rps: Option<u32>,
    pub database_url: String,
    pub image_base_url: String,
    pub player_base_url: String,
    pub max_concurrent: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let tmdb_api_key = std::env::var("TMDB_API_KEY").unwrap_or_default();
        let tmdb_base_url = std::env::var("TMDB_BASE_URL")
            .unwrap_or_else(|_| "https://api.themoviedb.org/3".to_string());
        let tmdb_language =
            std::env::var("TMDB_LANGUAGE").unwrap_or_else(|_| "pt-BR".to_string());

        let tmdb_rps: Option<u32> = match std::env::var("TMDB_RPS") {
            Ok(raw) => Some(raw.parse().context("TMDB_RPS")?),
            Err(_) => None,
        };

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://marquee.db?mode=rwc".to_string());

        let image_base_url =
            std::env::var("IMAGE_BASE_URL").unwrap_or_else(|_| DEFAULT_IMAGE_BASE_URL.to_string());
        let player_base_url = std::env::var("PLAYER_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_PLAYER_BASE_URL.to_string());

        let max_concurrent: usize =
            std::env::var("MAX_CONCURRENT_REQUESTS").ok().and_then(|s| s.parse().ok()).unwrap_or(5);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            tmdb_api_key,
            tmdb_base_url,
            tmdb_language,
            tmdb_rps,
            database_url,
            image_base_url,
            player_base_url,
            max_concurrent,
        })
    }
}
