use crate::models::ContentKind;

pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
pub const DEFAULT_PLAYER_BASE_URL: &str = "https://embedder.net/e";
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/500x750?text=No+Image";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ImageSize {
    W185,
    W300,
    W500,
    #[default]
    Original,
}

impl ImageSize {
    pub fn as_token(self) -> &'static str {
        match self {
            ImageSize::W185 => "w185",
            ImageSize::W300 => "w300",
            ImageSize::W500 => "w500",
            ImageSize::Original => "original",
        }
    }

    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "w185" => Some(ImageSize::W185),
            "w300" => Some(ImageSize::W300),
            "w500" => Some(ImageSize::W500),
            "original" => Some(ImageSize::Original),
            _ => None,
        }
    }
}

/// Builds image CDN and player embed URLs. Never touches the network.
#[derive(Clone, Debug)]
pub struct LinkBuilder {
    image_base_url: String,
    player_base_url: String,
}

impl Default for LinkBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE_URL, DEFAULT_PLAYER_BASE_URL)
    }
}

impl LinkBuilder {
    pub fn new(image_base_url: &str, player_base_url: &str) -> Self {
        Self {
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
            player_base_url: player_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn resolve_image_url(&self, path: Option<&str>, size: ImageSize) -> String {
        match path.map(str::trim).filter(|p| !p.is_empty()) {
            Some(path) if path.starts_with('/') => {
                format!("{}/{}{}", self.image_base_url, size.as_token(), path)
            },
            Some(path) => format!("{}/{}/{}", self.image_base_url, size.as_token(), path),
            None => PLACEHOLDER_IMAGE_URL.to_string(),
        }
    }

    /// Series default to season 1, episode 1 when either is missing.
    pub fn resolve_playback_url(
        &self,
        id: i64,
        kind: ContentKind,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> String {
        match kind {
            ContentKind::Movie => format!("{}/movie?tmdb={}", self.player_base_url, id),
            ContentKind::Series => format!(
                "{}/{}/{}/{}",
                self.player_base_url,
                id,
                season.unwrap_or(1),
                episode.unwrap_or(1)
            ),
        }
    }
}
