/// OMDb (Open Movie Database) provider
///
/// Looks movies up by exact title and year through `/?t=...&y=...`. OMDb
/// answers a miss with HTTP 200 and `"Response": "False"`, which is mapped to
/// `AppError::LookupMiss` just like a failed request would be by the caller.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieDetail, OmdbMovie},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;

#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Option<Cache>,
    cache_ttl: u64,
}

impl OmdbProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            cache: None,
            cache_ttl: 0,
        }
    }

    /// Enables read-through caching of found movies
    pub fn with_cache(mut self, cache: Cache, ttl: u64) -> Self {
        self.cache = Some(cache);
        self.cache_ttl = ttl;
        self
    }

    /// Turns a decoded OMDb body into a detail record or a miss
    fn convert_api_response(movie: OmdbMovie, title: &str, year: &str) -> AppResult<MovieDetail> {
        if !movie.is_found() {
            return Err(AppError::LookupMiss(format!(
                "{} ({}): {}",
                title,
                year,
                movie.error.as_deref().unwrap_or("no match")
            )));
        }
        Ok(MovieDetail::from(movie))
    }

    async fn fetch_from_api(&self, title: &str, year: &str) -> AppResult<MovieDetail> {
        let url = format!("{}/", self.api_url.trim_end_matches('/'));

        let response = self
            .http_client
            .get(&url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title), ("y", year)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }

        let movie: OmdbMovie = response.json().await?;
        let detail = Self::convert_api_response(movie, title, year)?;

        tracing::info!(
            title = %title,
            year = %year,
            genre = %detail.genre,
            provider = "omdb",
            "Movie details fetched"
        );

        Ok(detail)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for OmdbProvider {
    async fn lookup(&self, title: &str, year: &str) -> AppResult<MovieDetail> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Movie title cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache.as_ref(),
            CacheKey::movie_detail(title, year),
            self.cache_ttl,
            async move { self.fetch_from_api(title, year).await }
        )
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}
