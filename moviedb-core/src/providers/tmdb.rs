use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::traits::{
    Configuration, MetadataProvider, MovieCredits, MovieDetails, MovieImages,
    PopularMoviesPage, ProviderError,
};

pub const TMDB_API_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Connection settings for [`TmdbClient`].
#[derive(Clone)]
pub struct TmdbSettings {
    pub api_key: String,
    pub api_url: String,
}

impl std::fmt::Debug for TmdbSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbSettings")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl TmdbSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: TMDB_API_BASE.to_string(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

/// Blocking-style TMDB v3 client: every call is a single GET awaited to
/// completion, with no retry or rate limiting.
///
/// The service configuration is fetched once by [`TmdbClient::connect`] and
/// kept for the lifetime of the client.
#[derive(Debug)]
pub struct TmdbClient {
    client: Client,
    settings: TmdbSettings,
    configuration: Configuration,
}

impl TmdbClient {
    /// Build a client and fetch the service configuration.
    pub async fn connect(settings: TmdbSettings) -> Result<Self, ProviderError> {
        Self::connect_with_client(Client::new(), settings).await
    }

    pub async fn connect_with_client(
        client: Client,
        settings: TmdbSettings,
    ) -> Result<Self, ProviderError> {
        let configuration = fetch_configuration(&client, &settings).await?;
        info!(
            "TMDB configuration loaded, image base URL {}",
            configuration.images.base_url
        );

        Ok(Self {
            client,
            settings,
            configuration,
        })
    }

    /// Fetch `/configuration` again. The cached copy is not replaced.
    pub async fn fetch_configuration(&self) -> Result<Configuration, ProviderError> {
        fetch_configuration(&self.client, &self.settings).await
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        get_json(&self.client, &self.settings, path, params).await
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    async fn popular(
        &self,
        language: &str,
        page: u32,
    ) -> Result<PopularMoviesPage, ProviderError> {
        let page = page.to_string();
        self.get(
            "/movie/popular",
            &[("language", language), ("page", page.as_str())],
        )
        .await
    }

    async fn details(
        &self,
        movie_id: &str,
        language: &str,
    ) -> Result<MovieDetails, ProviderError> {
        require_movie_id(movie_id, "details")?;
        self.get(&format!("/movie/{}", movie_id), &[("language", language)])
            .await
    }

    async fn credits(
        &self,
        movie_id: &str,
        language: &str,
    ) -> Result<MovieCredits, ProviderError> {
        require_movie_id(movie_id, "credits")?;
        self.get(
            &format!("/movie/{}/credits", movie_id),
            &[("language", language)],
        )
        .await
    }

    async fn images(&self, movie_id: &str) -> Result<MovieImages, ProviderError> {
        require_movie_id(movie_id, "images")?;
        self.get(&format!("/movie/{}/images", movie_id), &[]).await
    }

    fn image_base_url(&self) -> &str {
        &self.configuration.images.base_url
    }
}

/// Blank ids and `"0"` never name a movie.
fn require_movie_id(movie_id: &str, what: &str) -> Result<(), ProviderError> {
    let movie_id = movie_id.trim();
    if movie_id.is_empty() || movie_id == "0" {
        return Err(ProviderError::InvalidArgument(format!(
            "Movie ID is not provided, can't retrieve {}. Please provide movie ID to proceed",
            what
        )));
    }
    Ok(())
}

async fn fetch_configuration(
    client: &Client,
    settings: &TmdbSettings,
) -> Result<Configuration, ProviderError> {
    get_json(client, settings, "/configuration", &[]).await
}

async fn get_json<T: DeserializeOwned>(
    client: &Client,
    settings: &TmdbSettings,
    path: &str,
    params: &[(&str, &str)],
) -> Result<T, ProviderError> {
    let url = format!("{}{}", settings.api_url.trim_end_matches('/'), path);
    debug!("TMDB request: GET {} {:?}", url, params);

    let response = client
        .get(&url)
        .query(params)
        .query(&[("api_key", settings.api_key.as_str())])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ProviderError::Parse(format!("{}: {}", path, e)))
}
