use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

// Request URLs carry the API key in the query string.
impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Network(err.without_url())
    }
}

/// One entry of the popular-movie listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularMovie {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub overview: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularMoviesPage {
    #[serde(default)]
    pub page: u32,
    pub results: Vec<PopularMovie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// `YYYY-MM-DD`; unreleased titles come back with an empty string or null.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewMember {
    pub name: String,
    #[serde(default)]
    pub job: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieCredits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageFile {
    pub file_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieImages {
    #[serde(default)]
    pub backdrops: Vec<ImageFile>,
}

/// Service configuration returned by `/configuration`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    pub images: ImagesConfiguration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfiguration {
    pub base_url: String,
    #[serde(default)]
    pub secure_base_url: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read side of the movie metadata service used by the import job.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch one page of the popularity-ranked movie list
    async fn popular(&self, language: &str, page: u32) -> Result<PopularMoviesPage, ProviderError>;

    /// Fetch genres, release date and rating for a movie
    async fn details(&self, movie_id: &str, language: &str) -> Result<MovieDetails, ProviderError>;

    /// Fetch cast and crew for a movie
    async fn credits(&self, movie_id: &str, language: &str) -> Result<MovieCredits, ProviderError>;

    /// Fetch the image listing for a movie
    async fn images(&self, movie_id: &str) -> Result<MovieImages, ProviderError>;

    /// Base URL that image file paths are resolved against
    fn image_base_url(&self) -> &str;
}
