use moviedb_core::{ImportSettings, TmdbSettings};
use std::path::PathBuf;

use super::loader::ConfigLoadError;

/// Fully resolved importer configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub tmdb: TmdbConfig,
    pub import: ImportSettings,
    pub database: DatabaseConfig,
    pub media: MediaConfig,
    pub metadata: ConfigMetadata,
}

#[derive(Clone)]
pub struct TmdbConfig {
    pub api_key: Option<String>,
    pub api_url: String,
}

impl std::fmt::Debug for TmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Staging root; downloads land in `<dir>/tmp/`.
    pub dir: PathBuf,
    /// Catalog media tree that staged images are published into.
    pub catalog_root: Option<PathBuf>,
}

/// Where the configuration came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}

impl Config {
    /// Client settings for the import. Fails when no API key is configured.
    pub fn tmdb_settings(&self) -> Result<TmdbSettings, ConfigLoadError> {
        let api_key = self
            .tmdb
            .api_key
            .clone()
            .ok_or(ConfigLoadError::MissingApiKey)?;
        Ok(TmdbSettings::new(api_key).with_api_url(self.tmdb.api_url.clone()))
    }
}
