use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub tmdb: FileTmdbConfig,
    #[serde(default)]
    pub import: FileImportConfig,
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub media: FileMediaConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileTmdbConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileImportConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_set_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_ids: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_images: Option<usize>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileMediaConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_root: Option<PathBuf>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub tmdb_api_key: Option<String>,
    pub tmdb_api_url: Option<String>,
    pub tmdb_language: Option<String>,
    pub database_url: Option<String>,
    pub media_dir: Option<PathBuf>,
    pub catalog_media_root: Option<PathBuf>,
    /// Unparsed; validated when the configuration is composed.
    pub attribute_set_id: Option<String>,
    pub category_id: Option<String>,
    pub config_path: Option<PathBuf>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            tmdb_api_key: non_empty_var("TMDB_API_KEY"),
            tmdb_api_url: non_empty_var("TMDB_API_URL"),
            tmdb_language: non_empty_var("TMDB_LANGUAGE"),
            database_url: non_empty_var("DATABASE_URL"),
            media_dir: non_empty_var("MEDIA_DIR").map(PathBuf::from),
            catalog_media_root: non_empty_var("CATALOG_MEDIA_ROOT").map(PathBuf::from),
            attribute_set_id: non_empty_var("MOVIE_ATTRIBUTE_SET_ID"),
            category_id: non_empty_var("MOVIE_CATEGORY_ID"),
            config_path: non_empty_var("MOVIEDB_CONFIG").map(PathBuf::from),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}
