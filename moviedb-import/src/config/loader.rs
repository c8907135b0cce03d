use moviedb_core::ImportSettings;
use moviedb_core::import::MAX_BACKDROPS;
use moviedb_core::providers::tmdb::TMDB_API_BASE;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use super::{
    models::{Config, ConfigMetadata, DatabaseConfig, MediaConfig, TmdbConfig},
    sources::{EnvConfig, FileConfig},
};

const DEFAULT_CONFIG_LOCATIONS: [&str; 2] = ["moviedb.toml", "config/moviedb.toml"];
const DEFAULT_MEDIA_DIR: &str = "./media";

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn load(&self) -> Result<Config, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigLoadError::MissingEnvFile { path: path.clone() });
                }
                dotenvy::from_path(path)?;
                true
            }
            None => dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                dotenvy::Error::Io(_) => Ok(false),
                _ => Err(err),
            })?,
        };

        self.load_with_env(EnvConfig::gather(), env_file_loaded)
    }

    /// Resolve the configuration against an already gathered environment.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
        env_file_loaded: bool,
    ) -> Result<Config, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let metadata = ConfigMetadata {
            config_path,
            env_file_loaded,
        };
        compose_config(file_config, env, metadata)
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env.config_path.clone());

        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigLoadError::MissingConfig { path });
                }
                path
            }
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(path) => path,
                None => return Ok((None, None)),
            },
        };

        let file_config = read_file_config(&path)?;
        Ok((Some(file_config), Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge the sources with precedence env > file > default.
pub fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    metadata: ConfigMetadata,
) -> Result<Config, ConfigLoadError> {
    let FileConfig {
        tmdb: file_tmdb,
        import: file_import,
        database: file_database,
        media: file_media,
    } = file_config.unwrap_or_default();

    let api_key = env
        .tmdb_api_key
        .or(file_tmdb.api_key)
        .filter(|key| !key.trim().is_empty());
    let tmdb = TmdbConfig {
        api_key,
        api_url: env
            .tmdb_api_url
            .or(file_tmdb.api_url)
            .unwrap_or_else(|| TMDB_API_BASE.to_string()),
    };

    let defaults = ImportSettings::default();
    let import = ImportSettings {
        language: env
            .tmdb_language
            .or(file_import.language)
            .unwrap_or(defaults.language),
        page: file_import.page.unwrap_or(defaults.page),
        attribute_set_id: parse_id("MOVIE_ATTRIBUTE_SET_ID", env.attribute_set_id.as_deref())?
            .or(file_import.attribute_set_id)
            .unwrap_or(defaults.attribute_set_id),
        category_id: parse_id("MOVIE_CATEGORY_ID", env.category_id.as_deref())?
            .or(file_import.category_id)
            .unwrap_or(defaults.category_id),
        website_ids: file_import.website_ids.unwrap_or(defaults.website_ids),
        price: defaults.price,
        qty: file_import.qty.unwrap_or(defaults.qty),
        max_images: file_import
            .max_images
            .unwrap_or(defaults.max_images)
            .min(MAX_BACKDROPS),
    };
    if import.page == 0 {
        return Err(ConfigLoadError::InvalidValue {
            field: "import.page",
            reason: "pages start at 1".to_string(),
        });
    }

    let database = DatabaseConfig {
        url: env.database_url.or(file_database.url),
    };

    let media = MediaConfig {
        dir: env
            .media_dir
            .or(file_media.dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_DIR)),
        catalog_root: env.catalog_media_root.or(file_media.catalog_root),
    };

    Ok(Config {
        tmdb,
        import,
        database,
        media,
        metadata,
    })
}

fn parse_id(field: &'static str, raw: Option<&str>) -> Result<Option<u32>, ConfigLoadError> {
    raw.map(|value| {
        value.parse::<u32>().map_err(|_| ConfigLoadError::InvalidValue {
            field,
            reason: format!("expected a numeric id, got '{value}'"),
        })
    })
    .transpose()
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("env file missing: {path}")]
    MissingEnvFile { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("TMDB API key is not configured; set TMDB_API_KEY or tmdb.api_key")]
    MissingApiKey,
    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn loader_for(path: &Path) -> ConfigLoader {
        ConfigLoader::with_options(ConfigLoaderOptions {
            config_path: Some(path.to_path_buf()),
            env_file: None,
        })
    }

    fn env_with_key() -> EnvConfig {
        EnvConfig {
            tmdb_api_key: Some("env-key".to_string()),
            ..EnvConfig::default()
        }
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config =
            compose_config(None, env_with_key(), ConfigMetadata::default()).unwrap();

        let settings = config.tmdb_settings().unwrap();
        assert_eq!(settings.api_key, "env-key");
        assert_eq!(settings.api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.import, ImportSettings::default());
        assert_eq!(config.media.dir, PathBuf::from("./media"));
        assert!(config.media.catalog_root.is_none());
        assert!(config.database.url.is_none());
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let config =
            compose_config(None, EnvConfig::default(), ConfigMetadata::default()).unwrap();
        let err = config.tmdb_settings().unwrap_err();
        assert!(matches!(err, ConfigLoadError::MissingApiKey));

        let blank = EnvConfig {
            tmdb_api_key: Some("  ".to_string()),
            ..EnvConfig::default()
        };
        let config = compose_config(None, blank, ConfigMetadata::default()).unwrap();
        assert!(config.tmdb_settings().is_err());
    }

    #[test]
    fn env_overrides_file() {
        let file: FileConfig = toml::from_str(
            r#"
            [tmdb]
            api_key = "file-key"
            api_url = "http://localhost:9000/3"

            [import]
            language = "fr-FR"
            category_id = 7
            website_ids = [1, 2]

            [media]
            dir = "/srv/file-media"
            "#,
        )
        .unwrap();
        let env = EnvConfig {
            tmdb_language: Some("de-DE".to_string()),
            media_dir: Some(PathBuf::from("/srv/env-media")),
            ..env_with_key()
        };

        let config = compose_config(Some(file), env, ConfigMetadata::default()).unwrap();

        assert_eq!(config.tmdb.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.tmdb.api_url, "http://localhost:9000/3");
        assert_eq!(config.import.language, "de-DE");
        assert_eq!(config.import.category_id, 7);
        assert_eq!(config.import.website_ids, vec![1, 2]);
        assert_eq!(config.media.dir, PathBuf::from("/srv/env-media"));
    }

    #[test]
    fn non_numeric_category_id_is_rejected() {
        let env = EnvConfig {
            category_id: Some("books".to_string()),
            ..env_with_key()
        };
        let err = compose_config(None, env, ConfigMetadata::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::InvalidValue {
                field: "MOVIE_CATEGORY_ID",
                ..
            }
        ));

        let env = EnvConfig {
            attribute_set_id: Some("-4".to_string()),
            ..env_with_key()
        };
        assert!(compose_config(None, env, ConfigMetadata::default()).is_err());
    }

    #[test]
    fn numeric_ids_from_env_override_file() {
        let file: FileConfig = toml::from_str("[import]\ncategory_id = 7\n").unwrap();
        let env = EnvConfig {
            category_id: Some("12".to_string()),
            attribute_set_id: Some("9".to_string()),
            ..env_with_key()
        };
        let config = compose_config(Some(file), env, ConfigMetadata::default()).unwrap();
        assert_eq!(config.import.category_id, 12);
        assert_eq!(config.import.attribute_set_id, 9);
    }

    #[test]
    fn image_limit_is_capped() {
        let file: FileConfig = toml::from_str("[import]\nmax_images = 20\n").unwrap();
        let config = compose_config(Some(file), env_with_key(), ConfigMetadata::default())
            .unwrap();
        assert_eq!(config.import.max_images, 5);
    }

    #[test]
    fn missing_explicit_env_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigLoader::with_options(ConfigLoaderOptions {
            config_path: None,
            env_file: Some(dir.path().join("absent.env")),
        })
        .load()
        .unwrap_err();
        assert!(matches!(err, ConfigLoadError::MissingEnvFile { .. }));
    }

    #[test]
    fn page_zero_is_rejected() {
        let file: FileConfig = toml::from_str("[import]\npage = 0\n").unwrap();
        let err = compose_config(Some(file), env_with_key(), ConfigMetadata::default())
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::InvalidValue { .. }));
    }

    #[test]
    fn explicit_config_file_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database]\nurl = \"postgres://localhost/catalog\"").unwrap();

        let config = loader_for(file.path())
            .load_with_env(env_with_key(), false)
            .unwrap();

        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://localhost/catalog")
        );
        assert_eq!(config.metadata.config_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn missing_explicit_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = loader_for(&dir.path().join("absent.toml"))
            .load_with_env(env_with_key(), false)
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
    }

    #[test]
    fn malformed_config_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[import\npage = ").unwrap();

        let err = loader_for(file.path())
            .load_with_env(env_with_key(), false)
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse { .. }));
    }
}
