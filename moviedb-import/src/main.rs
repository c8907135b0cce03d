//! # moviedb-import
//!
//! Pulls one page of TMDB's popular movies and saves each as a catalog
//! product, with backdrops staged under the media directory.
//!
//! ```text
//! moviedb-import [import] [--config <path>] [--env-file <path>]
//!                [--language <tag>] [--page <n>] [--media-dir <dir>] [--dry-run]
//! moviedb-import db migrate
//! ```

mod config;

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use moviedb_core::{
    CatalogStore, ImageStager, ImportJob, InMemoryCatalog, TmdbClient,
    catalog::PostgresCatalog,
};
use std::{path::PathBuf, sync::Arc};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, ConfigLoader, ConfigLoaderOptions};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "moviedb-import")]
#[command(about = "Import TMDB popular movies into the product catalog")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    import: ImportArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ImportArgs {
    /// Path to a moviedb.toml configuration file
    #[arg(long, global = true, env = "MOVIEDB_CONFIG")]
    config: Option<PathBuf>,

    /// Path to a .env file (defaults to ./.env when present)
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Language tag sent to TMDB, e.g. en-US
    #[arg(long, global = true)]
    language: Option<String>,

    /// Page of the popular list to import
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    page: Option<u32>,

    /// Media directory; images are staged in <dir>/tmp
    #[arg(long, global = true)]
    media_dir: Option<PathBuf>,

    /// Keep products in memory instead of writing to the database
    #[arg(long, global = true, default_value_t = false)]
    dry_run: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Import the popular movie page (default)
    Import,
    /// Catalog database maintenance
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply catalog schema migrations and exit
    Migrate,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::with_options(ConfigLoaderOptions {
        config_path: cli.import.config.clone(),
        env_file: cli.import.env_file.clone(),
    })
    .load()
    .context("failed to load configuration")?;
    apply_cli_overrides(&mut config, &cli.import);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,moviedb_core=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!("using configuration {}", path.display());
    }

    match cli.command.unwrap_or(Command::Import) {
        Command::Import => run_import(&config, cli.import.dry_run).await,
        Command::Db(DbCommand::Migrate) => run_db_migrate(&config).await,
    }
}

fn apply_cli_overrides(config: &mut Config, args: &ImportArgs) {
    if let Some(language) = args.language.clone() {
        config.import.language = language;
    }
    if let Some(page) = args.page {
        config.import.page = page;
    }
    if let Some(media_dir) = args.media_dir.clone() {
        config.media.dir = media_dir;
    }
}

async fn run_import(config: &Config, dry_run: bool) -> anyhow::Result<()> {
    let settings = config.tmdb_settings()?;
    let client = TmdbClient::connect(settings)
        .await
        .context("failed to fetch TMDB configuration")?;

    let catalog: Arc<dyn CatalogStore> = if dry_run {
        info!("Dry run: products are kept in memory");
        Arc::new(InMemoryCatalog::new())
    } else {
        let mut catalog = connect_catalog(config).await?;
        catalog
            .migrate()
            .await
            .context("database migration failed")?;
        if let Some(root) = &config.media.catalog_root {
            catalog = catalog.with_media_root(root);
        }
        Arc::new(catalog)
    };

    let job = ImportJob::new(
        Arc::new(client),
        catalog,
        ImageStager::new(&config.media.dir),
        config.import.clone(),
    );
    let summary = job.execute().await.context("movie import failed")?;

    info!(
        "Import finished: {} products, {} images",
        summary.products, summary.images_attached
    );
    Ok(())
}

async fn run_db_migrate(config: &Config) -> anyhow::Result<()> {
    let catalog = connect_catalog(config).await?;
    catalog
        .migrate()
        .await
        .context("database migration failed")?;
    info!("Database migrations applied successfully");
    Ok(())
}

async fn connect_catalog(config: &Config) -> anyhow::Result<PostgresCatalog> {
    let url = config
        .database
        .url
        .as_deref()
        .context("DATABASE_URL is not configured (use --dry-run to skip the database)")?;
    PostgresCatalog::connect(url)
        .await
        .context("failed to connect to PostgreSQL")
}
