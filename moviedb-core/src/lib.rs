//! # moviedb-core
//!
//! Imports TMDB's popular movies into an e-commerce catalog.
//!
//! - [`providers`]: the TMDB v3 client and the [`MetadataProvider`] seam the
//!   import reads through
//! - [`catalog`]: the product draft, the [`CatalogStore`] port and its
//!   in-memory and PostgreSQL adapters
//! - [`import`]: attribute flattening, backdrop staging and [`ImportJob`]
//!
//! ## Feature Flags
//!
//! - `postgres` (default): [`catalog::PostgresCatalog`] and the embedded
//!   schema migrations
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use moviedb_core::{
//!     ImageStager, ImportJob, ImportSettings, InMemoryCatalog, TmdbClient, TmdbSettings,
//! };
//!
//! async fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TmdbClient::connect(TmdbSettings::new("api-key")).await?;
//!     let job = ImportJob::new(
//!         Arc::new(client),
//!         Arc::new(InMemoryCatalog::new()),
//!         ImageStager::new("./media"),
//!         ImportSettings::default(),
//!     );
//!     let summary = job.execute().await?;
//!     println!("imported {} products", summary.products);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Catalog draft model and persistence port
pub mod catalog;

/// Error types for an import run
pub mod error;

/// Popular-movie import job
pub mod import;

/// Movie metadata providers
pub mod providers;

#[cfg(feature = "postgres")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use catalog::{CatalogError, CatalogStore, InMemoryCatalog, ProductDraft};
pub use error::{ImportError, Result};
pub use import::{ImageStager, ImportJob, ImportSettings, ImportSummary};
pub use providers::{MetadataProvider, ProviderError, TmdbClient, TmdbSettings};
