//! Write side of the import: the product draft and the store it is saved to.

mod draft;
mod memory;
#[cfg(feature = "postgres")]
#[cfg_attr(docsrs, doc(cfg(feature = "postgres")))]
mod postgres;

pub use draft::{
    ImageRole, MediaGalleryEntry, ProductDraft, ProductStatus, StockData, Visibility,
};
pub use memory::{CategoryAssignment, InMemoryCatalog};
#[cfg(feature = "postgres")]
pub use postgres::{PostgresCatalog, catalog_media_path};

use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[cfg(feature = "postgres")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[cfg(feature = "postgres")]
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Product rejected: {0}")]
    Rejected(String),
}

/// Persistence port for imported products.
///
/// Calls are independent; no transaction spans a `save` and the following
/// category assignment.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Persist a fully populated draft
    async fn save(&self, draft: &ProductDraft) -> Result<(), CatalogError>;

    /// Replace the category links of the product identified by `sku`
    async fn assign_product_to_categories(
        &self,
        sku: &str,
        category_ids: &[u32],
    ) -> Result<(), CatalogError>;
}
