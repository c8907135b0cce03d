use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{CatalogError, CatalogStore, MediaGalleryEntry, ProductDraft};

/// PostgreSQL-backed catalog.
///
/// `save` upserts the product row by SKU and appends gallery rows, so running
/// the import twice yields duplicate images, never duplicate products.
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
    media_root: Option<PathBuf>,
}

impl PostgresCatalog {
    pub async fn connect(database_url: &str) -> Result<Self, CatalogError> {
        info!("Connecting to PostgreSQL catalog");
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            media_root: None,
        }
    }

    /// Copy staged gallery files under `<root>/catalog/product/` on save and
    /// store the copied path instead of the staging path.
    pub fn with_media_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.media_root = Some(root.into());
        self
    }

    pub async fn migrate(&self) -> Result<(), CatalogError> {
        crate::MIGRATOR.run(&self.pool).await?;
        info!("Catalog schema is up to date");
        Ok(())
    }

    async fn publish_media(&self, entry: &MediaGalleryEntry) -> Result<PathBuf, CatalogError> {
        let Some(root) = &self.media_root else {
            return Ok(entry.file.clone());
        };
        let file_name = entry
            .file
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                CatalogError::Rejected(format!(
                    "gallery file has no name: {}",
                    entry.file.display()
                ))
            })?;

        let target = catalog_media_path(root, file_name);
        if let Some(dir) = target.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| CatalogError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::copy(&entry.file, &target)
            .await
            .map_err(|source| CatalogError::Io {
                path: entry.file.clone(),
                source,
            })?;
        debug!("Published {} to {}", entry.file.display(), target.display());
        Ok(target)
    }
}

/// Dispersed location of a product image: `<root>/catalog/product/a/b/ab....jpg`,
/// keyed on the first two characters of the lowercased file name.
pub fn catalog_media_path(root: &Path, file_name: &str) -> PathBuf {
    let lowered = file_name.to_lowercase();
    let mut chars = lowered.chars().map(|c| if c == '.' { '_' } else { c });
    let first = chars.next().unwrap_or('_');
    let second = chars.next().unwrap_or('_');

    root.join("catalog")
        .join("product")
        .join(first.to_string())
        .join(second.to_string())
        .join(file_name)
}

fn to_db_int(value: u32, field: &str) -> Result<i32, CatalogError> {
    i32::try_from(value)
        .map_err(|_| CatalogError::Rejected(format!("{} out of range: {}", field, value)))
}

#[async_trait]
impl CatalogStore for PostgresCatalog {
    async fn save(&self, draft: &ProductDraft) -> Result<(), CatalogError> {
        let website_ids = draft
            .website_ids
            .iter()
            .map(|id| to_db_int(*id, "website id"))
            .collect::<Result<Vec<_>, _>>()?;

        let mut published = Vec::with_capacity(draft.media_gallery.len());
        for entry in &draft.media_gallery {
            published.push((self.publish_media(entry).await?, entry));
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO catalog_products (
                sku, name, description, genre, release_year, vote_average,
                producer, director, actors, status, visibility, price,
                attribute_set_id, website_ids, manage_stock, is_in_stock, qty
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT (sku) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                genre = EXCLUDED.genre,
                release_year = EXCLUDED.release_year,
                vote_average = EXCLUDED.vote_average,
                producer = EXCLUDED.producer,
                director = EXCLUDED.director,
                actors = EXCLUDED.actors,
                status = EXCLUDED.status,
                visibility = EXCLUDED.visibility,
                price = EXCLUDED.price,
                attribute_set_id = EXCLUDED.attribute_set_id,
                website_ids = EXCLUDED.website_ids,
                manage_stock = EXCLUDED.manage_stock,
                is_in_stock = EXCLUDED.is_in_stock,
                qty = EXCLUDED.qty,
                updated_at = NOW()
            "#,
        )
        .bind(&draft.sku)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.genre)
        .bind(&draft.release_year)
        .bind(draft.vote_average)
        .bind(&draft.producer)
        .bind(&draft.director)
        .bind(&draft.actors)
        .bind(draft.status.code())
        .bind(draft.visibility.code())
        .bind(draft.price)
        .bind(to_db_int(draft.attribute_set_id, "attribute set id")?)
        .bind(&website_ids)
        .bind(draft.stock.manage_stock)
        .bind(draft.stock.is_in_stock)
        .bind(to_db_int(draft.stock.qty, "qty")?)
        .execute(&mut *tx)
        .await?;

        let (next_position,): (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM catalog_product_media WHERE sku = $1",
        )
        .bind(&draft.sku)
        .fetch_one(&mut *tx)
        .await?;

        for (offset, (file, entry)) in published.iter().enumerate() {
            let roles: Vec<&str> = entry.roles.iter().map(|role| role.as_str()).collect();
            let file = file.to_string_lossy().into_owned();
            sqlx::query(
                r#"
                INSERT INTO catalog_product_media (sku, file, roles, is_primary, excluded, position)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&draft.sku)
            .bind(file)
            .bind(&roles)
            .bind(entry.primary)
            .bind(entry.excluded)
            .bind(next_position + offset as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(
            "Saved product {} with {} gallery images",
            draft.sku,
            published.len()
        );
        Ok(())
    }

    async fn assign_product_to_categories(
        &self,
        sku: &str,
        category_ids: &[u32],
    ) -> Result<(), CatalogError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM catalog_category_products WHERE sku = $1")
            .bind(sku)
            .execute(&mut *tx)
            .await?;

        for category_id in category_ids {
            sqlx::query(
                "INSERT INTO catalog_category_products (sku, category_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(sku)
            .bind(to_db_int(*category_id, "category id")?)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
