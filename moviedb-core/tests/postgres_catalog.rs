//! Catalog persistence against a real PostgreSQL database.
#![cfg(feature = "postgres")]

use anyhow::Result;
use moviedb_core::catalog::{
    CatalogStore, ImageRole, PostgresCatalog, ProductDraft, ProductStatus, StockData, Visibility,
};
use rust_decimal::Decimal;
use sqlx::PgPool;

const ROLES: [ImageRole; 3] = [ImageRole::Image, ImageRole::SmallImage, ImageRole::Thumbnail];

fn sample_draft(name: &str) -> ProductDraft {
    let mut draft = ProductDraft::new("550", name, "Rules.");
    draft.genre = "Drama".to_string();
    draft.release_year = "1999".to_string();
    draft.vote_average = Some(8.4);
    draft.director = "David Fincher".to_string();
    draft.status = ProductStatus::Enabled;
    draft.visibility = Visibility::CatalogSearch;
    draft.price = Decimal::new(599, 2);
    draft.attribute_set_id = 4;
    draft.website_ids = vec![1, 2];
    draft.stock = StockData {
        manage_stock: false,
        is_in_stock: true,
        qty: 100,
    };
    draft.add_image_to_media_gallery("/media/tmp/a.jpg", &ROLES, true, false);
    draft.add_image_to_media_gallery("/media/tmp/b.jpg", &ROLES, true, false);
    draft
}

#[sqlx::test(migrator = "moviedb_core::MIGRATOR")]
async fn saving_twice_upserts_product_and_appends_media(pool: PgPool) -> Result<()> {
    let catalog = PostgresCatalog::new(pool.clone());

    catalog.save(&sample_draft("Fight Club")).await?;
    catalog.save(&sample_draft("Fight Club (1999)")).await?;

    let products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog_products")
        .fetch_one(&pool)
        .await?;
    assert_eq!(products, 1);

    let (name, status, visibility, price, website_ids, qty, in_stock): (
        String,
        i16,
        i16,
        Decimal,
        Vec<i32>,
        i32,
        bool,
    ) = sqlx::query_as(
        "SELECT name, status, visibility, price, website_ids, qty, is_in_stock \
         FROM catalog_products WHERE sku = $1",
    )
    .bind("550")
    .fetch_one(&pool)
    .await?;
    assert_eq!(name, "Fight Club (1999)");
    assert_eq!(status, 1);
    assert_eq!(visibility, 4);
    assert_eq!(price, Decimal::new(599, 2));
    assert_eq!(website_ids, vec![1, 2]);
    assert_eq!(qty, 100);
    assert!(in_stock);

    let media: Vec<(String, Vec<String>, i32, bool)> = sqlx::query_as(
        "SELECT file, roles, position, is_primary FROM catalog_product_media \
         WHERE sku = $1 ORDER BY position",
    )
    .bind("550")
    .fetch_all(&pool)
    .await?;
    let positions: Vec<i32> = media.iter().map(|row| row.2).collect();
    assert_eq!(positions, vec![0, 1, 2, 3]);
    assert_eq!(media[2].0, "/media/tmp/a.jpg");
    assert_eq!(media[0].1, vec!["image", "small_image", "thumbnail"]);
    assert!(media.iter().all(|row| row.3));

    Ok(())
}

#[sqlx::test(migrator = "moviedb_core::MIGRATOR")]
async fn assigning_categories_replaces_links(pool: PgPool) -> Result<()> {
    let catalog = PostgresCatalog::new(pool.clone());
    catalog.save(&sample_draft("Fight Club")).await?;

    catalog.assign_product_to_categories("550", &[3, 5]).await?;
    catalog.assign_product_to_categories("550", &[7]).await?;

    let links: Vec<i32> = sqlx::query_scalar(
        "SELECT category_id FROM catalog_category_products WHERE sku = $1 ORDER BY category_id",
    )
    .bind("550")
    .fetch_all(&pool)
    .await?;
    assert_eq!(links, vec![7]);

    Ok(())
}

#[sqlx::test(migrator = "moviedb_core::MIGRATOR")]
async fn media_root_receives_published_copies(pool: PgPool) -> Result<()> {
    let staging = tempfile::tempdir()?;
    let root = tempfile::tempdir()?;
    let staged = staging.path().join("Kqjtl3GyMwY.jpg");
    std::fs::write(&staged, b"jpeg")?;

    let mut draft = ProductDraft::new("603", "The Matrix", "");
    draft.add_image_to_media_gallery(&staged, &ROLES, true, false);

    let catalog = PostgresCatalog::new(pool.clone()).with_media_root(root.path());
    catalog.save(&draft).await?;

    let published = root.path().join("catalog/product/k/q/Kqjtl3GyMwY.jpg");
    assert_eq!(std::fs::read(&published)?, b"jpeg");

    let stored: String =
        sqlx::query_scalar("SELECT file FROM catalog_product_media WHERE sku = $1")
            .bind("603")
            .fetch_one(&pool)
            .await?;
    assert_eq!(stored, published.to_string_lossy());

    Ok(())
}
