use rust_decimal::Decimal;
use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::fields::{CreditKind, credit_names, join_genres, release_year};
use super::images::{ImageStager, MAX_BACKDROPS};
use crate::catalog::{
    CatalogStore, ProductDraft, ProductStatus, StockData, Visibility,
};
use crate::error::Result;
use crate::providers::tmdb::DEFAULT_LANGUAGE;
use crate::providers::{MetadataProvider, PopularMovie};

pub const DEFAULT_ATTRIBUTE_SET_ID: u32 = 4;
pub const DEFAULT_CATEGORY_ID: u32 = 3;
pub const DEFAULT_WEBSITE_ID: u32 = 1;
pub const DEFAULT_QTY: u32 = 100;

/// 5.99
pub fn default_price() -> Decimal {
    Decimal::new(599, 2)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSettings {
    pub language: String,
    pub page: u32,
    pub attribute_set_id: u32,
    pub category_id: u32,
    pub website_ids: Vec<u32>,
    pub price: Decimal,
    pub qty: u32,
    pub max_images: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            page: 1,
            attribute_set_id: DEFAULT_ATTRIBUTE_SET_ID,
            category_id: DEFAULT_CATEGORY_ID,
            website_ids: vec![DEFAULT_WEBSITE_ID],
            price: default_price(),
            qty: DEFAULT_QTY,
            max_images: MAX_BACKDROPS,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub products: usize,
    pub images_attached: usize,
    pub images_skipped: usize,
}

/// One pass over the popular-movie page: build a product per movie and save
/// it, in list order. The first error ends the run.
pub struct ImportJob {
    provider: Arc<dyn MetadataProvider>,
    catalog: Arc<dyn CatalogStore>,
    stager: ImageStager,
    settings: ImportSettings,
}

impl fmt::Debug for ImportJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportJob")
            .field("provider", &type_name_of_val(self.provider.as_ref()))
            .field("catalog", &type_name_of_val(self.catalog.as_ref()))
            .field("stager", &self.stager)
            .field("settings", &self.settings)
            .finish()
    }
}

impl ImportJob {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        catalog: Arc<dyn CatalogStore>,
        stager: ImageStager,
        settings: ImportSettings,
    ) -> Self {
        let stager = stager.with_max_images(settings.max_images);
        Self {
            provider,
            catalog,
            stager,
            settings,
        }
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    pub async fn execute(&self) -> Result<ImportSummary> {
        let started = Instant::now();
        let popular = self
            .provider
            .popular(&self.settings.language, self.settings.page)
            .await?;
        info!(
            "Importing {} popular movies (page {}, {})",
            popular.results.len(),
            self.settings.page,
            self.settings.language
        );

        let mut summary = ImportSummary::default();
        for movie in &popular.results {
            self.import_movie(movie, &mut summary).await?;
        }

        info!(
            "Imported {} products ({} images attached, {} skipped) in {:.1?}",
            summary.products,
            summary.images_attached,
            summary.images_skipped,
            started.elapsed()
        );
        Ok(summary)
    }

    async fn import_movie(&self, movie: &PopularMovie, summary: &mut ImportSummary) -> Result<()> {
        let sku = movie.id.to_string();
        let language = self.settings.language.as_str();
        let mut draft = ProductDraft::new(&sku, &movie.title, &movie.overview);

        let details = self.provider.details(&sku, language).await?;
        draft.genre = join_genres(&details);
        draft.release_year = release_year(&details);
        draft.vote_average = details.vote_average;

        let credits = self.provider.credits(&sku, language).await?;
        draft.producer = credit_names(&credits, CreditKind::Crew, "Producer");
        draft.director = credit_names(&credits, CreditKind::Crew, "Director");
        draft.actors = credit_names(&credits, CreditKind::Cast, "");

        self.apply_defaults(&mut draft);

        let images = self
            .stager
            .attach_backdrops(self.provider.as_ref(), &mut draft, &sku)
            .await?;
        summary.images_attached += images.attached;
        summary.images_skipped += images.skipped;

        self.catalog.save(&draft).await?;
        self.catalog
            .assign_product_to_categories(&sku, &[self.settings.category_id])
            .await?;
        summary.products += 1;

        info!("Imported movie {} \"{}\"", sku, draft.name);
        debug!(
            "Movie {}: genre={:?} year={:?} director={:?} images={}",
            sku,
            draft.genre,
            draft.release_year,
            draft.director,
            draft.media_gallery.len()
        );
        Ok(())
    }

    fn apply_defaults(&self, draft: &mut ProductDraft) {
        draft.status = ProductStatus::Enabled;
        draft.visibility = Visibility::CatalogSearch;
        draft.price = self.settings.price;
        draft.attribute_set_id = self.settings.attribute_set_id;
        draft.website_ids = self.settings.website_ids.clone();
        draft.stock = StockData {
            manage_stock: false,
            is_in_stock: true,
            qty: self.settings.qty,
        };
    }
}
