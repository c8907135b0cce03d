use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Catalog product status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStatus {
    Enabled,
    Disabled,
}

impl ProductStatus {
    pub fn code(self) -> i16 {
        match self {
            ProductStatus::Enabled => 1,
            ProductStatus::Disabled => 2,
        }
    }
}

/// Where a product is listed on the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    NotVisible,
    Catalog,
    Search,
    CatalogSearch,
}

impl Visibility {
    pub fn code(self) -> i16 {
        match self {
            Visibility::NotVisible => 1,
            Visibility::Catalog => 2,
            Visibility::Search => 3,
            Visibility::CatalogSearch => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageRole {
    Image,
    SmallImage,
    Thumbnail,
}

impl ImageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageRole::Image => "image",
            ImageRole::SmallImage => "small_image",
            ImageRole::Thumbnail => "thumbnail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockData {
    pub manage_stock: bool,
    pub is_in_stock: bool,
    pub qty: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaGalleryEntry {
    pub file: PathBuf,
    pub roles: Vec<ImageRole>,
    /// The entry defines the image for each of `roles`.
    pub primary: bool,
    /// Hidden from storefront galleries.
    pub excluded: bool,
}

/// A catalog product being assembled from API data. Handed to a
/// [`CatalogStore`](super::CatalogStore) once fully populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub genre: String,
    pub release_year: String,
    pub vote_average: Option<f64>,
    pub producer: String,
    pub director: String,
    pub actors: String,
    pub status: ProductStatus,
    pub visibility: Visibility,
    pub price: Decimal,
    pub attribute_set_id: u32,
    pub website_ids: Vec<u32>,
    pub stock: StockData,
    pub media_gallery: Vec<MediaGalleryEntry>,
}

impl ProductDraft {
    /// Start a draft from the identifying fields. Everything else starts
    /// empty and disabled until filled in.
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            description: description.into(),
            genre: String::new(),
            release_year: String::new(),
            vote_average: None,
            producer: String::new(),
            director: String::new(),
            actors: String::new(),
            status: ProductStatus::Disabled,
            visibility: Visibility::NotVisible,
            price: Decimal::ZERO,
            attribute_set_id: 0,
            website_ids: Vec::new(),
            stock: StockData {
                manage_stock: false,
                is_in_stock: false,
                qty: 0,
            },
            media_gallery: Vec::new(),
        }
    }

    pub fn add_image_to_media_gallery(
        &mut self,
        file: impl Into<PathBuf>,
        roles: &[ImageRole],
        primary: bool,
        excluded: bool,
    ) {
        self.media_gallery.push(MediaGalleryEntry {
            file: file.into(),
            roles: roles.to_vec(),
            primary,
            excluded,
        });
    }
}
