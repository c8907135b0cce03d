pub mod fields;
pub mod images;
mod job;

pub use fields::{CreditKind, credit_names, join_genres, release_year};
pub use images::{AttachOutcome, DownloadError, ImageStager, MAX_BACKDROPS};
pub use job::{
    DEFAULT_ATTRIBUTE_SET_ID, DEFAULT_CATEGORY_ID, DEFAULT_QTY, DEFAULT_WEBSITE_ID,
    ImportJob, ImportSettings, ImportSummary, default_price,
};
