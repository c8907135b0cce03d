use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::providers::ProviderError;

/// Anything that aborts an import run.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Metadata provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ImportError>;
