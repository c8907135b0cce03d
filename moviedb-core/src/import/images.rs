use reqwest::Client;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use url::Url;

use crate::catalog::{ImageRole, ProductDraft};
use crate::error::ImportError;
use crate::providers::MetadataProvider;

/// Backdrops considered per movie.
pub const MAX_BACKDROPS: usize = 5;

/// TMDB image size segment for full resolution files.
pub const ORIGINAL_SIZE: &str = "original";

pub const GALLERY_ROLES: [ImageRole; 3] =
    [ImageRole::Image, ImageRole::SmallImage, ImageRole::Thumbnail];

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("no file name in {0}")]
    NoFileName(String),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AttachOutcome {
    pub attached: usize,
    pub skipped: usize,
}

/// Downloads backdrops into `<media_dir>/tmp/` and adds them to a draft's
/// media gallery.
#[derive(Debug, Clone)]
pub struct ImageStager {
    http_client: Client,
    tmp_dir: PathBuf,
    max_images: usize,
}

impl ImageStager {
    pub fn new(media_dir: impl AsRef<Path>) -> Self {
        Self::with_client(Client::new(), media_dir)
    }

    pub fn with_client(http_client: Client, media_dir: impl AsRef<Path>) -> Self {
        Self {
            http_client,
            tmp_dir: media_dir.as_ref().join("tmp"),
            max_images: MAX_BACKDROPS,
        }
    }

    /// Lower the number of backdrops tried per movie. Values above
    /// [`MAX_BACKDROPS`] are capped.
    pub fn with_max_images(mut self, max_images: usize) -> Self {
        self.max_images = max_images.min(MAX_BACKDROPS);
        self
    }

    pub fn max_images(&self) -> usize {
        self.max_images
    }

    pub fn tmp_dir(&self) -> &Path {
        &self.tmp_dir
    }

    /// Create the staging directory if it does not exist yet.
    pub async fn ensure_tmp_dir(&self) -> Result<(), ImportError> {
        tokio::fs::create_dir_all(&self.tmp_dir)
            .await
            .map_err(|source| ImportError::Io {
                path: self.tmp_dir.clone(),
                source,
            })
    }

    /// Fetch the movie's backdrops and attach the first few that download.
    ///
    /// Only the staging directory and the image listing can fail the call;
    /// a backdrop that does not download is logged and left out.
    pub async fn attach_backdrops(
        &self,
        provider: &dyn MetadataProvider,
        draft: &mut ProductDraft,
        movie_id: &str,
    ) -> Result<AttachOutcome, ImportError> {
        self.ensure_tmp_dir().await?;

        let images = provider.images(movie_id).await?;
        let base_url = provider.image_base_url();
        let mut outcome = AttachOutcome::default();

        for backdrop in images.backdrops.iter().take(self.max_images) {
            let url = format!("{}{}{}", base_url, ORIGINAL_SIZE, backdrop.file_path);
            match self.download(&url).await {
                Ok(path) => {
                    draft.add_image_to_media_gallery(path, &GALLERY_ROLES, true, false);
                    outcome.attached += 1;
                }
                Err(e) => {
                    warn!("Skipping image {} for movie {}: {}", url, movie_id, e);
                    outcome.skipped += 1;
                }
            }
        }

        Ok(outcome)
    }

    /// Download `url` into the staging directory under its own file name.
    pub async fn download(&self, url: &str) -> Result<PathBuf, DownloadError> {
        let file_name =
            file_name_from_url(url).ok_or_else(|| DownloadError::NoFileName(url.to_string()))?;
        let destination = self.tmp_dir.join(file_name);

        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await?;
        tokio::fs::write(&destination, &bytes).await?;

        debug!("Downloaded {} ({} bytes)", destination.display(), bytes.len());
        Ok(destination)
    }
}

/// Last path segment of a URL, ignoring query and fragment.
pub fn file_name_from_url(url: &str) -> Option<String> {
    let segment = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string),
        Err(_) => url.rsplit('/').next().map(str::to_string),
    };
    segment.filter(|name| !name.is_empty())
}
