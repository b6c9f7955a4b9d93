/// List thumbnails
///
/// Thumbnails are decoded on tokio's blocking pool. A scan queues one job per
/// listed image, so a semaphore bounds how many decodes (and full-size
/// buffers) are alive at once; the rest wait for a permit.

use image::ImageReader;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;

use super::raster::Raster;
use crate::error::{PresenterError, Result};
use crate::state::data::ImageRef;

/// Default edge length of list thumbnails (square box)
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 128;

/// Thumbnail decodes allowed to run at the same time
pub const MAX_CONCURRENT_THUMBNAILS: usize = 4;

/// Decode limit for thumbnails, guards the list against huge files
const MAX_THUMBNAIL_SOURCE_BYTES: u64 = 128 * 1024 * 1024;

/// Produces small previews for the image list
///
/// Clones share one decode budget.
#[derive(Debug, Clone)]
pub struct ThumbnailGenerator {
    size: u32,
    permits: Arc<Semaphore>,
}

impl ThumbnailGenerator {
    pub fn new(size: u32) -> Self {
        Self::with_concurrency(size, MAX_CONCURRENT_THUMBNAILS)
    }

    pub fn with_concurrency(size: u32, concurrency: usize) -> Self {
        Self {
            size: size.max(1),
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Generate a thumbnail, or the null raster if the file can't be decoded
    pub fn generate(&self, image: &ImageRef) -> Raster {
        match generate_thumbnail(image.path(), self.size) {
            Ok(raster) => raster,
            Err(e) => {
                tracing::warn!("⚠️  No thumbnail: {}", e);
                Raster::null()
            }
        }
    }

    /// Generate a thumbnail on the blocking pool once a decode slot is free
    ///
    /// Returns the image alongside its thumbnail so results can be matched
    /// back to list entries as they arrive.
    pub async fn generate_async(self, image: ImageRef) -> (ImageRef, Raster) {
        let permit = match Arc::clone(&self.permits).acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                tracing::warn!("⚠️  Thumbnail queue closed: {}", e);
                return (image, Raster::null());
            }
        };

        let task_image = image.clone();
        let raster = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            self.generate(&task_image)
        })
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("⚠️  Thumbnail task failed: {}", e);
            Raster::null()
        });
        (image, raster)
    }
}

impl Default for ThumbnailGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_THUMBNAIL_SIZE)
    }
}

/// Decode `path` and shrink it to fit a `size` x `size` box
///
/// Aspect ratio is kept. Images already inside the box are left at their
/// own size.
pub fn generate_thumbnail(path: &Path, size: u32) -> Result<Raster> {
    let mut reader = ImageReader::open(path)?.with_guessed_format()?;

    let mut limits = image::Limits::default();
    limits.max_alloc = Some(MAX_THUMBNAIL_SOURCE_BYTES);
    reader.limits(limits);

    let decoded = reader.decode().map_err(|source| PresenterError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let thumbnail = if decoded.width() > size || decoded.height() > size {
        decoded.thumbnail(size, size)
    } else {
        decoded
    };

    Ok(thumbnail.into_rgba8().into())
}
