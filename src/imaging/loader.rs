/// Full-resolution image loading
///
/// Decodes an image file at its native size for composition. Decode
/// failures are never fatal: they are logged and the image contributes the
/// null raster.

use image::ImageReader;
use std::path::Path;

use super::raster::Raster;
use crate::error::{PresenterError, Result};
use crate::state::data::ImageRef;

/// Source of full-resolution rasters
pub trait ImageLoader {
    /// Decode `image`, or return the null raster if it cannot be decoded
    fn load(&self, image: &ImageRef) -> Raster;

    /// Decode every image in order, keeping a null raster for each failure
    fn load_all(&self, images: &[ImageRef]) -> Vec<Raster> {
        images.iter().map(|image| self.load(image)).collect()
    }
}

/// Loads images from disk with the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct FullImageLoader;

impl ImageLoader for FullImageLoader {
    fn load(&self, image: &ImageRef) -> Raster {
        match load_full_image(image.path()) {
            Ok(raster) => raster,
            Err(e) => {
                tracing::warn!("⚠️  {}", e);
                Raster::null()
            }
        }
    }
}

/// Decode the file at `path` at native resolution
///
/// The format is sniffed from the file contents, so a mislabeled extension
/// still decodes.
pub fn load_full_image(path: &Path) -> Result<Raster> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;

    let decoded = reader.decode().map_err(|source| PresenterError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        "📷 Loaded {}x{} from {}",
        decoded.width(),
        decoded.height(),
        path.display()
    );

    Ok(decoded.into_rgba8().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_load_full_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        RgbaImage::from_pixel(40, 30, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let raster = load_full_image(&path).unwrap();
        assert_eq!((raster.width(), raster.height()), (40, 30));
        assert_eq!(*raster.image().get_pixel(5, 5), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_missing_file_is_null() {
        let loader = FullImageLoader;
        let raster = loader.load(&ImageRef::new("/nonexistent/path.png"));
        assert!(raster.is_null());
    }

    #[test]
    fn test_corrupt_file_is_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        assert!(load_full_image(&path).is_err());
        assert!(FullImageLoader.load(&ImageRef::new(&path)).is_null());
    }

    #[test]
    fn test_load_all_keeps_order_and_failures() {
        let dir = tempfile::tempdir().unwrap();
        let wide = dir.path().join("wide.png");
        let tall = dir.path().join("tall.bmp");
        RgbaImage::new(20, 10).save(&wide).unwrap();
        RgbaImage::new(10, 20).save(&tall).unwrap();

        let images = [
            ImageRef::new(&wide),
            ImageRef::new(dir.path().join("gone.png")),
            ImageRef::new(&tall),
        ];
        let rasters = FullImageLoader.load_all(&images);

        assert_eq!(rasters.len(), 3);
        assert_eq!(rasters[0].width(), 20);
        assert!(rasters[1].is_null());
        assert_eq!(rasters[2].height(), 20);
    }
}
