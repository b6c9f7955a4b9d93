use image::RgbaImage;
use std::fmt;
use std::sync::Arc;

/// Target size for a composition, in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A canvas with no area never produces an image
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A decoded RGBA8 pixel buffer
///
/// Rasters are immutable once built and cheap to clone (the pixels sit
/// behind an `Arc`). The zero-sized raster is the "no image" sentinel used
/// for empty selections, failed decodes and degenerate canvases.
#[derive(Clone)]
pub struct Raster {
    pixels: Arc<RgbaImage>,
}

impl Raster {
    pub fn null() -> Self {
        Self {
            pixels: Arc::new(RgbaImage::new(0, 0)),
        }
    }

    pub fn is_null(&self) -> bool {
        self.pixels.width() == 0 || self.pixels.height() == 0
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> CanvasSize {
        CanvasSize::new(self.width(), self.height())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Raw RGBA bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// True when both rasters share the same pixel allocation
    pub fn ptr_eq(&self, other: &Raster) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

impl From<RgbaImage> for Raster {
    fn from(image: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(image),
        }
    }
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Default for Raster {
    fn default() -> Self {
        Self::null()
    }
}
