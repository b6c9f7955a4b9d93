/// Image decoding and composition
///
/// This module handles:
/// - The shared raster type and canvas sizes
/// - Decoding full-resolution images for composition
/// - Generating list thumbnails
/// - Composing up to four images into one raster

pub mod compositor;
pub mod loader;
pub mod raster;
pub mod thumbnail;

pub use compositor::compose;
pub use loader::{FullImageLoader, ImageLoader};
pub use raster::{CanvasSize, Raster};
pub use thumbnail::ThumbnailGenerator;
