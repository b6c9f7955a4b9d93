/// The promoted output image
///
/// "Update Output Image" copies the active staging area's selection here.
/// Source images are decoded once per promotion; every output surface (the
/// output pane, the display window) then gets its own composition sized to
/// its viewport.

use crate::imaging::{compose, CanvasSize, ImageLoader, Raster};
use super::data::ImageRef;
use super::staging::MAX_SELECTION;

#[derive(Debug, Default)]
pub struct OutputStage {
    selection: Vec<ImageRef>,
    sources: Vec<Raster>,
}

impl OutputStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take over `selection` and decode its images
    pub fn promote(&mut self, selection: &[ImageRef], loader: &dyn ImageLoader) {
        let selection = &selection[..selection.len().min(MAX_SELECTION)];
        self.sources = loader.load_all(selection);
        self.selection = selection.to_vec();

        tracing::info!("🖼️  Promoted {} images to output", self.selection.len());
    }

    pub fn clear(&mut self) {
        self.selection.clear();
        self.sources.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    pub fn selection(&self) -> &[ImageRef] {
        &self.selection
    }

    /// Compose the promoted images for a surface of `target` size
    pub fn render(&self, target: CanvasSize) -> Raster {
        if self.is_empty() {
            return Raster::null();
        }
        compose(&self.sources, target)
    }
}
