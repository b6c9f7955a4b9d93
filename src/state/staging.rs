/// Staging areas ("tabs")
///
/// Each area holds its own ordered selection of at most four images and a
/// cached composed preview. The set tracks which area is active and never
/// lets the last area be closed.

use crate::imaging::{compose, CanvasSize, ImageLoader, Raster};
use super::data::ImageRef;

/// Most images a staging area keeps; extra picks are dropped
pub const MAX_SELECTION: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AreaId(u64);

/// Preview composed for a particular canvas size
#[derive(Debug, Clone)]
struct CachedPreview {
    target: CanvasSize,
    raster: Raster,
}

#[derive(Debug)]
pub struct StagingArea {
    id: AreaId,
    label: String,
    selection: Vec<ImageRef>,
    /// Decoded selection, kept so a resize only recomposes
    sources: Option<Vec<Raster>>,
    cached: Option<CachedPreview>,
}

impl StagingArea {
    fn new(id: AreaId, label: String) -> Self {
        Self {
            id,
            label,
            selection: Vec::new(),
            sources: None,
            cached: None,
        }
    }

    pub fn id(&self) -> AreaId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn selection(&self) -> &[ImageRef] {
        &self.selection
    }

    /// Replace the selection, keeping only the first `MAX_SELECTION` images
    pub fn set_selection(&mut self, images: impl IntoIterator<Item = ImageRef>) {
        self.selection = images.into_iter().take(MAX_SELECTION).collect();
        self.sources = None;
        self.cached = None;
    }

    /// Composed preview of the selection for `target`
    ///
    /// An empty selection yields the null raster without touching the
    /// loader. Otherwise the result is cached until the selection or the
    /// target size changes. Sources are decoded once per selection; a new
    /// target size only recomposes them.
    pub fn composed_preview(&mut self, target: CanvasSize, loader: &dyn ImageLoader) -> Raster {
        if self.selection.is_empty() {
            self.sources = None;
            self.cached = None;
            return Raster::null();
        }

        if let Some(cached) = &self.cached {
            if cached.target == target {
                return cached.raster.clone();
            }
        }

        let selection = &self.selection;
        let sources = self
            .sources
            .get_or_insert_with(|| loader.load_all(selection));
        let raster = compose(sources, target);
        self.cached = Some(CachedPreview {
            target,
            raster: raster.clone(),
        });
        raster
    }
}

/// All open staging areas plus the active one
#[derive(Debug)]
pub struct StagingAreaSet {
    areas: Vec<StagingArea>,
    active: usize,
    next_id: u64,
}

impl StagingAreaSet {
    /// Create a set with a single empty, active area
    pub fn new() -> Self {
        let mut set = Self {
            areas: Vec::new(),
            active: 0,
            next_id: 0,
        };
        set.add_area();
        set
    }

    pub fn areas(&self) -> &[StagingArea] {
        &self.areas
    }

    /// Append a new empty area and make it active
    pub fn add_area(&mut self) -> AreaId {
        let id = AreaId(self.next_id);
        self.next_id += 1;

        let label = format!("Tab {}", self.areas.len() + 1);
        tracing::debug!("➕ Added staging area {:?} ({})", id, label);

        self.areas.push(StagingArea::new(id, label));
        self.active = self.areas.len() - 1;
        id
    }

    /// Remove an area; the last remaining area is never removed
    ///
    /// Returns whether an area was removed. Closing the active area
    /// activates its right neighbor, or the new last area.
    pub fn close_area(&mut self, id: AreaId) -> bool {
        if self.areas.len() <= 1 {
            return false;
        }
        let Some(index) = self.index_of(id) else {
            return false;
        };

        self.areas.remove(index);
        if index < self.active || self.active >= self.areas.len() {
            self.active -= 1;
        }

        tracing::debug!("✖️  Closed staging area {:?}", id);
        true
    }

    /// Make `id` the active area; unknown ids are ignored
    pub fn set_active(&mut self, id: AreaId) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.active = index;
                tracing::debug!("🗂️  Activated staging area {:?}", id);
                true
            }
            None => false,
        }
    }

    pub fn active(&self) -> &StagingArea {
        &self.areas[self.active]
    }

    pub fn active_mut(&mut self) -> &mut StagingArea {
        &mut self.areas[self.active]
    }

    pub fn active_id(&self) -> AreaId {
        self.active().id
    }

    /// Store a selection picked in the image list into the active area
    pub fn sync_selection_from_source(&mut self, images: impl IntoIterator<Item = ImageRef>) {
        self.active_mut().set_selection(images);
    }

    /// Selection the image list should highlight for the active area
    ///
    /// The caller must apply it with its own change notifications
    /// suppressed, otherwise it comes straight back through
    /// `sync_selection_from_source`.
    pub fn reflect_active_selection_to_source(&self) -> &[ImageRef] {
        self.active().selection()
    }

    fn index_of(&self, id: AreaId) -> Option<usize> {
        self.areas.iter().position(|area| area.id == id)
    }
}

impl Default for StagingAreaSet {
    fn default() -> Self {
        Self::new()
    }
}
