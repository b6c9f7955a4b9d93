/// Shared data structures for the application state

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Handle to one image file on disk
///
/// Two refs are equal when they point at the same path, regardless of the
/// file's contents. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageRef(Arc<PathBuf>);

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(Arc::new(path.into()))
    }

    /// Full path to the image file
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// File name without extension (e.g., "goblin_camp" for "goblin_camp.png")
    pub fn display_name(&self) -> String {
        self.0
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_by_path() {
        let a = ImageRef::new("/maps/cave.png");
        let b = ImageRef::new(PathBuf::from("/maps/cave.png"));
        let c = ImageRef::new("/maps/cave.jpg");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(ImageRef::new("/maps/Dragon Lair.JPEG").display_name(), "Dragon Lair");
        assert_eq!(ImageRef::new("tavern.v2.png").display_name(), "tavern.v2");
    }
}
