use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::data::ImageRef;
use crate::error::Result;

/// Extensions listed from a folder (compared case-insensitively)
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Result of scanning a folder for images
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub folder: PathBuf,
    pub images: Vec<ImageRef>,
    /// Entries below the root that could not be read
    pub unreadable_count: usize,
}

/// The images of the currently opened folder plus the list filter.
#[derive(Debug, Default)]
pub struct Library {
    folder: Option<PathBuf>,
    images: Vec<ImageRef>,
    index: HashSet<ImageRef>,
    filter: String,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the library contents with a finished scan
    pub fn set_scan(&mut self, scan: ScanResult) {
        self.folder = Some(scan.folder);
        self.index = scan.images.iter().cloned().collect();
        self.images = scan.images;
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    pub fn contains(&self, image: &ImageRef) -> bool {
        self.index.contains(image)
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    /// Images whose name contains the filter text, in scan order
    ///
    /// Matching is case-insensitive against the file name without extension.
    pub fn visible(&self) -> Vec<ImageRef> {
        let needle = self.filter.to_lowercase();
        self.images
            .iter()
            .filter(|image| image.display_name().to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

/// Check whether `path` has one of the listed image extensions
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Recursively collect image files under `folder`
///
/// Entries are sorted by file name within each directory so the list order
/// is stable between scans. Failing to read the folder itself is an error;
/// unreadable entries below it are skipped and counted.
pub fn scan_folder(folder: &Path) -> Result<ScanResult> {
    tracing::info!("🔍 Scanning folder: {}", folder.display());

    let mut images = Vec::new();
    let mut unreadable_count = 0;

    for entry in WalkDir::new(folder)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                tracing::warn!("⚠️  Skipping unreadable entry: {}", e);
                unreadable_count += 1;
                continue;
            }
        };

        if entry.file_type().is_file() && is_image_path(entry.path()) {
            images.push(ImageRef::new(entry.path()));
        }
    }

    tracing::info!(
        "✅ Scan complete: {} images, {} unreadable entries",
        images.len(),
        unreadable_count
    );

    Ok(ScanResult {
        folder: folder.to_path_buf(),
        images,
        unreadable_count,
    })
}

/// Scan a folder on the blocking pool
pub async fn scan_folder_async(folder: PathBuf) -> std::result::Result<ScanResult, String> {
    tokio::task::spawn_blocking(move || scan_folder(&folder).map_err(|e| e.to_string()))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}
