/// State management module
///
/// This module handles all application state, including:
/// - Image references and the scanned folder (data.rs, library.rs)
/// - The image list's selection model (picker.rs)
/// - Staging areas and their cached previews (staging.rs)
/// - The promoted output image (output.rs)
/// - Persisted user settings (settings.rs)

pub mod data;
pub mod library;
pub mod output;
pub mod picker;
pub mod settings;
pub mod staging;
