//! Pane geometry of the main window
//!
//! Composition happens before the view is built, so the canvas size of each
//! preview is derived here from the window size using the same constants the
//! view lays itself out with.

use iced::Size;

use crate::imaging::CanvasSize;

pub const MAIN_WINDOW_WIDTH: f32 = 1280.0;
pub const MAIN_WINDOW_HEIGHT: f32 = 800.0;

/// Width of the folder/filter/list panel
pub const LEFT_PANEL_WIDTH: f32 = 320.0;
pub const PADDING: f32 = 10.0;
pub const TAB_BAR_HEIGHT: f32 = 40.0;
pub const BUTTON_ROW_HEIGHT: f32 = 44.0;

/// Canvas sizes of the two previews on the right-hand side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneSizes {
    /// Active tab's preview (top half)
    pub staging_preview: CanvasSize,
    /// Output preview (bottom half)
    pub output_preview: CanvasSize,
}

impl PaneSizes {
    pub fn for_window(window: Size) -> Self {
        // Outer padding on both sides plus the gap between the panels
        let right_width = window.width - LEFT_PANEL_WIDTH - 3.0 * PADDING;
        let half_height = (window.height - 3.0 * PADDING) / 2.0;

        Self {
            staging_preview: to_canvas(Size::new(
                right_width,
                half_height - TAB_BAR_HEIGHT - BUTTON_ROW_HEIGHT,
            )),
            output_preview: to_canvas(Size::new(right_width, half_height - BUTTON_ROW_HEIGHT)),
        }
    }
}

/// The display window shows the output edge to edge
pub fn display_canvas(window: Size) -> CanvasSize {
    to_canvas(window)
}

/// Whole logical pixels, negative sizes clamp to zero
pub fn to_canvas(size: Size) -> CanvasSize {
    CanvasSize::new(
        size.width.max(0.0).floor() as u32,
        size.height.max(0.0).floor() as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_panes() {
        let panes = PaneSizes::for_window(Size::new(MAIN_WINDOW_WIDTH, MAIN_WINDOW_HEIGHT));
        assert_eq!(panes.staging_preview, CanvasSize::new(930, 301));
        assert_eq!(panes.output_preview, CanvasSize::new(930, 341));
    }

    #[test]
    fn test_tiny_window_is_degenerate() {
        let panes = PaneSizes::for_window(Size::new(200.0, 100.0));
        assert!(panes.staging_preview.is_degenerate());
        assert!(panes.output_preview.is_degenerate());
    }

    #[test]
    fn test_display_canvas_truncates() {
        assert_eq!(display_canvas(Size::new(1919.6, 1080.2)), CanvasSize::new(1919, 1080));
    }
}
