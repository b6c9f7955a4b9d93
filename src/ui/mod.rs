/// View helpers for the main and display windows
///
/// - `layout.rs` - canvas sizes of the preview panes
/// - `widgets.rs` - image handles, list rows, tab strip

pub mod layout;
pub mod widgets;
