/// Selection model behind the image list
///
/// The picker owns which list entries are highlighted. User clicks produce a
/// change notification (the new selection) that the caller forwards to the
/// active staging area. When a staging area's stored selection is pushed back
/// into the picker (switching tabs), notifications are suppressed for the
/// duration so the reflected selection does not loop back into the area.

use super::data::ImageRef;

/// How a click combines with the existing selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickMode {
    /// Plain click: select only the clicked entry
    #[default]
    Replace,
    /// Ctrl/Cmd click: add or remove the clicked entry
    Toggle,
    /// Shift click: select the visible range from the last clicked entry
    Extend,
}

#[derive(Debug, Default)]
pub struct Picker {
    /// Selected entries in the order they were picked
    selected: Vec<ImageRef>,
    /// Start of the next shift-click range
    anchor: Option<ImageRef>,
    notifications_suppressed: bool,
}

impl Picker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &[ImageRef] {
        &self.selected
    }

    pub fn is_selected(&self, image: &ImageRef) -> bool {
        self.selected.contains(image)
    }

    /// Apply a click on `image`; `visible` is the list as currently shown
    ///
    /// Returns the new selection if it changed and notifications are live.
    pub fn click(
        &mut self,
        image: &ImageRef,
        mode: ClickMode,
        visible: &[ImageRef],
    ) -> Option<Vec<ImageRef>> {
        let before = self.selected.clone();

        match mode {
            ClickMode::Replace => {
                self.selected = vec![image.clone()];
                self.anchor = Some(image.clone());
            }
            ClickMode::Toggle => {
                if let Some(index) = self.selected.iter().position(|s| s == image) {
                    self.selected.remove(index);
                } else {
                    self.selected.push(image.clone());
                }
                self.anchor = Some(image.clone());
            }
            ClickMode::Extend => {
                let anchor_index = self
                    .anchor
                    .as_ref()
                    .and_then(|anchor| visible.iter().position(|v| v == anchor));
                let clicked_index = visible.iter().position(|v| v == image);

                match (anchor_index, clicked_index) {
                    (Some(start), Some(end)) => {
                        let (low, high) = (start.min(end), start.max(end));
                        self.selected = visible[low..=high].to_vec();
                    }
                    _ => {
                        self.selected = vec![image.clone()];
                        self.anchor = Some(image.clone());
                    }
                }
            }
        }

        if self.selected == before {
            return None;
        }
        self.notify()
    }

    /// Deselect everything
    pub fn clear(&mut self) -> Option<Vec<ImageRef>> {
        self.anchor = None;
        if self.selected.is_empty() {
            return None;
        }
        self.selected.clear();
        self.notify()
    }

    /// Highlight exactly `selection` without notifying anyone
    pub fn reflect(&mut self, selection: &[ImageRef]) {
        self.with_notifications_suppressed(|picker| {
            // Notifications are off, so the results are always None
            let _ = picker.clear();
            for image in selection {
                let _ = picker.click(image, ClickMode::Toggle, &[]);
            }
        });
    }

    /// Run `f` with change notifications turned off
    pub fn with_notifications_suppressed<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = std::mem::replace(&mut self.notifications_suppressed, true);
        let result = f(self);
        self.notifications_suppressed = previous;
        result
    }

    fn notify(&self) -> Option<Vec<ImageRef>> {
        if self.notifications_suppressed {
            None
        } else {
            Some(self.selected.clone())
        }
    }
}
